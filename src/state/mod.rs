//! State Module - Event plumbing between the host and menus
//!
//! - **Click** - Click event type, buttons, modifier flags, cancellation
//! - **Input** - crossterm event source: coordinate mapping, polling, routing

mod click;
pub mod input;

pub use click::*;
