//! Layout Module
//!
//! Turns an ASCII layout string into a deterministic slot assignment.
//!
//! # Rules
//!
//! - Nine slots per row, one to six rows
//! - Line breaks are stripped before validation; spaces are ordinary characters
//! - Each distinct character owns the ordered set of slots where it appears
//!
//! # Example
//!
//! ```ignore
//! use slot_menu::layout::Layout;
//!
//! let layout = Layout::parse("#########\n# X Y Z #\n#########")?;
//! assert_eq!(layout.slots_of('X'), &[11]);
//! ```

mod parser;

pub use parser::*;
