//! Menu Engine - elements, slot resolution, scrolling and dispatch routing.
//!
//! The engine manages the core data structures of a menu:
//! - Element: Fixed / Mutable / ScrollControl display + click units
//! - SlotTable: Layout bindings and the per-slot resolution cache
//! - ScrollWindow: Viewport of a backing list over the content region
//! - Registry: Container id → live menu, click routing
//!
//! # Architecture
//!
//! A menu is a grid of slots. Each slot resolves to an element (or to an empty
//! placeholder inside the content region):
//!
//! ```text
//! layout:   "#########"  "# >   < #"  "#########"
//! slot 9:   '#' → border element
//! slot 11:  '>' → scroll control (+1)
//! slot 13:  ' ' → content region → backing[offset + 2]
//! ```
//!
//! Every render path writes a slot only when its content changed.

mod element;
mod registry;
mod scroll_window;
mod slot_table;

pub use element::*;
pub use registry::*;
pub use scroll_window::*;
pub use slot_table::*;
