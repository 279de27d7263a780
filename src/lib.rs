//! # slot-menu
//!
//! Layout engine for fixed-size slot-grid menus.
//!
//! A menu is a grid of nine slots per row and one to six rows. Its shape is
//! described by an ASCII layout string; every character stands for the element
//! bound to it, or for a managed region such as a scrollable content window.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! reactive state (scroll offset, last dispatched click).
//!
//! ## Architecture
//!
//! ```text
//! layout string → Layout → SlotTable (+ ScrollWindow) → Surface
//!                                 ↑
//!   host click → MenuRegistry → Menu::dispatch → Element::on_click
//! ```
//!
//! Every mutation redraws only the slots whose content changed. Clicks are
//! resolved through a per-slot cache that is kept consistent after every
//! mutation. Handlers may call back into the menu synchronously.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Stack, Attr, Rows, Indicator)
//! - [`layout`] - Layout string parsing and validation
//! - [`engine`] - Elements, slot table, scroll window, registry
//! - [`menu`] - Menu handle and builder
//! - [`renderer`] - Surface trait, in-memory and terminal surfaces
//! - [`state`] - Click events and the crossterm input bridge
//! - [`config`] - Declarative (JSON) menu specs

pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod menu;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{LayoutSource, MenuSpec};

pub use engine::{
    ClickHandler, ContainerId, Element, ElementRef, MenuRegistry, Resolved, ScrollWindow, SlotTable,
    check_scroll, same_element,
};

pub use error::{LayoutIssue, MenuError, Result};

pub use layout::Layout;

pub use menu::{Menu, MenuBuilder, MenuHandle};

pub use renderer::{GridSurface, Surface, TerminalSurface, write_if_changed};

pub use state::{ClickButton, ClickEvent, ClickModifiers};
