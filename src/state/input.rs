//! Input Module - Terminal event source
//!
//! Bridges crossterm's event system with menu click dispatch.
//! Provides coordinate → slot mapping, event conversion, polling and routing.
//!
//! # API
//!
//! - `slot_at` - Map a terminal cell to a raw slot index
//! - `convert_mouse_event` - Convert a crossterm mouse press to a click
//! - `poll_event` / `read_event` - Non-blocking / blocking event read
//! - `route_mouse_event` - Forward a mouse event to a registry
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use slot_menu::state::input::{poll_event, InputEvent};
//! use std::time::Duration;
//!
//! loop {
//!     match poll_event(Duration::from_millis(16), origin)? {
//!         Some(InputEvent::Click { slot, mut event }) => {
//!             registry.dispatch(menu.id(), slot, &mut event);
//!         }
//!         Some(InputEvent::Key(key)) if key.code == KeyCode::Char('q') => break,
//!         _ => {}
//!     }
//! }
//! ```

use std::io::stdout;
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyEvent, KeyModifiers,
    MouseButton as CrosstermMouseButton, MouseEvent as CrosstermMouseEvent, MouseEventKind,
    poll, read,
};
use crossterm::execute;

use super::click::{ClickButton, ClickEvent, ClickModifiers};
use crate::engine::{ContainerId, MenuRegistry};
use crate::renderer::CELL_WIDTH;
use crate::types::ROW_WIDTH;

/// Raw slot reported for clicks outside the grid.
pub const OUTSIDE_SLOT: i32 = -999;

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// Events the menu event loop cares about.
#[derive(Debug, Clone)]
pub enum InputEvent {
    /// Mouse press mapped to a raw slot index (may be out of range).
    Click { slot: i32, event: ClickEvent },
    /// Keyboard event, passed through untouched.
    Key(KeyEvent),
    /// Terminal resize (new width, height).
    Resize(u16, u16),
    /// No event or unhandled event type.
    None,
}

// =============================================================================
// COORDINATE MAPPING
// =============================================================================

/// Map a terminal cell to a raw slot index for a grid drawn at `origin`.
///
/// Cells left of or above the grid, or right of its ninth column, map to
/// [`OUTSIDE_SLOT`]. Cells below the last row map past the end; dispatch
/// ignores both.
pub fn slot_at(column: u16, row: u16, origin: (u16, u16)) -> i32 {
    if column < origin.0 || row < origin.1 {
        return OUTSIDE_SLOT;
    }
    let grid_column = usize::from((column - origin.0) / CELL_WIDTH);
    if grid_column >= ROW_WIDTH {
        return OUTSIDE_SLOT;
    }
    let grid_row = usize::from(row - origin.1);
    i32::try_from(grid_row * ROW_WIDTH + grid_column).unwrap_or(OUTSIDE_SLOT)
}

// =============================================================================
// MOUSE EVENT CONVERSION
// =============================================================================

/// Convert a crossterm mouse press into a raw slot and click.
///
/// Releases, drags, moves and wheel events yield `None`.
pub fn convert_mouse_event(event: CrosstermMouseEvent, origin: (u16, u16)) -> Option<(i32, ClickEvent)> {
    let MouseEventKind::Down(button) = event.kind else {
        return None;
    };
    let click = ClickEvent::new(convert_mouse_button(button))
        .with_modifiers(convert_modifiers(event.modifiers));
    Some((slot_at(event.column, event.row, origin), click))
}

fn convert_mouse_button(btn: CrosstermMouseButton) -> ClickButton {
    match btn {
        CrosstermMouseButton::Left => ClickButton::Left,
        CrosstermMouseButton::Right => ClickButton::Right,
        CrosstermMouseButton::Middle => ClickButton::Middle,
    }
}

fn convert_modifiers(mods: KeyModifiers) -> ClickModifiers {
    let mut out = ClickModifiers::NONE;
    if mods.contains(KeyModifiers::SHIFT) {
        out |= ClickModifiers::SHIFT;
    }
    if mods.contains(KeyModifiers::CONTROL) {
        out |= ClickModifiers::CTRL;
    }
    if mods.contains(KeyModifiers::ALT) {
        out |= ClickModifiers::ALT;
    }
    if mods.contains(KeyModifiers::META) {
        out |= ClickModifiers::META;
    }
    out
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration, origin: (u16, u16)) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(read_event(origin)?))
    } else {
        Ok(None)
    }
}

/// Read the next event (blocking).
pub fn read_event(origin: (u16, u16)) -> std::io::Result<InputEvent> {
    Ok(match read()? {
        CrosstermEvent::Mouse(mouse) => match convert_mouse_event(mouse, origin) {
            Some((slot, event)) => InputEvent::Click { slot, event },
            None => InputEvent::None,
        },
        CrosstermEvent::Key(key) => InputEvent::Key(key),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    })
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Forward a crossterm mouse event to the menu registered as `container`.
///
/// Returns the click if the event was a press (whether or not a menu took it).
pub fn route_mouse_event(
    registry: &MenuRegistry,
    container: ContainerId,
    event: CrosstermMouseEvent,
    origin: (u16, u16),
) -> Option<ClickEvent> {
    let (slot, mut click) = convert_mouse_event(event, origin)?;
    registry.dispatch(container, slot, &mut click);
    Some(click)
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================
