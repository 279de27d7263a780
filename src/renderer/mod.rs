//! Rendering surfaces.
//!
//! The engine does not draw anything itself. It writes [`Stack`]s into a
//! [`Surface`], a flat array of slot contents indexed `0..len`, and only when
//! the content at a slot actually changes.
//!
//! - [`GridSurface`] - in-memory surface (headless hosts, tests)
//! - [`TerminalSurface`] - crossterm-backed surface with dirty-slot flushing

mod terminal;

pub use terminal::*;

use crate::types::{ROW_WIDTH, Rows, Stack};

// =============================================================================
// Surface
// =============================================================================

/// A host rendering surface for one menu.
pub trait Surface {
    /// Number of addressable slots.
    fn len(&self) -> usize;

    /// Current content at a slot, `None` if out of range.
    fn get_cell(&self, slot: usize) -> Option<Stack>;

    /// Replace the content at a slot. Out-of-range writes are ignored.
    fn set_cell(&mut self, slot: usize, content: Stack);

    /// Change the slot count. Existing slots keep their content.
    fn resize(&mut self, slots: usize);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write `content` at `slot` unless the surface already shows it.
///
/// Returns true if a write happened.
pub fn write_if_changed(surface: &mut dyn Surface, slot: usize, content: &Stack) -> bool {
    if surface.get_cell(slot).as_ref() == Some(content) {
        return false;
    }
    surface.set_cell(slot, content.clone());
    true
}

// =============================================================================
// GridSurface
// =============================================================================

/// In-memory surface. Counts writes so callers can observe diffing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridSurface {
    cells: Vec<Stack>,
    writes: usize,
}

impl GridSurface {
    /// Create an empty surface sized for `rows`.
    pub fn new(rows: Rows) -> Self {
        Self::with_len(rows.slot_count())
    }

    pub fn with_len(slots: usize) -> Self {
        Self {
            cells: vec![Stack::EMPTY; slots],
            writes: 0,
        }
    }

    /// All cells in slot order.
    pub fn cells(&self) -> &[Stack] {
        &self.cells
    }

    /// Cell at a grid position.
    pub fn at(&self, row: usize, column: usize) -> Option<&Stack> {
        if column >= ROW_WIDTH {
            return None;
        }
        self.cells.get(row * ROW_WIDTH + column)
    }

    /// Total `set_cell` calls that landed in range.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn reset_writes(&mut self) {
        self.writes = 0;
    }
}

impl Surface for GridSurface {
    fn len(&self) -> usize {
        self.cells.len()
    }

    fn get_cell(&self, slot: usize) -> Option<Stack> {
        self.cells.get(slot).cloned()
    }

    fn set_cell(&mut self, slot: usize, content: Stack) {
        if let Some(cell) = self.cells.get_mut(slot) {
            *cell = content;
            self.writes += 1;
        }
    }

    fn resize(&mut self, slots: usize) {
        self.cells.resize(slots, Stack::EMPTY);
    }
}
