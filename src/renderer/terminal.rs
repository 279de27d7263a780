//! Terminal surface for dirty-slot rendering.
//!
//! `TerminalSurface` keeps the current slot contents plus the set of slots
//! written since the last flush. Flushing only emits those slots, so a scroll
//! that moves two items costs two cell redraws rather than a full repaint.
//!
//! # Algorithm
//!
//! 1. `set_cell` stores the content and marks the slot dirty
//! 2. `flush` queues MoveTo/SetAttribute/Print for dirty slots in slot order
//! 3. The writer is flushed once (single syscall for stdout)
//!
//! The surface is a cheap shared handle: hand one clone to the menu builder
//! and keep another for flushing from the event loop.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::rc::Rc;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute};
use crossterm::terminal::{Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};

use super::Surface;
use crate::types::{Attr, ROW_WIDTH, Rows, Stack};

/// Terminal columns used by one slot.
pub const CELL_WIDTH: u16 = 3;

struct TerminalState {
    cells: Vec<Stack>,
    dirty: BTreeSet<usize>,
    origin: (u16, u16),
}

/// Crossterm-backed surface. Clones share the same cells.
#[derive(Clone)]
pub struct TerminalSurface {
    state: Rc<RefCell<TerminalState>>,
}

impl TerminalSurface {
    /// Create a surface whose top-left slot is drawn at `origin` (column, row).
    pub fn new(rows: Rows, origin: (u16, u16)) -> Self {
        let slots = rows.slot_count();
        Self {
            state: Rc::new(RefCell::new(TerminalState {
                cells: vec![Stack::EMPTY; slots],
                dirty: (0..slots).collect(),
                origin,
            })),
        }
    }

    pub fn origin(&self) -> (u16, u16) {
        self.state.borrow().origin
    }

    /// Slots waiting to be drawn.
    pub fn dirty_count(&self) -> usize {
        self.state.borrow().dirty.len()
    }

    /// Mark every slot dirty. Next flush is a full redraw.
    pub fn invalidate(&self) {
        let mut state = self.state.borrow_mut();
        let len = state.cells.len();
        state.dirty = (0..len).collect();
    }

    /// Draw dirty slots. Returns the number of slots drawn.
    pub fn flush<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        let mut state = self.state.borrow_mut();
        let dirty = std::mem::take(&mut state.dirty);
        for &slot in &dirty {
            if let Some(cell) = state.cells.get(slot) {
                draw_cell(out, state.origin, slot, cell)?;
            }
        }
        out.flush()?;
        Ok(dirty.len())
    }

    /// Force a full redraw (no diffing).
    ///
    /// Use this after a terminal resize or when the screen is corrupted.
    pub fn render_full<W: Write>(&self, out: &mut W) -> io::Result<usize> {
        self.invalidate();
        self.flush(out)
    }

    /// Enter fullscreen mode (alternate screen buffer) and schedule a full redraw.
    pub fn enter_fullscreen<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, EnterAlternateScreen, Hide, Clear(ClearType::All))?;
        out.flush()?;
        self.invalidate();
        Ok(())
    }

    /// Exit fullscreen mode.
    pub fn exit_fullscreen<W: Write>(&self, out: &mut W) -> io::Result<()> {
        queue!(out, SetAttribute(Attribute::Reset), Show, LeaveAlternateScreen)?;
        out.flush()
    }
}

impl Surface for TerminalSurface {
    fn len(&self) -> usize {
        self.state.borrow().cells.len()
    }

    fn get_cell(&self, slot: usize) -> Option<Stack> {
        self.state.borrow().cells.get(slot).cloned()
    }

    fn set_cell(&mut self, slot: usize, content: Stack) {
        let mut state = self.state.borrow_mut();
        if let Some(cell) = state.cells.get_mut(slot) {
            *cell = content;
            state.dirty.insert(slot);
        }
    }

    fn resize(&mut self, slots: usize) {
        let mut state = self.state.borrow_mut();
        let old = state.cells.len();
        state.cells.resize(slots, Stack::EMPTY);
        state.dirty.retain(|&slot| slot < slots);
        state.dirty.extend(old.min(slots)..slots);
    }
}

fn draw_cell<W: Write>(out: &mut W, origin: (u16, u16), slot: usize, cell: &Stack) -> io::Result<()> {
    let column = origin.0 + (slot % ROW_WIDTH) as u16 * CELL_WIDTH;
    let row = origin.1 + (slot / ROW_WIDTH) as u16;
    queue!(out, MoveTo(column, row))?;
    for attr in attributes(cell.attrs) {
        queue!(out, SetAttribute(attr))?;
    }
    let glyph = if cell.is_empty() { '.' } else { cell.glyph };
    queue!(out, Print(format!(" {glyph} ")), SetAttribute(Attribute::Reset))
}

fn attributes(attrs: Attr) -> Vec<Attribute> {
    let mut out = Vec::new();
    if attrs.contains(Attr::BOLD) {
        out.push(Attribute::Bold);
    }
    if attrs.contains(Attr::DIM) {
        out.push(Attribute::Dim);
    }
    if attrs.contains(Attr::ITALIC) {
        out.push(Attribute::Italic);
    }
    if attrs.contains(Attr::UNDERLINE) {
        out.push(Attribute::Underlined);
    }
    if attrs.contains(Attr::GLINT) {
        out.push(Attribute::Reverse);
    }
    out
}
