//! Core types for slot-menu.
//!
//! - [`Stack`] - the display content of one slot (what the host renders)
//! - [`Attr`] - display attribute flags
//! - [`Rows`] - the six legal grid heights
//! - [`Indicator`] - reserved markers for algorithmically managed slots

use std::fmt;

// =============================================================================
// Grid Constants
// =============================================================================

/// Slots per row. Fixed for every menu.
pub const ROW_WIDTH: usize = 9;

/// Maximum number of rows a layout may have.
pub const MAX_ROWS: usize = 6;

/// Maximum number of slots a layout may have.
pub const MAX_SLOTS: usize = ROW_WIDTH * MAX_ROWS;

// =============================================================================
// Display Attributes (bitflags)
// =============================================================================

bitflags::bitflags! {
    /// Display attributes as a bitfield for cheap storage and comparison.
    ///
    /// Combine with bitwise OR: `Attr::BOLD | Attr::GLINT`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Attr: u8 {
        const NONE = 0;
        const BOLD = 1 << 0;
        const DIM = 1 << 1;
        const ITALIC = 1 << 2;
        const UNDERLINE = 1 << 3;
        /// Enchantment-style shimmer. Terminal hosts render it as reverse video.
        const GLINT = 1 << 4;
    }
}

// =============================================================================
// Stack - The atomic unit of slot rendering
// =============================================================================

/// The content shown in a single slot.
///
/// Hosts treat this as opaque. The engine only compares stacks for equality
/// to skip redundant writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Stack {
    /// Glyph drawn for the slot.
    pub glyph: char,
    /// Display name (may carry host markup).
    pub label: String,
    /// Stack size. Zero means the slot is empty.
    pub count: u8,
    /// Attribute flags.
    pub attrs: Attr,
}

impl Stack {
    /// The empty placeholder.
    pub const EMPTY: Stack = Stack {
        glyph: ' ',
        label: String::new(),
        count: 0,
        attrs: Attr::NONE,
    };

    /// A single unlabeled item.
    pub fn new(glyph: char) -> Self {
        Self {
            glyph,
            label: String::new(),
            count: 1,
            attrs: Attr::NONE,
        }
    }

    /// A single item with a display name.
    pub fn labeled(glyph: char, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::new(glyph)
        }
    }

    pub fn with_count(mut self, count: u8) -> Self {
        self.count = count;
        self
    }

    pub fn with_attrs(mut self, attrs: Attr) -> Self {
        self.attrs = attrs;
        self
    }

    /// True for the empty placeholder (or any zero-sized stack).
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl Default for Stack {
    fn default() -> Self {
        Self::EMPTY
    }
}

// =============================================================================
// Rows - Legal grid heights
// =============================================================================

/// Number of rows in a menu grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rows {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
}

impl Rows {
    /// Every legal height, smallest first.
    pub const ALL: [Rows; MAX_ROWS] = [
        Rows::One,
        Rows::Two,
        Rows::Three,
        Rows::Four,
        Rows::Five,
        Rows::Six,
    ];

    /// Map a slot count to its row count.
    ///
    /// Returns `None` unless `slots` is a positive multiple of [`ROW_WIDTH`]
    /// no larger than [`MAX_SLOTS`].
    pub fn from_slot_count(slots: usize) -> Option<Rows> {
        if slots == 0 || slots % ROW_WIDTH != 0 {
            return None;
        }
        Self::ALL.get(slots / ROW_WIDTH - 1).copied()
    }

    pub fn count(self) -> usize {
        self as usize + 1
    }

    pub fn slot_count(self) -> usize {
        self.count() * ROW_WIDTH
    }
}

// =============================================================================
// Indicator
// =============================================================================

/// Reserved marker that hands a layout character's slots to an algorithm
/// instead of a single bound element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Indicator {
    /// The slots form the viewport of the menu's scroll window.
    ContentRegion,
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indicator::ContentRegion => f.write_str("content region"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_from_slot_count() {
        assert_eq!(Rows::from_slot_count(9), Some(Rows::One));
        assert_eq!(Rows::from_slot_count(27), Some(Rows::Three));
        assert_eq!(Rows::from_slot_count(54), Some(Rows::Six));

        assert_eq!(Rows::from_slot_count(0), None);
        assert_eq!(Rows::from_slot_count(5), None);
        assert_eq!(Rows::from_slot_count(63), None);
    }

    #[test]
    fn test_rows_counts() {
        for (i, rows) in Rows::ALL.iter().enumerate() {
            assert_eq!(rows.count(), i + 1);
            assert_eq!(rows.slot_count(), (i + 1) * ROW_WIDTH);
        }
    }

    #[test]
    fn test_stack_empty() {
        assert!(Stack::EMPTY.is_empty());
        assert_eq!(Stack::default(), Stack::EMPTY);
        assert!(!Stack::new('x').is_empty());
        assert_eq!(Stack::new('x').with_count(0), Stack { glyph: 'x', ..Stack::EMPTY });
    }

    #[test]
    fn test_stack_equality_is_structural() {
        let a = Stack::labeled('b', "Bow").with_attrs(Attr::GLINT);
        let b = Stack::labeled('b', "Bow").with_attrs(Attr::GLINT);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_count(2));
    }
}
