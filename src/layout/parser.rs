//! Layout parser - compiles a layout string into a slot map.
//!
//! A layout is ASCII art: one character per slot, nine per row, one to six
//! rows. Every position holding the same character belongs to that
//! character's slot set.
//!
//! ```text
//! #########      '#' -> [0..=9, 17, 18, 19, 20, 22, 24, 25, 26]
//! #       #      ' ' -> [10..=16]
//! ###<#>###      '<' -> [21]   '>' -> [23]
//! ```

use std::collections::HashMap;

use crate::error::{LayoutIssue, MenuError, Result};
use crate::types::{MAX_SLOTS, ROW_WIDTH, Rows};

// =============================================================================
// Normalization
// =============================================================================

/// Strip structural line breaks. Spaces are layout characters and stay.
pub fn normalize(raw: &str) -> String {
    raw.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Check a normalized layout length and return its row count.
pub fn validate_len(len: usize) -> Result<Rows> {
    if len == 0 {
        return Err(MenuError::InvalidLayout { len, issue: LayoutIssue::Empty });
    }
    if len % ROW_WIDTH != 0 {
        return Err(MenuError::InvalidLayout { len, issue: LayoutIssue::NotRowAligned });
    }
    if len > MAX_SLOTS {
        return Err(MenuError::InvalidLayout { len, issue: LayoutIssue::TooManyRows });
    }
    Rows::from_slot_count(len).ok_or(MenuError::InvalidLayout {
        len,
        issue: LayoutIssue::NotRowAligned,
    })
}

// =============================================================================
// Layout
// =============================================================================

/// A compiled layout: the normalized characters plus a character → slots index.
///
/// Slot lists are ascending. Characters iterate in first-seen order so redraws
/// are deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    chars: Vec<char>,
    rows: Rows,
    order: Vec<char>,
    slots: HashMap<char, Vec<usize>>,
}

impl Layout {
    /// Normalize and compile a layout string.
    ///
    /// Fails with [`MenuError::InvalidLayout`] when the normalized length is
    /// not a positive multiple of 9 or exceeds 54.
    pub fn parse(raw: &str) -> Result<Self> {
        let chars: Vec<char> = normalize(raw).chars().collect();
        let rows = validate_len(chars.len())?;

        let mut order = Vec::new();
        let mut slots: HashMap<char, Vec<usize>> = HashMap::new();
        for (slot, &c) in chars.iter().enumerate() {
            slots
                .entry(c)
                .or_insert_with(|| {
                    order.push(c);
                    Vec::new()
                })
                .push(slot);
        }

        Ok(Self { chars, rows, order, slots })
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false for a parsed layout.
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn rows(&self) -> Rows {
        self.rows
    }

    /// Character at a slot.
    pub fn char_at(&self, slot: usize) -> Option<char> {
        self.chars.get(slot).copied()
    }

    /// Slots using a character, ascending. Empty if the character is absent.
    pub fn slots_of(&self, c: char) -> &[usize] {
        self.slots.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, c: char) -> bool {
        self.slots.contains_key(&c)
    }

    /// Distinct characters in first-seen order.
    pub fn characters(&self) -> impl Iterator<Item = char> + '_ {
        self.order.iter().copied()
    }

    /// The normalized layout string.
    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_row_count_compiles() {
        for rows in 1..=6 {
            let raw = "#".repeat(rows * ROW_WIDTH);
            let layout = Layout::parse(&raw).unwrap();
            assert_eq!(layout.len(), rows * ROW_WIDTH);
            assert_eq!(layout.rows().count(), rows);
            assert_eq!(layout.slots_of('#').len(), rows * ROW_WIDTH);
        }
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        for len in 0..=70 {
            let valid = len > 0 && len % ROW_WIDTH == 0 && len / ROW_WIDTH <= 6;
            let result = Layout::parse(&"x".repeat(len));
            assert_eq!(result.is_ok(), valid, "length {len}");
            if !valid {
                assert!(matches!(result, Err(MenuError::InvalidLayout { len: l, .. }) if l == len));
            }
        }
    }

    #[test]
    fn test_invalid_issue_reported() {
        assert_eq!(
            Layout::parse("AB###").unwrap_err(),
            MenuError::InvalidLayout { len: 5, issue: LayoutIssue::NotRowAligned }
        );
        assert_eq!(
            Layout::parse(&"#".repeat(63)).unwrap_err(),
            MenuError::InvalidLayout { len: 63, issue: LayoutIssue::TooManyRows }
        );
        assert_eq!(
            Layout::parse("\n\n").unwrap_err(),
            MenuError::InvalidLayout { len: 0, issue: LayoutIssue::Empty }
        );
    }

    #[test]
    fn test_newlines_stripped_spaces_kept() {
        let layout = Layout::parse("#########\n#   X   #\r\n#########").unwrap();
        assert_eq!(layout.len(), 27);
        assert_eq!(layout.slots_of(' '), &[10, 11, 12, 14, 15, 16]);
        assert_eq!(layout.slots_of('X'), &[13]);
        assert_eq!(layout.char_at(13), Some('X'));
    }

    #[test]
    fn test_slot_sets_ascending_and_first_seen_order() {
        let layout = Layout::parse("ab#ba####").unwrap();
        assert_eq!(layout.characters().collect::<Vec<_>>(), vec!['a', 'b', '#']);
        assert_eq!(layout.slots_of('a'), &[0, 4]);
        assert_eq!(layout.slots_of('b'), &[1, 3]);
        assert_eq!(layout.slots_of('#'), &[2, 5, 6, 7, 8]);
        assert!(layout.slots_of('z').is_empty());
        assert!(!layout.contains('z'));
    }

    #[test]
    fn test_bordered_layout_with_controls() {
        let layout = Layout::parse("#########\n#       #\n###<#>###").unwrap();
        let border: Vec<usize> = (0..=9).chain([17, 18, 19, 20, 22, 24, 25, 26]).collect();
        assert_eq!(layout.slots_of('#'), border.as_slice());
        assert_eq!(layout.slots_of(' '), (10..=16).collect::<Vec<_>>().as_slice());
        assert_eq!(layout.slots_of('<'), &[21]);
        assert_eq!(layout.slots_of('>'), &[23]);
    }

    #[test]
    fn test_as_string_round_trips_normalized() {
        let layout = Layout::parse("#########\n#########").unwrap();
        assert_eq!(layout.as_string(), "#".repeat(18));
    }
}
