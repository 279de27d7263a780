//! Scroll Window - a viewport over a backing list.
//!
//! The content-region slots of a layout form a fixed-size window. Region slot
//! `i` (in ascending slot order) shows backing entry `offset + i`:
//!
//! ```text
//! backing:  [i0 i1 i2 i3 i4]        window size 2
//! offset 0:  ^^^^^                  → [i0, i1]
//! offset 2:        ^^^^^            → [i2, i3]
//! offset 4:              ^^ --      → [i4, empty]
//! ```
//!
//! The backing list can be replaced at any time. The offset is not reset on
//! replacement; an offset past the new end simply renders an empty window.

use tracing::trace;

use super::element::{Element, ElementRef, same_element};
use super::slot_table::{Resolved, SlotTable};
use crate::renderer::Surface;
use crate::types::Stack;

// =============================================================================
// SCROLL BOUNDS
// =============================================================================

/// Compute the offset after scrolling by `delta`, or `None` if the move is
/// rejected.
///
/// Rejected when:
/// - the new offset would be negative
/// - no backing entries would remain visible (`backing - proposed <= 0`)
/// - scrolling forward, fewer entries would remain than the window size minus
///   the step (`window - (backing - proposed) > delta`), so the last page is
///   never skipped past
pub fn check_scroll(offset: usize, delta: i32, backing: usize, window: usize) -> Option<usize> {
    let delta = i64::from(delta);
    let proposed = offset as i64 + delta;
    if proposed < 0 {
        return None;
    }
    let remaining = backing as i64 - proposed;
    if remaining <= 0 {
        return None;
    }
    if delta > 0 && window as i64 - remaining > delta {
        return None;
    }
    Some(proposed as usize)
}

// =============================================================================
// SCROLL WINDOW
// =============================================================================

#[derive(Debug, Default)]
pub struct ScrollWindow {
    content: Vec<Option<ElementRef>>,
    offset: usize,
}

impl ScrollWindow {
    pub fn new(content: Vec<Option<ElementRef>>) -> Self {
        Self { content, offset: 0 }
    }

    /// Index of the backing entry shown in the first region slot.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The backing list.
    pub fn content(&self) -> &[Option<ElementRef>] {
        &self.content
    }

    /// Project the backing list onto the region slots of `table`.
    ///
    /// Returns the number of surface writes.
    pub fn fill(&self, table: &mut SlotTable, surface: &mut dyn Surface) -> usize {
        let region = table.region_slots().to_vec();
        let mut writes = 0;
        for (position, slot) in region.into_iter().enumerate() {
            if self.project(table, position, slot, surface) {
                writes += 1;
            }
        }
        writes
    }

    /// Move the window by `delta` entries and refill.
    ///
    /// Returns false (and changes nothing) if [`check_scroll`] rejects the move.
    pub fn scroll(&mut self, delta: i32, table: &mut SlotTable, surface: &mut dyn Surface) -> bool {
        let window = table.region_slots().len();
        let Some(offset) = check_scroll(self.offset, delta, self.content.len(), window) else {
            trace!(offset = self.offset, delta, backing = self.content.len(), window, "scroll rejected");
            return false;
        };
        trace!(from = self.offset, to = offset, "scrolled");
        self.offset = offset;
        self.fill(table, surface);
        true
    }

    /// Return to the first entry and refill. False if already there.
    pub fn scroll_to_start(&mut self, table: &mut SlotTable, surface: &mut dyn Surface) -> bool {
        if self.offset == 0 {
            return false;
        }
        self.offset = 0;
        self.fill(table, surface);
        true
    }

    /// Replace the backing list and refill. The offset is kept as is.
    pub fn set_content(&mut self, content: Vec<Option<ElementRef>>, table: &mut SlotTable, surface: &mut dyn Surface) {
        self.content = content;
        self.fill(table, surface);
    }

    /// Redraw region slots currently showing `element`.
    pub fn refresh_element(&self, element: &Element, table: &mut SlotTable, surface: &mut dyn Surface) -> usize {
        self.refresh_where(table, surface, |shown| same_element(shown, element))
    }

    /// Redraw region slots currently showing a mutable element.
    pub fn refresh_mutable(&self, table: &mut SlotTable, surface: &mut dyn Surface) -> usize {
        self.refresh_where(table, surface, Element::is_mutable)
    }

    fn refresh_where<F>(&self, table: &mut SlotTable, surface: &mut dyn Surface, matches: F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let region = table.region_slots().to_vec();
        let mut writes = 0;
        for (position, slot) in region.into_iter().enumerate() {
            let shown = self.entry(position).is_some_and(|element| matches(element));
            if shown && self.project(table, position, slot, surface) {
                writes += 1;
            }
        }
        writes
    }

    fn entry(&self, position: usize) -> Option<&ElementRef> {
        self.content.get(self.offset + position).and_then(Option::as_ref)
    }

    fn project(&self, table: &mut SlotTable, position: usize, slot: usize, surface: &mut dyn Surface) -> bool {
        match self.entry(position) {
            Some(element) => {
                let display = element.display();
                table.place(slot, Resolved::Element(element.clone()), &display, surface)
            }
            None => table.place(slot, Resolved::Placeholder, &Stack::EMPTY, surface),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::layout::Layout;
    use crate::renderer::GridSurface;
    use crate::types::Indicator;

    /// Table with `window` region slots (' ') followed by border ('#').
    fn region_table(window: usize, surface: &mut GridSurface) -> SlotTable {
        let raw: String = (0..9).map(|i| if i < window { ' ' } else { '#' }).collect();
        SlotTable::compile(
            Layout::parse(&raw).unwrap(),
            HashMap::from([('#', Element::fixed(Stack::new('#')))]),
            HashMap::from([(Indicator::ContentRegion, ' ')]),
            surface,
        )
        .unwrap()
    }

    fn items(n: usize) -> Vec<Option<ElementRef>> {
        (0..n)
            .map(|i| Some(Element::fixed(Stack::new(char::from_digit(i as u32 % 36, 36).unwrap()))))
            .collect()
    }

    fn shown(surface: &GridSurface, window: usize) -> Vec<char> {
        surface.cells()[..window]
            .iter()
            .map(|cell| if cell.is_empty() { '_' } else { cell.glyph })
            .collect()
    }

    #[test]
    fn test_two_slot_window_over_five_items() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(2, &mut surface);
        let mut window = ScrollWindow::new(items(5));
        window.fill(&mut table, &mut surface);
        assert_eq!(shown(&surface, 2), vec!['0', '1']);

        assert!(window.scroll(2, &mut table, &mut surface));
        assert_eq!(window.offset(), 2);
        assert_eq!(shown(&surface, 2), vec!['2', '3']);

        // remaining 1, 2 - 1 = 1 is not > 2: accepted
        assert!(window.scroll(2, &mut table, &mut surface));
        assert_eq!(window.offset(), 4);
        assert_eq!(shown(&surface, 2), vec!['4', '_']);

        // remaining -1: rejected
        assert!(!window.scroll(2, &mut table, &mut surface));
        assert_eq!(window.offset(), 4);
    }

    #[test]
    fn test_backward_past_zero_rejected() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(3, &mut surface);
        let mut window = ScrollWindow::new(items(10));
        window.fill(&mut table, &mut surface);
        surface.reset_writes();

        for k in 1..20 {
            assert!(!window.scroll(-k, &mut table, &mut surface));
            assert_eq!(window.offset(), 0);
        }
        assert_eq!(surface.writes(), 0);
    }

    #[test]
    fn test_forward_scroll_converges() {
        for backing in 1..=20 {
            for size in 1..=7 {
                for step in 1..=size as i32 {
                    let mut offset = 0;
                    while let Some(next) = check_scroll(offset, step, backing, size) {
                        assert!(next > offset);
                        offset = next;
                    }
                    let remaining = backing - offset;
                    assert!(remaining > 0 && remaining <= size, "N={backing} W={size} step={step} O={offset}");
                    assert_eq!(check_scroll(offset, step, backing, size), None);
                    if remaining < size {
                        for k in 1..=size as i32 * 2 {
                            assert_eq!(check_scroll(offset, k, backing, size), None);
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_backward_scroll_always_allowed_within_bounds() {
        assert_eq!(check_scroll(5, -2, 10, 3), Some(3));
        assert_eq!(check_scroll(5, -5, 10, 3), Some(0));
        assert_eq!(check_scroll(5, -6, 10, 3), None);
        // Backward from a dangling offset past a shortened list stays rejected
        // until the window shows something again.
        assert_eq!(check_scroll(8, -1, 5, 3), None);
        assert_eq!(check_scroll(8, -4, 5, 3), Some(4));
    }

    #[test]
    fn test_fill_twice_writes_nothing() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(4, &mut surface);
        let window = ScrollWindow::new(items(6));
        assert_eq!(window.fill(&mut table, &mut surface), 4);
        surface.reset_writes();
        assert_eq!(window.fill(&mut table, &mut surface), 0);
        assert_eq!(surface.writes(), 0);
    }

    #[test]
    fn test_shorter_content_self_heals() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(3, &mut surface);
        let mut window = ScrollWindow::new(items(9));
        window.fill(&mut table, &mut surface);
        assert!(window.scroll(3, &mut table, &mut surface));
        assert!(window.scroll(3, &mut table, &mut surface));
        assert_eq!(window.offset(), 6);

        window.set_content(items(4), &mut table, &mut surface);
        assert_eq!(window.offset(), 6);
        assert_eq!(shown(&surface, 3), vec!['_', '_', '_']);
        for slot in 0..3 {
            assert!(matches!(table.resolve(slot), Some(Resolved::Placeholder)));
        }
    }

    #[test]
    fn test_empty_entries_render_placeholder() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(3, &mut surface);
        let a = Element::fixed(Stack::new('a'));
        let window = ScrollWindow::new(vec![Some(a.clone()), None, Some(a)]);
        window.fill(&mut table, &mut surface);

        assert_eq!(shown(&surface, 3), vec!['a', '_', 'a']);
        assert!(matches!(table.resolve(1), Some(Resolved::Placeholder)));
        assert!(table.resolve(0).and_then(Resolved::element).is_some());
    }

    #[test]
    fn test_scroll_rewrites_only_changed_slots() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(3, &mut surface);
        let same = Element::fixed(Stack::new('s'));
        let mut content = vec![Some(same.clone()); 4];
        content.push(Some(Element::fixed(Stack::new('x'))));
        let mut window = ScrollWindow::new(content);
        window.fill(&mut table, &mut surface);
        surface.reset_writes();

        // [s s s] -> [s s s]: nothing to write
        assert!(window.scroll(1, &mut table, &mut surface));
        assert_eq!(surface.writes(), 0);
        // [s s s] -> [s s x]
        assert!(window.scroll(1, &mut table, &mut surface));
        assert_eq!(surface.writes(), 1);
    }

    #[test]
    fn test_scroll_to_start() {
        let mut surface = GridSurface::with_len(0);
        let mut table = region_table(2, &mut surface);
        let mut window = ScrollWindow::new(items(5));
        window.fill(&mut table, &mut surface);

        assert!(!window.scroll_to_start(&mut table, &mut surface));
        window.scroll(2, &mut table, &mut surface);
        assert!(window.scroll_to_start(&mut table, &mut surface));
        assert_eq!(window.offset(), 0);
        assert_eq!(shown(&surface, 2), vec!['0', '1']);
    }

    #[test]
    fn test_window_without_region_slots() {
        let mut surface = GridSurface::with_len(0);
        let mut table = SlotTable::compile(
            Layout::parse("#########").unwrap(),
            HashMap::from([('#', Element::fixed(Stack::new('#')))]),
            HashMap::from([(Indicator::ContentRegion, ' ')]),
            &mut surface,
        )
        .unwrap();
        let mut window = ScrollWindow::new(items(3));
        assert_eq!(window.fill(&mut table, &mut surface), 0);
        assert!(window.scroll(1, &mut table, &mut surface));
        assert_eq!(window.offset(), 1);
    }
}
