//! Slot Table - the live layout → element mapping of one menu.
//!
//! Holds the compiled layout, the character bindings, the indicator bindings
//! and the per-slot resolution cache used for click dispatch.
//!
//! # Invariant
//!
//! After every successful mutation, `resolved[slot]` equals what a fresh
//! computation from (layout, bindings, window state) would give for `slot`.
//! Indicator slots are written by their owning component (the scroll window)
//! through [`SlotTable::place`].
//!
//! All render paths go through `write_if_changed`, so unchanged slots cost no
//! surface writes.

use std::collections::HashMap;

use tracing::debug;

use super::element::{Element, ElementRef, same_element};
use crate::error::{MenuError, Result};
use crate::layout::Layout;
use crate::renderer::{Surface, write_if_changed};
use crate::types::{Indicator, Stack};

/// What a slot resolves to for click dispatch.
#[derive(Debug, Clone)]
pub enum Resolved {
    /// A bound or projected element. Clicks are forwarded to it.
    Element(ElementRef),
    /// A managed slot with nothing in it. Clicks are cancelled, not forwarded.
    Placeholder,
}

impl Resolved {
    pub fn element(&self) -> Option<&ElementRef> {
        match self {
            Resolved::Element(element) => Some(element),
            Resolved::Placeholder => None,
        }
    }
}

pub struct SlotTable {
    layout: Layout,
    bindings: HashMap<char, ElementRef>,
    indicators: HashMap<Indicator, char>,
    resolved: Vec<Option<Resolved>>,
}

impl SlotTable {
    /// Validate bindings against `layout` and render every non-indicator slot.
    ///
    /// Fails with [`MenuError::UnboundCharacter`] if a layout character has
    /// neither an element nor an indicator.
    pub fn compile(
        layout: Layout,
        bindings: HashMap<char, ElementRef>,
        indicators: HashMap<Indicator, char>,
        surface: &mut dyn Surface,
    ) -> Result<Self> {
        check_bound(&layout, &bindings, &indicators)?;
        surface.resize(layout.len());
        let mut table = Self {
            resolved: vec![None; layout.len()],
            layout,
            bindings,
            indicators,
        };
        table.render_all(surface);
        Ok(table)
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }

    /// Character carrying an indicator.
    pub fn indicator(&self, indicator: Indicator) -> Option<char> {
        self.indicators.get(&indicator).copied()
    }

    /// Slots of the content region, ascending. Empty without one.
    pub fn region_slots(&self) -> &[usize] {
        match self.indicator(Indicator::ContentRegion) {
            Some(c) => self.layout.slots_of(c),
            None => &[],
        }
    }

    /// Element bound to a character.
    pub fn element_for(&self, c: char) -> Option<&ElementRef> {
        self.bindings.get(&c)
    }

    /// All character bindings (including characters not in the layout).
    pub fn bindings(&self) -> impl Iterator<Item = (char, &ElementRef)> {
        self.bindings.iter().map(|(c, element)| (*c, element))
    }

    /// Cached resolution of a slot. `None` if out of range or unresolved.
    pub fn resolve(&self, slot: usize) -> Option<&Resolved> {
        self.resolved.get(slot).and_then(Option::as_ref)
    }

    /// Bind `element` to `c` and redraw every slot using `c`.
    ///
    /// Characters absent from the layout are stored for a later
    /// [`set_layout`](Self::set_layout). Returns the previous binding.
    pub fn set_element(&mut self, c: char, element: ElementRef, surface: &mut dyn Surface) -> Option<ElementRef> {
        let previous = self.bindings.insert(c, element);
        self.render_char(c, surface);
        previous
    }

    /// Replace the layout and redraw all non-indicator slots.
    ///
    /// On error the previous layout stays in effect. The caller refills
    /// indicator slots afterwards.
    pub fn set_layout(&mut self, raw: &str, surface: &mut dyn Surface) -> Result<()> {
        let layout = Layout::parse(raw)?;
        check_bound(&layout, &self.bindings, &self.indicators)?;
        debug!(slots = layout.len(), rows = layout.rows().count(), "layout replaced");

        surface.resize(layout.len());
        self.resolved = vec![None; layout.len()];
        self.layout = layout;
        self.render_all(surface);
        Ok(())
    }

    /// Redraw every slot whose character is bound to `element`.
    ///
    /// Returns the number of surface writes.
    pub fn notify_changed(&mut self, element: &Element, surface: &mut dyn Surface) -> usize {
        self.render_matching(surface, |bound| same_element(bound, element))
    }

    /// Redraw every slot bound to a mutable element.
    pub fn refresh_mutable(&mut self, surface: &mut dyn Surface) -> usize {
        self.render_matching(surface, Element::is_mutable)
    }

    /// Set the resolution and content of a single slot.
    ///
    /// Used by indicator owners. Returns true if the surface was written.
    pub fn place(&mut self, slot: usize, resolved: Resolved, content: &Stack, surface: &mut dyn Surface) -> bool {
        let Some(entry) = self.resolved.get_mut(slot) else {
            return false;
        };
        *entry = Some(resolved);
        write_if_changed(surface, slot, content)
    }

    fn is_indicator(&self, c: char) -> bool {
        self.indicators.values().any(|&marked| marked == c)
    }

    /// Render all slots of one character. Returns the number of writes.
    fn render_char(&mut self, c: char, surface: &mut dyn Surface) -> usize {
        if self.is_indicator(c) {
            return 0;
        }
        let Some(element) = self.bindings.get(&c) else {
            return 0;
        };
        let display = element.display();
        let mut writes = 0;
        for &slot in self.layout.slots_of(c) {
            self.resolved[slot] = Some(Resolved::Element(element.clone()));
            if write_if_changed(surface, slot, &display) {
                writes += 1;
            }
        }
        writes
    }

    /// Render characters whose binding satisfies `matches`, in layout order.
    fn render_matching<F>(&mut self, surface: &mut dyn Surface, matches: F) -> usize
    where
        F: Fn(&Element) -> bool,
    {
        let chars: Vec<char> = self
            .layout
            .characters()
            .filter(|c| self.bindings.get(c).is_some_and(|bound| matches(bound.as_ref())))
            .collect();
        chars.into_iter().map(|c| self.render_char(c, surface)).sum()
    }

    fn render_all(&mut self, surface: &mut dyn Surface) -> usize {
        let chars: Vec<char> = self.layout.characters().collect();
        chars.into_iter().map(|c| self.render_char(c, surface)).sum()
    }
}

fn check_bound(
    layout: &Layout,
    bindings: &HashMap<char, ElementRef>,
    indicators: &HashMap<Indicator, char>,
) -> Result<()> {
    for c in layout.characters() {
        if !bindings.contains_key(&c) && !indicators.values().any(|&marked| marked == c) {
            return Err(MenuError::UnboundCharacter(c));
        }
    }
    Ok(())
}
