//! Menu - a slot table, an optional scroll window and a rendering surface.
//!
//! `Menu` is a cheap, clonable handle. All operations run synchronously to
//! completion; click handlers invoked from [`Menu::dispatch`] may call back
//! into the menu (change a display, scroll) and those calls run inline.
//!
//! # API
//!
//! - `Menu::builder` - Configure and build a menu (see [`MenuBuilder`])
//! - `set_element` / `set_layout` / `set_content` - Mutations, redraw changed slots only
//! - `scroll` / `scroll_to_start` - Move the content window
//! - `dispatch` - Route a click on a raw slot index to its element
//! - `refresh_mutable` - Redraw every slot showing a mutable element
//!
//! # Example
//!
//! ```ignore
//! use slot_menu::{Element, Indicator, Menu, MenuRegistry, Stack};
//!
//! let registry = MenuRegistry::new();
//! let menu = Menu::builder()
//!     .with_layout("#########\n#       #\n###<#>###")?
//!     .bind_character('#', Element::fixed(Stack::new('#')))
//!     .bind_character('<', Element::scroll_control(-7, Stack::new('<'))?)
//!     .bind_character('>', Element::scroll_control(7, Stack::new('>'))?)
//!     .bind_indicator(' ', Indicator::ContentRegion)?
//!     .with_content(items)
//!     .with_registry(&registry)
//!     .build()?;
//!
//! registry.dispatch(menu.id(), 23, &mut ClickEvent::left()); // '>' scrolls by 7
//! ```

mod builder;

pub use builder::*;

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::Signal;
use tracing::{debug, trace};

use crate::engine::{ContainerId, Element, ElementRef, Resolved, ScrollWindow, SlotTable};
use crate::error::{MenuError, Result};
use crate::layout::Layout;
use crate::renderer::Surface;
use crate::state::ClickEvent;
use crate::types::{Indicator, Rows, Stack};

// =============================================================================
// Internal state
// =============================================================================

pub(crate) struct MenuCore {
    id: ContainerId,
    title: Option<String>,
    /// Present only for scrollable menus.
    offset: Option<Signal<usize>>,
    state: RefCell<MenuState>,
}

struct MenuState {
    table: SlotTable,
    window: Option<ScrollWindow>,
    surface: Box<dyn Surface>,
}

// =============================================================================
// Menu
// =============================================================================

#[derive(Clone)]
pub struct Menu {
    core: Rc<MenuCore>,
}

impl Menu {
    pub fn builder() -> MenuBuilder {
        MenuBuilder::new()
    }

    pub(crate) fn from_core(core: Rc<MenuCore>) -> Self {
        Self { core }
    }

    pub(crate) fn downgrade(&self) -> Weak<MenuCore> {
        Rc::downgrade(&self.core)
    }

    pub(crate) fn handle(&self) -> MenuHandle {
        MenuHandle {
            id: self.core.id,
            core: self.downgrade(),
        }
    }

    fn with_state<R>(&self, f: impl FnOnce(&mut SlotTable, Option<&mut ScrollWindow>, &mut dyn Surface) -> R) -> R {
        let mut state = self.core.state.borrow_mut();
        let MenuState { table, window, surface } = &mut *state;
        f(table, window.as_mut(), surface.as_mut())
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    pub fn id(&self) -> ContainerId {
        self.core.id
    }

    pub fn title(&self) -> Option<&str> {
        self.core.title.as_deref()
    }

    pub fn rows(&self) -> Rows {
        self.core.state.borrow().table.layout().rows()
    }

    /// Snapshot of the current layout.
    pub fn layout(&self) -> Layout {
        self.core.state.borrow().table.layout().clone()
    }

    pub fn indicator(&self, indicator: Indicator) -> Option<char> {
        self.core.state.borrow().table.indicator(indicator)
    }

    pub fn is_scrollable(&self) -> bool {
        self.core.offset.is_some()
    }

    /// Current scroll offset. Always 0 for menus without a content region.
    pub fn offset(&self) -> usize {
        self.core
            .state
            .borrow()
            .window
            .as_ref()
            .map_or(0, ScrollWindow::offset)
    }

    /// Reactive scroll offset, `None` for menus without a content region.
    pub fn offset_signal(&self) -> Option<Signal<usize>> {
        self.core.offset.clone()
    }

    /// Snapshot of the backing list. Empty for menus without a content region.
    pub fn content(&self) -> Vec<Option<ElementRef>> {
        self.core
            .state
            .borrow()
            .window
            .as_ref()
            .map(|window| window.content().to_vec())
            .unwrap_or_default()
    }

    /// What the surface currently shows at `slot`.
    pub fn cell(&self, slot: usize) -> Option<Stack> {
        self.core.state.borrow().surface.get_cell(slot)
    }

    /// Element a click on `slot` would reach.
    pub fn element_at(&self, slot: usize) -> Option<ElementRef> {
        self.core
            .state
            .borrow()
            .table
            .resolve(slot)
            .and_then(Resolved::element)
            .cloned()
    }

    // -------------------------------------------------------------------------
    // Mutations
    // -------------------------------------------------------------------------

    /// Bind `element` to `c` and redraw the slots of `c`.
    ///
    /// Returns the element previously bound to `c`. A character absent from the
    /// current layout is stored and takes effect on a later
    /// [`set_layout`](Self::set_layout).
    pub fn set_element(&self, c: char, element: ElementRef) -> Result<Option<ElementRef>> {
        let handle = self.handle();
        if !element.can_bind(Some(&handle)) {
            return Err(MenuError::AlreadyBound);
        }
        if element.scroll_step().is_some() && !self.is_scrollable() {
            return Err(MenuError::NoScrollWindow(c));
        }
        element.bind(&handle)?;
        debug!(id = %self.id(), character = %c, "element bound");
        Ok(self.with_state(|table, _, surface| table.set_element(c, element, surface)))
    }

    /// Replace the layout, then redraw and refill the content region.
    ///
    /// On error the previous layout stays in effect.
    pub fn set_layout(&self, raw: &str) -> Result<()> {
        self.with_state(|table, window, surface| {
            table.set_layout(raw, surface)?;
            if let Some(window) = window {
                window.fill(table, surface);
            }
            Ok(())
        })
    }

    /// Replace the backing list of the content region and refill it.
    ///
    /// The offset is not reset. Every element is bound to this menu; nothing
    /// changes if one of them belongs to another menu.
    pub fn set_content<I>(&self, content: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<ElementRef>>,
    {
        if !self.is_scrollable() {
            return Err(MenuError::InvalidArgument("menu has no content region"));
        }
        let content: Vec<Option<ElementRef>> = content.into_iter().collect();
        let handle = self.handle();
        if !content.iter().flatten().all(|element| element.can_bind(Some(&handle))) {
            return Err(MenuError::AlreadyBound);
        }
        for element in content.iter().flatten() {
            element.bind(&handle)?;
        }
        debug!(id = %self.id(), len = content.len(), "content replaced");
        self.with_state(|table, window, surface| {
            if let Some(window) = window {
                window.set_content(content, table, surface);
            }
        });
        Ok(())
    }

    /// Redraw every slot currently showing `element`.
    ///
    /// Returns the number of surface writes.
    pub fn notify_changed(&self, element: &Element) -> usize {
        self.with_state(|table, window, surface| {
            let mut writes = table.notify_changed(element, surface);
            if let Some(window) = window {
                writes += window.refresh_element(element, table, surface);
            }
            writes
        })
    }

    /// Redraw every slot currently showing a mutable element.
    pub fn refresh_mutable(&self) -> usize {
        self.with_state(|table, window, surface| {
            let mut writes = table.refresh_mutable(surface);
            if let Some(window) = window {
                writes += window.refresh_mutable(table, surface);
            }
            writes
        })
    }

    // -------------------------------------------------------------------------
    // Scrolling
    // -------------------------------------------------------------------------

    /// Move the content window by `delta`. Returns false if rejected.
    pub fn scroll(&self, delta: i32) -> bool {
        let moved = self.with_state(|table, window, surface| {
            let window = window?;
            window.scroll(delta, table, surface).then(|| window.offset())
        });
        self.publish_offset(moved)
    }

    /// Return the content window to the first entry.
    pub fn scroll_to_start(&self) -> bool {
        let moved = self.with_state(|table, window, surface| {
            let window = window?;
            window.scroll_to_start(table, surface).then_some(0)
        });
        self.publish_offset(moved)
    }

    fn publish_offset(&self, moved: Option<usize>) -> bool {
        match (moved, &self.core.offset) {
            (Some(offset), Some(signal)) => {
                signal.set(offset);
                true
            }
            _ => false,
        }
    }

    // -------------------------------------------------------------------------
    // Dispatch
    // -------------------------------------------------------------------------

    /// Route a click on a raw slot index.
    ///
    /// Negative and out-of-range slots are ignored. A content-region slot
    /// showing nothing cancels the click without reaching any element.
    pub fn dispatch(&self, slot: i32, event: &mut ClickEvent) {
        let Ok(index) = usize::try_from(slot) else {
            trace!(id = %self.id(), slot, "negative slot ignored");
            return;
        };
        // Clone the target out so the handler can re-enter the menu.
        let target = self.core.state.borrow().table.resolve(index).cloned();
        match target {
            Some(Resolved::Element(element)) => {
                event.slot = Some(index);
                element.on_click(event);
            }
            Some(Resolved::Placeholder) => {
                event.slot = Some(index);
                event.cancel();
            }
            None => trace!(id = %self.id(), slot, "click outside menu ignored"),
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Menu")
            .field("id", &self.core.id)
            .field("title", &self.core.title)
            .field("scrollable", &self.is_scrollable())
            .finish()
    }
}

// =============================================================================
// MenuHandle
// =============================================================================

/// Non-owning back-reference from an element to its menu.
#[derive(Debug, Clone)]
pub struct MenuHandle {
    id: ContainerId,
    core: Weak<MenuCore>,
}

impl MenuHandle {
    pub fn id(&self) -> ContainerId {
        self.id
    }

    /// The menu, if it is still alive.
    pub fn upgrade(&self) -> Option<Menu> {
        self.core.upgrade().map(Menu::from_core)
    }

    pub fn same_menu(&self, other: &MenuHandle) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::engine::MenuRegistry;
    use crate::renderer::GridSurface;

    fn items(n: usize) -> Vec<Option<ElementRef>> {
        (0..n)
            .map(|i| Some(Element::fixed(Stack::new(char::from_digit(i as u32, 10).unwrap()))))
            .collect()
    }

    /// "AAA  BBBB": two region slots at 3 and 4.
    fn scrollable(registry: &MenuRegistry, content: Vec<Option<ElementRef>>) -> Menu {
        Menu::builder()
            .with_layout("AAA  BBBB")
            .unwrap()
            .bind_character('A', Element::fixed(Stack::new('a')))
            .bind_character('B', Element::fixed(Stack::new('b')))
            .bind_indicator(' ', Indicator::ContentRegion)
            .unwrap()
            .with_content(content)
            .with_registry(registry)
            .build()
            .unwrap()
    }

    #[test]
    fn test_accessors() {
        let registry = MenuRegistry::new();
        let menu = scrollable(&registry, items(3));
        assert_eq!(menu.rows(), Rows::One);
        assert_eq!(menu.layout().as_string(), "AAA  BBBB");
        assert_eq!(menu.indicator(Indicator::ContentRegion), Some(' '));
        assert!(menu.is_scrollable());
        assert_eq!(menu.title(), None);
        assert_eq!(menu.content().len(), 3);
        assert_eq!(menu.cell(0), Some(Stack::new('a')));
        assert_eq!(menu.cell(3), Some(Stack::new('0')));
        assert_eq!(menu.cell(4), Some(Stack::new('1')));
        assert_eq!(menu.cell(9), None);
    }

    #[test]
    fn test_scroll_publishes_offset() {
        let registry = MenuRegistry::new();
        let menu = scrollable(&registry, items(5));
        let offset = menu.offset_signal().unwrap();

        assert!(menu.scroll(2));
        assert_eq!(offset.get(), 2);
        assert!(!menu.scroll(-3));
        assert_eq!(offset.get(), 2);
        assert!(menu.scroll_to_start());
        assert_eq!(offset.get(), 0);
        assert_eq!(menu.offset(), 0);
    }

    #[test]
    fn test_placeholder_click_cancelled() {
        let registry = MenuRegistry::new();
        let menu = scrollable(&registry, items(1));

        let mut event = ClickEvent::left();
        menu.dispatch(4, &mut event);
        assert!(event.is_cancelled());
        assert_eq!(event.slot, Some(4));
        assert!(menu.element_at(4).is_none());
        assert!(menu.element_at(3).is_some());
    }

    #[test]
    fn test_set_layout_refills_region() {
        let registry = MenuRegistry::new();
        let menu = scrollable(&registry, items(3));

        menu.set_layout("   AAABBB").unwrap();
        assert_eq!(menu.cell(0), Some(Stack::new('0')));
        assert_eq!(menu.cell(2), Some(Stack::new('2')));
        assert_eq!(menu.cell(3), Some(Stack::new('a')));

        assert!(matches!(menu.set_layout("AAAA"), Err(MenuError::InvalidLayout { .. })));
        assert!(matches!(menu.set_layout("AAAAXAAAA"), Err(MenuError::UnboundCharacter('X'))));
        assert_eq!(menu.layout().as_string(), "   AAABBB");
    }

    #[test]
    fn test_set_element_deferred_until_layout_uses_it() {
        let registry = MenuRegistry::new();
        let menu = scrollable(&registry, items(0));
        let c = Element::fixed(Stack::new('c'));

        assert!(menu.set_element('C', c.clone()).unwrap().is_none());
        assert!(c.is_bound());
        assert_eq!(menu.cell(0), Some(Stack::new('a')));

        menu.set_layout("CCC  BBBB").unwrap();
        assert_eq!(menu.cell(0), Some(Stack::new('c')));
    }

    #[test]
    fn test_set_content_rejects_foreign_elements() {
        let registry = MenuRegistry::new();
        let first = scrollable(&registry, items(2));
        let second = scrollable(&registry, items(0));

        let owned = first.content();
        assert_eq!(second.set_content(owned), Err(MenuError::AlreadyBound));
        assert!(second.content().is_empty());
        assert_eq!(second.cell(3), Some(Stack::EMPTY));
    }

    #[test]
    fn test_set_content_on_fixed_menu_fails() {
        let registry = MenuRegistry::new();
        let menu = Menu::builder()
            .with_layout("#########")
            .unwrap()
            .bind_character('#', Element::fixed(Stack::new('#')))
            .with_registry(&registry)
            .build()
            .unwrap();

        assert!(matches!(menu.set_content(items(2)), Err(MenuError::InvalidArgument(_))));
        assert!(!menu.scroll(1));
        assert_eq!(menu.offset(), 0);
        assert!(menu.offset_signal().is_none());
    }

    #[test]
    fn test_refresh_mutable_redraws_changed_content() {
        let registry = MenuRegistry::new();
        let clicks = Rc::new(Cell::new(0));
        let counter = clicks.clone();
        let live = Element::mutable(Stack::new('m'), move |_| counter.set(counter.get() + 1));
        let menu = scrollable(&registry, vec![Some(live.clone()), None]);

        live.set_display(Stack::new('n')).unwrap();
        assert_eq!(menu.cell(3), Some(Stack::new('n')));
        assert_eq!(menu.refresh_mutable(), 0);

        let mut event = ClickEvent::left();
        menu.dispatch(3, &mut event);
        assert_eq!(clicks.get(), 1);
    }

    #[test]
    fn test_custom_surface() {
        let registry = MenuRegistry::new();
        let menu = Menu::builder()
            .with_layout("#########")
            .unwrap()
            .bind_character('#', Element::fixed(Stack::new('#')))
            .with_surface(GridSurface::with_len(0))
            .with_title("<b>Chest</b>")
            .with_registry(&registry)
            .build()
            .unwrap();
        assert_eq!(menu.cell(8), Some(Stack::new('#')));
        assert_eq!(menu.title(), Some("<b>Chest</b>"));
    }
}
