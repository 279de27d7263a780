//! Menu Registry - container id → live menu.
//!
//! The host's event source only knows a container id and a raw slot index.
//! The registry maps the id to its menu and forwards the click.
//!
//! Entries are weak: the registry never keeps a menu alive. Entries whose
//! menu has been dropped are pruned lazily on dispatch.
//!
//! # API
//!
//! - `MenuRegistry::new` - Create an empty registry (cheap to clone, shared)
//! - `dispatch` - Route a click to the menu registered under an id
//! - `get` / `unregister` / `len` - Lookup and lifecycle
//! - `last_dispatch` - Signal of the most recent delivered (id, slot)

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use spark_signals::{Signal, signal};
use tracing::trace;

use crate::menu::{Menu, MenuCore};
use crate::state::ClickEvent;

// =============================================================================
// Container IDs
// =============================================================================

thread_local! {
    /// Counter for generating unique container ids.
    static ID_COUNTER: Cell<u64> = const { Cell::new(0) };
}

/// Opaque identifier of a displayed menu container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContainerId(u64);

impl ContainerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "menu#{}", self.0)
    }
}

pub(crate) fn allocate_id() -> ContainerId {
    ID_COUNTER.with(|counter| {
        let id = counter.get();
        counter.set(id + 1);
        ContainerId(id)
    })
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Default)]
struct RegistryState {
    menus: HashMap<ContainerId, Weak<MenuCore>>,
}

/// Shared, weak index of live menus.
#[derive(Clone)]
pub struct MenuRegistry {
    inner: Rc<RefCell<RegistryState>>,
    last: Signal<Option<(ContainerId, i32)>>,
}

impl MenuRegistry {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(RegistryState::default())),
            last: signal(None),
        }
    }

    /// Track `menu`. Entries of dropped menus are pruned here.
    pub(crate) fn register(&self, menu: &Menu) {
        trace!(id = %menu.id(), "menu registered");
        let mut inner = self.inner.borrow_mut();
        inner.menus.retain(|_, core| core.strong_count() > 0);
        inner.menus.insert(menu.id(), menu.downgrade());
    }

    /// Remove a menu. Returns false if it was not registered here.
    pub fn unregister(&self, menu: &Menu) -> bool {
        self.inner.borrow_mut().menus.remove(&menu.id()).is_some()
    }

    /// Look up a live menu by id.
    pub fn get(&self, id: ContainerId) -> Option<Menu> {
        let core = self.inner.borrow().menus.get(&id)?.upgrade()?;
        Some(Menu::from_core(core))
    }

    /// Number of registered menus that are still alive.
    pub fn len(&self) -> usize {
        self.inner
            .borrow()
            .menus
            .values()
            .filter(|menu| menu.strong_count() > 0)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Route a click on `slot` to the menu registered as `container`.
    ///
    /// Unknown or dropped containers are ignored. Returns true if a menu
    /// received the event (the menu may still ignore an out-of-range slot).
    pub fn dispatch(&self, container: ContainerId, slot: i32, event: &mut ClickEvent) -> bool {
        let target = self.inner.borrow().menus.get(&container).map(Weak::upgrade);
        let menu = match target {
            Some(Some(core)) => Menu::from_core(core),
            Some(None) => {
                trace!(id = %container, "dropping dead registry entry");
                self.inner.borrow_mut().menus.remove(&container);
                return false;
            }
            None => {
                trace!(id = %container, slot, "click for unknown container ignored");
                return false;
            }
        };
        menu.dispatch(slot, event);
        self.last.set(Some((container, slot)));
        true
    }

    /// Signal of the most recent delivered click as (container, slot).
    pub fn last_dispatch(&self) -> Signal<Option<(ContainerId, i32)>> {
        self.last.clone()
    }
}

impl Default for MenuRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MenuRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<ContainerId> = self.inner.borrow().menus.keys().copied().collect();
        ids.sort();
        f.debug_struct("MenuRegistry").field("menus", &ids).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Element;
    use crate::types::Stack;

    fn menu(registry: &MenuRegistry) -> Menu {
        Menu::builder()
            .with_layout("#########")
            .unwrap()
            .bind_character('#', Element::fixed(Stack::new('#')))
            .with_registry(registry)
            .build()
            .unwrap()
    }

    #[test]
    fn test_ids_are_unique() {
        let a = allocate_id();
        let b = allocate_id();
        assert_ne!(a, b);
        assert!(b > a);
    }

    #[test]
    fn test_build_registers() {
        let registry = MenuRegistry::new();
        let menu = menu(&registry);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get(menu.id()).map(|found| found.id()), Some(menu.id()));
    }

    #[test]
    fn test_dispatch_unknown_container_ignored() {
        let registry = MenuRegistry::new();
        let other = MenuRegistry::new();
        let foreign = menu(&other);

        let mut event = ClickEvent::left();
        assert!(!registry.dispatch(foreign.id(), 0, &mut event));
        assert!(!event.is_cancelled());
        assert_eq!(registry.last_dispatch().get(), None);
    }

    #[test]
    fn test_dispatch_reaches_menu() {
        let registry = MenuRegistry::new();
        let menu = menu(&registry);

        let mut event = ClickEvent::left();
        assert!(registry.dispatch(menu.id(), 4, &mut event));
        assert!(event.is_cancelled());
        assert_eq!(event.slot, Some(4));
        assert_eq!(registry.last_dispatch().get(), Some((menu.id(), 4)));
    }

    #[test]
    fn test_registry_does_not_keep_menus_alive() {
        let registry = MenuRegistry::new();
        let id = menu(&registry).id();

        assert!(registry.get(id).is_none());
        assert_eq!(registry.len(), 0);
        let mut event = ClickEvent::left();
        assert!(!registry.dispatch(id, 0, &mut event));
        assert!(!event.is_cancelled());
    }

    #[test]
    fn test_dropped_menus_are_pruned() {
        let registry = MenuRegistry::new();
        for _ in 0..100 {
            drop(menu(&registry));
        }
        assert!(registry.inner.borrow().menus.len() <= 1);
        assert_eq!(registry.len(), 0);

        let kept = menu(&registry);
        assert_eq!(registry.inner.borrow().menus.len(), 1);
        assert_eq!(registry.get(kept.id()).map(|found| found.id()), Some(kept.id()));
    }

    #[test]
    fn test_unregister() {
        let registry = MenuRegistry::new();
        let menu = menu(&registry);
        assert!(registry.unregister(&menu));
        assert!(!registry.unregister(&menu));
        assert!(registry.is_empty());

        let mut event = ClickEvent::left();
        assert!(!registry.dispatch(menu.id(), 0, &mut event));
    }
}
