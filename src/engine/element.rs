//! Elements - bindable units of display + click behavior.
//!
//! The variant set is closed:
//!
//! - **Fixed** - constant display, every click is cancelled
//! - **Mutable** - display and click handler replaceable at runtime; a display
//!   change redraws every slot showing the element
//! - **ScrollControl** - constant display, a click cancels and scrolls the
//!   owning menu's window by a fixed non-zero step
//!
//! Identity is reference identity: two elements with equal displays are still
//! distinct. An element is owned by at most one menu, assigned once at bind
//! time.

use std::cell::{OnceCell, RefCell};
use std::fmt;
use std::rc::Rc;

use tracing::trace;

use crate::error::{MenuError, Result};
use crate::menu::{Menu, MenuHandle};
use crate::state::ClickEvent;
use crate::types::Stack;

/// Shared element handle. Bind the same handle to several characters to share
/// one element between them.
pub type ElementRef = Rc<Element>;

/// Click handler for mutable elements.
///
/// Held as `Rc` so dispatch can clone it out before calling; a handler may
/// replace itself while running.
pub type ClickHandler = Rc<dyn Fn(&mut ClickEvent)>;

enum ElementKind {
    Fixed {
        display: Stack,
    },
    Mutable {
        display: RefCell<Stack>,
        handler: RefCell<ClickHandler>,
    },
    ScrollControl {
        display: Stack,
        step: i32,
    },
}

pub struct Element {
    kind: ElementKind,
    owner: OnceCell<MenuHandle>,
}

impl Element {
    fn with_kind(kind: ElementKind) -> ElementRef {
        Rc::new(Self {
            kind,
            owner: OnceCell::new(),
        })
    }

    /// An immutable element that cancels every click.
    pub fn fixed(display: Stack) -> ElementRef {
        Self::with_kind(ElementKind::Fixed { display })
    }

    /// An element whose display and handler can change after binding.
    pub fn mutable<F>(display: Stack, handler: F) -> ElementRef
    where
        F: Fn(&mut ClickEvent) + 'static,
    {
        Self::with_kind(ElementKind::Mutable {
            display: RefCell::new(display),
            handler: RefCell::new(Rc::new(handler)),
        })
    }

    /// A control that scrolls the owning menu by `step` per click.
    ///
    /// Fails with [`MenuError::InvalidArgument`] when `step` is zero.
    pub fn scroll_control(step: i32, display: Stack) -> Result<ElementRef> {
        if step == 0 {
            return Err(MenuError::InvalidArgument("scroll step cannot be zero"));
        }
        Ok(Self::with_kind(ElementKind::ScrollControl { display, step }))
    }

    /// Current display content.
    pub fn display(&self) -> Stack {
        match &self.kind {
            ElementKind::Fixed { display } | ElementKind::ScrollControl { display, .. } => display.clone(),
            ElementKind::Mutable { display, .. } => display.borrow().clone(),
        }
    }

    /// Handle a click routed to this element.
    pub fn on_click(&self, event: &mut ClickEvent) {
        match &self.kind {
            ElementKind::Fixed { .. } => event.cancel(),
            ElementKind::Mutable { handler, .. } => {
                let handler = Rc::clone(&handler.borrow());
                handler(event);
            }
            ElementKind::ScrollControl { step, .. } => {
                event.cancel();
                match self.owner() {
                    Some(menu) => {
                        menu.scroll(*step);
                    }
                    None => trace!(step, "scroll control clicked without a live menu"),
                }
            }
        }
    }

    /// Replace the display of a mutable element and redraw its slots.
    ///
    /// Fails with [`MenuError::NotBound`] before the element is bound and with
    /// [`MenuError::InvalidArgument`] for fixed and scroll-control elements.
    pub fn set_display(&self, new_display: Stack) -> Result<()> {
        let ElementKind::Mutable { display, .. } = &self.kind else {
            return Err(MenuError::InvalidArgument("only mutable elements change display"));
        };
        let handle = self.owner.get().ok_or(MenuError::NotBound)?;
        *display.borrow_mut() = new_display;
        match handle.upgrade() {
            Some(menu) => {
                menu.notify_changed(self);
            }
            None => trace!("display changed after owning menu was dropped"),
        }
        Ok(())
    }

    /// Replace the click handler of a mutable element.
    pub fn set_handler<F>(&self, new_handler: F) -> Result<()>
    where
        F: Fn(&mut ClickEvent) + 'static,
    {
        let ElementKind::Mutable { handler, .. } = &self.kind else {
            return Err(MenuError::InvalidArgument("only mutable elements change handler"));
        };
        *handler.borrow_mut() = Rc::new(new_handler);
        Ok(())
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self.kind, ElementKind::Mutable { .. })
    }

    /// Step of a scroll control, `None` for other variants.
    pub fn scroll_step(&self) -> Option<i32> {
        match self.kind {
            ElementKind::ScrollControl { step, .. } => Some(step),
            _ => None,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.owner.get().is_some()
    }

    /// Owning menu, if bound and still alive.
    pub fn owner(&self) -> Option<Menu> {
        self.owner.get().and_then(MenuHandle::upgrade)
    }

    /// Assign the owning menu. Rebinding to the same menu is a no-op.
    pub(crate) fn bind(&self, handle: &MenuHandle) -> Result<()> {
        if let Some(existing) = self.owner.get() {
            return if existing.same_menu(handle) {
                Ok(())
            } else {
                Err(MenuError::AlreadyBound)
            };
        }
        self.owner.set(handle.clone()).map_err(|_| MenuError::AlreadyBound)
    }

    /// Whether `bind(handle)` would succeed.
    pub(crate) fn can_bind(&self, handle: Option<&MenuHandle>) -> bool {
        match (self.owner.get(), handle) {
            (None, _) => true,
            (Some(existing), Some(handle)) => existing.same_menu(handle),
            (Some(_), None) => false,
        }
    }
}

impl fmt::Debug for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ElementKind::Fixed { .. } => "Fixed",
            ElementKind::Mutable { .. } => "Mutable",
            ElementKind::ScrollControl { .. } => "ScrollControl",
        };
        f.debug_struct("Element")
            .field("kind", &kind)
            .field("display", &self.display())
            .field("owner", &self.owner.get().map(MenuHandle::id))
            .finish()
    }
}

/// Reference identity for elements.
pub fn same_element(a: &Element, b: &Element) -> bool {
    std::ptr::eq(a, b)
}
