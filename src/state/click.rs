//! Click events delivered to elements.
//!
//! A host event source produces one [`ClickEvent`] per raw click and hands it
//! to the registry together with the container identity and raw slot index.
//! Elements may cancel the event to suppress the host's default interaction
//! (picking up, moving or dropping the displayed stack).

// =============================================================================
// TYPES
// =============================================================================

/// Mouse button that produced the click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClickButton {
    #[default]
    Left,
    Right,
    Middle,
}

bitflags::bitflags! {
    /// Modifier keys held during the click.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ClickModifiers: u8 {
        const NONE = 0;
        const SHIFT = 1 << 0;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
        const META = 1 << 3;
    }
}

/// A click on one menu slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClickEvent {
    /// Button pressed.
    pub button: ClickButton,
    /// Modifier keys state.
    pub modifiers: ClickModifiers,
    /// Slot the click resolved to (filled by dispatch).
    pub slot: Option<usize>,
    cancelled: bool,
}

impl ClickEvent {
    pub fn new(button: ClickButton) -> Self {
        Self {
            button,
            ..Self::default()
        }
    }

    pub fn left() -> Self {
        Self::new(ClickButton::Left)
    }

    pub fn right() -> Self {
        Self::new(ClickButton::Right)
    }

    pub fn with_modifiers(mut self, modifiers: ClickModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Suppress the host's default interaction for this click.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    pub fn set_cancelled(&mut self, cancelled: bool) {
        self.cancelled = cancelled;
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_shift_click(&self) -> bool {
        self.modifiers.contains(ClickModifiers::SHIFT)
    }
}
