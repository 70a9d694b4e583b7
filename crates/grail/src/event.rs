//! Input events delivered by the host to widget behaviors.
//!
//! Events carry an [`EventBase`] whose `accepted` flag is the "handled" mark:
//! a behavior accepts an event when it consumed it, which tells the host to
//! suppress the platform's default action (the DOM's `preventDefault`).
//! Events a behavior did not consume are left unaccepted so the default
//! action can proceed.

use crate::dom::ElementId;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct KeyboardModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyboardModifiers {
    /// No modifiers pressed.
    pub const NONE: Self = Self {
        shift: false,
        control: false,
        alt: false,
        meta: false,
    };

    /// Shift modifier only.
    pub const SHIFT: Self = Self {
        shift: true,
        ..Self::NONE
    };

    /// Returns true if no modifier is held.
    pub fn is_empty(&self) -> bool {
        *self == Self::NONE
    }
}

/// Logical keys the widget behaviors react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Navigation
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,

    // Actions
    Enter,
    Space,
    Tab,
    Escape,
    Backspace,
    Delete,

    /// A key producing a single printable character.
    Character(char),

    /// Any key without a dedicated variant.
    Unidentified,
}

impl Key {
    /// The printable character this key produces, if any.
    pub fn printable_char(&self) -> Option<char> {
        match self {
            Self::Space => Some(' '),
            Self::Character(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }

    /// Returns true for the keys that activate the focused item.
    pub fn is_activation(&self) -> bool {
        matches!(self, Self::Enter | Self::Space)
    }
}

/// Common event data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventBase {
    /// Whether the event has been accepted (handled).
    accepted: bool,
}

impl EventBase {
    /// Create a new, unaccepted event base.
    pub fn new() -> Self {
        Self { accepted: false }
    }

    /// Check if the event has been accepted.
    pub fn is_accepted(&self) -> bool {
        self.accepted
    }

    /// Accept the event, suppressing the host's default action.
    pub fn accept(&mut self) {
        self.accepted = true;
    }

    /// Ignore the event, letting the host's default action proceed.
    pub fn ignore(&mut self) {
        self.accepted = false;
    }
}

/// Key press event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPressEvent {
    /// Base event data.
    pub base: EventBase,
    /// The key that was pressed.
    pub key: Key,
    /// Keyboard modifiers held during the event.
    pub modifiers: KeyboardModifiers,
    /// The element the event was dispatched to, if any.
    pub target: Option<ElementId>,
}

impl KeyPressEvent {
    /// Create a new key press event without a target.
    pub fn new(key: Key) -> Self {
        Self {
            base: EventBase::new(),
            key,
            modifiers: KeyboardModifiers::NONE,
            target: None,
        }
    }

    /// Create a key press event for a printable character.
    pub fn character(c: char) -> Self {
        Self::new(Key::Character(c))
    }

    /// Sets the target element.
    pub fn with_target(mut self, target: ElementId) -> Self {
        self.target = Some(target);
        self
    }

    /// Sets the modifiers.
    pub fn with_modifiers(mut self, modifiers: KeyboardModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Check if a behavior handled this event.
    pub fn is_handled(&self) -> bool {
        self.base.is_accepted()
    }
}

/// Primary-button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element that was clicked.
    pub target: ElementId,
}

impl ClickEvent {
    /// Create a new click event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// Focus moved into an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusInEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element that received focus.
    pub target: ElementId,
}

impl FocusInEvent {
    /// Create a new focus-in event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// The pointer moved over an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerOverEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element under the pointer.
    pub target: ElementId,
}

impl PointerOverEvent {
    /// Create a new pointer-over event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// A pointer button was pressed on an element.
///
/// Hosts dispatch this for presses anywhere in the document so behaviors can
/// react to presses outside their elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerDownEvent {
    /// Base event data.
    pub base: EventBase,
    /// The pressed element.
    pub target: ElementId,
}

impl PointerDownEvent {
    /// Create a new pointer-down event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// A pointer button was released.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PointerUpEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element under the pointer.
    pub target: ElementId,
}

impl PointerUpEvent {
    /// Create a new pointer-up event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// Focus left an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusOutEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element that lost focus.
    pub target: ElementId,
}

impl FocusOutEvent {
    /// Create a new focus-out event.
    pub fn new(target: ElementId) -> Self {
        Self {
            base: EventBase::new(),
            target,
        }
    }
}

/// Mouse wheel scrolled over an element.
#[derive(Debug, Clone, PartialEq)]
pub struct WheelEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element under the pointer.
    pub target: ElementId,
    /// Vertical scroll delta. Negative scrolls up, away from the user.
    pub delta_y: f64,
}

impl WheelEvent {
    /// Create a new wheel event.
    pub fn new(target: ElementId, delta_y: f64) -> Self {
        Self {
            base: EventBase::new(),
            target,
            delta_y,
        }
    }
}

/// Text pasted into an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasteEvent {
    /// Base event data.
    pub base: EventBase,
    /// The element receiving the text.
    pub target: ElementId,
    /// The pasted text.
    pub text: String,
}

impl PasteEvent {
    /// Create a new paste event.
    pub fn new(target: ElementId, text: impl Into<String>) -> Self {
        Self {
            base: EventBase::new(),
            target,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_printable_char() {
        assert_eq!(Key::Character('b').printable_char(), Some('b'));
        assert_eq!(Key::Space.printable_char(), Some(' '));
        assert_eq!(Key::ArrowDown.printable_char(), None);
        assert_eq!(Key::Character('\u{7}').printable_char(), None);
    }

    #[test]
    fn test_event_accept() {
        let mut event = KeyPressEvent::new(Key::Enter);
        assert!(!event.is_handled());
        event.base.accept();
        assert!(event.is_handled());
        event.base.ignore();
        assert!(!event.is_handled());
    }
}
