//! Event types delivered to widget listeners.
//!
//! Every event carries the [`WidgetId`] of its source. Mouse and key events
//! additionally carry a `consumed` flag: a listener that handles the event
//! calls `consume()`, which stops the event from bubbling further up the
//! widget tree (listeners on the same widget are still called).

use guichan_core::{GuiError, WidgetId};

// =========================================================================
// Keys and modifiers
// =========================================================================

/// Keyboard modifiers held during an input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct KeyModifiers {
    /// The Shift key is held.
    pub shift: bool,
    /// The Control key is held.
    pub control: bool,
    /// The Alt key is held.
    pub alt: bool,
    /// The Meta/Super key is held.
    pub meta: bool,
}

impl KeyModifiers {
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
        control: false,
        alt: false,
        meta: false,
    };

    /// Control modifier only.
    pub const CTRL: Self = Self {
        shift: false,
        control: true,
        alt: false,
        meta: false,
    };

    /// Alt modifier only.
    pub const ALT: Self = Self {
        shift: false,
        control: false,
        alt: true,
        meta: false,
    };

    /// Returns true if no modifiers are pressed.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !self.shift && !self.control && !self.alt && !self.meta
    }
}

/// A key value.
///
/// Printable keys use their character code. Non-printable keys use the
/// associated constants, which start at 1000 so they never collide with
/// Latin-1 characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Key(pub i32);

impl Key {
    pub const SPACE: Key = Key(' ' as i32);
    pub const TAB: Key = Key('\t' as i32);
    pub const ENTER: Key = Key('\n' as i32);
    pub const LEFT_ALT: Key = Key(1000);
    pub const RIGHT_ALT: Key = Key(1001);
    pub const LEFT_SHIFT: Key = Key(1002);
    pub const RIGHT_SHIFT: Key = Key(1003);
    pub const LEFT_CONTROL: Key = Key(1004);
    pub const RIGHT_CONTROL: Key = Key(1005);
    pub const LEFT_META: Key = Key(1006);
    pub const RIGHT_META: Key = Key(1007);
    pub const LEFT_SUPER: Key = Key(1008);
    pub const RIGHT_SUPER: Key = Key(1009);
    pub const INSERT: Key = Key(1010);
    pub const HOME: Key = Key(1011);
    pub const PAGE_UP: Key = Key(1012);
    pub const DELETE: Key = Key(1013);
    pub const END: Key = Key(1014);
    pub const PAGE_DOWN: Key = Key(1015);
    pub const ESCAPE: Key = Key(1016);
    pub const CAPS_LOCK: Key = Key(1017);
    pub const BACKSPACE: Key = Key(1018);
    pub const F1: Key = Key(1019);
    pub const F2: Key = Key(1020);
    pub const F3: Key = Key(1021);
    pub const F4: Key = Key(1022);
    pub const F5: Key = Key(1023);
    pub const F6: Key = Key(1024);
    pub const F7: Key = Key(1025);
    pub const F8: Key = Key(1026);
    pub const F9: Key = Key(1027);
    pub const F10: Key = Key(1028);
    pub const F11: Key = Key(1029);
    pub const F12: Key = Key(1030);
    pub const F13: Key = Key(1031);
    pub const F14: Key = Key(1032);
    pub const F15: Key = Key(1033);
    pub const PRINT_SCREEN: Key = Key(1034);
    pub const SCROLL_LOCK: Key = Key(1035);
    pub const PAUSE: Key = Key(1036);
    pub const NUM_LOCK: Key = Key(1037);
    pub const ALT_GR: Key = Key(1038);
    pub const LEFT: Key = Key(1039);
    pub const RIGHT: Key = Key(1040);
    pub const UP: Key = Key(1041);
    pub const DOWN: Key = Key(1042);

    /// Create a key from a character.
    pub fn from_char(c: char) -> Key {
        Key(c as i32)
    }

    /// The raw key value.
    #[inline]
    pub fn value(self) -> i32 {
        self.0
    }

    /// Whether the key produces a printable Latin-1 character.
    pub fn is_character(self) -> bool {
        (32..=126).contains(&self.0) || ((162..=255).contains(&self.0) && self.0 != 247)
    }

    /// Whether the key is a decimal digit.
    pub fn is_number(self) -> bool {
        (48..=57).contains(&self.0)
    }

    /// Whether the key is a Latin-1 letter.
    pub fn is_letter(self) -> bool {
        (65..=90).contains(&self.0)
            || (97..=122).contains(&self.0)
            || ((192..=255).contains(&self.0) && self.0 != 215 && self.0 != 247)
    }

    /// The character for printable keys.
    pub fn to_char(self) -> Option<char> {
        if self.is_character() {
            u32::try_from(self.0).ok().and_then(char::from_u32)
        } else {
            None
        }
    }
}

// =========================================================================
// Mouse buttons and event kinds
// =========================================================================

/// Mouse buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum MouseButton {
    /// No button, used by moves and wheel events.
    #[default]
    Empty = 0,
    /// Primary button.
    Left = 1,
    /// Secondary button.
    Right = 2,
    /// Middle button.
    Middle = 3,
}

impl TryFrom<u32> for MouseButton {
    type Error = GuiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Left),
            2 => Ok(Self::Right),
            3 => Ok(Self::Middle),
            _ => Err(GuiError::UnknownEventType {
                kind: "mouse button",
                value,
            }),
        }
    }
}

/// The kind of a [`MouseEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseEventType {
    Moved = 0,
    Pressed = 1,
    Released = 2,
    WheelMovedDown = 3,
    WheelMovedUp = 4,
    Clicked = 5,
    Entered = 6,
    Exited = 7,
    Dragged = 8,
}

impl TryFrom<u32> for MouseEventType {
    type Error = GuiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Moved,
            1 => Self::Pressed,
            2 => Self::Released,
            3 => Self::WheelMovedDown,
            4 => Self::WheelMovedUp,
            5 => Self::Clicked,
            6 => Self::Entered,
            7 => Self::Exited,
            8 => Self::Dragged,
            _ => {
                return Err(GuiError::UnknownEventType {
                    kind: "mouse",
                    value,
                });
            }
        })
    }
}

/// The kind of a [`KeyEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyEventType {
    Pressed = 0,
    Released = 1,
}

impl TryFrom<u32> for KeyEventType {
    type Error = GuiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Pressed),
            1 => Ok(Self::Released),
            _ => Err(GuiError::UnknownEventType { kind: "key", value }),
        }
    }
}

// =========================================================================
// Events
// =========================================================================

/// A mouse event.
///
/// `x` and `y` are relative to the widget currently receiving the event;
/// they are recomputed for every widget the event bubbles through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MouseEvent {
    source: WidgetId,
    kind: MouseEventType,
    button: MouseButton,
    pub(crate) x: i32,
    pub(crate) y: i32,
    click_count: u32,
    modifiers: KeyModifiers,
    consumed: bool,
}

impl MouseEvent {
    /// Create a new mouse event.
    pub fn new(
        source: WidgetId,
        kind: MouseEventType,
        button: MouseButton,
        x: i32,
        y: i32,
        click_count: u32,
        modifiers: KeyModifiers,
    ) -> Self {
        Self {
            source,
            kind,
            button,
            x,
            y,
            click_count,
            modifiers,
            consumed: false,
        }
    }

    /// The widget the event originated from.
    #[inline]
    pub fn source(&self) -> WidgetId {
        self.source
    }

    /// The event kind.
    #[inline]
    pub fn kind(&self) -> MouseEventType {
        self.kind
    }

    /// The button involved.
    #[inline]
    pub fn button(&self) -> MouseButton {
        self.button
    }

    /// X position relative to the receiving widget.
    #[inline]
    pub fn x(&self) -> i32 {
        self.x
    }

    /// Y position relative to the receiving widget.
    #[inline]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// Number of consecutive presses of the same button.
    #[inline]
    pub fn click_count(&self) -> u32 {
        self.click_count
    }

    /// Modifier keys held when the event was produced.
    #[inline]
    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Mark the event as handled. It will not bubble to further ancestors.
    #[inline]
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether a listener consumed the event.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A key event.
///
/// Events delivered to global key listeners have no source widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    source: Option<WidgetId>,
    kind: KeyEventType,
    key: Key,
    modifiers: KeyModifiers,
    numeric_pad: bool,
    consumed: bool,
}

impl KeyEvent {
    /// Create a new key event.
    pub fn new(
        source: Option<WidgetId>,
        kind: KeyEventType,
        key: Key,
        modifiers: KeyModifiers,
        numeric_pad: bool,
    ) -> Self {
        Self {
            source,
            kind,
            key,
            modifiers,
            numeric_pad,
            consumed: false,
        }
    }

    /// The widget the event was sent to, if any.
    #[inline]
    pub fn source(&self) -> Option<WidgetId> {
        self.source
    }

    /// Pressed or released.
    #[inline]
    pub fn kind(&self) -> KeyEventType {
        self.kind
    }

    /// The key.
    #[inline]
    pub fn key(&self) -> Key {
        self.key
    }

    /// Modifier keys held.
    #[inline]
    pub fn modifiers(&self) -> KeyModifiers {
        self.modifiers
    }

    /// Whether the key came from the numeric keypad.
    #[inline]
    pub fn is_numeric_pad(&self) -> bool {
        self.numeric_pad
    }

    /// Mark the event as handled.
    #[inline]
    pub fn consume(&mut self) {
        self.consumed = true;
    }

    /// Whether a listener consumed the event.
    #[inline]
    pub fn is_consumed(&self) -> bool {
        self.consumed
    }
}

/// A focus gained or lost notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusEvent {
    /// The widget whose focus changed.
    pub source: WidgetId,
}

/// An action fired by a widget, for example a button click.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionEvent {
    /// The widget that fired the action.
    pub source: WidgetId,
    /// The widget's action event id at the time of firing.
    pub id: String,
}

/// Sent to death listeners just before a widget is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeathEvent {
    /// The widget being destroyed. It is still alive during delivery.
    pub source: WidgetId,
}

/// A geometry or visibility change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetEvent {
    /// The widget that changed.
    pub source: WidgetId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_classification() {
        assert!(Key::from_char('a').is_letter());
        assert!(Key::from_char('7').is_number());
        assert!(Key::SPACE.is_character());
        assert!(!Key::TAB.is_character());
        assert!(!Key::F1.is_character());
        assert_eq!(Key::from_char('x').to_char(), Some('x'));
        assert_eq!(Key::ESCAPE.to_char(), None);
    }

    #[test]
    fn test_unknown_codes_are_rejected() {
        assert_eq!(MouseEventType::try_from(8), Ok(MouseEventType::Dragged));
        assert!(matches!(
            MouseEventType::try_from(9),
            Err(GuiError::UnknownEventType { kind: "mouse", value: 9 })
        ));
        assert!(KeyEventType::try_from(2).is_err());
        assert!(MouseButton::try_from(4).is_err());
    }

    #[test]
    fn test_consume() {
        let mut event = MouseEvent::new(
            WidgetId::default(),
            MouseEventType::Pressed,
            MouseButton::Left,
            1,
            2,
            1,
            KeyModifiers::NONE,
        );
        assert!(!event.is_consumed());
        event.consume();
        assert!(event.is_consumed());
    }
}
