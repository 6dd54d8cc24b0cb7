//! Input sources.
//!
//! An [`Input`] is a pair of FIFO queues of normalized [`KeyInput`] and
//! [`MouseInput`] records. The `Gui` calls [`Input::poll_input`] once per
//! logic pass and then drains both queues completely, keys first.
//!
//! Two sources are provided:
//!
//! - [`GenericInput`]: push-based, for tests and custom back ends
//! - `WinitInput` (feature `winit`): translates winit window events

mod generic;
#[cfg(feature = "winit")]
mod winit_input;

use std::sync::Arc;

use guichan_core::{GuiError, Result};
use parking_lot::Mutex;

use crate::widget::{Key, KeyModifiers, MouseButton};

pub use generic::GenericInput;
#[cfg(feature = "winit")]
pub use winit_input::{WinitInput, from_winit_key, from_winit_modifiers, from_winit_mouse_button};

/// A source of key and mouse input.
pub trait Input: Send {
    fn is_key_queue_empty(&self) -> bool;

    /// Fails with [`GuiError::EmptyQueue`] when there is nothing to dequeue.
    fn dequeue_key_input(&mut self) -> Result<KeyInput>;

    fn is_mouse_queue_empty(&self) -> bool;

    /// Fails with [`GuiError::EmptyQueue`] when there is nothing to dequeue.
    fn dequeue_mouse_input(&mut self) -> Result<MouseInput>;

    /// Collect pending native events into the queues.
    fn poll_input(&mut self) {}
}

/// Shared handle to an input source.
pub type SharedInput = Arc<Mutex<dyn Input>>;

// =============================================================================
// Key input
// =============================================================================

/// Whether a key went down or up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum KeyInputType {
    Pressed = 0,
    Released = 1,
}

impl TryFrom<u32> for KeyInputType {
    type Error = GuiError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Pressed),
            1 => Ok(Self::Released),
            _ => Err(GuiError::UnknownEventType { kind: "key input", value }),
        }
    }
}

/// A raw key press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyInput {
    pub key: Key,
    pub kind: KeyInputType,
    /// Modifier state at the time of the event.
    pub modifiers: KeyModifiers,
    /// Whether the key is on the numeric keypad.
    pub numeric_pad: bool,
}

impl KeyInput {
    /// A key input without modifiers.
    pub fn new(key: Key, kind: KeyInputType) -> Self {
        Self {
            key,
            kind,
            modifiers: KeyModifiers::NONE,
            numeric_pad: false,
        }
    }

    pub fn with_modifiers(mut self, modifiers: KeyModifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_numeric_pad(mut self, numeric_pad: bool) -> Self {
        self.numeric_pad = numeric_pad;
        self
    }
}

// =============================================================================
// Mouse input
// =============================================================================

/// What happened to the mouse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MouseInputType {
    Pressed = 0,
    Released = 1,
    WheelMovedDown = 2,
    WheelMovedUp = 3,
    Moved = 4,
}

impl TryFrom<u32> for MouseInputType {
    type Error = GuiError;

    fn try_from(value: u32) -> Result<Self> {
        match value {
            0 => Ok(Self::Pressed),
            1 => Ok(Self::Released),
            2 => Ok(Self::WheelMovedDown),
            3 => Ok(Self::WheelMovedUp),
            4 => Ok(Self::Moved),
            _ => Err(GuiError::UnknownEventType { kind: "mouse input", value }),
        }
    }
}

/// A raw mouse event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseInput {
    pub button: MouseButton,
    pub kind: MouseInputType,
    pub x: i32,
    pub y: i32,
    /// Milliseconds since an arbitrary epoch, monotonic per source.
    pub timestamp: u64,
}

impl MouseInput {
    pub fn new(
        button: MouseButton,
        kind: MouseInputType,
        x: i32,
        y: i32,
        timestamp: u64,
    ) -> Self {
        Self {
            button,
            kind,
            x,
            y,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_codes() {
        assert_eq!(MouseInputType::try_from(4), Ok(MouseInputType::Moved));
        assert_eq!(KeyInputType::try_from(1), Ok(KeyInputType::Released));
        assert_eq!(
            MouseInputType::try_from(9),
            Err(GuiError::UnknownEventType { kind: "mouse input", value: 9 })
        );
        assert!(KeyInputType::try_from(2).is_err());
    }

    #[test]
    fn test_key_input_builder() {
        let input = KeyInput::new(Key::ENTER, KeyInputType::Pressed)
            .with_modifiers(KeyModifiers::SHIFT)
            .with_numeric_pad(true);
        assert!(input.modifiers.shift);
        assert!(input.numeric_pad);
    }
}
