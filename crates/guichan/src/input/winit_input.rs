//! Input source backed by winit window events.
//!
//! Feed every [`WindowEvent`] of the GUI window to
//! [`WinitInput::handle_window_event`]; the `Gui` drains the resulting queues
//! on its next logic pass.
//!
//! ```ignore
//! let input = shared(WinitInput::new());
//! gui.set_input(Some(input.clone()));
//!
//! // In the winit event handler:
//! input.lock().handle_window_event(&event);
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use guichan_core::logging::targets;
use guichan_core::{GuiError, QueueKind, Result};
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key as WinitKey, KeyLocation, ModifiersState, NamedKey};

use super::{Input, KeyInput, KeyInputType, MouseInput, MouseInputType};
use crate::widget::{Key, KeyModifiers, MouseButton};

/// Converts a winit logical key. Returns `None` for keys without a
/// counterpart.
pub fn from_winit_key(key: &WinitKey, location: KeyLocation) -> Option<Key> {
    match key {
        WinitKey::Named(named) => from_winit_named_key(named, location),
        WinitKey::Character(text) => {
            let mut chars = text.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Key::from_char(c)),
                _ => None,
            }
        }
        WinitKey::Unidentified(_) | WinitKey::Dead(_) => None,
    }
}

fn from_winit_named_key(key: &NamedKey, location: KeyLocation) -> Option<Key> {
    let right = location == KeyLocation::Right;
    let key = match key {
        NamedKey::Space => Key::SPACE,
        NamedKey::Tab => Key::TAB,
        NamedKey::Enter => Key::ENTER,

        NamedKey::Alt if right => Key::RIGHT_ALT,
        NamedKey::Alt => Key::LEFT_ALT,
        NamedKey::AltGraph => Key::ALT_GR,
        NamedKey::Shift if right => Key::RIGHT_SHIFT,
        NamedKey::Shift => Key::LEFT_SHIFT,
        NamedKey::Control if right => Key::RIGHT_CONTROL,
        NamedKey::Control => Key::LEFT_CONTROL,
        NamedKey::Meta if right => Key::RIGHT_META,
        NamedKey::Meta => Key::LEFT_META,
        NamedKey::Super if right => Key::RIGHT_SUPER,
        NamedKey::Super => Key::LEFT_SUPER,

        NamedKey::Insert => Key::INSERT,
        NamedKey::Home => Key::HOME,
        NamedKey::PageUp => Key::PAGE_UP,
        NamedKey::Delete => Key::DELETE,
        NamedKey::End => Key::END,
        NamedKey::PageDown => Key::PAGE_DOWN,
        NamedKey::Escape => Key::ESCAPE,
        NamedKey::Backspace => Key::BACKSPACE,

        NamedKey::CapsLock => Key::CAPS_LOCK,
        NamedKey::NumLock => Key::NUM_LOCK,
        NamedKey::ScrollLock => Key::SCROLL_LOCK,
        NamedKey::PrintScreen => Key::PRINT_SCREEN,
        NamedKey::Pause => Key::PAUSE,

        NamedKey::F1 => Key::F1,
        NamedKey::F2 => Key::F2,
        NamedKey::F3 => Key::F3,
        NamedKey::F4 => Key::F4,
        NamedKey::F5 => Key::F5,
        NamedKey::F6 => Key::F6,
        NamedKey::F7 => Key::F7,
        NamedKey::F8 => Key::F8,
        NamedKey::F9 => Key::F9,
        NamedKey::F10 => Key::F10,
        NamedKey::F11 => Key::F11,
        NamedKey::F12 => Key::F12,
        NamedKey::F13 => Key::F13,
        NamedKey::F14 => Key::F14,
        NamedKey::F15 => Key::F15,

        NamedKey::ArrowLeft => Key::LEFT,
        NamedKey::ArrowRight => Key::RIGHT,
        NamedKey::ArrowUp => Key::UP,
        NamedKey::ArrowDown => Key::DOWN,

        _ => return None,
    };
    Some(key)
}

/// Converts winit modifier state.
pub fn from_winit_modifiers(state: ModifiersState) -> KeyModifiers {
    KeyModifiers {
        shift: state.shift_key(),
        control: state.control_key(),
        alt: state.alt_key(),
        meta: state.super_key(),
    }
}

/// Converts a winit mouse button. Buttons beyond the middle one are ignored.
pub fn from_winit_mouse_button(button: WinitMouseButton) -> Option<MouseButton> {
    match button {
        WinitMouseButton::Left => Some(MouseButton::Left),
        WinitMouseButton::Right => Some(MouseButton::Right),
        WinitMouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// An input source fed by winit window events.
#[derive(Debug)]
pub struct WinitInput {
    keys: VecDeque<KeyInput>,
    mouse: VecDeque<MouseInput>,
    modifiers: KeyModifiers,
    cursor: (i32, i32),
    /// Bit per held mouse button.
    buttons_held: u8,
    epoch: Instant,
}

impl Default for WinitInput {
    fn default() -> Self {
        Self::new()
    }
}

impl WinitInput {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            mouse: VecDeque::new(),
            modifiers: KeyModifiers::NONE,
            cursor: (0, 0),
            buttons_held: 0,
            epoch: Instant::now(),
        }
    }

    /// Translate one window event. Events with no GUI meaning are ignored.
    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position.x, position.y),
            WindowEvent::CursorLeft { .. } => self.cursor_left(),
            WindowEvent::MouseInput { state, button, .. } => self.mouse_button(*state, *button),
            WindowEvent::MouseWheel { delta, .. } => self.mouse_wheel(*delta),
            WindowEvent::ModifiersChanged(modifiers) => {
                self.modifiers = from_winit_modifiers(modifiers.state());
            }
            WindowEvent::KeyboardInput { event, .. } => {
                self.key(&event.logical_key, event.location, event.state);
            }
            _ => {}
        }
    }

    fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    fn push_mouse(&mut self, button: MouseButton, kind: MouseInputType) {
        let (x, y) = self.cursor;
        let input = MouseInput::new(button, kind, x, y, self.now());
        tracing::trace!(target: targets::INPUT, ?input, "mouse input queued");
        self.mouse.push_back(input);
    }

    /// The cursor moved to a window position in physical pixels.
    pub fn cursor_moved(&mut self, x: f64, y: f64) {
        self.cursor = (x as i32, y as i32);
        self.push_mouse(MouseButton::Empty, MouseInputType::Moved);
    }

    /// The cursor left the window. Reported as a move to (-1, -1) unless a
    /// button is held, so that drags keep their target.
    pub fn cursor_left(&mut self) {
        if self.buttons_held == 0 {
            self.cursor = (-1, -1);
            self.push_mouse(MouseButton::Empty, MouseInputType::Moved);
        }
    }

    pub fn mouse_button(&mut self, state: ElementState, button: WinitMouseButton) {
        let Some(button) = from_winit_mouse_button(button) else {
            return;
        };
        let bit = 1 << (button as u8);
        match state {
            ElementState::Pressed => {
                self.buttons_held |= bit;
                self.push_mouse(button, MouseInputType::Pressed);
            }
            ElementState::Released => {
                self.buttons_held &= !bit;
                self.push_mouse(button, MouseInputType::Released);
            }
        }
    }

    pub fn mouse_wheel(&mut self, delta: MouseScrollDelta) {
        let dy = match delta {
            MouseScrollDelta::LineDelta(_, y) => f64::from(y),
            MouseScrollDelta::PixelDelta(position) => position.y,
        };
        if dy > 0.0 {
            self.push_mouse(MouseButton::Empty, MouseInputType::WheelMovedUp);
        } else if dy < 0.0 {
            self.push_mouse(MouseButton::Empty, MouseInputType::WheelMovedDown);
        }
    }

    pub fn key(&mut self, key: &WinitKey, location: KeyLocation, state: ElementState) {
        let Some(key) = from_winit_key(key, location) else {
            tracing::trace!(target: targets::INPUT, "unmapped key ignored");
            return;
        };
        let kind = match state {
            ElementState::Pressed => KeyInputType::Pressed,
            ElementState::Released => KeyInputType::Released,
        };
        let input = KeyInput::new(key, kind)
            .with_modifiers(self.modifiers)
            .with_numeric_pad(location == KeyLocation::Numpad);
        tracing::trace!(target: targets::INPUT, ?input, "key input queued");
        self.keys.push_back(input);
    }

    pub fn set_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = from_winit_modifiers(state);
    }
}

impl Input for WinitInput {
    fn is_key_queue_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn dequeue_key_input(&mut self) -> Result<KeyInput> {
        self.keys
            .pop_front()
            .ok_or(GuiError::EmptyQueue(QueueKind::Key))
    }

    fn is_mouse_queue_empty(&self) -> bool {
        self.mouse.is_empty()
    }

    fn dequeue_mouse_input(&mut self) -> Result<MouseInput> {
        self.mouse
            .pop_front()
            .ok_or(GuiError::EmptyQueue(QueueKind::Mouse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::SmolStr;

    #[test]
    fn test_key_conversion() {
        assert_eq!(
            from_winit_key(&WinitKey::Named(NamedKey::Tab), KeyLocation::Standard),
            Some(Key::TAB)
        );
        assert_eq!(
            from_winit_key(&WinitKey::Named(NamedKey::Shift), KeyLocation::Right),
            Some(Key::RIGHT_SHIFT)
        );
        assert_eq!(
            from_winit_key(&WinitKey::Character(SmolStr::new("q")), KeyLocation::Standard),
            Some(Key::from_char('q'))
        );
        assert_eq!(
            from_winit_key(&WinitKey::Character(SmolStr::new("ab")), KeyLocation::Standard),
            None
        );
    }

    #[test]
    fn test_modifier_conversion() {
        let modifiers = from_winit_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert!(modifiers.shift && modifiers.control);
        assert!(!modifiers.alt && !modifiers.meta);
    }

    #[test]
    fn test_mouse_sequence() {
        let mut input = WinitInput::new();
        input.cursor_moved(12.7, 30.2);
        input.mouse_button(ElementState::Pressed, WinitMouseButton::Left);
        input.mouse_wheel(MouseScrollDelta::LineDelta(0.0, -1.0));
        input.mouse_button(ElementState::Released, WinitMouseButton::Left);

        let moved = input.dequeue_mouse_input().unwrap();
        assert_eq!((moved.x, moved.y), (12, 30));
        let pressed = input.dequeue_mouse_input().unwrap();
        assert_eq!(
            (pressed.kind, pressed.button),
            (MouseInputType::Pressed, MouseButton::Left)
        );
        let wheel = input.dequeue_mouse_input().unwrap();
        assert_eq!(wheel.kind, MouseInputType::WheelMovedDown);
        assert_eq!(
            input.dequeue_mouse_input().unwrap().kind,
            MouseInputType::Released
        );
    }

    #[test]
    fn test_cursor_left_while_dragging_is_ignored() {
        let mut input = WinitInput::new();
        input.mouse_button(ElementState::Pressed, WinitMouseButton::Left);
        input.cursor_left();
        assert_eq!(input.dequeue_mouse_input().unwrap().kind, MouseInputType::Pressed);
        assert!(input.is_mouse_queue_empty());

        input.mouse_button(ElementState::Released, WinitMouseButton::Left);
        input.cursor_left();
        input.dequeue_mouse_input().unwrap();
        let left = input.dequeue_mouse_input().unwrap();
        assert_eq!((left.x, left.y), (-1, -1));
    }

    #[test]
    fn test_numpad_keys_flagged() {
        let mut input = WinitInput::new();
        input.key(
            &WinitKey::Character(SmolStr::new("7")),
            KeyLocation::Numpad,
            ElementState::Pressed,
        );
        let key = input.dequeue_key_input().unwrap();
        assert!(key.numeric_pad);
        assert_eq!(key.key, Key::from_char('7'));
    }
}
