//! Push-based input source.

use std::collections::VecDeque;
use std::time::Instant;

use guichan_core::logging::targets;
use guichan_core::{GuiError, QueueKind, Result};

use super::{Input, KeyInput, KeyInputType, MouseInput, MouseInputType};
use crate::widget::{Key, KeyModifiers, MouseButton};

/// An input source fed by explicit pushes.
///
/// Mouse timestamps are milliseconds since the source was created, unless
/// the caller pushes [`MouseInput`] records with its own timestamps.
///
/// # Example
///
/// ```
/// use guichan::input::{GenericInput, Input};
/// use guichan::widget::{Key, MouseButton};
///
/// let mut input = GenericInput::new();
/// input.push_key_pressed(Key::from_char('a'));
/// input.push_mouse_button_pressed(10, 10, MouseButton::Left);
///
/// assert_eq!(input.dequeue_key_input().unwrap().key, Key::from_char('a'));
/// assert!(input.dequeue_key_input().is_err());
/// assert!(!input.is_mouse_queue_empty());
/// ```
#[derive(Debug)]
pub struct GenericInput {
    keys: VecDeque<KeyInput>,
    mouse: VecDeque<MouseInput>,
    modifiers: KeyModifiers,
    epoch: Instant,
}

impl Default for GenericInput {
    fn default() -> Self {
        Self::new()
    }
}

impl GenericInput {
    pub fn new() -> Self {
        Self {
            keys: VecDeque::new(),
            mouse: VecDeque::new(),
            modifiers: KeyModifiers::NONE,
            epoch: Instant::now(),
        }
    }

    /// Modifiers attached to subsequently pushed key inputs.
    pub fn set_modifiers(&mut self, modifiers: KeyModifiers) {
        self.modifiers = modifiers;
    }

    fn now(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    // =========================================================================
    // Keys
    // =========================================================================

    pub fn push_key_pressed(&mut self, key: Key) {
        self.push_key_input(KeyInput::new(key, KeyInputType::Pressed).with_modifiers(self.modifiers));
    }

    pub fn push_key_released(&mut self, key: Key) {
        self.push_key_input(KeyInput::new(key, KeyInputType::Released).with_modifiers(self.modifiers));
    }

    pub fn push_key_input(&mut self, input: KeyInput) {
        tracing::trace!(target: targets::INPUT, ?input, "key input queued");
        self.keys.push_back(input);
    }

    // =========================================================================
    // Mouse
    // =========================================================================

    pub fn push_mouse_button_pressed(&mut self, x: i32, y: i32, button: MouseButton) {
        self.push_mouse(button, MouseInputType::Pressed, x, y);
    }

    pub fn push_mouse_button_released(&mut self, x: i32, y: i32, button: MouseButton) {
        self.push_mouse(button, MouseInputType::Released, x, y);
    }

    pub fn push_mouse_wheel_moved_up(&mut self, x: i32, y: i32) {
        self.push_mouse(MouseButton::Empty, MouseInputType::WheelMovedUp, x, y);
    }

    pub fn push_mouse_wheel_moved_down(&mut self, x: i32, y: i32) {
        self.push_mouse(MouseButton::Empty, MouseInputType::WheelMovedDown, x, y);
    }

    pub fn push_mouse_moved(&mut self, x: i32, y: i32) {
        self.push_mouse(MouseButton::Empty, MouseInputType::Moved, x, y);
    }

    fn push_mouse(&mut self, button: MouseButton, kind: MouseInputType, x: i32, y: i32) {
        let timestamp = self.now();
        self.push_mouse_input(MouseInput::new(button, kind, x, y, timestamp));
    }

    /// Queue a mouse input with a caller-supplied timestamp.
    pub fn push_mouse_input(&mut self, input: MouseInput) {
        tracing::trace!(target: targets::INPUT, ?input, "mouse input queued");
        self.mouse.push_back(input);
    }
}

impl Input for GenericInput {
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

    #[test]
    fn test_queues_are_fifo() {
        let mut input = GenericInput::new();
        input.push_mouse_moved(1, 1);
        input.push_mouse_button_pressed(2, 2, MouseButton::Right);
        input.push_mouse_wheel_moved_down(3, 3);

        let first = input.dequeue_mouse_input().unwrap();
        assert_eq!((first.kind, first.x), (MouseInputType::Moved, 1));
        let second = input.dequeue_mouse_input().unwrap();
        assert_eq!(second.button, MouseButton::Right);
        assert!(second.timestamp >= first.timestamp);
        let third = input.dequeue_mouse_input().unwrap();
        assert_eq!(third.kind, MouseInputType::WheelMovedDown);
        assert!(input.is_mouse_queue_empty());
    }

    #[test]
    fn test_empty_queue_errors() {
        let mut input = GenericInput::new();
        assert_eq!(
            input.dequeue_key_input(),
            Err(GuiError::EmptyQueue(QueueKind::Key))
        );
        assert_eq!(
            input.dequeue_mouse_input(),
            Err(GuiError::EmptyQueue(QueueKind::Mouse))
        );
    }

    #[test]
    fn test_modifiers_attach_to_keys() {
        let mut input = GenericInput::new();
        input.set_modifiers(KeyModifiers::SHIFT);
        input.push_key_pressed(Key::TAB);
        input.set_modifiers(KeyModifiers::NONE);
        input.push_key_released(Key::TAB);

        assert!(input.dequeue_key_input().unwrap().modifiers.shift);
        let released = input.dequeue_key_input().unwrap();
        assert_eq!(released.kind, KeyInputType::Released);
        assert!(released.modifiers.is_empty());
    }
}
