//! Key input handling and dispatch.

use guichan_core::{Result, WidgetId, gcn_warn};

use super::Gui;
use crate::input::{KeyInput, KeyInputType, SharedInput};
use crate::widget::{Key, KeyEvent, KeyEventType};

impl Gui {
    pub(super) fn handle_key_input(&mut self, input: &SharedInput) -> Result<()> {
        loop {
            let key_input = {
                let mut input = input.lock();
                if input.is_key_queue_empty() {
                    break;
                }
                input.dequeue_key_input()?
            };
            self.handle_key(key_input)?;
        }
        Ok(())
    }

    fn handle_key(&mut self, input: KeyInput) -> Result<()> {
        self.modifiers = input.modifiers;
        let kind = match input.kind {
            KeyInputType::Pressed => KeyEventType::Pressed,
            KeyInputType::Released => KeyEventType::Released,
        };

        let mut global = KeyEvent::new(None, kind, input.key, input.modifiers, input.numeric_pad);
        self.distribute_key_event_to_global_key_listeners(&mut global);
        if global.is_consumed() {
            return Ok(());
        }

        let mut consumed = false;
        if let Some(focused) = self.focused() {
            if self.widgets.is_focusable(focused) {
                let source = self.key_event_source(focused);
                let mut event =
                    KeyEvent::new(Some(source), kind, input.key, input.modifiers, input.numeric_pad);
                self.distribute_key_event(&mut event);
                consumed = event.is_consumed();
            } else {
                self.widgets.focus_none(self.focus_handler)?;
            }
        }

        if !consumed
            && self.config.tabbing_enabled
            && input.key == Key::TAB
            && input.kind == KeyInputType::Pressed
        {
            if input.modifiers.shift {
                self.widgets.tab_previous(self.focus_handler)?;
            } else {
                self.widgets.tab_next(self.focus_handler)?;
            }
        }
        Ok(())
    }

    /// The focused widget, descending through internal focus handlers.
    fn key_event_source(&self, focused: WidgetId) -> WidgetId {
        let mut widget = focused;
        while let Some(inner) = self
            .widgets
            .base(widget)
            .ok()
            .and_then(|b| b.internal_focus_handler())
            .and_then(|h| self.widgets.focus_handler(h).ok())
            .and_then(|h| h.focused())
        {
            if inner == widget {
                break;
            }
            widget = inner;
        }
        widget
    }

    fn distribute_key_event_to_global_key_listeners(&mut self, event: &mut KeyEvent) {
        for listener in self.key_listeners.clone() {
            let Some(mut listener) = listener.try_lock() else {
                gcn_warn!("re-entrant global key listener skipped");
                continue;
            };
            match event.kind() {
                KeyEventType::Pressed => listener.key_pressed(event, &mut self.widgets),
                KeyEventType::Released => listener.key_released(event, &mut self.widgets),
            }
            drop(listener);
            self.widgets.flush_pending_focus();
            if event.is_consumed() {
                break;
            }
        }
    }

    /// Deliver a key event to its source and bubble it toward the root.
    ///
    /// Bubbling stops when the event is consumed, when a destroyed widget
    /// is reached, or when the next ancestor is outside modal focus.
    fn distribute_key_event(&mut self, event: &mut KeyEvent) {
        let Some(source) = event.source() else {
            return;
        };
        if self.modal_focused().is_some() && !self.is_modal_focused(source) {
            return;
        }
        if self.modal_mouse_input_focused().is_some() && !self.is_modal_mouse_input_focused(source)
        {
            return;
        }

        let mut current = Some(source);
        while let Some(widget) = current {
            if !self.widgets.contains(widget) {
                break;
            }
            if self.widgets.is_enabled(widget) {
                self.widgets.distribute_key_event_to(widget, event);
            }
            if event.is_consumed() {
                break;
            }

            current = self.widgets.parent(widget);
            if let Some(next) = current {
                if self.modal_focused().is_some() && !self.is_modal_focused(next) {
                    break;
                }
            }
        }
    }
}
