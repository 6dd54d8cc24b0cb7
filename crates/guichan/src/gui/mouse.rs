//! Mouse input handling and dispatch.

use guichan_core::logging::targets;
use guichan_core::{Result, WidgetId, gcn_debug};

use super::Gui;
use crate::input::{MouseInput, MouseInputType, SharedInput};
use crate::widget::{MouseButton, MouseEvent, MouseEventType};

/// Delivery options for [`Gui::distribute_mouse_event`].
#[derive(Debug, Clone, Copy, Default)]
struct Delivery {
    /// Deliver to disabled widgets and ignore modal scope at the source.
    force: bool,
    /// Do not bubble to ancestors.
    to_source_only: bool,
}

const BUBBLE: Delivery = Delivery {
    force: false,
    to_source_only: false,
};

const FORCED_SOURCE_ONLY: Delivery = Delivery {
    force: true,
    to_source_only: true,
};

impl Gui {
    pub(super) fn handle_mouse_input(&mut self, input: &SharedInput) -> Result<()> {
        loop {
            let mouse_input = {
                let mut input = input.lock();
                if input.is_mouse_queue_empty() {
                    break;
                }
                input.dequeue_mouse_input()?
            };

            self.last_mouse_x = mouse_input.x;
            self.last_mouse_y = mouse_input.y;

            match mouse_input.kind {
                MouseInputType::Pressed => self.handle_mouse_pressed(mouse_input)?,
                MouseInputType::Released => self.handle_mouse_released(mouse_input)?,
                MouseInputType::Moved => self.handle_mouse_moved(mouse_input)?,
                MouseInputType::WheelMovedDown => {
                    self.handle_mouse_wheel(mouse_input, MouseEventType::WheelMovedDown)?
                }
                MouseInputType::WheelMovedUp => {
                    self.handle_mouse_wheel(mouse_input, MouseEventType::WheelMovedUp)?
                }
            }
        }
        Ok(())
    }

    /// Whether a screen point lies outside the widget's on-screen rectangle.
    fn is_outside(&self, widget: WidgetId, x: i32, y: i32) -> bool {
        let (Ok((wx, wy)), Ok(dimension)) = (
            self.widgets.absolute_position(widget),
            self.widgets.dimension(widget),
        ) else {
            return true;
        };
        wx > x || wy > y || wx + dimension.width <= x || wy + dimension.height <= y
    }

    /// The widget that should receive a mouse event at a screen position:
    /// the hit-tested widget, unless modal mouse input focus is held
    /// outside it.
    pub(super) fn mouse_event_source(&self, x: i32, y: i32) -> Result<WidgetId> {
        let widget = self.get_widget_at(x, y)?;
        match self.modal_mouse_input_focused() {
            Some(holder) if !self.is_modal_mouse_input_focused(widget) => Ok(holder),
            _ => Ok(widget),
        }
    }

    fn handle_mouse_moved(&mut self, input: MouseInput) -> Result<()> {
        let top = self.live_top()?;
        let (x, y) = (input.x, input.y);

        // The mouse left the top widget: exit everything.
        let top_area = self.widgets.dimension(top)?;
        if !self.widgets_with_mouse.is_empty()
            && (x < 0 || y < 0 || !top_area.is_point_in_rect(x, y))
        {
            while let Some(widget) = self.widgets_with_mouse.pop_front() {
                if self.widgets.contains(widget) {
                    self.distribute_mouse_event(
                        widget,
                        MouseEventType::Exited,
                        input.button,
                        x,
                        y,
                        FORCED_SOURCE_ONLY,
                    );
                }
            }
            return Ok(());
        }

        // Exit the widgets the mouse is no longer over.
        let mut index = 0;
        while index < self.widgets_with_mouse.len() {
            let widget = self.widgets_with_mouse[index];
            if !self.widgets.contains(widget) {
                self.widgets_with_mouse.remove(index);
                continue;
            }
            if self.is_outside(widget, x, y) || !self.widgets.is_visible(widget) {
                self.distribute_mouse_event(
                    widget,
                    MouseEventType::Exited,
                    input.button,
                    x,
                    y,
                    FORCED_SOURCE_ONLY,
                );
                self.click_count = 1;
                self.last_mouse_press_timestamp = 0;
                self.widgets_with_mouse.retain(|&w| w != widget);
                index = 0;
                continue;
            }
            index += 1;
        }

        // Enter the widgets under the mouse that are not tracked yet. A
        // modal mouse input holder is only entered when the mouse is
        // actually over it.
        let source = self.mouse_event_source(x, y)?;
        let mut current = Some(source);
        if self.modal_mouse_input_focused() == Some(source) && self.is_outside(source, x, y) {
            current = None;
        }
        self.enter_chain(current, input.button, x, y, FORCED_SOURCE_ONLY);

        match self.dragged() {
            Some(dragged) => self.distribute_mouse_event(
                dragged,
                MouseEventType::Dragged,
                self.last_mouse_drag_button,
                x,
                y,
                BUBBLE,
            ),
            None => {
                let source = self.mouse_event_source(x, y)?;
                self.distribute_mouse_event(
                    source,
                    MouseEventType::Moved,
                    input.button,
                    x,
                    y,
                    BUBBLE,
                );
            }
        }
        Ok(())
    }

    /// Send `Entered` to `start` and each ancestor not already tracked, and
    /// track them.
    fn enter_chain(
        &mut self,
        start: Option<WidgetId>,
        button: MouseButton,
        x: i32,
        y: i32,
        delivery: Delivery,
    ) {
        let mut current = start;
        while let Some(widget) = current {
            if !self.widgets.contains(widget) {
                break;
            }
            if !self.widgets_with_mouse.contains(&widget) {
                self.distribute_mouse_event(widget, MouseEventType::Entered, button, x, y, delivery);
                self.widgets_with_mouse.push_front(widget);
            }
            current = self.widgets.parent(widget);
        }
    }

    fn handle_mouse_pressed(&mut self, input: MouseInput) -> Result<()> {
        let source = match self.dragged() {
            Some(dragged) => dragged,
            None => self.mouse_event_source(input.x, input.y)?,
        };

        if self.modal_focused().is_none() || self.is_modal_focused(source) {
            if let Err(err) = self.widgets.request_focus(source) {
                gcn_debug!(widget = ?source, %err, "focus request on press failed");
            }
        }

        let elapsed = input
            .timestamp
            .saturating_sub(self.last_mouse_press_timestamp);
        if elapsed < self.config.double_click_threshold_ms
            && self.last_mouse_press_button == input.button
        {
            self.click_count += 1;
        } else {
            self.click_count = 1;
        }

        self.distribute_mouse_event(
            source,
            MouseEventType::Pressed,
            input.button,
            input.x,
            input.y,
            BUBBLE,
        );

        if self.widgets.contains(source) {
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_pressed(Some(source));
                handler.set_dragged(Some(source));
            }
        }
        self.last_mouse_drag_button = input.button;
        self.last_mouse_press_button = input.button;
        self.last_mouse_press_timestamp = input.timestamp;
        Ok(())
    }

    fn handle_mouse_wheel(&mut self, input: MouseInput, kind: MouseEventType) -> Result<()> {
        let source = match self.dragged() {
            Some(dragged) => dragged,
            None => self.mouse_event_source(input.x, input.y)?,
        };
        self.distribute_mouse_event(source, kind, input.button, input.x, input.y, BUBBLE);
        Ok(())
    }

    fn handle_mouse_released(&mut self, input: MouseInput) -> Result<()> {
        let mut source = self.mouse_event_source(input.x, input.y)?;
        if let Some(dragged) = self.dragged() {
            let last_pressed = self.handler().and_then(|h| h.last_widget_pressed());
            if last_pressed != Some(source) {
                if let Some(handler) = self.handler_mut() {
                    handler.set_last_widget_pressed(None);
                }
            }
            source = dragged;
        }

        self.distribute_mouse_event(
            source,
            MouseEventType::Released,
            input.button,
            input.x,
            input.y,
            BUBBLE,
        );

        let last_pressed = self.handler().and_then(|h| h.last_widget_pressed());
        if input.button == self.last_mouse_press_button && last_pressed == Some(source) {
            self.distribute_mouse_event(
                source,
                MouseEventType::Clicked,
                input.button,
                input.x,
                input.y,
                BUBBLE,
            );
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_pressed(None);
            }
        } else {
            self.last_mouse_press_button = MouseButton::Empty;
            self.click_count = 0;
        }

        if let Some(handler) = self.handler_mut() {
            handler.set_dragged(None);
        }
        Ok(())
    }

    /// Deliver a mouse event to `source` and bubble it toward the root.
    ///
    /// Bubbling stops when the event is consumed, when a destroyed widget
    /// is reached, or when the next ancestor is outside the modal scope.
    /// Disabled widgets are skipped unless the delivery is forced.
    fn distribute_mouse_event(
        &mut self,
        source: WidgetId,
        kind: MouseEventType,
        button: MouseButton,
        x: i32,
        y: i32,
        delivery: Delivery,
    ) {
        if !self.widgets.contains(source) {
            return;
        }
        if !delivery.force {
            if self.modal_focused().is_some() && !self.is_modal_focused(source) {
                return;
            }
            if self.modal_mouse_input_focused().is_some()
                && !self.is_modal_mouse_input_focused(source)
            {
                return;
            }
        }

        let mut event = MouseEvent::new(source, kind, button, x, y, self.click_count, self.modifiers);
        let mut current = Some(source);
        while let Some(widget) = current {
            if !self.widgets.contains(widget) {
                break;
            }

            if delivery.force || self.widgets.is_enabled(widget) {
                if let Ok((wx, wy)) = self.widgets.absolute_position(widget) {
                    event.x = x - wx;
                    event.y = y - wy;
                }
                self.widgets.distribute_mouse_event_to(widget, &mut event);
                if delivery.to_source_only {
                    break;
                }
            }
            if event.is_consumed() {
                tracing::trace!(target: targets::GUI, ?widget, ?kind, "mouse event consumed");
                break;
            }

            current = self.widgets.parent(widget);
            if let Some(next) = current {
                if self.modal_focused().is_some() && !self.is_modal_focused(next) {
                    break;
                }
                if self.modal_mouse_input_focused().is_some()
                    && !self.is_modal_mouse_input_focused(next)
                {
                    break;
                }
            }
        }
    }

    // =========================================================================
    // Modal focus transitions
    // =========================================================================

    pub(super) fn handle_modal_focus(&mut self) -> Result<()> {
        let Some(handler) = self.handler() else {
            return Ok(());
        };
        let last = handler.last_widget_with_modal_focus();
        let current = handler.modal_focused();
        if last == current {
            return Ok(());
        }

        if last.is_none() {
            self.handle_modal_focus_gained();
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_with_modal_focus(current);
            }
        } else {
            self.handle_modal_focus_released()?;
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_with_modal_focus(None);
            }
        }
        Ok(())
    }

    pub(super) fn handle_modal_mouse_input_focus(&mut self) -> Result<()> {
        let Some(handler) = self.handler() else {
            return Ok(());
        };
        let last = handler.last_widget_with_modal_mouse_input_focus();
        let current = handler.modal_mouse_input_focused();
        if last == current {
            return Ok(());
        }

        if last.is_none() {
            self.handle_modal_focus_gained();
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_with_modal_mouse_input_focus(current);
            }
        } else {
            self.handle_modal_focus_released()?;
            if let Some(handler) = self.handler_mut() {
                handler.set_last_widget_with_modal_mouse_input_focus(None);
            }
        }
        Ok(())
    }

    /// Exit every widget under the mouse.
    fn handle_modal_focus_gained(&mut self) {
        gcn_debug!("modal focus gained, exiting widgets under the mouse");
        while let Some(widget) = self.widgets_with_mouse.pop_front() {
            if self.widgets.contains(widget) {
                self.distribute_mouse_event(
                    widget,
                    MouseEventType::Exited,
                    self.last_mouse_press_button,
                    self.last_mouse_x,
                    self.last_mouse_y,
                    FORCED_SOURCE_ONLY,
                );
            }
        }
        let holder = self.modal_mouse_input_focused();
        if let Some(handler) = self.handler_mut() {
            handler.set_last_widget_with_modal_mouse_input_focus(holder);
        }
    }

    /// Re-enter the widgets under the last known mouse position.
    fn handle_modal_focus_released(&mut self) -> Result<()> {
        gcn_debug!("modal focus released, entering widgets under the mouse");
        let source = self.mouse_event_source(self.last_mouse_x, self.last_mouse_y)?;
        self.enter_chain(
            Some(source),
            self.last_mouse_press_button,
            self.last_mouse_x,
            self.last_mouse_y,
            Delivery {
                force: false,
                to_source_only: true,
            },
        );
        Ok(())
    }
}
