//! A push button.
//!
//! The button is its own mouse, key and focus listener. It fires an action
//! event when clicked with the left button, or when Enter or Space is
//! released after being pressed while it had focus.

use std::sync::Arc;

use guichan_core::logging::targets;
use guichan_core::{Rectangle, WidgetId};
use parking_lot::Mutex;

use crate::graphics::{Alignment, Color, Graphics};
use crate::widget::{
    FocusEvent, FocusListener, Key, KeyEvent, KeyListener, MouseButton, MouseEvent,
    MouseListener, Widget, WidgetBase, WidgetKind, WidgetRegistry, shared,
};

/// Space between the caption and the button edge.
const SPACING: i32 = 4;

/// A clickable button with a text caption.
///
/// # Example
///
/// ```
/// use guichan::widget::{ActionEvent, ActionFn, WidgetRegistry, shared};
/// use guichan::widgets::Button;
///
/// let mut widgets = WidgetRegistry::new();
/// let ok = Button::create(&mut widgets, "Ok");
/// widgets
///     .base_mut(ok)
///     .unwrap()
///     .add_action_listener(shared(ActionFn(|event: &ActionEvent, _: &mut WidgetRegistry| {
///         println!("{} clicked", event.id);
///     })));
/// assert!(widgets.base(ok).unwrap().is_focusable_flag());
/// ```
#[derive(Debug)]
pub struct Button {
    id: Option<WidgetId>,
    caption: String,
    alignment: Alignment,
    has_mouse: bool,
    key_pressed: bool,
    mouse_pressed: bool,
    has_focus: bool,
}

impl Button {
    pub fn new(caption: impl Into<String>) -> Self {
        Self {
            id: None,
            caption: caption.into(),
            alignment: Alignment::Center,
            has_mouse: false,
            key_pressed: false,
            mouse_pressed: false,
            has_focus: false,
        }
    }

    /// Register a button and size it to its caption.
    pub fn create(widgets: &mut WidgetRegistry, caption: impl Into<String>) -> WidgetId {
        Self::create_shared(widgets, caption).0
    }

    /// Register a button and also return its behavior handle, for changing
    /// the caption later.
    ///
    /// Do not lock the handle from inside one of the button's own listener
    /// callbacks; the button is locked while it handles events.
    pub fn create_shared(
        widgets: &mut WidgetRegistry,
        caption: impl Into<String>,
    ) -> (WidgetId, Arc<Mutex<Button>>) {
        let button = shared(Button::new(caption));
        let id = widgets.insert(button.clone(), WidgetKind::Leaf);
        button.lock().id = Some(id);

        if let Ok(base) = widgets.base_mut(id) {
            base.focusable = true;
            base.set_frame_size(1);
            base.add_mouse_listener(button.clone());
            base.add_key_listener(button.clone());
            base.add_focus_listener(button.clone());
        }
        button.lock().adjust_size(widgets);
        (id, button)
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn set_caption(&mut self, caption: impl Into<String>) {
        self.caption = caption.into();
    }

    pub fn alignment(&self) -> Alignment {
        self.alignment
    }

    pub fn set_alignment(&mut self, alignment: Alignment) {
        self.alignment = alignment;
    }

    /// Resize the widget to fit the caption in its effective font.
    pub fn adjust_size(&self, widgets: &mut WidgetRegistry) {
        let Some(id) = self.id else {
            return;
        };
        let (width, height) = match widgets.font(id) {
            Some(font) => (font.width(&self.caption), font.height()),
            None => (0, 0),
        };
        if let Err(err) = widgets.set_size(id, width + 2 * SPACING, height + 2 * SPACING) {
            tracing::warn!(target: targets::WIDGET, %err, "button resize failed");
        }
    }

    /// Whether the button was last told it holds focus.
    pub fn has_focus(&self) -> bool {
        self.has_focus
    }

    /// Whether the button is drawn pressed down.
    pub fn is_pressed(&self) -> bool {
        if self.mouse_pressed {
            self.has_mouse
        } else {
            self.key_pressed
        }
    }

    /// Whether the event's widget-relative position lies inside the button.
    fn contains(&self, event: &MouseEvent, widgets: &WidgetRegistry) -> bool {
        let Some(base) = self.id.and_then(|id| widgets.base(id).ok()) else {
            return false;
        };
        (0..base.width()).contains(&event.x()) && (0..base.height()).contains(&event.y())
    }

    fn fire_action(&self, widgets: &mut WidgetRegistry) {
        if let Some(id) = self.id {
            if let Err(err) = widgets.distribute_action_event(id) {
                tracing::warn!(target: targets::WIDGET, %err, "button action dropped");
            }
        }
    }
}

impl Widget for Button {
    fn type_name(&self) -> &'static str {
        "Button"
    }

    fn draw(&mut self, base: &WidgetBase, graphics: &mut dyn Graphics) {
        let delta = Color::from_hex(0x303030);
        let mut face = base.base_color();
        let (highlight, shadow) = if self.is_pressed() {
            face = face - delta;
            (face - delta, face + delta)
        } else {
            (face + delta, face - delta)
        };

        let width = base.width();
        let height = base.height();

        graphics.set_color(face);
        graphics.fill_rectangle(Rectangle::new(1, 1, width - 1, height - 1));

        graphics.set_color(highlight);
        graphics.draw_line(0, 0, width - 1, 0);
        graphics.draw_line(0, 1, 0, height - 1);

        graphics.set_color(shadow);
        graphics.draw_line(width - 1, 1, width - 1, height - 1);
        graphics.draw_line(1, height - 1, width - 1, height - 1);

        graphics.set_color(base.foreground_color());
        let font_height = graphics.font().map(|f| f.height()).unwrap_or(0);
        let text_x = match self.alignment {
            Alignment::Left => SPACING,
            Alignment::Center => width / 2,
            Alignment::Right => width - SPACING,
        };
        let mut text_y = height / 2 - font_height / 2;
        if self.is_pressed() {
            text_y += 1;
        }
        graphics.draw_text(&self.caption, text_x, text_y, self.alignment);

        if self.has_focus {
            graphics.draw_rectangle(Rectangle::new(2, 2, width - 4, height - 4));
        }
    }
}

impl MouseListener for Button {
    fn mouse_entered(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {
        self.has_mouse = true;
    }

    fn mouse_exited(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {
        self.has_mouse = false;
    }

    fn mouse_pressed(&mut self, event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {
        if event.button() == MouseButton::Left {
            self.mouse_pressed = true;
            self.has_mouse = true;
            event.consume();
        }
    }

    fn mouse_released(&mut self, event: &mut MouseEvent, widgets: &mut WidgetRegistry) {
        if event.button() != MouseButton::Left {
            return;
        }
        let over = self.contains(event, widgets);
        if self.mouse_pressed && over {
            self.mouse_pressed = false;
            self.fire_action(widgets);
        } else {
            self.mouse_pressed = false;
        }
        event.consume();
    }

    fn mouse_dragged(&mut self, event: &mut MouseEvent, widgets: &mut WidgetRegistry) {
        self.has_mouse = self.contains(event, widgets);
        event.consume();
    }
}

impl KeyListener for Button {
    fn key_pressed(&mut self, event: &mut KeyEvent, _widgets: &mut WidgetRegistry) {
        if matches!(event.key(), Key::ENTER | Key::SPACE) {
            self.key_pressed = true;
            event.consume();
        }
    }

    fn key_released(&mut self, event: &mut KeyEvent, widgets: &mut WidgetRegistry) {
        if matches!(event.key(), Key::ENTER | Key::SPACE) && self.key_pressed {
            self.key_pressed = false;
            self.fire_action(widgets);
            event.consume();
        }
    }
}

impl FocusListener for Button {
    fn focus_gained(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {
        self.has_focus = true;
    }

    fn focus_lost(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {
        self.has_focus = false;
        self.mouse_pressed = false;
        self.key_pressed = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{DrawCommand, FixedWidthFont, Font, RecordingGraphics};
    use crate::widget::{ActionEvent, ActionFn, KeyEventType, KeyModifiers, MouseEventType};

    fn setup() -> (WidgetRegistry, WidgetId, Arc<Mutex<Button>>, Arc<Mutex<Vec<String>>>) {
        let mut widgets = WidgetRegistry::new();
        let font: Arc<dyn Font> = Arc::new(FixedWidthFont::new(8, 10));
        widgets.set_global_font(Some(font));
        let (id, button) = Button::create_shared(&mut widgets, "Ok");

        let actions = Arc::new(Mutex::new(Vec::new()));
        let log = actions.clone();
        widgets.base_mut(id).unwrap().set_action_event_id("ok");
        widgets
            .base_mut(id)
            .unwrap()
            .add_action_listener(shared(ActionFn(move |e: &ActionEvent, _: &mut WidgetRegistry| {
                log.lock().push(e.id.clone());
            })));
        (widgets, id, button, actions)
    }

    fn mouse(id: WidgetId, kind: MouseEventType, button: MouseButton) -> MouseEvent {
        mouse_at(id, kind, button, 1, 1)
    }

    fn mouse_at(id: WidgetId, kind: MouseEventType, button: MouseButton, x: i32, y: i32) -> MouseEvent {
        MouseEvent::new(id, kind, button, x, y, 1, KeyModifiers::NONE)
    }

    #[test]
    fn test_create_sizes_to_caption() {
        let (widgets, id, _, _) = setup();
        let base = widgets.base(id).unwrap();
        assert_eq!((base.width(), base.height()), (16 + 8, 10 + 8));
        assert_eq!(base.frame_size(), 1);
    }

    #[test]
    fn test_click_inside_fires_action() {
        let (mut widgets, id, button, actions) = setup();
        let mut b = button.lock();

        let mut press = mouse(id, MouseEventType::Pressed, MouseButton::Left);
        b.mouse_pressed(&mut press, &mut widgets);
        assert!(press.is_consumed());
        assert!(b.is_pressed());

        let mut release = mouse(id, MouseEventType::Released, MouseButton::Left);
        b.mouse_released(&mut release, &mut widgets);
        assert!(release.is_consumed());
        assert_eq!(*actions.lock(), vec!["ok".to_string()]);
    }

    #[test]
    fn test_release_outside_fires_nothing() {
        let (mut widgets, id, button, actions) = setup();
        let mut b = button.lock();

        b.mouse_pressed(&mut mouse(id, MouseEventType::Pressed, MouseButton::Left), &mut widgets);
        let mut drag = mouse_at(id, MouseEventType::Dragged, MouseButton::Left, 30, 5);
        b.mouse_dragged(&mut drag, &mut widgets);
        assert!(!b.is_pressed());

        let mut release = mouse_at(id, MouseEventType::Released, MouseButton::Left, 30, 5);
        b.mouse_released(&mut release, &mut widgets);
        assert!(actions.lock().is_empty());
        assert!(!b.is_pressed());
    }

    #[test]
    fn test_release_on_far_edge_is_outside() {
        let (mut widgets, id, button, actions) = setup();
        let mut b = button.lock();

        b.mouse_pressed(&mut mouse(id, MouseEventType::Pressed, MouseButton::Left), &mut widgets);
        let mut release = mouse_at(id, MouseEventType::Released, MouseButton::Left, 24, 17);
        b.mouse_released(&mut release, &mut widgets);
        assert!(actions.lock().is_empty());
    }

    #[test]
    fn test_right_button_ignored() {
        let (mut widgets, id, button, _) = setup();
        let mut press = mouse(id, MouseEventType::Pressed, MouseButton::Right);
        button.lock().mouse_pressed(&mut press, &mut widgets);
        assert!(!press.is_consumed());
    }

    #[test]
    fn test_enter_key_fires_action_on_release() {
        let (mut widgets, id, button, actions) = setup();
        let mut b = button.lock();

        let mut down = KeyEvent::new(Some(id), KeyEventType::Pressed, Key::ENTER, KeyModifiers::NONE, false);
        b.key_pressed(&mut down, &mut widgets);
        assert!(down.is_consumed());
        assert!(actions.lock().is_empty());

        let mut up = KeyEvent::new(Some(id), KeyEventType::Released, Key::ENTER, KeyModifiers::NONE, false);
        b.key_released(&mut up, &mut widgets);
        assert_eq!(actions.lock().len(), 1);
    }

    #[test]
    fn test_focus_lost_resets_press_state() {
        let (mut widgets, id, button, actions) = setup();
        let mut b = button.lock();

        let mut down = KeyEvent::new(Some(id), KeyEventType::Pressed, Key::SPACE, KeyModifiers::NONE, false);
        b.key_pressed(&mut down, &mut widgets);
        b.focus_lost(&FocusEvent { source: id }, &mut widgets);

        let mut up = KeyEvent::new(Some(id), KeyEventType::Released, Key::SPACE, KeyModifiers::NONE, false);
        b.key_released(&mut up, &mut widgets);
        assert!(actions.lock().is_empty());
        assert!(!up.is_consumed());
    }

    #[test]
    fn test_draw_centers_caption() {
        let (widgets, id, _, _) = setup();
        let mut graphics = RecordingGraphics::new();
        widgets.draw_tree(id, &mut graphics).unwrap();

        assert!(graphics.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { text, x: 12, alignment: Alignment::Center, .. } if text == "Ok"
        )));
    }
}
