//! Listener traits for widget events.
//!
//! Listeners are shared handles (`Arc<Mutex<dyn ...>>`) registered on a
//! widget's [`WidgetBase`](super::WidgetBase). Every callback receives the
//! [`WidgetRegistry`] so a listener can mutate the tree in response, including
//! destroying widgets. Dispatch snapshots the listener list before calling
//! into it, and checks widget liveness again before touching the tree.
//!
//! All methods have empty default implementations; implement only the ones
//! you care about.

use std::sync::Arc;

use parking_lot::Mutex;

use super::events::{ActionEvent, DeathEvent, FocusEvent, KeyEvent, MouseEvent, WidgetEvent};
use super::registry::WidgetRegistry;

/// Receives mouse events.
pub trait MouseListener: Send {
    fn mouse_entered(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_exited(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_pressed(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_released(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_clicked(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_wheel_moved_up(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_wheel_moved_down(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {
    }
    fn mouse_moved(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
    fn mouse_dragged(&mut self, _event: &mut MouseEvent, _widgets: &mut WidgetRegistry) {}
}

/// Receives key events, either from a focused widget or globally from the `Gui`.
pub trait KeyListener: Send {
    fn key_pressed(&mut self, _event: &mut KeyEvent, _widgets: &mut WidgetRegistry) {}
    fn key_released(&mut self, _event: &mut KeyEvent, _widgets: &mut WidgetRegistry) {}
}

/// Receives focus changes.
pub trait FocusListener: Send {
    fn focus_gained(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {}
    fn focus_lost(&mut self, _event: &FocusEvent, _widgets: &mut WidgetRegistry) {}
}

/// Receives actions such as button clicks.
pub trait ActionListener: Send {
    fn action(&mut self, event: &ActionEvent, widgets: &mut WidgetRegistry);
}

/// Notified just before a widget is destroyed.
pub trait DeathListener: Send {
    fn death(&mut self, event: &DeathEvent, widgets: &mut WidgetRegistry);
}

/// Receives geometry and visibility changes.
pub trait WidgetListener: Send {
    fn widget_resized(&mut self, _event: &WidgetEvent, _widgets: &mut WidgetRegistry) {}
    fn widget_moved(&mut self, _event: &WidgetEvent, _widgets: &mut WidgetRegistry) {}
    fn widget_hidden(&mut self, _event: &WidgetEvent, _widgets: &mut WidgetRegistry) {}
    fn widget_shown(&mut self, _event: &WidgetEvent, _widgets: &mut WidgetRegistry) {}
}

pub type SharedMouseListener = Arc<Mutex<dyn MouseListener>>;
pub type SharedKeyListener = Arc<Mutex<dyn KeyListener>>;
pub type SharedFocusListener = Arc<Mutex<dyn FocusListener>>;
pub type SharedActionListener = Arc<Mutex<dyn ActionListener>>;
pub type SharedDeathListener = Arc<Mutex<dyn DeathListener>>;
pub type SharedWidgetListener = Arc<Mutex<dyn WidgetListener>>;

/// Wrap a value in the shared handle type used for listeners and widgets.
pub fn shared<T>(value: T) -> Arc<Mutex<T>> {
    Arc::new(Mutex::new(value))
}

/// Remove `listener` from `list` by pointer identity.
pub(crate) fn remove_listener<T: ?Sized>(list: &mut Vec<Arc<Mutex<T>>>, listener: &Arc<Mutex<T>>) {
    list.retain(|l| !Arc::ptr_eq(l, listener));
}

/// An [`ActionListener`] backed by a closure.
pub struct ActionFn<F>(pub F);

impl<F> ActionListener for ActionFn<F>
where
    F: FnMut(&ActionEvent, &mut WidgetRegistry) + Send,
{
    fn action(&mut self, event: &ActionEvent, widgets: &mut WidgetRegistry) {
        (self.0)(event, widgets)
    }
}
