//! Guichan - a small retained-mode GUI toolkit.
//!
//! The toolkit is split into a few layers:
//!
//! - [`widget`]: the widget registry, containment tree, focus handling and
//!   the listener/event types
//! - [`gui`]: the [`Gui`] façade that turns raw input into widget events and
//!   drives drawing
//! - [`input`]: raw key and mouse input queues, plus a winit adapter behind
//!   the `winit` feature
//! - [`graphics`]: the drawing sink trait and a headless recording backend
//! - [`widgets`]: stock widgets built on the above
//!
//! # Example
//!
//! ```
//! use guichan::input::GenericInput;
//! use guichan::widget::{ActionEvent, ActionFn, MouseButton, WidgetRegistry, shared};
//! use guichan::widgets::{Button, Container};
//! use guichan::Gui;
//!
//! let mut gui = Gui::new();
//! let top = Container::create(gui.widgets_mut());
//! gui.widgets_mut().set_size(top, 200, 100).unwrap();
//!
//! let ok = Button::create(gui.widgets_mut(), "Ok");
//! gui.widgets_mut().set_dimension(ok, guichan::Rectangle::new(10, 10, 40, 20)).unwrap();
//! gui.widgets_mut().add(top, ok).unwrap();
//!
//! let clicks = shared(0);
//! let counter = clicks.clone();
//! gui.widgets_mut()
//!     .base_mut(ok)
//!     .unwrap()
//!     .add_action_listener(shared(ActionFn(move |_: &ActionEvent, _: &mut WidgetRegistry| {
//!         *counter.lock() += 1;
//!     })));
//!
//! gui.set_top(Some(top)).unwrap();
//! let input = shared(GenericInput::new());
//! gui.set_input(Some(input.clone()));
//!
//! {
//!     let mut input = input.lock();
//!     input.push_mouse_moved(15, 15);
//!     input.push_mouse_button_pressed(15, 15, MouseButton::Left);
//!     input.push_mouse_button_released(15, 15, MouseButton::Left);
//! }
//! gui.logic().unwrap();
//! assert_eq!(*clicks.lock(), 1);
//! ```

pub mod config;
pub mod debug;
pub mod graphics;
pub mod gui;
pub mod input;
pub mod widget;
pub mod widgets;

pub use config::GuiConfig;
pub use gui::{Gui, SharedGraphics};

pub use guichan_core;
pub use guichan_core::{
    ClipRectangle, FocusHandlerId, GuiError, QueueKind, Rectangle, Result, WidgetId,
};
