//! Widgets, containers and focus.
//!
//! # Architecture
//!
//! - [`WidgetRegistry`]: the arena holding every widget and focus handler
//! - [`WidgetBase`]: state shared by every widget (geometry, flags, colors,
//!   listeners)
//! - [`Widget`]: the per-type behavior (drawing, logic)
//! - [`FocusHandler`]: focus, modal focus and tab order for one tree
//! - Listener traits and event types for mouse, key, focus, action, death
//!   and widget notifications
//!
//! Container operations (`add`, `remove`, z-order, hit testing) are methods
//! on the registry, since they update both the container and the child.

mod base;
mod container;
pub mod events;
mod focus;
pub mod listeners;
mod registry;
mod traits;

pub use base::WidgetBase;
pub use events::{
    ActionEvent, DeathEvent, FocusEvent, Key, KeyEvent, KeyEventType, KeyModifiers, MouseButton,
    MouseEvent, MouseEventType, WidgetEvent,
};
pub use focus::{FocusHandler, FocusTransition, WidgetAccess};
pub use listeners::{
    ActionFn, ActionListener, DeathListener, FocusListener, KeyListener, MouseListener,
    SharedActionListener, SharedDeathListener, SharedFocusListener, SharedKeyListener,
    SharedMouseListener, SharedWidgetListener, WidgetListener, shared,
};
pub use registry::{WidgetArena, WidgetKind, WidgetRegistry};
pub use traits::{SharedWidget, Widget, draw_bevel_frame};
