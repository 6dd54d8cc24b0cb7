//! Stock widgets.
//!
//! Each widget provides a `create` constructor that registers it with a
//! [`WidgetRegistry`](crate::widget::WidgetRegistry) and returns its handle.

mod button;
mod container;

pub use button::Button;
pub use container::Container;
