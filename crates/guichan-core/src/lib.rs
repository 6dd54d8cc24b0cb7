//! Core types for Guichan.
//!
//! This crate holds the pieces shared by every layer of the toolkit:
//!
//! - **Handles**: [`WidgetId`] and [`FocusHandlerId`], generational arena keys
//!   that stay safe to hold after the referenced widget is destroyed
//! - **Errors**: [`GuiError`] and the crate-wide [`Result`] alias
//! - **Geometry**: [`Rectangle`] and [`ClipRectangle`]
//! - **Logging**: tracing targets and span helpers in [`logging`]
//!
//! # Example
//!
//! ```
//! use guichan_core::Rectangle;
//!
//! let area = Rectangle::new(10, 10, 80, 20);
//! assert!(area.is_point_in_rect(10, 10));
//! assert!(!area.is_point_in_rect(90, 10));
//! ```

pub mod error;
pub mod geometry;
pub mod logging;
pub mod object;

pub use error::{GuiError, QueueKind, Result};
pub use geometry::{ClipRectangle, Rectangle};
pub use logging::PerfSpan;
pub use object::{FocusHandlerId, WidgetId};
