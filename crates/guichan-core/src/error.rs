//! Error types for Guichan.
//!
//! Every fallible operation in the toolkit returns [`Result`]. Errors are never
//! caught or retried inside the library; they surface to the caller of
//! `Gui::logic`, `Gui::draw` or the widget operation that failed.

use std::fmt;

use thiserror::Error;

use crate::object::{FocusHandlerId, WidgetId};

/// Which input queue an operation refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueKind {
    /// The keyboard input queue.
    Key,
    /// The mouse input queue.
    Mouse,
}

impl fmt::Display for QueueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key => f.write_str("key"),
            Self::Mouse => f.write_str("mouse"),
        }
    }
}

/// The main error type for Guichan operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuiError {
    /// `Gui::logic` or `Gui::draw` was called before a top widget was set.
    #[error("no top widget set")]
    NoTopWidget,

    /// `Gui::draw` was called before a graphics sink was set.
    #[error("no graphics set")]
    NoGraphics,

    /// The widget is not attached to a tree with a focus handler.
    #[error("widget {0:?} has no focus handler")]
    NoFocusHandler(WidgetId),

    /// The widget handle does not refer to a live widget.
    #[error("widget {0:?} does not exist")]
    InvalidWidget(WidgetId),

    /// The focus handler handle does not refer to a live focus handler.
    #[error("focus handler {0:?} does not exist")]
    InvalidFocusHandler(FocusHandlerId),

    /// A container operation was invoked on a leaf widget.
    #[error("widget {0:?} is not a container")]
    NotAContainer(WidgetId),

    /// The widget is not a child of the container.
    #[error("there is no such widget {widget:?} in container {container:?}")]
    NotInContainer {
        /// The container that was searched.
        container: WidgetId,
        /// The widget that was not found.
        widget: WidgetId,
    },

    /// The widget already has a parent and must be removed from it first.
    #[error("widget {0:?} already has a parent")]
    AlreadyInContainer(WidgetId),

    /// The widget cannot be its own ancestor.
    #[error("adding widget {0:?} would create a cycle")]
    CircularParentage(WidgetId),

    /// The widget is not registered with the focus handler.
    #[error("trying to focus a widget {0:?} that is not registered")]
    NotRegistered(WidgetId),

    /// Another widget already holds modal focus.
    #[error("another widget {holder:?} already has modal focus")]
    ModalFocusTaken {
        /// The current modal focus holder.
        holder: WidgetId,
    },

    /// Another widget already holds modal mouse input focus.
    #[error("another widget {holder:?} already has modal mouse input focus")]
    ModalMouseInputFocusTaken {
        /// The current modal mouse input focus holder.
        holder: WidgetId,
    },

    /// An input queue was dequeued while empty.
    #[error("the {0} input queue is empty")]
    EmptyQueue(QueueKind),

    /// A raw event type code could not be interpreted.
    #[error("unknown {kind} event type {value}")]
    UnknownEventType {
        /// The kind of event being converted.
        kind: &'static str,
        /// The raw code.
        value: u32,
    },

    /// Drawing left the clip stack at a different depth than it started.
    #[error("clip stack unbalanced after draw: expected depth {expected}, found {actual}")]
    UnbalancedClipStack {
        /// Depth before drawing.
        expected: usize,
        /// Depth after drawing.
        actual: usize,
    },

    /// A clip area was popped without a matching push.
    #[error("tried to pop clip area from an empty stack")]
    ClipStackEmpty,

    /// Configuration could not be parsed or serialized.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A specialized Result type for Guichan operations.
pub type Result<T> = std::result::Result<T, GuiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GuiError::NoTopWidget.to_string(), "no top widget set");
        assert_eq!(
            GuiError::EmptyQueue(QueueKind::Mouse).to_string(),
            "the mouse input queue is empty"
        );
        assert_eq!(
            GuiError::UnknownEventType {
                kind: "mouse",
                value: 42
            }
            .to_string(),
            "unknown mouse event type 42"
        );
    }

    #[test]
    fn test_error_equality() {
        let id = WidgetId::default();
        assert_eq!(GuiError::InvalidWidget(id), GuiError::InvalidWidget(id));
        assert_ne!(GuiError::NoTopWidget, GuiError::NoGraphics);
    }
}
