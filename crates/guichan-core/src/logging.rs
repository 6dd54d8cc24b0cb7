//! Logging facilities for Guichan.
//!
//! Guichan uses the `tracing` crate for instrumentation. To see logs, install
//! a subscriber in your application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("guichan::focus=debug")
//!     .init();
//! ```
//!
//! Widget creation and destruction are logged at `trace`, focus and modal
//! transitions at `debug`, and skipped re-entrant listener calls at `warn`.

/// Span names used for tracing.
pub mod span_names {
    /// One `Gui::logic` pass.
    pub const LOGIC: &str = "guichan::logic";
    /// One `Gui::draw` pass.
    pub const DRAW: &str = "guichan::draw";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Widget lifecycle and tree mutation.
    pub const WIDGET: &str = "guichan::widget";
    /// Focus handler transitions.
    pub const FOCUS: &str = "guichan::focus";
    /// Event dispatch in the `Gui`.
    pub const GUI: &str = "guichan::gui";
    /// Input adapters.
    pub const INPUT: &str = "guichan::input";
    /// Graphics sinks.
    pub const GRAPHICS: &str = "guichan::graphics";
    /// Performance spans.
    pub const PERF: &str = "guichan::perf";
}

/// A guard that keeps a performance span entered until dropped.
///
/// ```ignore
/// fn logic(&mut self) {
///     let _span = PerfSpan::new(span_names::LOGIC);
///     // ...
/// }
/// ```
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create and enter a new performance span.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: targets::PERF, "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

/// Trace-level event on the widget target.
#[macro_export]
macro_rules! gcn_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: $crate::logging::targets::WIDGET, $($arg)*)
    };
}

/// Debug-level event on the focus target.
#[macro_export]
macro_rules! gcn_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: $crate::logging::targets::FOCUS, $($arg)*)
    };
}

/// Warn-level event on the gui target.
#[macro_export]
macro_rules! gcn_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: $crate::logging::targets::GUI, $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tracing::span;
    use tracing_subscriber::layer::{Context, SubscriberExt};

    use super::*;

    #[test]
    fn test_perf_span_without_subscriber() {
        let _span = PerfSpan::new(span_names::LOGIC);
    }

    #[test]
    fn test_perf_span_with_subscriber() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::DRAW);
            gcn_trace!("inside draw span");
        });
    }

    /// Records the target of every event and span.
    struct TargetLog(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for TargetLog {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(event.metadata().target().to_string());
        }

        fn on_new_span(&self, attrs: &span::Attributes<'_>, _id: &span::Id, _ctx: Context<'_, S>) {
            self.0.lock().unwrap().push(attrs.metadata().target().to_string());
        }
    }

    #[test]
    fn test_macros_use_module_targets() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(TargetLog(log.clone()));
        tracing::subscriber::with_default(subscriber, || {
            let _span = PerfSpan::new(span_names::LOGIC);
            gcn_trace!("created");
            gcn_debug!("focused");
            gcn_warn!("skipped");
        });
        assert_eq!(
            *log.lock().unwrap(),
            vec![targets::PERF, targets::WIDGET, targets::FOCUS, targets::GUI]
        );
    }
}
