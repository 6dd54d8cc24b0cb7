//! Widget tree visualization for diagnostics.
//!
//! ```
//! use guichan::debug::{TreeFormatOptions, WidgetTreeDebug};
//! use guichan::widget::WidgetRegistry;
//! use guichan::widgets::{Button, Container};
//!
//! let mut widgets = WidgetRegistry::new();
//! let root = Container::create(&mut widgets);
//! widgets.base_mut(root).unwrap().set_name("root");
//! let ok = Button::create(&mut widgets, "Ok");
//! widgets.base_mut(ok).unwrap().set_name("ok");
//! widgets.add(root, ok).unwrap();
//!
//! let debug = WidgetTreeDebug::with_options(TreeFormatOptions::minimal());
//! let text = debug.format_subtree(&widgets, root).unwrap();
//! assert_eq!(text, "root\n\u{2514}\u{2500}\u{2500} ok\n");
//! ```

use std::fmt::Write;

use guichan_core::{Result, WidgetId};

use crate::widget::WidgetRegistry;

/// Connector style for tree output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TreeStyle {
    /// ASCII characters for tree branches.
    Ascii,
    /// Unicode box-drawing characters.
    #[default]
    Unicode,
    /// Dashes only.
    Compact,
}

/// Configuration for widget tree output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    pub style: TreeStyle,
    /// Show widget handles.
    pub show_ids: bool,
    /// Show the behavior's type name.
    pub show_types: bool,
    /// Show position, size and the hidden/disabled/focusable flags.
    pub show_geometry: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            style: TreeStyle::default(),
            show_ids: true,
            show_types: true,
            show_geometry: false,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Everything, including geometry.
    pub fn detailed() -> Self {
        Self {
            show_geometry: true,
            ..Default::default()
        }
    }

    /// Names only.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            show_geometry: false,
            ..Default::default()
        }
    }
}

/// Formats widget trees held in a [`WidgetRegistry`].
#[derive(Debug, Clone, Default)]
pub struct WidgetTreeDebug {
    options: TreeFormatOptions,
}

impl WidgetTreeDebug {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self { options }
    }

    /// Format every tree in the registry, one per parentless widget.
    pub fn format_all(&self, widgets: &WidgetRegistry) -> Result<String> {
        let mut roots: Vec<_> = widgets
            .widget_ids()
            .filter(|&id| widgets.parent(id).is_none())
            .collect();
        roots.sort();

        let mut output = String::new();
        let _ = writeln!(output, "Widget Tree ({} total widgets):", widgets.len());
        if roots.is_empty() {
            output.push_str("  (empty)\n");
        }
        for root in roots {
            self.format_subtree_into(widgets, root, 0, true, &mut output)?;
        }
        Ok(output)
    }

    /// Format the subtree rooted at `root`.
    pub fn format_subtree(&self, widgets: &WidgetRegistry, root: WidgetId) -> Result<String> {
        let mut output = String::new();
        self.format_subtree_into(widgets, root, 0, true, &mut output)?;
        Ok(output)
    }

    fn format_subtree_into(
        &self,
        widgets: &WidgetRegistry,
        id: WidgetId,
        depth: usize,
        is_last: bool,
        output: &mut String,
    ) -> Result<()> {
        if self.options.max_depth.is_some_and(|max| depth > max) {
            return Ok(());
        }

        let base = widgets.base(id)?;
        output.push_str(&self.build_prefix(depth, is_last));
        output.push_str(if base.name().is_empty() {
            "(unnamed)"
        } else {
            base.name()
        });

        if self.options.show_ids {
            let _ = write!(output, " [{id:?}]");
        }
        if self.options.show_types {
            let behavior = widgets.behavior(id)?;
            let type_name = behavior.try_lock().map(|b| b.type_name()).unwrap_or("busy");
            let _ = write!(output, " ({type_name})");
        }
        if self.options.show_geometry {
            let d = base.dimension();
            let _ = write!(output, " @{},{} {}x{}", d.x, d.y, d.width, d.height);
            if !base.is_visible_flag() {
                output.push_str(" hidden");
            }
            if !base.is_enabled_flag() {
                output.push_str(" disabled");
            }
            if base.is_focusable_flag() {
                output.push_str(" focusable");
            }
        }
        output.push('\n');

        let children = if widgets.is_container(id) {
            widgets.children(id)?
        } else {
            Vec::new()
        };
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.format_subtree_into(widgets, child, depth + 1, i + 1 == count, output)?;
        }
        Ok(())
    }

    fn build_prefix(&self, depth: usize, is_last: bool) -> String {
        if depth == 0 {
            return String::new();
        }

        let (branch, tee, corner) = match self.options.style {
            TreeStyle::Ascii => ("|", "+--", "`--"),
            TreeStyle::Unicode => ("\u{2502}", "\u{251c}\u{2500}\u{2500}", "\u{2514}\u{2500}\u{2500}"),
            TreeStyle::Compact => ("", "-", "-"),
        };

        let mut prefix = String::new();
        for _ in 0..depth - 1 {
            prefix.push_str(branch);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { corner } else { tee });
        prefix.push(' ');
        prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::Container;

    fn setup() -> (WidgetRegistry, WidgetId) {
        let mut widgets = WidgetRegistry::new();
        let root = Container::create(&mut widgets);
        widgets.base_mut(root).unwrap().set_name("root");
        for name in ["a", "b"] {
            let child = Container::create(&mut widgets);
            widgets.base_mut(child).unwrap().set_name(name);
            widgets.add_owned(root, child).unwrap();
        }
        (widgets, root)
    }

    #[test]
    fn test_ascii_connectors() {
        let (widgets, root) = setup();
        let debug = WidgetTreeDebug::with_options(TreeFormatOptions {
            style: TreeStyle::Ascii,
            ..TreeFormatOptions::minimal()
        });
        let text = debug.format_subtree(&widgets, root).unwrap();
        assert_eq!(text, "root\n+-- a\n`-- b\n");
    }

    #[test]
    fn test_max_depth_stops_descent() {
        let (widgets, root) = setup();
        let debug = WidgetTreeDebug::with_options(TreeFormatOptions {
            max_depth: Some(0),
            ..TreeFormatOptions::minimal()
        });
        assert_eq!(debug.format_subtree(&widgets, root).unwrap(), "root\n");
    }

    #[test]
    fn test_types_and_geometry() {
        let (mut widgets, root) = setup();
        widgets.set_dimension(root, guichan_core::Rectangle::new(1, 2, 30, 40)).unwrap();
        widgets.set_visible(root, false).unwrap();

        let debug = WidgetTreeDebug::with_options(TreeFormatOptions {
            show_ids: false,
            max_depth: Some(0),
            ..TreeFormatOptions::detailed()
        });
        let text = debug.format_subtree(&widgets, root).unwrap();
        assert_eq!(text, "root (Container) @1,2 30x40 hidden\n");
    }

    #[test]
    fn test_format_all_counts_widgets() {
        let (widgets, _) = setup();
        let text = WidgetTreeDebug::new().format_all(&widgets).unwrap();
        assert!(text.starts_with("Widget Tree (3 total widgets):\n"));
    }
}
