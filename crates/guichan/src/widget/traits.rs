//! The widget behavior trait.
//!
//! A widget in the registry is a [`WidgetBase`] (state shared by all widgets)
//! plus a behavior object implementing [`Widget`]. The behavior decides how
//! the widget draws itself and what it does each logic tick. Children of a
//! container are drawn and ticked by the registry after the container itself.

use std::sync::Arc;

use guichan_core::WidgetId;
use parking_lot::Mutex;

use super::base::WidgetBase;
use super::registry::WidgetRegistry;
use crate::graphics::{Color, Graphics};

/// Shared handle to a widget behavior.
pub type SharedWidget = Arc<Mutex<dyn Widget>>;

/// Behavior of a widget.
///
/// # Example
///
/// ```
/// use guichan::graphics::Graphics;
/// use guichan::widget::{Widget, WidgetBase};
///
/// struct Swatch;
///
/// impl Widget for Swatch {
///     fn type_name(&self) -> &'static str {
///         "Swatch"
///     }
///
///     fn draw(&mut self, base: &WidgetBase, graphics: &mut dyn Graphics) {
///         graphics.set_color(base.base_color());
///         graphics.fill_rectangle(base.dimension().translated(-base.x(), -base.y()));
///     }
/// }
/// ```
pub trait Widget: Send {
    /// A short name for debugging output.
    fn type_name(&self) -> &'static str {
        "Widget"
    }

    /// Draw the widget.
    ///
    /// The graphics clip area is set to the widget's dimension, so (0, 0) is
    /// the widget's top-left corner. The widget's effective font is already
    /// set on `graphics`.
    fn draw(&mut self, base: &WidgetBase, graphics: &mut dyn Graphics);

    /// Draw the frame around the widget.
    ///
    /// Called only when the frame size is non-zero. The clip area covers the
    /// dimension expanded by the frame size on every side, with (0, 0) at
    /// the outer corner.
    fn draw_frame(&mut self, base: &WidgetBase, graphics: &mut dyn Graphics) {
        draw_bevel_frame(base, graphics);
    }

    /// Called once per `Gui::logic` pass.
    fn logic(&mut self, _id: WidgetId, _widgets: &mut WidgetRegistry) {}

    /// Called when the effective font changes.
    fn font_changed(&mut self, _base: &WidgetBase) {}
}

/// Draw a bevel frame derived from the widget's base color.
///
/// The top and left edges use a shadow, the bottom and right edges a
/// highlight.
pub fn draw_bevel_frame(base: &WidgetBase, graphics: &mut dyn Graphics) {
    let face = base.base_color();
    let delta = Color::from_hex(0x303030);
    let highlight = face + delta;
    let shadow = face - delta;

    let frame = base.frame_size() as i32;
    let width = base.width() + frame * 2 - 1;
    let height = base.height() + frame * 2 - 1;

    for i in 0..frame {
        graphics.set_color(shadow);
        graphics.draw_line(i, i, width - i, i);
        graphics.draw_line(i, i + 1, i, height - i - 1);
        graphics.set_color(highlight);
        graphics.draw_line(width - i, i + 1, width - i, height - i);
        graphics.draw_line(i, height - i, width - i - 1, height - i);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{DrawCommand, RecordingGraphics};
    use guichan_core::Rectangle;

    #[test]
    fn test_bevel_frame_lines() {
        let mut base = WidgetBase::new(WidgetId::default());
        base.dimension = Rectangle::new(0, 0, 10, 10);
        base.set_frame_size(1);

        let mut graphics = RecordingGraphics::new();
        draw_bevel_frame(&base, &mut graphics);

        let lines = graphics
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
            .count();
        assert_eq!(lines, 4);
        assert_eq!(
            graphics.commands()[0],
            DrawCommand::SetColor(Color::from_hex(0x505060))
        );
    }

    #[test]
    fn test_no_frame_draws_nothing() {
        let base = WidgetBase::new(WidgetId::default());
        let mut graphics = RecordingGraphics::new();
        draw_bevel_frame(&base, &mut graphics);
        assert!(graphics.commands().is_empty());
    }
}
