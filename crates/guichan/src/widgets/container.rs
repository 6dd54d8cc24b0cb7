//! A plain container.

use guichan_core::{Rectangle, WidgetId};

use crate::graphics::Graphics;
use crate::widget::{Widget, WidgetBase, WidgetRegistry};

/// A container that optionally paints its background.
///
/// Children are managed through the registry's container operations.
#[derive(Debug, Clone)]
pub struct Container {
    opaque: bool,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// An opaque container.
    pub fn new() -> Self {
        Self { opaque: true }
    }

    pub fn with_opaque(mut self, opaque: bool) -> Self {
        self.opaque = opaque;
        self
    }

    pub fn is_opaque(&self) -> bool {
        self.opaque
    }

    /// Register an opaque container.
    pub fn create(widgets: &mut WidgetRegistry) -> WidgetId {
        widgets.create_container(Self::new())
    }
}

impl Widget for Container {
    fn type_name(&self) -> &'static str {
        "Container"
    }

    fn draw(&mut self, base: &WidgetBase, graphics: &mut dyn Graphics) {
        if self.opaque {
            graphics.set_color(base.background_color());
            graphics.fill_rectangle(Rectangle::new(0, 0, base.width(), base.height()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graphics::{DrawCommand, RecordingGraphics};

    #[test]
    fn test_transparent_container_draws_nothing() {
        let mut widgets = WidgetRegistry::new();
        let glass = widgets.create_container(Container::new().with_opaque(false));
        widgets.set_size(glass, 10, 10).unwrap();

        let mut graphics = RecordingGraphics::new();
        widgets.draw_tree(glass, &mut graphics).unwrap();
        assert!(
            !graphics
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::FillRectangle(_)))
        );
    }

    #[test]
    fn test_opaque_container_fills_background() {
        let mut widgets = WidgetRegistry::new();
        let panel = Container::create(&mut widgets);
        widgets.set_position(panel, 5, 5).unwrap();
        widgets.set_size(panel, 10, 10).unwrap();

        let mut graphics = RecordingGraphics::new();
        widgets.draw_tree(panel, &mut graphics).unwrap();
        assert!(
            graphics
                .commands()
                .contains(&DrawCommand::FillRectangle(Rectangle::new(5, 5, 10, 10)))
        );
    }
}
