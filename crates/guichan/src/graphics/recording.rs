use std::sync::Arc;

use guichan_core::logging::targets;
use guichan_core::{ClipRectangle, Rectangle, Result};

use super::{Alignment, ClipStack, Color, Font, Graphics, Image};

/// A draw call captured by [`RecordingGraphics`].
///
/// Coordinates are in screen space: the current clip origin has already been
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DrawCommand {
    /// `begin_draw` was called.
    BeginDraw,
    /// `end_draw` was called.
    EndDraw,
    /// A clip area was pushed; holds the resulting screen-space area.
    PushClip(ClipRectangle),
    /// A clip area was popped.
    PopClip,
    /// The drawing color changed.
    SetColor(Color),
    /// A pixel.
    Point { x: i32, y: i32 },
    /// A line.
    Line { x1: i32, y1: i32, x2: i32, y2: i32 },
    /// A rectangle outline.
    Rectangle(Rectangle),
    /// A filled rectangle.
    FillRectangle(Rectangle),
    /// A line of text.
    Text {
        text: String,
        x: i32,
        y: i32,
        alignment: Alignment,
    },
    /// An image blit.
    Image {
        source: Rectangle,
        x: i32,
        y: i32,
    },
}

/// A headless [`Graphics`] backend that records every call.
///
/// Useful for tests and for inspecting what a widget tree would draw.
#[derive(Debug, Default)]
pub struct RecordingGraphics {
    clips: ClipStack,
    color: Color,
    font: Option<Arc<dyn Font>>,
    commands: Vec<DrawCommand>,
}

impl RecordingGraphics {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Take the recorded commands, leaving the recorder empty.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Text lines drawn so far, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Graphics for RecordingGraphics {
    fn begin_draw(&mut self) {
        self.commands.push(DrawCommand::BeginDraw);
    }

    fn end_draw(&mut self) {
        self.commands.push(DrawCommand::EndDraw);
    }

    fn push_clip_area(&mut self, area: Rectangle) -> bool {
        let visible = self.clips.push(area);
        if let Some(top) = self.clips.top() {
            self.commands.push(DrawCommand::PushClip(top));
        }
        visible
    }

    fn pop_clip_area(&mut self) -> Result<()> {
        self.clips.pop().inspect_err(|err| {
            tracing::warn!(target: targets::GRAPHICS, %err, "unbalanced clip pop");
        })?;
        self.commands.push(DrawCommand::PopClip);
        Ok(())
    }

    fn current_clip_area(&self) -> Option<ClipRectangle> {
        self.clips.top()
    }

    fn clip_depth(&self) -> usize {
        self.clips.depth()
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
        self.commands.push(DrawCommand::SetColor(color));
    }

    fn color(&self) -> Color {
        self.color
    }

    fn set_font(&mut self, font: Option<Arc<dyn Font>>) {
        self.font = font;
    }

    fn font(&self) -> Option<Arc<dyn Font>> {
        self.font.clone()
    }

    fn draw_point(&mut self, x: i32, y: i32) {
        let (x, y) = self.clips.to_screen(x, y);
        self.commands.push(DrawCommand::Point { x, y });
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32) {
        let (x1, y1) = self.clips.to_screen(x1, y1);
        let (x2, y2) = self.clips.to_screen(x2, y2);
        self.commands.push(DrawCommand::Line { x1, y1, x2, y2 });
    }

    fn draw_rectangle(&mut self, rectangle: Rectangle) {
        let (x, y) = self.clips.to_screen(rectangle.x, rectangle.y);
        self.commands.push(DrawCommand::Rectangle(Rectangle::new(
            x,
            y,
            rectangle.width,
            rectangle.height,
        )));
    }

    fn fill_rectangle(&mut self, rectangle: Rectangle) {
        let (x, y) = self.clips.to_screen(rectangle.x, rectangle.y);
        self.commands.push(DrawCommand::FillRectangle(Rectangle::new(
            x,
            y,
            rectangle.width,
            rectangle.height,
        )));
    }

    fn draw_text(&mut self, text: &str, x: i32, y: i32, alignment: Alignment) {
        let (x, y) = self.clips.to_screen(x, y);
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            alignment,
        });
    }

    fn draw_image(&mut self, _image: &dyn Image, source: Rectangle, dst_x: i32, dst_y: i32) {
        let (x, y) = self.clips.to_screen(dst_x, dst_y);
        self.commands.push(DrawCommand::Image { source, x, y });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tile;

    impl Image for Tile {
        fn width(&self) -> i32 {
            16
        }

        fn height(&self) -> i32 {
            16
        }
    }

    #[test]
    fn test_records_in_screen_space() {
        let mut g = RecordingGraphics::new();
        g.push_clip_area(Rectangle::new(10, 20, 100, 100));
        g.fill_rectangle(Rectangle::new(0, 0, 5, 5));
        g.draw_image(&Tile, Rectangle::new(0, 0, 16, 16), 2, 3);
        g.pop_clip_area().unwrap();

        assert_eq!(
            g.commands()[1],
            DrawCommand::FillRectangle(Rectangle::new(10, 20, 5, 5))
        );
        assert_eq!(
            g.commands()[2],
            DrawCommand::Image {
                source: Rectangle::new(0, 0, 16, 16),
                x: 12,
                y: 23
            }
        );
        assert_eq!(g.clip_depth(), 0);
    }

    #[test]
    fn test_pop_without_push_fails() {
        let mut g = RecordingGraphics::new();
        assert!(g.pop_clip_area().is_err());
        assert!(g.commands().is_empty());
    }
}
