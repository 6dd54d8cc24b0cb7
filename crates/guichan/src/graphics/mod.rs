//! The drawing sink used by [`Gui::draw`](crate::Gui::draw).
//!
//! A [`Graphics`] implementation receives primitive draw calls in coordinates
//! relative to the innermost clip area. Backends (SDL, OpenGL, a GPU
//! renderer) live outside this crate; [`RecordingGraphics`] is a headless
//! backend that records every call.
//!
//! Images are drawn through the [`Image`] capability trait so that callers
//! never need to know which backend created an image.

mod clip;
mod color;
mod recording;

use std::fmt;
use std::sync::Arc;

use guichan_core::{ClipRectangle, Rectangle, Result};

pub use clip::ClipStack;
pub use color::Color;
pub use recording::{DrawCommand, RecordingGraphics};

/// Horizontal text alignment for [`Graphics::draw_text`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Text starts at the given x coordinate.
    #[default]
    Left,
    /// Text is centered on the given x coordinate.
    Center,
    /// Text ends at the given x coordinate.
    Right,
}

/// A font capable of measuring text.
///
/// Glyph rendering belongs to the backend; widgets only need metrics for
/// layout.
pub trait Font: Send + Sync {
    /// Width in pixels of `text` rendered with this font.
    fn width(&self, text: &str) -> i32;

    /// Line height in pixels.
    fn height(&self) -> i32;
}

impl fmt::Debug for dyn Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("height", &self.height())
            .finish()
    }
}

/// A font where every glyph has the same advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedWidthFont {
    glyph_width: i32,
    height: i32,
}

impl FixedWidthFont {
    /// Create a font with the given glyph advance and line height.
    pub fn new(glyph_width: i32, height: i32) -> Self {
        Self {
            glyph_width,
            height,
        }
    }
}

impl Font for FixedWidthFont {
    fn width(&self, text: &str) -> i32 {
        self.glyph_width * text.chars().count() as i32
    }

    fn height(&self) -> i32 {
        self.height
    }
}

/// An image that a backend knows how to draw.
pub trait Image: Send + Sync {
    /// Width in pixels.
    fn width(&self) -> i32;

    /// Height in pixels.
    fn height(&self) -> i32;
}

/// A drawing sink.
///
/// All coordinates passed to the drawing primitives are relative to the
/// origin of the current clip area. `push_clip_area` takes an area relative
/// to the current origin, intersects it with the current clip area and makes
/// its top-left corner the new origin.
pub trait Graphics {
    /// Called once at the start of `Gui::draw`.
    fn begin_draw(&mut self) {}

    /// Called once at the end of `Gui::draw`.
    fn end_draw(&mut self) {}

    /// Push a nested clip area.
    ///
    /// Returns `false` if the resulting area is empty.
    fn push_clip_area(&mut self, area: Rectangle) -> bool;

    /// Pop the innermost clip area.
    ///
    /// Fails with [`GuiError::ClipStackEmpty`](guichan_core::GuiError::ClipStackEmpty)
    /// if nothing was pushed.
    fn pop_clip_area(&mut self) -> Result<()>;

    /// The innermost clip area, if any.
    fn current_clip_area(&self) -> Option<ClipRectangle>;

    /// Number of clip areas currently pushed.
    fn clip_depth(&self) -> usize;

    /// Set the color used by subsequent primitives.
    fn set_color(&mut self, color: Color);

    /// The current drawing color.
    fn color(&self) -> Color;

    /// Set the font used by [`Graphics::draw_text`].
    fn set_font(&mut self, font: Option<Arc<dyn Font>>);

    /// The current font.
    fn font(&self) -> Option<Arc<dyn Font>>;

    /// Draw a single pixel.
    fn draw_point(&mut self, x: i32, y: i32);

    /// Draw a line between two points, both inclusive.
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32);

    /// Draw a rectangle outline.
    fn draw_rectangle(&mut self, rectangle: Rectangle);

    /// Fill a rectangle.
    fn fill_rectangle(&mut self, rectangle: Rectangle);

    /// Draw a line of text with the current font.
    fn draw_text(&mut self, text: &str, x: i32, y: i32, alignment: Alignment);

    /// Draw part of an image.
    ///
    /// `source` selects the region of the image; it is drawn with its
    /// top-left corner at (`dst_x`, `dst_y`).
    fn draw_image(&mut self, image: &dyn Image, source: Rectangle, dst_x: i32, dst_y: i32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_width_font_metrics() {
        let font = FixedWidthFont::new(8, 12);
        assert_eq!(font.width("Ok"), 16);
        assert_eq!(font.width(""), 0);
        assert_eq!(font.height(), 12);
    }
}
