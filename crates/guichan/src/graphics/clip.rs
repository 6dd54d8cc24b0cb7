use guichan_core::{ClipRectangle, GuiError, Rectangle, Result};

/// A stack of nested clip areas.
///
/// Backends embed one of these to implement the clipping half of
/// [`Graphics`](super::Graphics).
#[derive(Debug, Clone, Default)]
pub struct ClipStack {
    stack: Vec<ClipRectangle>,
}

impl ClipStack {
    /// Create an empty clip stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `area`, relative to the current origin.
    ///
    /// The first area pushed is taken as-is in screen coordinates. Returns
    /// `false` when the resulting clip area is empty.
    pub fn push(&mut self, area: Rectangle) -> bool {
        let clip = match self.stack.last() {
            Some(top) => top.nest(area),
            None => ClipRectangle::new(area, area.x, area.y),
        };
        self.stack.push(clip);
        !clip.rect.is_empty()
    }

    /// Pop the innermost clip area.
    pub fn pop(&mut self) -> Result<ClipRectangle> {
        self.stack.pop().ok_or(GuiError::ClipStackEmpty)
    }

    /// The innermost clip area.
    pub fn top(&self) -> Option<ClipRectangle> {
        self.stack.last().copied()
    }

    /// Number of pushed areas.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Translate a point from the current origin to screen coordinates.
    pub fn to_screen(&self, x: i32, y: i32) -> (i32, i32) {
        match self.stack.last() {
            Some(top) => (x + top.x_offset, y + top.y_offset),
            None => (x, y),
        }
    }
}
