//! Integer geometry used for widget dimensions and clipping.

/// An axis-aligned rectangle in integer pixel coordinates.
///
/// Widget dimensions are expressed relative to the parent's children area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rectangle {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Check whether a point lies inside the rectangle.
    ///
    /// The left and top edges are inclusive, the right and bottom edges
    /// exclusive.
    #[inline]
    pub fn is_point_in_rect(&self, x: i32, y: i32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.width && y < self.y + self.height
    }

    /// Check whether two rectangles share any area.
    pub fn is_intersecting(&self, other: &Rectangle) -> bool {
        !self.intersection(other).is_empty()
    }

    /// The overlapping area of two rectangles.
    ///
    /// Returns an empty rectangle positioned at the clamped origin when the
    /// rectangles do not overlap.
    pub fn intersection(&self, other: &Rectangle) -> Rectangle {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = (self.x + self.width).min(other.x + other.width);
        let bottom = (self.y + self.height).min(other.y + other.height);
        Rectangle::new(x, y, (right - x).max(0), (bottom - y).max(0))
    }

    /// Whether the rectangle has no area.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Grow the rectangle by `amount` on every side.
    pub fn expanded(&self, amount: i32) -> Rectangle {
        Rectangle::new(
            self.x - amount,
            self.y - amount,
            self.width + 2 * amount,
            self.height + 2 * amount,
        )
    }

    /// Move the rectangle by the given offset.
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Rectangle {
        Rectangle::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// A clip area on the graphics clip stack.
///
/// `rect` is the clip area in screen coordinates. `x_offset` and `y_offset`
/// are the screen position of the coordinate origin used for drawing inside
/// the area; they may differ from `rect.x`/`rect.y` when the pushed area was
/// clamped by its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipRectangle {
    /// The clip area in screen coordinates.
    pub rect: Rectangle,
    /// Horizontal drawing origin.
    pub x_offset: i32,
    /// Vertical drawing origin.
    pub y_offset: i32,
}

impl ClipRectangle {
    /// Create a clip rectangle.
    pub const fn new(rect: Rectangle, x_offset: i32, y_offset: i32) -> Self {
        Self {
            rect,
            x_offset,
            y_offset,
        }
    }

    /// Compute the clip area for `area` (relative to this clip area's
    /// origin) nested inside `self`.
    pub fn nest(&self, area: Rectangle) -> ClipRectangle {
        let translated = area.translated(self.x_offset, self.y_offset);
        ClipRectangle::new(
            translated.intersection(&self.rect),
            translated.x,
            translated.y,
        )
    }
}
