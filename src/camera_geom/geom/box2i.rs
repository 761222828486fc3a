//! Integer axis-aligned bounding box with inclusive corners

use crate::camera_geom::geom::{Box2D, Extent2I, Point2D, Point2I};

/// Axis-aligned integer box.
///
/// Both corners are inclusive, so a box with `min == max` covers one pixel.
/// Constructors and operations return [`Box2I::empty`] for every empty result,
/// so all empty boxes compare equal to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Box2I {
    min: Point2I,
    max: Point2I,
}

impl Default for Box2I {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box2I {
    pub const fn empty() -> Self {
        Self {
            min: Point2I::new(0, 0),
            max: Point2I::new(-1, -1),
        }
    }

    /// Box spanning two arbitrary corners (order does not matter).
    pub fn from_corners(a: Point2I, b: Point2I) -> Self {
        Self {
            min: Point2I::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2I::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Box with the given minimum corner and dimensions; non-positive dimensions give an empty box.
    pub fn from_min_extent(min: Point2I, extent: Extent2I) -> Self {
        if extent.x <= 0 || extent.y <= 0 {
            return Self::empty();
        }
        Self {
            min,
            max: Point2I::new(min.x + extent.x - 1, min.y + extent.y - 1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn min(&self) -> Point2I {
        self.min
    }

    pub fn max(&self) -> Point2I {
        self.max
    }

    pub fn min_x(&self) -> i32 {
        self.min.x
    }

    pub fn min_y(&self) -> i32 {
        self.min.y
    }

    pub fn max_x(&self) -> i32 {
        self.max.x
    }

    pub fn max_y(&self) -> i32 {
        self.max.y
    }

    pub fn width(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max.x - self.min.x + 1 }
    }

    pub fn height(&self) -> i32 {
        if self.is_empty() { 0 } else { self.max.y - self.min.y + 1 }
    }

    pub fn dimensions(&self) -> Extent2I {
        Extent2I::new(self.width(), self.height())
    }

    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.min.x + self.max.x) as f64 / 2.0,
            (self.min.y + self.max.y) as f64 / 2.0,
        )
    }

    pub fn contains_point(&self, point: Point2I) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// True if `other` lies entirely inside this box. An empty box is contained by anything.
    pub fn contains(&self, other: &Box2I) -> bool {
        other.is_empty() || (self.contains_point(other.min) && self.contains_point(other.max))
    }

    pub fn overlaps(&self, other: &Box2I) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    /// Smallest box containing this box and `point`.
    pub fn include_point(self, point: Point2I) -> Self {
        if self.is_empty() {
            return Self { min: point, max: point };
        }
        Self {
            min: Point2I::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point2I::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    /// Smallest box containing both boxes.
    pub fn include_box(self, other: &Box2I) -> Self {
        if other.is_empty() {
            return self;
        }
        self.include_point(other.min).include_point(other.max)
    }

    /// Intersection of the two boxes.
    pub fn clipped(self, other: &Box2I) -> Self {
        if !self.overlaps(other) {
            return Self::empty();
        }
        Self {
            min: Point2I::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y)),
            max: Point2I::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y)),
        }
    }

    pub fn shifted(self, offset: Extent2I) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grow (or shrink, for a negative `buffer`) by `buffer` pixels on every side.
    pub fn grown(self, buffer: i32) -> Self {
        if self.is_empty() {
            return self;
        }
        let grown = Self {
            min: Point2I::new(self.min.x - buffer, self.min.y - buffer),
            max: Point2I::new(self.max.x + buffer, self.max.y + buffer),
        };
        if grown.is_empty() { Self::empty() } else { grown }
    }

    /// Mirror left-right inside a frame of width `x_extent` starting at x = 0.
    pub fn flipped_lr(self, x_extent: i32) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: Point2I::new(x_extent - 1 - self.max.x, self.min.y),
            max: Point2I::new(x_extent - 1 - self.min.x, self.max.y),
        }
    }

    /// Mirror top-bottom inside a frame of height `y_extent` starting at y = 0.
    pub fn flipped_tb(self, y_extent: i32) -> Self {
        if self.is_empty() {
            return self;
        }
        Self {
            min: Point2I::new(self.min.x, y_extent - 1 - self.max.y),
            max: Point2I::new(self.max.x, y_extent - 1 - self.min.y),
        }
    }

    /// Floating-point box covering the pixel edges (each pixel spans +/- 0.5 around its center).
    pub fn to_box2d(&self) -> Box2D {
        if self.is_empty() {
            return Box2D::empty();
        }
        Box2D::from_corners(
            Point2D::new(self.min.x as f64 - 0.5, self.min.y as f64 - 0.5),
            Point2D::new(self.max.x as f64 + 0.5, self.max.y as f64 + 0.5),
        )
    }
}
