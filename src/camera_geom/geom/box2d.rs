//! Floating-point axis-aligned bounding box

use crate::camera_geom::geom::{Extent2D, Point2D};

/// Axis-aligned box in continuous coordinates (pixels or millimeters).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2D {
    min: Point2D,
    max: Point2D,
}

impl Default for Box2D {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box2D {
    pub const fn empty() -> Self {
        Self {
            min: Point2D::new(f64::INFINITY, f64::INFINITY),
            max: Point2D::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    pub fn from_corners(a: Point2D, b: Point2D) -> Self {
        Self {
            min: Point2D::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point2D::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.min.x <= self.max.x && self.min.y <= self.max.y)
    }

    pub fn min(&self) -> Point2D {
        self.min
    }

    pub fn max(&self) -> Point2D {
        self.max
    }

    pub fn dimensions(&self) -> Extent2D {
        if self.is_empty() {
            return Extent2D::new(0.0, 0.0);
        }
        self.max - self.min
    }

    pub fn include_point(self, point: Point2D) -> Self {
        Self {
            min: Point2D::new(self.min.x.min(point.x), self.min.y.min(point.y)),
            max: Point2D::new(self.max.x.max(point.x), self.max.y.max(point.y)),
        }
    }

    pub fn include_box(self, other: &Box2D) -> Self {
        if other.is_empty() {
            return self;
        }
        self.include_point(other.min).include_point(other.max)
    }

    pub fn contains_point(&self, point: Point2D) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

impl FromIterator<Point2D> for Box2D {
    fn from_iter<I: IntoIterator<Item = Point2D>>(iter: I) -> Self {
        iter.into_iter().fold(Box2D::empty(), Box2D::include_point)
    }
}
