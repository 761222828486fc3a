//! Point and extent value types

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Integer pixel position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point2I {
    pub x: i32,
    pub y: i32,
}

/// Integer pixel offset or dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Extent2I {
    pub x: i32,
    pub y: i32,
}

/// Floating-point position, in pixels or focal-plane millimeters
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

/// Floating-point offset or size (e.g. physical pixel size in mm)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent2D {
    pub x: f64,
    pub y: f64,
}

impl Point2I {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_point2d(self) -> Point2D {
        Point2D::new(self.x as f64, self.y as f64)
    }

    pub fn to_extent(self) -> Extent2I {
        Extent2I::new(self.x, self.y)
    }
}

impl Extent2I {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn to_extent2d(self) -> Extent2D {
        Extent2D::new(self.x as f64, self.y as f64)
    }
}

impl Point2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Extent2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add<Extent2I> for Point2I {
    type Output = Point2I;

    fn add(self, rhs: Extent2I) -> Point2I {
        Point2I::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub<Extent2I> for Point2I {
    type Output = Point2I;

    fn sub(self, rhs: Extent2I) -> Point2I {
        Point2I::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub for Point2I {
    type Output = Extent2I;

    fn sub(self, rhs: Point2I) -> Extent2I {
        Extent2I::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Add for Extent2I {
    type Output = Extent2I;

    fn add(self, rhs: Extent2I) -> Extent2I {
        Extent2I::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Neg for Extent2I {
    type Output = Extent2I;

    fn neg(self) -> Extent2I {
        Extent2I::new(-self.x, -self.y)
    }
}

impl Add<Extent2D> for Point2D {
    type Output = Point2D;

    fn add(self, rhs: Extent2D) -> Point2D {
        Point2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point2D {
    type Output = Extent2D;

    fn sub(self, rhs: Point2D) -> Extent2D {
        Extent2D::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Extent2D {
    type Output = Extent2D;

    fn mul(self, rhs: f64) -> Extent2D {
        Extent2D::new(self.x * rhs, self.y * rhs)
    }
}

/// Component-wise scaling, e.g. a pixel offset times the physical pixel size.
impl Mul<Extent2D> for Extent2D {
    type Output = Extent2D;

    fn mul(self, rhs: Extent2D) -> Extent2D {
        Extent2D::new(self.x * rhs.x, self.y * rhs.y)
    }
}

impl Div<i32> for Extent2I {
    type Output = Extent2I;

    fn div(self, rhs: i32) -> Extent2I {
        Extent2I::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(i32, i32)> for Point2I {
    fn from(xy: (i32, i32)) -> Self {
        Self::new(xy.0, xy.1)
    }
}

impl From<(i32, i32)> for Extent2I {
    fn from(xy: (i32, i32)) -> Self {
        Self::new(xy.0, xy.1)
    }
}
