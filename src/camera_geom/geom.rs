//! Geometry primitives module
//!
//! Integer and floating-point points, extents and axis-aligned boxes, plus the
//! quarter-turn rotation used everywhere an orientation is applied.

mod box2d;
mod box2i;
mod point;
mod rotate;

pub use box2d::Box2D;
pub use box2i::Box2I;
pub use point::{Extent2D, Extent2I, Point2D, Point2I};
pub use rotate::{
    normalize_quarter_turns, rotate_bbox_by_90, rotate_dimensions_by_90, rotate_point_by_90,
};
