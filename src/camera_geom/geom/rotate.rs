//! Quarter-turn rotation of pixel positions and boxes.
//!
//! One quarter turn is counter-clockwise in the x-right/y-up pixel frame. In a
//! frame of dimensions (W, H) whose first pixel is (0, 0), pixel (x, y) lands
//! at (H - 1 - y, x) and the frame becomes (H, W). Image rotation and box
//! projection both go through [`rotate_point_by_90`] so that the two agree to
//! the pixel.

use crate::camera_geom::geom::{Box2I, Extent2I, Point2I};

/// Reduce any quarter-turn count (including negative ones) to 0..=3.
pub fn normalize_quarter_turns(n_quarter: i32) -> i32 {
    n_quarter.rem_euclid(4)
}

/// Dimensions of a frame after `n_quarter` turns.
pub fn rotate_dimensions_by_90(dimensions: Extent2I, n_quarter: i32) -> Extent2I {
    if normalize_quarter_turns(n_quarter) % 2 == 1 {
        Extent2I::new(dimensions.y, dimensions.x)
    } else {
        dimensions
    }
}

/// Position of `point` after rotating its frame of `dimensions` by `n_quarter` turns.
pub fn rotate_point_by_90(point: Point2I, n_quarter: i32, dimensions: Extent2I) -> Point2I {
    let (w, h) = (dimensions.x, dimensions.y);
    match normalize_quarter_turns(n_quarter) {
        0 => point,
        1 => Point2I::new(h - 1 - point.y, point.x),
        2 => Point2I::new(w - 1 - point.x, h - 1 - point.y),
        _ => Point2I::new(point.y, w - 1 - point.x),
    }
}

/// Box covering the same pixels as `bbox` after rotating its frame of `dimensions`.
pub fn rotate_bbox_by_90(bbox: Box2I, n_quarter: i32, dimensions: Extent2I) -> Box2I {
    if bbox.is_empty() {
        return bbox;
    }
    Box2I::from_corners(
        rotate_point_by_90(bbox.min(), n_quarter, dimensions),
        rotate_point_by_90(bbox.max(), n_quarter, dimensions),
    )
}
