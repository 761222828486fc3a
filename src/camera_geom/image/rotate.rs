//! Quarter-turn rotation of images.

use ndarray::Array2;

use crate::camera_geom::geom::{rotate_dimensions_by_90, rotate_point_by_90, Point2I};
use crate::camera_geom::image::types::{Image, Pixel};

/// Rotate `image` counter-clockwise by `n_quarter` quarter turns.
///
/// Every pixel is moved with [`rotate_point_by_90`], the same mapping used to
/// project boxes, so a rotated image and its rotated boxes line up exactly.
/// The result has its origin at (0, 0).
pub fn rotate_image_by_90<T: Pixel>(image: &Image<T>, n_quarter: i32) -> Image<T> {
    let dims = image.dimensions();
    let out_dims = rotate_dimensions_by_90(dims, n_quarter);
    let mut out = Array2::from_elem((out_dims.y as usize, out_dims.x as usize), T::default());
    for ((row, col), &value) in image.array().indexed_iter() {
        let p = rotate_point_by_90(Point2I::new(col as i32, row as i32), n_quarter, dims);
        out[[p.y as usize, p.x as usize]] = value;
    }
    Image::from_array(Point2I::new(0, 0), out)
}
