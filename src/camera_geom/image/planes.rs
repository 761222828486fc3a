//! Multi-plane pixel access shared by plain and masked images.

use ndarray::{s, ArrayView2, ArrayViewMut2};

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::Box2I;
use crate::camera_geom::image::types::Pixel;

/// Capability implemented by every image variant the assembler can copy.
///
/// All planes cover [`PixelPlanes::bbox`] and are processed identically.
pub trait PixelPlanes {
    type Pixel: Pixel;

    fn bbox(&self) -> Box2I;

    fn plane_count(&self) -> usize;

    /// Full view of plane `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= plane_count()`.
    fn plane_view(&self, index: usize) -> ArrayView2<'_, Self::Pixel>;

    /// Mutable counterpart of [`PixelPlanes::plane_view`].
    fn plane_view_mut(&mut self, index: usize) -> ArrayViewMut2<'_, Self::Pixel>;
}

fn local_ranges(plane_bbox: Box2I, bbox: Box2I) -> Result<(usize, usize, usize, usize)> {
    if bbox.is_empty() || !plane_bbox.contains(&bbox) {
        return Err(CameraGeomError::BoxOutOfBoundsError {
            requested: bbox,
            image: plane_bbox,
        });
    }
    let x0 = (bbox.min_x() - plane_bbox.min_x()) as usize;
    let y0 = (bbox.min_y() - plane_bbox.min_y()) as usize;
    Ok((y0, y0 + bbox.height() as usize, x0, x0 + bbox.width() as usize))
}

/// Restrict a plane covering `plane_bbox` to the parent-frame region `bbox`.
pub fn region_view<'a, T>(
    plane: ArrayView2<'a, T>,
    plane_bbox: Box2I,
    bbox: Box2I,
) -> Result<ArrayView2<'a, T>> {
    let (r0, r1, c0, c1) = local_ranges(plane_bbox, bbox)?;
    Ok(plane.slice_move(s![r0..r1, c0..c1]))
}

pub fn region_view_mut<'a, T>(
    plane: ArrayViewMut2<'a, T>,
    plane_bbox: Box2I,
    bbox: Box2I,
) -> Result<ArrayViewMut2<'a, T>> {
    let (r0, r1, c0, c1) = local_ranges(plane_bbox, bbox)?;
    Ok(plane.slice_move(s![r0..r1, c0..c1]))
}
