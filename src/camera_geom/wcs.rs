//! Focal-plane WCS module
//!
//! An affine map between image pixels and focal-plane millimeters:
//! `fp = reference_value + CD * (pixel - reference_pixel)`.

use nalgebra::{Matrix2, Vector2};
use tracing::debug;

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Extent2D, Extent2I, Point2D};
use crate::camera_geom::model::Amplifier;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocalPlaneWcs {
    reference_pixel: Point2D,
    reference_value: Point2D,
    cd: Matrix2<f64>,
}

impl FocalPlaneWcs {
    pub fn new(reference_pixel: Point2D, reference_value: Point2D, cd: Matrix2<f64>) -> Self {
        Self {
            reference_pixel,
            reference_value,
            cd,
        }
    }

    pub fn reference_pixel(&self) -> Point2D {
        self.reference_pixel
    }

    pub fn reference_value(&self) -> Point2D {
        self.reference_value
    }

    pub fn cd(&self) -> &Matrix2<f64> {
        &self.cd
    }

    pub fn pixel_to_focal_plane(&self, pixel: Point2D) -> Point2D {
        let d = self.cd * Vector2::new(pixel.x - self.reference_pixel.x, pixel.y - self.reference_pixel.y);
        Point2D::new(self.reference_value.x + d.x, self.reference_value.y + d.y)
    }

    /// Inverse of [`Self::pixel_to_focal_plane`].
    ///
    /// # Errors
    ///
    /// `InvalidGeometryError` when the CD matrix is singular.
    pub fn focal_plane_to_pixel(&self, fp: Point2D) -> Result<Point2D> {
        let inverse = self
            .cd
            .try_inverse()
            .ok_or_else(|| CameraGeomError::InvalidGeometryError(format!("singular CD matrix {:?}", self.cd)))?;
        let d = inverse * Vector2::new(fp.x - self.reference_value.x, fp.y - self.reference_value.y);
        Ok(Point2D::new(self.reference_pixel.x + d.x, self.reference_pixel.y + d.y))
    }

    /// Side of a square pixel with the same area, in millimeters.
    pub fn pixel_scale(&self) -> f64 {
        self.cd.determinant().abs().sqrt()
    }

    pub fn shift_reference_pixel(&mut self, dx: f64, dy: f64) {
        self.reference_pixel = Point2D::new(self.reference_pixel.x + dx, self.reference_pixel.y + dy);
    }

    /// Re-express the WCS for an image mirrored left-right and/or top-bottom within `dimensions`.
    ///
    /// Focal-plane positions of the physical pixels are preserved: a pixel at
    /// `x` moves to `width - 1 - x`.
    pub fn flip_image(&mut self, flip_lr: bool, flip_tb: bool, dimensions: Extent2I) {
        if flip_lr {
            let column = -self.cd.column(0);
            self.cd.set_column(0, &column);
            self.reference_pixel.x = (dimensions.x - 1) as f64 - self.reference_pixel.x;
        }
        if flip_tb {
            let column = -self.cd.column(1);
            self.cd.set_column(1, &column);
            self.reference_pixel.y = (dimensions.y - 1) as f64 - self.reference_pixel.y;
        }
    }
}

/// WCS mapping `reference_pixel` to the focal-plane origin with axis-aligned `pixel_size` (mm) pixels.
pub fn make_focal_plane_wcs(pixel_size: Extent2D, reference_pixel: Point2D) -> FocalPlaneWcs {
    FocalPlaneWcs::new(
        reference_pixel,
        Point2D::new(0.0, 0.0),
        Matrix2::new(pixel_size.x, 0.0, 0.0, pixel_size.y),
    )
}

/// Move a WCS describing one amplifier's raw image into detector coordinates.
///
/// The amplifier box (raw data bbox when trimmed, raw bbox otherwise) is
/// flipped per the raw flip flags, then the reference pixel is shifted by
/// minus the box minimum and by the raw XY offset.
///
/// # Errors
///
/// `MissingRawDataError` when the amplifier has no raw data.
pub fn prepare_wcs_data(wcs: &mut FocalPlaneWcs, amp: &Amplifier, is_trimmed: bool) -> Result<()> {
    let raw = amp.raw().map_err(|_| {
        CameraGeomError::MissingRawDataError(format!(
            "cannot move a WCS without raw data for amplifier {}",
            amp.name()
        ))
    })?;
    let amp_box = if is_trimmed {
        raw.raw_data_bbox()
    } else {
        raw.raw_bbox()
    };
    wcs.flip_image(raw.flip_x(), raw.flip_y(), amp_box.dimensions());
    wcs.shift_reference_pixel(-amp_box.min_x() as f64, -amp_box.min_y() as f64);
    let offset = raw.raw_xy_offset();
    wcs.shift_reference_pixel(offset.x as f64, offset.y as f64);
    debug!(amp = amp.name(), reference_pixel = ?wcs.reference_pixel(), "WCS moved to detector coordinates");
    Ok(())
}
