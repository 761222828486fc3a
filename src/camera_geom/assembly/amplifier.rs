use ndarray::{s, Slice};
use tracing::debug;

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::Box2I;
use crate::camera_geom::image::{region_view, region_view_mut, PixelPlanes};
use crate::camera_geom::model::Amplifier;

fn axis_slice(flip: bool) -> Slice {
    if flip { Slice::new(0, None, -1) } else { Slice::new(0, None, 1) }
}

/// Copy `in_bbox` of every plane of `raw` into `out_bbox` of `dest`, reversing flipped axes.
fn copy_region<I: PixelPlanes>(
    dest: &mut I,
    out_bbox: Box2I,
    raw: &I,
    in_bbox: Box2I,
    flip_x: bool,
    flip_y: bool,
) -> Result<()> {
    if in_bbox.dimensions() != out_bbox.dimensions() {
        return Err(CameraGeomError::DimensionMismatchError {
            source_dims: in_bbox.dimensions(),
            dest_dims: out_bbox.dimensions(),
        });
    }
    let raw_bbox = raw.bbox();
    let dest_bbox = dest.bbox();
    for plane in 0..raw.plane_count() {
        let in_view = region_view(raw.plane_view(plane), raw_bbox, in_bbox)?;
        // rows are y, columns are x
        let in_view = in_view.slice_move(s![axis_slice(flip_y), axis_slice(flip_x)]);
        let mut out_view = region_view_mut(dest.plane_view_mut(plane), dest_bbox, out_bbox)?;
        out_view.assign(&in_view);
    }
    Ok(())
}

/// Assemble one amplifier into a trimmed detector image.
///
/// The data region of `raw` (the amplifier's raw data bbox) overwrites the
/// region `amp.bbox()` of `dest`, with X and/or Y traversed in reverse when
/// the amplifier's flip flags are set. All planes are copied the same way.
///
/// # Errors
///
/// * `MissingRawDataError` - the amplifier has no raw amplifier data
/// * `BoxOutOfBoundsError` - a region falls outside `raw` or `dest`
pub fn assemble_amplifier_image<I: PixelPlanes>(dest: &mut I, raw: &I, amp: &Amplifier) -> Result<()> {
    let raw_amp = amp.raw()?;
    debug!(
        amp = amp.name(),
        flip_x = raw_amp.flip_x(),
        flip_y = raw_amp.flip_y(),
        "Assembling trimmed amplifier"
    );
    copy_region(
        dest,
        amp.bbox(),
        raw,
        raw_amp.raw_data_bbox(),
        raw_amp.flip_x(),
        raw_amp.flip_y(),
    )
}

/// Assemble one amplifier into an untrimmed detector image.
///
/// The whole raw bbox of `raw` (overscan and prescan included) is placed at
/// the raw bbox shifted by the amplifier's raw XY offset, in native readout
/// orientation (no flips).
pub fn assemble_amplifier_raw_image<I: PixelPlanes>(
    dest: &mut I,
    raw: &I,
    amp: &Amplifier,
) -> Result<()> {
    let raw_amp = amp.raw()?;
    debug!(amp = amp.name(), "Assembling untrimmed amplifier");
    copy_region(
        dest,
        raw_amp.placed_raw_bbox(),
        raw,
        raw_amp.raw_bbox(),
        false,
        false,
    )
}
