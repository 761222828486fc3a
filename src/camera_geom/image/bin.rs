//! Block-average binning.

use ndarray::{s, Array2, ArrayView2};
use num_traits::ToPrimitive;
use tracing::debug;

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Extent2I, Point2I};
use crate::camera_geom::image::types::{pixel_from_f64, Image, Pixel};

/// Dimensions after binning by `bin_size`: `ceil(dim / bin_size)` on each axis.
pub fn binned_dimensions(dimensions: Extent2I, bin_size: i32) -> Result<Extent2I> {
    if bin_size <= 0 {
        return Err(CameraGeomError::InvalidBinFactorError(bin_size));
    }
    if dimensions.x <= 0 || dimensions.y <= 0 {
        return Err(CameraGeomError::InvalidDimensionsError(
            dimensions.x as i64,
            dimensions.y as i64,
        ));
    }
    Ok(Extent2I::new(
        (dimensions.x + bin_size - 1) / bin_size,
        (dimensions.y + bin_size - 1) / bin_size,
    ))
}

/// Box of binned pixels touched by `bbox` on a grid whose blocks start at multiples of `bin_size`.
pub fn binned_bbox(bbox: Box2I, bin_size: i32) -> Result<Box2I> {
    if bin_size <= 0 {
        return Err(CameraGeomError::InvalidBinFactorError(bin_size));
    }
    if bbox.is_empty() {
        let dims = bbox.dimensions();
        return Err(CameraGeomError::InvalidDimensionsError(dims.x as i64, dims.y as i64));
    }
    let (min, max) = (bbox.min(), bbox.max());
    Ok(Box2I::from_corners(
        Point2I::new(min.x.div_euclid(bin_size), min.y.div_euclid(bin_size)),
        Point2I::new(max.x.div_euclid(bin_size), max.y.div_euclid(bin_size)),
    ))
}

/// Mean of every `bin` x `bin` block of `src`, with the first block starting
/// `lead` pixels before row/column 0. Blocks average only the pixels they cover.
fn block_means<T: Pixel>(src: ArrayView2<'_, T>, lead: (usize, usize), out_dims: Extent2I, bin: usize) -> Result<Array2<T>> {
    let (rows, cols) = src.dim();
    let mut out = Array2::from_elem((out_dims.y as usize, out_dims.x as usize), T::default());
    for ((out_row, out_col), value) in out.indexed_iter_mut() {
        let r0 = (out_row * bin).saturating_sub(lead.0);
        let c0 = (out_col * bin).saturating_sub(lead.1);
        let r1 = ((out_row + 1) * bin - lead.0).min(rows);
        let c1 = ((out_col + 1) * bin - lead.1).min(cols);
        let block = src.slice(s![r0..r1, c0..c1]);
        let sum: f64 = block.iter().map(|v| v.to_f64().unwrap_or(f64::NAN)).sum();
        *value = pixel_from_f64(sum / block.len() as f64)?;
    }
    Ok(out)
}

/// Bin `image` by `bin_size` in both axes.
///
/// Each output pixel is the mean of its `bin_size` x `bin_size` input block;
/// blocks on the upper/right edge average only the pixels they cover. The
/// mean is converted back with a plain numeric cast, so integer pixel types
/// truncate toward zero. The output origin is `xy0` floor-divided by `bin_size`.
pub fn bin_image<T: Pixel>(image: &Image<T>, bin_size: i32) -> Result<Image<T>> {
    let out_dims = binned_dimensions(image.dimensions(), bin_size)?;
    if bin_size == 1 {
        return Ok(image.clone());
    }
    debug!(
        "Binning {}x{} image by {} -> {}x{}",
        image.width(),
        image.height(),
        bin_size,
        out_dims.x,
        out_dims.y
    );

    let out = block_means(image.array().view(), (0, 0), out_dims, bin_size as usize)?;
    let xy0 = image.xy0();
    Ok(Image::from_array(
        Point2I::new(xy0.x.div_euclid(bin_size), xy0.y.div_euclid(bin_size)),
        out,
    ))
}

/// Bin `image` on the grid of its parent frame.
///
/// Blocks start at parent-frame multiples of `bin_size`, so the result covers
/// exactly [`binned_bbox`] of the image bbox. Images placed side by side in
/// one parent frame bin onto the same grid; a block they share averages only
/// the pixels of the image being binned.
pub fn bin_image_on_grid<T: Pixel>(image: &Image<T>, bin_size: i32) -> Result<Image<T>> {
    let bbox = binned_bbox(image.bbox(), bin_size)?;
    if bin_size == 1 {
        return Ok(image.clone());
    }
    let xy0 = image.xy0();
    let lead = (
        xy0.y.rem_euclid(bin_size) as usize,
        xy0.x.rem_euclid(bin_size) as usize,
    );
    debug!(?bbox, ?lead, "Binning image on parent grid");

    let out = block_means(image.array().view(), lead, bbox.dimensions(), bin_size as usize)?;
    Ok(Image::from_array(bbox.min(), out))
}
