use std::borrow::Cow;
use std::collections::HashMap;

use tracing::{debug, instrument};

use crate::camera_geom::assembly::amplifier::{assemble_amplifier_image, assemble_amplifier_raw_image};
use crate::camera_geom::assembly::synthetic::{
    make_image_from_amp, AmpFill, AmpImageOptions, GainScaler, DEFAULT_GAIN_SCALER,
};
use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Point2I};
use crate::camera_geom::image::{bin_image, Image, Pixel};
use crate::camera_geom::model::{Amplifier, Detector};

/// Options for [`make_image_from_ccd`].
#[derive(Debug, Clone, Copy)]
pub struct CcdImageOptions<'a> {
    pub is_trimmed: bool,
    pub fill: AmpFill,
    /// Side of the readout-corner mark in pixels
    pub mark_size: i32,
    pub mark_value: f64,
    pub gain_scaler: &'a dyn GainScaler,
    pub bin_size: i32,
}

impl Default for CcdImageOptions<'static> {
    fn default() -> Self {
        Self {
            is_trimmed: true,
            fill: AmpFill::ScaledGain,
            mark_size: 10,
            mark_value: 0.0,
            gain_scaler: &DEFAULT_GAIN_SCALER,
            bin_size: 1,
        }
    }
}

/// Untrimmed detector frame: union of every amplifier's raw bbox shifted by its raw XY offset.
///
/// # Errors
///
/// `MissingRawDataError` if any amplifier has no raw amplifier data.
pub fn calc_raw_ccd_bbox(ccd: &Detector) -> Result<Box2I> {
    ccd.iter().try_fold(Box2I::empty(), |bbox, amp| {
        let raw = amp.raw().map_err(|_| {
            CameraGeomError::MissingRawDataError(format!(
                "cannot build a raw bbox for detector {}: amplifier {} has no raw amplifier data",
                ccd.name(),
                amp.name()
            ))
        })?;
        Ok(bbox.include_box(&raw.placed_raw_bbox()))
    })
}

/// Shared trimmed/untrimmed assembly; `amp_image` yields the raw image of the n-th amplifier with raw data.
fn assemble_ccd<'i, T, F>(ccd: &Detector, is_trimmed: bool, bin_size: i32, mut amp_image: F) -> Result<Image<T>>
where
    T: Pixel + 'i,
    F: FnMut(usize, &Amplifier) -> Result<Cow<'i, Image<T>>>,
{
    let bbox = if is_trimmed {
        ccd.bbox()
    } else {
        calc_raw_ccd_bbox(ccd)?
    };
    let raw_amps: Vec<&Amplifier> = ccd.iter().filter(|amp| amp.has_raw_info()).collect();

    let image = if raw_amps.is_empty() {
        if !is_trimmed {
            return Err(CameraGeomError::MissingRawDataError(format!(
                "cannot create an untrimmed image of detector {} without amplifiers with raw data",
                ccd.name()
            )));
        }
        Image::new(ccd.bbox())?
    } else {
        let mut image = Image::new(bbox)?;
        for (index, amp) in raw_amps.into_iter().enumerate() {
            let raw = amp_image(index, amp)?;
            if is_trimmed {
                assemble_amplifier_image(&mut image, raw.as_ref(), amp)?;
            } else {
                assemble_amplifier_raw_image(&mut image, raw.as_ref(), amp)?;
            }
        }
        image
    };
    bin_image(&image, bin_size)
}

/// Synthesize an image of a detector from its amplifier geometry.
///
/// Trimmed images cover `ccd.bbox()` with each amplifier flip-corrected into
/// place; untrimmed images cover [`calc_raw_ccd_bbox`] with amplifiers in raw
/// layout. Amplifiers without raw data are skipped; where the amplifiers do
/// not tile the detector the gap keeps the default pixel value. The result is
/// binned by `options.bin_size`.
#[instrument(skip(ccd, options), fields(detector = ccd.name(), trimmed = options.is_trimmed))]
pub fn make_image_from_ccd<T: Pixel>(ccd: &Detector, options: &CcdImageOptions<'_>) -> Result<Image<T>> {
    let image = assemble_ccd(ccd, options.is_trimmed, options.bin_size, |index, amp| {
        let amp_options = AmpImageOptions {
            im_value: Some(options.fill.value_for(amp, index, options.gain_scaler)),
            mark_size: options.mark_size,
            mark_value: options.mark_value,
            gain_scaler: options.gain_scaler,
        };
        make_image_from_amp(amp, &amp_options).map(Cow::Owned)
    })?;
    debug!("Detector image {}x{}", image.width(), image.height());
    Ok(image)
}

/// Assemble a detector image from caller-supplied raw amplifier images keyed by amplifier name.
///
/// Each supplied image must cover its amplifier's raw bbox.
pub fn assemble_ccd_image<T: Pixel>(
    ccd: &Detector,
    amp_images: &HashMap<String, Image<T>>,
    is_trimmed: bool,
    bin_size: i32,
) -> Result<Image<T>> {
    assemble_ccd(ccd, is_trimmed, bin_size, |_, amp| {
        amp_images.get(amp.name()).map(Cow::Borrowed).ok_or_else(|| {
            CameraGeomError::MissingRawDataError(format!(
                "no raw image supplied for amplifier {} of detector {}",
                amp.name(),
                ccd.name()
            ))
        })
    })
}

/// Amplifier whose trimmed bbox contains `pixel`.
pub fn find_amp(ccd: &Detector, pixel: Point2I) -> Option<&Amplifier> {
    ccd.iter().find(|amp| amp.bbox().contains_point(pixel))
}
