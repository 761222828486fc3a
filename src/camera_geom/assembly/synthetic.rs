//! Synthetic (test-pattern) amplifier images.

use std::fmt::Debug;

use tracing::debug;

use crate::camera_geom::common::error::Result;
use crate::camera_geom::geom::{Box2I, Extent2I};
use crate::camera_geom::image::{pixel_from_f64, Image, Pixel};
use crate::camera_geom::model::{Amplifier, ReadoutCorner};

/// Strategy turning an amplifier gain into a fill value.
pub trait GainScaler: Debug + Send + Sync {
    fn scale(&self, gain: f64) -> f64;
}

/// `floor(gain * multiplier / divisor)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaledGain {
    pub multiplier: f64,
    pub divisor: f64,
}

impl GainScaler for ScaledGain {
    fn scale(&self, gain: f64) -> f64 {
        (gain * self.multiplier / self.divisor).floor()
    }
}

/// Default gain scaling: `floor(gain * 1000 / 10)`, so a gain of 1.5 fills with 150.
pub const DEFAULT_GAIN_SCALER: ScaledGain = ScaledGain {
    multiplier: 1000.0,
    divisor: 10.0,
};

/// How amplifier regions of a synthetic detector are filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmpFill {
    /// Gain passed through the [`GainScaler`]
    ScaledGain,
    /// `(index + 1) * 1000`, index counting amplifiers with raw data
    Index,
    /// The same value everywhere
    Value(f64),
}

impl AmpFill {
    pub fn value_for(&self, amp: &Amplifier, index: usize, gain_scaler: &dyn GainScaler) -> f64 {
        match self {
            AmpFill::ScaledGain => gain_scaler.scale(amp.gain()),
            AmpFill::Index => ((index + 1) * 1000) as f64,
            AmpFill::Value(value) => *value,
        }
    }
}

/// Options for [`make_image_from_amp`].
#[derive(Debug, Clone, Copy)]
pub struct AmpImageOptions<'a> {
    /// Fill value; `None` uses the gain scaler
    pub im_value: Option<f64>,
    /// Side of the readout-corner mark in pixels (0 disables the mark)
    pub mark_size: i32,
    pub mark_value: f64,
    pub gain_scaler: &'a dyn GainScaler,
}

impl Default for AmpImageOptions<'static> {
    fn default() -> Self {
        Self {
            im_value: None,
            mark_size: 10,
            mark_value: 0.0,
            gain_scaler: &DEFAULT_GAIN_SCALER,
        }
    }
}

/// Mark region of `mark_size` x `mark_size` pixels at `corner` of `data_bbox`, clipped to it.
pub fn readout_mark_bbox(data_bbox: &Box2I, corner: ReadoutCorner, mark_size: i32) -> Box2I {
    if mark_size <= 0 || data_bbox.is_empty() {
        return Box2I::empty();
    }
    let start = corner.corner_of(data_bbox);
    let step = corner.inward();
    let far = start + Extent2I::new(step.x * (mark_size - 1), step.y * (mark_size - 1));
    Box2I::from_corners(start, far).clipped(data_bbox)
}

/// Synthesize an untrimmed amplifier image.
///
/// The image covers the amplifier's raw bbox and is filled with `im_value`
/// (or the scaled gain); the first pixels read out, at the readout corner of
/// the raw data bbox, are set to `mark_value`.
pub fn make_image_from_amp<T: Pixel>(amp: &Amplifier, options: &AmpImageOptions<'_>) -> Result<Image<T>> {
    let raw = amp.raw()?;
    let value = options
        .im_value
        .unwrap_or_else(|| options.gain_scaler.scale(amp.gain()));
    let mut image = Image::filled(raw.raw_bbox(), pixel_from_f64(value)?)?;

    let mark = readout_mark_bbox(&raw.raw_data_bbox(), amp.readout_corner(), options.mark_size);
    if !mark.is_empty() {
        image.fill_box(mark, pixel_from_f64(options.mark_value)?)?;
    }
    debug!(amp = amp.name(), value, ?mark, "Synthesized amplifier image");
    Ok(image)
}
