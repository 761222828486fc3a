//! Where detector and amplifier images come from.

use std::collections::HashMap;
use std::sync::Arc;

use crate::camera_geom::assembly::detector::{assemble_ccd_image, make_image_from_ccd, CcdImageOptions};
use crate::camera_geom::assembly::synthetic::{
    make_image_from_amp, AmpFill, AmpImageOptions, GainScaler, DEFAULT_GAIN_SCALER,
};
use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::image::{Image, Pixel};
use crate::camera_geom::model::{Amplifier, Detector};

/// Supplies detector and amplifier images to the builders and display helpers.
pub trait ImageSource<T: Pixel> {
    /// Image of a whole detector, binned by `bin_size`.
    ///
    /// The camera mosaic always asks for `bin_size` 1 and bins on its own grid.
    fn ccd_image(&self, detector: &Detector, bin_size: i32) -> Result<Image<T>>;

    /// Image of one amplifier of `detector`.
    fn amp_image(&self, detector: &Detector, amp: &Amplifier) -> Result<Image<T>>;
}

/// Synthetic test-pattern images built from the camera geometry alone.
#[derive(Debug, Clone)]
pub struct FakeImageDataSource {
    pub is_trimmed: bool,
    pub fill: AmpFill,
    pub mark_size: i32,
    pub mark_value: f64,
    /// Fill value for single-amplifier images; `None` uses the gain scaler
    pub amp_im_value: Option<f64>,
    pub gain_scaler: Arc<dyn GainScaler>,
}

impl Default for FakeImageDataSource {
    fn default() -> Self {
        Self {
            is_trimmed: true,
            fill: AmpFill::ScaledGain,
            mark_size: 10,
            mark_value: 0.0,
            amp_im_value: None,
            gain_scaler: Arc::new(DEFAULT_GAIN_SCALER),
        }
    }
}

impl FakeImageDataSource {
    pub fn builder() -> FakeImageDataSourceBuilder {
        FakeImageDataSourceBuilder::default()
    }

    fn ccd_options(&self, bin_size: i32) -> CcdImageOptions<'_> {
        CcdImageOptions {
            is_trimmed: self.is_trimmed,
            fill: self.fill,
            mark_size: self.mark_size,
            mark_value: self.mark_value,
            gain_scaler: self.gain_scaler.as_ref(),
            bin_size,
        }
    }
}

impl<T: Pixel> ImageSource<T> for FakeImageDataSource {
    fn ccd_image(&self, detector: &Detector, bin_size: i32) -> Result<Image<T>> {
        make_image_from_ccd(detector, &self.ccd_options(bin_size))
    }

    /// Untrimmed amplifier image, cut down to the raw data bbox when trimmed.
    fn amp_image(&self, _detector: &Detector, amp: &Amplifier) -> Result<Image<T>> {
        let options = AmpImageOptions {
            im_value: self.amp_im_value,
            mark_size: self.mark_size,
            mark_value: self.mark_value,
            gain_scaler: self.gain_scaler.as_ref(),
        };
        let image = make_image_from_amp(amp, &options)?;
        if self.is_trimmed {
            image.sub_image(amp.raw()?.raw_data_bbox())
        } else {
            Ok(image)
        }
    }
}

/// Builder for FakeImageDataSource
#[derive(Debug, Default)]
pub struct FakeImageDataSourceBuilder {
    is_trimmed: Option<bool>,
    fill: Option<AmpFill>,
    mark_size: Option<i32>,
    mark_value: Option<f64>,
    amp_im_value: Option<Option<f64>>,
    gain_scaler: Option<Arc<dyn GainScaler>>,
}

impl FakeImageDataSourceBuilder {
    pub fn trimmed(mut self, is_trimmed: bool) -> Self {
        self.is_trimmed = Some(is_trimmed);
        self
    }

    /// Gain-scaled fill when true, amplifier-index fill otherwise.
    pub fn show_amp_gain(mut self, show: bool) -> Self {
        self.fill = Some(if show { AmpFill::ScaledGain } else { AmpFill::Index });
        self
    }

    pub fn fill(mut self, fill: AmpFill) -> Self {
        self.fill = Some(fill);
        self
    }

    pub fn mark_size(mut self, size: i32) -> Self {
        self.mark_size = Some(size);
        self
    }

    pub fn mark_value(mut self, value: f64) -> Self {
        self.mark_value = Some(value);
        self
    }

    pub fn amp_im_value(mut self, value: Option<f64>) -> Self {
        self.amp_im_value = Some(value);
        self
    }

    pub fn gain_scaler(mut self, scaler: impl GainScaler + 'static) -> Self {
        self.gain_scaler = Some(Arc::new(scaler));
        self
    }

    pub fn build(self) -> FakeImageDataSource {
        let default = FakeImageDataSource::default();
        FakeImageDataSource {
            is_trimmed: self.is_trimmed.unwrap_or(default.is_trimmed),
            fill: self.fill.unwrap_or(default.fill),
            mark_size: self.mark_size.unwrap_or(default.mark_size),
            mark_value: self.mark_value.unwrap_or(default.mark_value),
            amp_im_value: self.amp_im_value.unwrap_or(default.amp_im_value),
            gain_scaler: self.gain_scaler.unwrap_or(default.gain_scaler),
        }
    }
}

/// Caller-supplied raw amplifier images, keyed by detector name then amplifier name.
#[derive(Debug, Clone)]
pub struct AmplifierImageSource<T> {
    is_trimmed: bool,
    images: HashMap<String, HashMap<String, Image<T>>>,
}

impl<T: Pixel> AmplifierImageSource<T> {
    pub fn new(is_trimmed: bool) -> Self {
        Self {
            is_trimmed,
            images: HashMap::new(),
        }
    }

    /// Register the raw image of one amplifier; it must cover the amplifier's raw bbox.
    pub fn insert(&mut self, detector: impl Into<String>, amp: impl Into<String>, image: Image<T>) {
        self.images
            .entry(detector.into())
            .or_default()
            .insert(amp.into(), image);
    }

    fn detector_images(&self, detector: &Detector) -> Result<&HashMap<String, Image<T>>> {
        self.images.get(detector.name()).ok_or_else(|| {
            CameraGeomError::MissingRawDataError(format!(
                "no amplifier images supplied for detector {}",
                detector.name()
            ))
        })
    }
}

impl<T: Pixel> ImageSource<T> for AmplifierImageSource<T> {
    fn ccd_image(&self, detector: &Detector, bin_size: i32) -> Result<Image<T>> {
        assemble_ccd_image(detector, self.detector_images(detector)?, self.is_trimmed, bin_size)
    }

    fn amp_image(&self, detector: &Detector, amp: &Amplifier) -> Result<Image<T>> {
        let image = self.detector_images(detector)?.get(amp.name()).ok_or_else(|| {
            CameraGeomError::MissingRawDataError(format!(
                "no raw image supplied for amplifier {} of detector {}",
                amp.name(),
                detector.name()
            ))
        })?;
        if self.is_trimmed {
            image.sub_image(amp.raw()?.raw_data_bbox())
        } else {
            Ok(image.clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_geom::assembly::synthetic::ScaledGain;
    use crate::camera_geom::geom::{Box2I, Extent2D, Extent2I, Point2I};
    use crate::camera_geom::model::{Orientation, RawAmplifier, ReadoutCorner};

    fn bx(x0: i32, y0: i32, w: i32, h: i32) -> Box2I {
        Box2I::from_min_extent(Point2I::new(x0, y0), Extent2I::new(w, h))
    }

    fn detector() -> Detector {
        let raw = RawAmplifier::new(bx(0, 0, 8, 6), bx(2, 0, 6, 6)).unwrap();
        let amp = Amplifier::new("A0", bx(0, 0, 6, 6))
            .with_gain(3.0)
            .with_readout_corner(ReadoutCorner::UpperLeft)
            .with_raw(raw)
            .unwrap();
        Detector::new("D", bx(0, 0, 6, 6), Extent2D::new(0.01, 0.01), Orientation::default(), vec![amp])
            .unwrap()
    }

    #[test]
    fn test_builder_defaults() {
        let source = FakeImageDataSource::builder().build();
        assert!(source.is_trimmed);
        assert_eq!(source.fill, AmpFill::ScaledGain);
        assert_eq!(source.mark_size, 10);
        assert_eq!(source.amp_im_value, None);
    }

    #[test]
    fn test_builder_overrides() {
        let source = FakeImageDataSource::builder()
            .trimmed(false)
            .show_amp_gain(false)
            .mark_size(2)
            .mark_value(9.0)
            .amp_im_value(Some(5.0))
            .gain_scaler(ScaledGain { multiplier: 1.0, divisor: 1.0 })
            .build();
        assert!(!source.is_trimmed);
        assert_eq!(source.fill, AmpFill::Index);
        assert_eq!(source.gain_scaler.scale(3.5), 3.0);
    }

    #[test]
    fn test_trimmed_amp_image_is_data_region() {
        let det = detector();
        let source = FakeImageDataSource::builder().mark_size(1).mark_value(1.0).build();
        let image: Image<u16> = source.amp_image(&det, &det.amplifiers()[0]).unwrap();
        assert_eq!(image.bbox(), bx(2, 0, 6, 6));
        assert_eq!(image.get(Point2I::new(2, 5)), Some(1));
        assert_eq!(image.get(Point2I::new(3, 5)), Some(300));
    }

    #[test]
    fn test_untrimmed_amp_image_is_raw_region() {
        let det = detector();
        let source = FakeImageDataSource::builder().trimmed(false).build();
        let image: Image<u16> = source.amp_image(&det, &det.amplifiers()[0]).unwrap();
        assert_eq!(image.bbox(), bx(0, 0, 8, 6));
    }

    #[test]
    fn test_amplifier_image_source() {
        let det = detector();
        let mut source = AmplifierImageSource::new(true);
        assert!(matches!(
            source.ccd_image(&det, 1),
            Err(CameraGeomError::MissingRawDataError(_))
        ));
        source.insert("D", "A0", Image::<f32>::filled(bx(0, 0, 8, 6), 2.5).unwrap());
        let ccd = source.ccd_image(&det, 1).unwrap();
        assert_eq!(ccd.bbox(), det.bbox());
        assert!(ccd.array().iter().all(|&v| v == 2.5));
        let amp = source.amp_image(&det, &det.amplifiers()[0]).unwrap();
        assert_eq!(amp.bbox(), bx(2, 0, 6, 6));
    }
}
