//! Camera mosaic configuration and result types

use crate::camera_geom::geom::Box2I;
use crate::camera_geom::image::Image;
use crate::camera_geom::wcs::FocalPlaneWcs;

/// Configuration for building a camera mosaic
#[derive(Debug, Clone, PartialEq)]
pub struct MosaicConfig {
    /// Detectors to include, in placement order; `None` uses every detector in camera order
    pub detector_names: Option<Vec<String>>,
    /// Block-averaging factor applied to each detector image
    pub bin_size: i32,
    /// Unbinned pixels of border around the detectors
    pub buffer_size: i32,
    /// Value of mosaic pixels not covered by any detector
    pub background: f64,
    /// Put the WCS reference pixel at the image center instead of the lower-left corner
    pub origin_at_center: bool,
    /// Fail when two placement boxes overlap
    pub check_overlap: bool,
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            detector_names: None,
            bin_size: 1,
            buffer_size: 10,
            background: 0.0,
            origin_at_center: true,
            check_overlap: true,
        }
    }
}

impl MosaicConfig {
    pub fn builder() -> MosaicConfigBuilder {
        MosaicConfigBuilder::default()
    }
}

/// Builder for MosaicConfig
#[derive(Debug, Default)]
pub struct MosaicConfigBuilder {
    detector_names: Option<Option<Vec<String>>>,
    bin_size: Option<i32>,
    buffer_size: Option<i32>,
    background: Option<f64>,
    origin_at_center: Option<bool>,
    check_overlap: Option<bool>,
}

impl MosaicConfigBuilder {
    pub fn detector_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.detector_names = Some(Some(names.into_iter().map(Into::into).collect()));
        self
    }

    pub fn all_detectors(mut self) -> Self {
        self.detector_names = Some(None);
        self
    }

    pub fn bin_size(mut self, bin_size: i32) -> Self {
        self.bin_size = Some(bin_size);
        self
    }

    pub fn buffer_size(mut self, buffer_size: i32) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn background(mut self, background: f64) -> Self {
        self.background = Some(background);
        self
    }

    pub fn origin_at_center(mut self, at_center: bool) -> Self {
        self.origin_at_center = Some(at_center);
        self
    }

    pub fn check_overlap(mut self, check: bool) -> Self {
        self.check_overlap = Some(check);
        self
    }

    pub fn build(self) -> MosaicConfig {
        let default = MosaicConfig::default();
        MosaicConfig {
            detector_names: self.detector_names.unwrap_or(default.detector_names),
            bin_size: self.bin_size.unwrap_or(default.bin_size),
            buffer_size: self.buffer_size.unwrap_or(default.buffer_size),
            background: self.background.unwrap_or(default.background),
            origin_at_center: self.origin_at_center.unwrap_or(default.origin_at_center),
            check_overlap: self.check_overlap.unwrap_or(default.check_overlap),
        }
    }
}

/// Where one detector landed in the mosaic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectorPlacement {
    pub name: String,
    /// Box in binned mosaic pixels, local to the mosaic (minimum pixel is 0, 0)
    pub bbox: Box2I,
    /// Unbinned box relative to the camera pixel bbox minimum
    pub pixel_bbox: Box2I,
    pub n_quarter: i32,
}

/// An assembled camera image with its focal-plane WCS
#[derive(Debug, Clone)]
pub struct CameraMosaic<T> {
    pub(crate) image: Image<T>,
    pub(crate) wcs: FocalPlaneWcs,
    pub(crate) placements: Vec<DetectorPlacement>,
}

impl<T> CameraMosaic<T> {
    pub fn image(&self) -> &Image<T> {
        &self.image
    }

    pub fn into_image(self) -> Image<T> {
        self.image
    }

    pub fn wcs(&self) -> &FocalPlaneWcs {
        &self.wcs
    }

    pub fn placements(&self) -> &[DetectorPlacement] {
        &self.placements
    }

    pub fn placement(&self, name: &str) -> Option<&DetectorPlacement> {
        self.placements.iter().find(|p| p.name == name)
    }
}
