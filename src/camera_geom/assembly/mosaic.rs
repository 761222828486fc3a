use tracing::{debug, info, instrument, warn};

use crate::camera_geom::assembly::projection::{check_pixel_scale, get_camera_image_bbox, get_ccd_in_cam_pixel_bbox};
use crate::camera_geom::assembly::source::{FakeImageDataSource, ImageSource};
use crate::camera_geom::assembly::types::{CameraMosaic, DetectorPlacement, MosaicConfig};
use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2D, Box2I, Extent2D, Extent2I, Point2D, Point2I};
use crate::camera_geom::image::{
    bin_image_on_grid, binned_bbox, binned_dimensions, pixel_from_f64, rotate_image_by_90, Image, Pixel,
};
use crate::camera_geom::model::{Camera, Detector};
use crate::camera_geom::wcs::{make_focal_plane_wcs, FocalPlaneWcs};

/// Geometry of a camera mosaic, computed before any pixels are produced.
#[derive(Debug, Clone)]
pub struct CameraLayout<'c> {
    detectors: Vec<&'c Detector>,
    pixel_size: Extent2D,
    camera_bbox: Box2I,
    dimensions: Extent2I,
    placements: Vec<DetectorPlacement>,
}

impl<'c> CameraLayout<'c> {
    /// Select detectors, size the mosaic and project every detector into it.
    ///
    /// # Errors
    ///
    /// `UnknownDetectorError`, `InconsistentPixelScaleError`,
    /// `InvalidDimensionsError`/`InvalidBinFactorError` for a degenerate mosaic,
    /// and `OverlappingDetectorsError` when `config.check_overlap` is set.
    pub fn plan(camera: &'c Camera, config: &MosaicConfig) -> Result<Self> {
        let detectors = camera.select(config.detector_names.as_deref())?;
        let pixel_size = check_pixel_scale(detectors.iter().copied())?;

        let fp_bbox = detectors
            .iter()
            .fold(Box2D::empty(), |acc, det| acc.include_box(&det.fp_bbox()));
        let camera_bbox = get_camera_image_bbox(&fp_bbox, pixel_size, config.buffer_size)?;
        let dimensions = binned_dimensions(camera_bbox.dimensions(), config.bin_size)?;

        let placements = detectors
            .iter()
            .map(|det| {
                let pixel_bbox = get_ccd_in_cam_pixel_bbox(det, pixel_size, camera_bbox.min())?;
                Ok(DetectorPlacement {
                    name: det.name().to_string(),
                    bbox: binned_bbox(pixel_bbox, config.bin_size)?,
                    pixel_bbox,
                    n_quarter: det.orientation().n_quarter(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        if config.check_overlap {
            check_overlaps(&placements)?;
        }

        debug!(
            detectors = detectors.len(),
            width = dimensions.x,
            height = dimensions.y,
            "Planned camera layout"
        );
        Ok(Self {
            detectors,
            pixel_size,
            camera_bbox,
            dimensions,
            placements,
        })
    }

    pub fn detectors(&self) -> &[&'c Detector] {
        &self.detectors
    }

    pub fn pixel_size(&self) -> Extent2D {
        self.pixel_size
    }

    /// Unbinned camera pixel box, buffer included.
    pub fn camera_bbox(&self) -> Box2I {
        self.camera_bbox
    }

    /// Binned mosaic dimensions.
    pub fn dimensions(&self) -> Extent2I {
        self.dimensions
    }

    pub fn placements(&self) -> &[DetectorPlacement] {
        &self.placements
    }

    /// Focal-plane WCS of the binned mosaic.
    pub fn wcs(&self, bin_size: i32, origin_at_center: bool) -> FocalPlaneWcs {
        let reference_pixel = if origin_at_center {
            let half = self.dimensions / 2;
            Point2D::new(half.x as f64, half.y as f64)
        } else {
            Point2D::new(0.0, 0.0)
        };
        make_focal_plane_wcs(self.pixel_size * bin_size as f64, reference_pixel)
    }
}

/// Detectors overlap when their unbinned boxes do; binned boxes of abutting
/// detectors may share the block their common edge falls in.
fn check_overlaps(placements: &[DetectorPlacement]) -> Result<()> {
    for (i, a) in placements.iter().enumerate() {
        if let Some(b) = placements[i + 1..].iter().find(|b| a.pixel_bbox.overlaps(&b.pixel_bbox)) {
            warn!(first = %a.name, second = %b.name, "Detector placements overlap");
            return Err(CameraGeomError::OverlappingDetectorsError(a.name.clone(), b.name.clone()));
        }
    }
    Ok(())
}

/// Assemble a camera mosaic from the detector images supplied by `source`.
///
/// Each unbinned detector image is rotated by its quarter-turn count, binned
/// on the mosaic grid and written over its placement box; pixels outside
/// every detector keep `config.background`. A block shared by two abutting
/// detectors holds the mean of the later detector's pixels in it.
#[instrument(skip(camera, config, source), fields(camera = camera.name(), bin_size = config.bin_size))]
pub fn make_image_from_camera<T, S>(camera: &Camera, config: &MosaicConfig, source: &S) -> Result<CameraMosaic<T>>
where
    T: Pixel,
    S: ImageSource<T> + ?Sized,
{
    info!("Starting camera mosaic assembly");

    let layout = {
        let _span = tracing::info_span!("plan_layout").entered();
        CameraLayout::plan(camera, config)?
    };

    let mut image = Image::filled(
        Box2I::from_min_extent(Point2I::new(0, 0), layout.dimensions()),
        pixel_from_f64(config.background)?,
    )?;

    for (detector, placement) in layout.detectors().iter().zip(layout.placements()) {
        let _span = tracing::info_span!("place_detector", detector = detector.name()).entered();
        let ccd_image = source.ccd_image(detector, 1)?;
        let mut rotated = rotate_image_by_90(&ccd_image, placement.n_quarter);
        if rotated.dimensions() != placement.pixel_bbox.dimensions() {
            return Err(CameraGeomError::DimensionMismatchError {
                source_dims: rotated.dimensions(),
                dest_dims: placement.pixel_bbox.dimensions(),
            });
        }
        rotated.set_xy0(placement.pixel_bbox.min());
        let binned = bin_image_on_grid(&rotated, config.bin_size)?;
        image.view_mut(placement.bbox)?.assign(binned.array());
        debug!(bbox = ?placement.bbox, n_quarter = placement.n_quarter, "Placed detector");
    }

    let wcs = layout.wcs(config.bin_size, config.origin_at_center);
    info!(
        width = image.width(),
        height = image.height(),
        detectors = layout.placements().len(),
        "Camera mosaic complete"
    );
    Ok(CameraMosaic {
        image,
        wcs,
        placements: layout.placements,
    })
}

/// Camera mosaic builder over an [`ImageSource`].
pub struct CameraMosaicBuilder<S> {
    source: S,
    config: MosaicConfig,
}

impl CameraMosaicBuilder<FakeImageDataSource> {
    pub fn new(config: MosaicConfig) -> Self {
        Self {
            source: FakeImageDataSource::default(),
            config,
        }
    }
}

impl<S> CameraMosaicBuilder<S> {
    pub fn with_custom(source: S, config: MosaicConfig) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &MosaicConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: MosaicConfig) {
        self.config = config;
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn build<T: Pixel>(&self, camera: &Camera) -> Result<CameraMosaic<T>>
    where
        S: ImageSource<T>,
    {
        make_image_from_camera(camera, &self.config, &self.source)
    }
}
