use std::path::Path;

use tracing::{debug, instrument};

use crate::camera_geom::assembly::types::{CameraMosaic, MosaicConfig};
use crate::camera_geom::assembly::{calc_raw_ccd_bbox, make_image_from_camera, ImageSource};
use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::display::overlay::{overlay_amp_boxes, overlay_camera_boxes, overlay_ccd_boxes};
use crate::camera_geom::display::sink::{DisplayRequest, DisplaySink};
use crate::camera_geom::display::types::{Annotation, DisplayConfig};
use crate::camera_geom::geom::Point2I;
use crate::camera_geom::image::{binned_dimensions, rotate_image_by_90, Image, Pixel};
use crate::camera_geom::model::{Amplifier, Camera, Detector};
use crate::camera_geom::wcs::FocalPlaneWcs;

fn emit<T, K>(
    sink: &mut K,
    config: &DisplayConfig,
    image: &Image<T>,
    default_title: &str,
    wcs: Option<&FocalPlaneWcs>,
    annotations: &[Annotation],
) -> Result<()>
where
    K: DisplaySink<T> + ?Sized,
{
    sink.display(DisplayRequest {
        frame: config.frame,
        image,
        title: config.title.as_deref().unwrap_or(default_title),
        wcs,
        annotations,
    })
}

/// Fetch one amplifier image from `source` and send it to `sink` with its raw-region boxes.
#[instrument(skip_all, fields(amp = amp.name()))]
pub fn show_amp<T, S, K>(
    detector: &Detector,
    amp: &Amplifier,
    source: &S,
    sink: &mut K,
    config: &DisplayConfig,
) -> Result<Image<T>>
where
    T: Pixel,
    S: ImageSource<T> + ?Sized,
    K: DisplaySink<T> + ?Sized,
{
    let image = source.amp_image(detector, amp)?;
    if config.enabled {
        let annotations = if config.overlay {
            overlay_amp_boxes(amp, image.dimensions())
        } else {
            Vec::new()
        };
        emit(sink, config, &image, amp.name(), None, &annotations)?;
    }
    Ok(image)
}

/// Fetch a detector image (binned by `config.bin_size`) and send it to `sink`.
///
/// The image counts as trimmed when its size matches the binned detector bbox.
/// With `config.in_camera_coords` the image is turned by the detector's
/// quarter-turn count before display. Returns the displayed image.
#[instrument(skip_all, fields(detector = ccd.name()))]
pub fn show_ccd<T, S, K>(ccd: &Detector, source: &S, sink: &mut K, config: &DisplayConfig) -> Result<Image<T>>
where
    T: Pixel,
    S: ImageSource<T> + ?Sized,
    K: DisplaySink<T> + ?Sized,
{
    let mut image = source.ccd_image(ccd, config.bin_size)?;
    let is_trimmed = image.dimensions() == binned_dimensions(ccd.bbox().dimensions(), config.bin_size)?;

    let n_quarter = if config.in_camera_coords {
        ccd.orientation().n_quarter()
    } else {
        0
    };
    if n_quarter != 0 {
        image = rotate_image_by_90(&image, n_quarter);
    }
    debug!(is_trimmed, n_quarter, "Detector image ready");

    if config.enabled {
        let annotations = if config.overlay {
            let ccd_bbox = if is_trimmed {
                ccd.bbox()
            } else {
                calc_raw_ccd_bbox(ccd)?
            };
            overlay_ccd_boxes(ccd, ccd_bbox, n_quarter, is_trimmed, Point2I::new(0, 0), config.bin_size)?
        } else {
            Vec::new()
        };
        let title = if is_trimmed {
            format!("{}(trimmed)", ccd.name())
        } else {
            ccd.name().to_string()
        };
        emit(sink, config, &image, &title, None, &annotations)?;
    }
    Ok(image)
}

/// Assemble a camera mosaic and send it to `sink` with its focal-plane WCS and detector outlines.
#[instrument(skip_all, fields(camera = camera.name()))]
pub fn show_camera<T, S, K>(
    camera: &Camera,
    mosaic_config: &MosaicConfig,
    source: &S,
    sink: &mut K,
    config: &DisplayConfig,
) -> Result<CameraMosaic<T>>
where
    T: Pixel,
    S: ImageSource<T> + ?Sized,
    K: DisplaySink<T> + ?Sized,
{
    let mosaic = make_image_from_camera(camera, mosaic_config, source)?;
    if config.enabled {
        let annotations = if config.overlay {
            overlay_camera_boxes(mosaic.placements(), config.color, config.text_size)
        } else {
            Vec::new()
        };
        emit(sink, config, mosaic.image(), camera.name(), Some(mosaic.wcs()), &annotations)?;
    }
    Ok(mosaic)
}

/// Display of a mosaic read from a file; not available for this camera model.
pub fn show_mosaic(file_name: impl AsRef<Path>) -> Result<()> {
    Err(CameraGeomError::UnsupportedOperationError(format!(
        "show_mosaic({}) is not supported by the current camera geometry",
        file_name.as_ref().display()
    )))
}
