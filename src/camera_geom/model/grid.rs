//! Regular grid cameras with synthetic amplifier layouts.

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Extent2D, Extent2I, Point2D, Point2I};
use crate::camera_geom::model::amplifier::{Amplifier, RawAmplifier};
use crate::camera_geom::model::camera::Camera;
use crate::camera_geom::model::detector::{Detector, Orientation};

const PRESCAN: i32 = 2;
const SERIAL_OVERSCAN: i32 = 4;
const PARALLEL_OVERSCAN: i32 = 2;

/// Layout of a camera made of identical detectors on a square-pitch grid.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCameraSpec {
    pub name: String,
    /// Detector columns and rows
    pub detector_grid: (i32, i32),
    pub detector_dims: Extent2I,
    /// Amplifier columns and rows per detector; must divide `detector_dims`
    pub amp_grid: (i32, i32),
    /// Physical pixel size in mm
    pub pixel_size: Extent2D,
    /// Gap between neighbouring detectors in mm
    pub gap_mm: f64,
    /// Turn detector `k` (row-major) by `k % 4` quarter turns
    pub rotate_detectors: bool,
}

impl Default for GridCameraSpec {
    fn default() -> Self {
        Self {
            name: "grid".to_string(),
            detector_grid: (2, 2),
            detector_dims: Extent2I::new(400, 400),
            amp_grid: (2, 2),
            pixel_size: Extent2D::new(0.01, 0.01),
            gap_mm: 0.5,
            rotate_detectors: false,
        }
    }
}

/// Amplifiers of one detector, each with a raw frame of prescan, data and overscan.
///
/// Amplifiers in the right half are read out flipped in x and those in the
/// upper half flipped in y, so every readout corner faces outward.
fn grid_amplifiers(spec: &GridCameraSpec) -> Result<Vec<Amplifier>> {
    let (cols, rows) = spec.amp_grid;
    let dims = spec.detector_dims;
    if cols <= 0 || rows <= 0 || dims.x % cols != 0 || dims.y % rows != 0 {
        return Err(CameraGeomError::InvalidGeometryError(format!(
            "amplifier grid {cols}x{rows} does not divide detector {}x{}",
            dims.x, dims.y
        )));
    }
    let (width, height) = (dims.x / cols, dims.y / rows);
    let raw_width = PRESCAN + width + SERIAL_OVERSCAN;
    let raw_height = height + PARALLEL_OVERSCAN;

    let mut amps = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let index = row * cols + col;
            let raw = RawAmplifier::new(
                Box2I::from_min_extent(Point2I::new(0, 0), Extent2I::new(raw_width, raw_height)),
                Box2I::from_min_extent(Point2I::new(PRESCAN, 0), Extent2I::new(width, height)),
            )?
            .with_overscan(
                Box2I::from_min_extent(Point2I::new(PRESCAN + width, 0), Extent2I::new(SERIAL_OVERSCAN, height)),
                Box2I::from_min_extent(Point2I::new(PRESCAN, height), Extent2I::new(width, PARALLEL_OVERSCAN)),
                Box2I::from_min_extent(Point2I::new(0, 0), Extent2I::new(PRESCAN, height)),
            )?
            .with_flips(cols > 1 && col >= cols / 2, rows > 1 && row >= rows / 2)
            .with_xy_offset(Extent2I::new(col * raw_width, row * raw_height));

            let bbox = Box2I::from_min_extent(Point2I::new(col * width, row * height), Extent2I::new(width, height));
            amps.push(
                Amplifier::new(format!("A{row}{col}"), bbox)
                    .with_gain(1.0 + 0.1 * index as f64)
                    .with_raw(raw)?,
            );
        }
    }
    Ok(amps)
}

/// Build a camera whose detectors sit on a grid centered on the focal-plane origin.
pub fn make_grid_camera(spec: &GridCameraSpec) -> Result<Camera> {
    let (cols, rows) = spec.detector_grid;
    if cols <= 0 || rows <= 0 {
        return Err(CameraGeomError::InvalidGeometryError(format!(
            "detector grid {cols}x{rows} is empty"
        )));
    }
    let dims = spec.detector_dims;
    let pitch = Extent2D::new(
        dims.x.max(dims.y) as f64 * spec.pixel_size.x + spec.gap_mm,
        dims.x.max(dims.y) as f64 * spec.pixel_size.y + spec.gap_mm,
    );
    let center = Point2D::new((dims.x - 1) as f64 / 2.0, (dims.y - 1) as f64 / 2.0);
    let bbox = Box2I::from_min_extent(Point2I::new(0, 0), dims);

    let mut detectors = Vec::with_capacity((cols * rows) as usize);
    for row in 0..rows {
        for col in 0..cols {
            let index = row * cols + col;
            let fp_position = Point2D::new(
                (col as f64 - (cols - 1) as f64 / 2.0) * pitch.x,
                (row as f64 - (rows - 1) as f64 / 2.0) * pitch.y,
            );
            let n_quarter = if spec.rotate_detectors { index % 4 } else { 0 };
            detectors.push(Detector::new(
                format!("R{row}{col}"),
                bbox,
                spec.pixel_size,
                Orientation::new(fp_position, center, n_quarter),
                grid_amplifiers(spec)?,
            )?);
        }
    }
    Camera::new(spec.name.clone(), detectors)
}
