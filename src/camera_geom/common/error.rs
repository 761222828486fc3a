use thiserror::Error;

use crate::camera_geom::geom::{Box2I, Extent2D, Extent2I};

#[derive(Error, Debug)]
pub enum CameraGeomError {
    #[error("Missing raw amplifier data: {0}")]
    MissingRawDataError(String),

    #[error("Inconsistent pixel scale for detector {detector}: expected {expected:?}, found {found:?}")]
    InconsistentPixelScaleError {
        detector: String,
        expected: Extent2D,
        found: Extent2D,
    },

    #[error("Invalid readout corner: {0} (expected 0, 1, 2 or 3)")]
    InvalidReadoutCornerError(i32),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperationError(String),

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensionsError(i64, i64),

    #[error("Invalid bin factor: {0}")]
    InvalidBinFactorError(i32),

    #[error("Box {requested:?} is not contained in image box {image:?}")]
    BoxOutOfBoundsError { requested: Box2I, image: Box2I },

    #[error("Dimension mismatch: source {source_dims:?}, destination {dest_dims:?}")]
    DimensionMismatchError {
        source_dims: Extent2I,
        dest_dims: Extent2I,
    },

    #[error("Unknown detector: {0}")]
    UnknownDetectorError(String),

    #[error("Duplicate detector name: {0}")]
    DuplicateDetectorError(String),

    #[error("Detectors {0} and {1} overlap in the mosaic")]
    OverlappingDetectorsError(String, String),

    #[error("Invalid geometry: {0}")]
    InvalidGeometryError(String),

    #[error("Pixel value {0} cannot be represented by the image pixel type")]
    PixelValueError(f64),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CameraGeomError>;
