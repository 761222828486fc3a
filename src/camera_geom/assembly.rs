//! Image assembly module
//!
//! Amplifier → detector → camera assembly. Amplifier pixels are copied into a
//! detector image with their readout flips undone, detector images are binned,
//! rotated by their quarter-turn orientation, and placed in a camera mosaic at
//! the box computed by the projection functions.

mod amplifier;
mod detector;
mod mosaic;
mod projection;
mod source;
mod synthetic;
pub mod types;

#[cfg(test)]
mod tests;

pub use amplifier::{assemble_amplifier_image, assemble_amplifier_raw_image};
pub use detector::{assemble_ccd_image, calc_raw_ccd_bbox, find_amp, make_image_from_ccd, CcdImageOptions};
pub use mosaic::{make_image_from_camera, CameraLayout, CameraMosaicBuilder};
pub use projection::{
    check_pixel_scale, get_amp_in_ccd_bbox, get_camera_image_bbox, get_ccd_in_cam_bbox,
    get_ccd_in_cam_bbox_list, get_ccd_in_cam_pixel_bbox,
};
pub use source::{AmplifierImageSource, FakeImageDataSource, FakeImageDataSourceBuilder, ImageSource};
pub use synthetic::{
    make_image_from_amp, readout_mark_bbox, AmpFill, AmpImageOptions, GainScaler, ScaledGain,
    DEFAULT_GAIN_SCALER,
};
pub use types::{CameraMosaic, DetectorPlacement, MosaicConfig, MosaicConfigBuilder};
