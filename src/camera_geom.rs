//! Camera geometry pipeline module
//!
//! Assembles amplifier readouts into detector images and detector images into
//! camera mosaics, with the focal-plane WCS and overlays needed to inspect them.

pub mod assembly;
pub mod common;
pub mod display;
pub mod geom;
pub mod image;
pub mod model;
pub mod tiff;
pub mod wcs;

pub use common::{CameraGeomError, Result};

pub use geom::{Box2D, Box2I, Extent2D, Extent2I, Point2D, Point2I};

pub use image::{bin_image, bin_image_on_grid, binned_bbox, rotate_image_by_90, Image, MaskedImage, Pixel, PixelPlanes};

pub use model::{Amplifier, Camera, Detector, Orientation, RawAmplifier, ReadoutCorner};

pub use assembly::{
    assemble_amplifier_image, assemble_amplifier_raw_image, assemble_ccd_image, calc_raw_ccd_bbox, find_amp,
    get_camera_image_bbox, get_ccd_in_cam_bbox, get_ccd_in_cam_bbox_list, get_ccd_in_cam_pixel_bbox,
    make_image_from_amp, make_image_from_camera, make_image_from_ccd, AmplifierImageSource, CameraLayout,
    CameraMosaic, CameraMosaicBuilder, FakeImageDataSource, ImageSource, MosaicConfig, MosaicConfigBuilder,
};

pub use wcs::{make_focal_plane_wcs, prepare_wcs_data, FocalPlaneWcs};

pub use display::{show_amp, show_camera, show_ccd, show_mosaic, DisplayConfig, DisplaySink, LoggingSink};

pub use self::tiff::{write_tiff_file, MosaicWriter, StandardTiffWriter, TiffCompression, TiffConfig};
