//! Image module
//!
//! Pixel containers for the assembly pipeline: single-plane [`Image`], the
//! three-plane [`MaskedImage`], the [`PixelPlanes`] capability shared by both,
//! and the binning/rotation operations the detector and camera builders use.

mod bin;
mod planes;
mod rotate;
pub mod types;

pub use bin::{bin_image, bin_image_on_grid, binned_bbox, binned_dimensions};
pub use planes::{region_view, region_view_mut, PixelPlanes};
pub use rotate::rotate_image_by_90;
pub use types::{pixel_from_f64, Image, MaskedImage, Pixel};
