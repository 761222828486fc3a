//! Camera description module
//!
//! Plain value types describing amplifiers, detectors and cameras. The assembly
//! code only reads them; nothing here allocates pixels.

mod amplifier;
mod camera;
mod detector;
mod grid;

pub use amplifier::{Amplifier, RawAmplifier, ReadoutCorner};
pub use camera::Camera;
pub use detector::{Detector, Orientation};
pub use grid::{make_grid_camera, GridCameraSpec};
