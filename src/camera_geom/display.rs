//! Display module
//!
//! Builds images for inspection and describes their overlays (bounding boxes
//! and labels) as plain annotations. Rendering is left to a [`DisplaySink`].

mod overlay;
mod show;
mod sink;
pub mod types;

pub use overlay::{overlay_amp_boxes, overlay_camera_boxes, overlay_ccd_boxes};
pub use show::{show_amp, show_camera, show_ccd, show_mosaic};
pub use sink::{DisplayRequest, DisplaySink, LoggingSink};
pub use types::{Annotation, BoxAnnotation, DisplayConfig, DisplayConfigBuilder, LabelAnnotation, OverlayColor};
