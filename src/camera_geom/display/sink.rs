use tracing::{debug, info};

use crate::camera_geom::common::error::Result;
use crate::camera_geom::display::types::Annotation;
use crate::camera_geom::image::{Image, Pixel};
use crate::camera_geom::wcs::FocalPlaneWcs;

/// One image to show, with everything drawn over it.
#[derive(Debug, Clone, Copy)]
pub struct DisplayRequest<'a, T> {
    pub frame: Option<i32>,
    pub image: &'a Image<T>,
    pub title: &'a str,
    pub wcs: Option<&'a FocalPlaneWcs>,
    pub annotations: &'a [Annotation],
}

/// Receiver of display requests (an image viewer, a file dumper, a test recorder).
pub trait DisplaySink<T> {
    fn display(&mut self, request: DisplayRequest<'_, T>) -> Result<()>;
}

/// Sink that only reports what would be shown through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl<T: Pixel> DisplaySink<T> for LoggingSink {
    fn display(&mut self, request: DisplayRequest<'_, T>) -> Result<()> {
        info!(
            frame = ?request.frame,
            title = request.title,
            width = request.image.width(),
            height = request.image.height(),
            annotations = request.annotations.len(),
            has_wcs = request.wcs.is_some(),
            "Display image"
        );
        for annotation in request.annotations {
            match annotation {
                Annotation::Box(b) => debug!(outline = ?b.outline(), color = ?b.color, "box"),
                Annotation::Label(l) => debug!(text = %l.text, position = ?l.position, angle = l.angle_deg, "label"),
            }
        }
        Ok(())
    }
}
