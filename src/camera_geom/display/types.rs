//! Overlay annotation and display configuration types

use crate::camera_geom::geom::{Box2D, Box2I, Point2D, Point2I};

/// Border width putting a box outline just inside the outer pixel edges
pub const PIXEL_BORDER: f64 = 0.49;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverlayColor {
    Green,
    Red,
    Blue,
    Magenta,
    Yellow,
    Cyan,
    White,
}

/// Outline of a pixel box, drawn in a (possibly binned) image.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxAnnotation {
    /// Box in unbinned pixels, relative to `origin`
    pub bbox: Box2I,
    pub origin: Point2I,
    pub bin_size: i32,
    /// Distance of the outline outside the pixel centers, in unbinned pixels
    pub border_width: f64,
    /// `None` leaves the color to the sink
    pub color: Option<OverlayColor>,
}

impl BoxAnnotation {
    pub fn new(bbox: Box2I, border_width: f64, color: Option<OverlayColor>) -> Self {
        Self {
            bbox,
            origin: Point2I::new(0, 0),
            bin_size: 1,
            border_width,
            color,
        }
    }

    pub fn with_origin(mut self, origin: Point2I) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_bin_size(mut self, bin_size: i32) -> Self {
        self.bin_size = bin_size;
        self
    }

    /// Outline corners in display pixels: shifted by the origin, divided by the bin
    /// size and pushed out by the border width.
    pub fn outline(&self) -> Box2D {
        if self.bbox.is_empty() {
            return Box2D::empty();
        }
        let bin = self.bin_size.max(1) as f64;
        let border = self.border_width / bin;
        let scale = |value: i32, origin: i32| (value + origin) as f64 / bin;
        Box2D::from_corners(
            Point2D::new(
                scale(self.bbox.min_x(), self.origin.x) - border,
                scale(self.bbox.min_y(), self.origin.y) - border,
            ),
            Point2D::new(
                scale(self.bbox.max_x(), self.origin.x) + border,
                scale(self.bbox.max_y(), self.origin.y) + border,
            ),
        )
    }
}

/// Text placed at a display pixel position.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelAnnotation {
    pub text: String,
    pub position: Point2D,
    pub color: Option<OverlayColor>,
    pub size: f64,
    /// Counter-clockwise text angle in degrees
    pub angle_deg: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Annotation {
    Box(BoxAnnotation),
    Label(LabelAnnotation),
}

impl Annotation {
    pub fn as_box(&self) -> Option<&BoxAnnotation> {
        match self {
            Annotation::Box(b) => Some(b),
            Annotation::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&LabelAnnotation> {
        match self {
            Annotation::Label(l) => Some(l),
            Annotation::Box(_) => None,
        }
    }
}

/// Configuration for the show helpers
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayConfig {
    /// Send images to the sink at all; images are built either way
    pub enabled: bool,
    pub frame: Option<i32>,
    /// Attach bounding-box overlays
    pub overlay: bool,
    /// Title override; defaults to the amplifier, detector or camera name
    pub title: Option<String>,
    /// Color of detector outlines in camera displays
    pub color: OverlayColor,
    pub text_size: f64,
    /// Rotate detector displays into camera orientation
    pub in_camera_coords: bool,
    /// Bin factor for detector displays
    pub bin_size: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            frame: None,
            overlay: true,
            title: None,
            color: OverlayColor::Green,
            text_size: 1.25,
            in_camera_coords: false,
            bin_size: 1,
        }
    }
}

impl DisplayConfig {
    pub fn builder() -> DisplayConfigBuilder {
        DisplayConfigBuilder::default()
    }
}

/// Builder for DisplayConfig
#[derive(Debug, Default)]
pub struct DisplayConfigBuilder {
    enabled: Option<bool>,
    frame: Option<Option<i32>>,
    overlay: Option<bool>,
    title: Option<Option<String>>,
    color: Option<OverlayColor>,
    text_size: Option<f64>,
    in_camera_coords: Option<bool>,
    bin_size: Option<i32>,
}

impl DisplayConfigBuilder {
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = Some(enabled);
        self
    }

    pub fn frame(mut self, frame: Option<i32>) -> Self {
        self.frame = Some(frame);
        self
    }

    pub fn overlay(mut self, overlay: bool) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Some(title.into()));
        self
    }

    pub fn color(mut self, color: OverlayColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn text_size(mut self, size: f64) -> Self {
        self.text_size = Some(size);
        self
    }

    pub fn in_camera_coords(mut self, in_camera: bool) -> Self {
        self.in_camera_coords = Some(in_camera);
        self
    }

    pub fn bin_size(mut self, bin_size: i32) -> Self {
        self.bin_size = Some(bin_size);
        self
    }

    pub fn build(self) -> DisplayConfig {
        let default = DisplayConfig::default();
        DisplayConfig {
            enabled: self.enabled.unwrap_or(default.enabled),
            frame: self.frame.unwrap_or(default.frame),
            overlay: self.overlay.unwrap_or(default.overlay),
            title: self.title.unwrap_or(default.title),
            color: self.color.unwrap_or(default.color),
            text_size: self.text_size.unwrap_or(default.text_size),
            in_camera_coords: self.in_camera_coords.unwrap_or(default.in_camera_coords),
            bin_size: self.bin_size.unwrap_or(default.bin_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_geom::geom::Extent2I;

    #[test]
    fn test_outline_pushes_out_by_border() {
        let bbox = Box2I::from_min_extent(Point2I::new(0, 0), Extent2I::new(4, 2));
        let outline = BoxAnnotation::new(bbox, 0.5, None).outline();
        assert_eq!(outline.min(), Point2D::new(-0.5, -0.5));
        assert_eq!(outline.max(), Point2D::new(3.5, 1.5));
    }

    #[test]
    fn test_outline_with_origin_and_bin() {
        let bbox = Box2I::from_min_extent(Point2I::new(2, 0), Extent2I::new(8, 4));
        let outline = BoxAnnotation::new(bbox, 1.0, Some(OverlayColor::Red))
            .with_origin(Point2I::new(2, 4))
            .with_bin_size(2)
            .outline();
        assert_eq!(outline.min(), Point2D::new(1.5, 1.5));
        assert_eq!(outline.max(), Point2D::new(6.0, 4.0));
    }

    #[test]
    fn test_display_config_builder() {
        let config = DisplayConfig::builder().build();
        assert_eq!(config, DisplayConfig::default());

        let config = DisplayConfig::builder()
            .enabled(false)
            .frame(Some(3))
            .overlay(false)
            .title("focal plane")
            .color(OverlayColor::Cyan)
            .text_size(2.0)
            .in_camera_coords(true)
            .bin_size(4)
            .build();
        assert!(!config.enabled);
        assert_eq!(config.frame, Some(3));
        assert_eq!(config.title.as_deref(), Some("focal plane"));
        assert_eq!(config.color, OverlayColor::Cyan);
        assert!(config.in_camera_coords);
        assert_eq!(config.bin_size, 4);
    }
}
