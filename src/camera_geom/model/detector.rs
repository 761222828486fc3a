//! Detector geometry and focal-plane orientation

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{normalize_quarter_turns, Box2D, Box2I, Extent2D, Point2D};
use crate::camera_geom::model::amplifier::Amplifier;

/// Placement of a detector in the focal plane.
///
/// `reference_point` (detector pixels) maps to `fp_position` (mm); the
/// detector is turned counter-clockwise by `n_quarter` quarter turns about it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Orientation {
    fp_position: Point2D,
    reference_point: Point2D,
    n_quarter: i32,
}

impl Default for Orientation {
    fn default() -> Self {
        Self::new(Point2D::new(0.0, 0.0), Point2D::new(0.0, 0.0), 0)
    }
}

impl Orientation {
    pub fn new(fp_position: Point2D, reference_point: Point2D, n_quarter: i32) -> Self {
        Self {
            fp_position,
            reference_point,
            n_quarter: normalize_quarter_turns(n_quarter),
        }
    }

    pub fn fp_position(&self) -> Point2D {
        self.fp_position
    }

    pub fn reference_point(&self) -> Point2D {
        self.reference_point
    }

    /// Quarter-turn count in 0..=3.
    pub fn n_quarter(&self) -> i32 {
        self.n_quarter
    }

    /// Map a detector pixel position to focal-plane millimeters.
    pub fn pixel_to_focal_plane(&self, pixel: Point2D, pixel_size: Extent2D) -> Point2D {
        let d = (pixel - self.reference_point) * pixel_size;
        let (dx, dy) = match self.n_quarter {
            0 => (d.x, d.y),
            1 => (-d.y, d.x),
            2 => (-d.x, -d.y),
            _ => (d.y, -d.x),
        };
        self.fp_position + Extent2D::new(dx, dy)
    }
}

/// One sensor of the camera.
#[derive(Debug, Clone, PartialEq)]
pub struct Detector {
    name: String,
    bbox: Box2I,
    pixel_size: Extent2D,
    orientation: Orientation,
    amplifiers: Vec<Amplifier>,
}

impl Detector {
    /// Build a detector whose trimmed frame is `bbox`; every amplifier bbox must lie inside it.
    pub fn new(
        name: impl Into<String>,
        bbox: Box2I,
        pixel_size: Extent2D,
        orientation: Orientation,
        amplifiers: Vec<Amplifier>,
    ) -> Result<Self> {
        let name = name.into();
        if bbox.is_empty() {
            let dims = bbox.dimensions();
            return Err(CameraGeomError::InvalidDimensionsError(dims.x as i64, dims.y as i64));
        }
        if !(pixel_size.x > 0.0 && pixel_size.y > 0.0) {
            return Err(CameraGeomError::InvalidGeometryError(format!(
                "detector {name}: pixel size must be positive, got {pixel_size:?}"
            )));
        }
        if let Some(amp) = amplifiers.iter().find(|amp| !bbox.contains(&amp.bbox())) {
            return Err(CameraGeomError::InvalidGeometryError(format!(
                "detector {name}: amplifier {} bbox {:?} lies outside {:?}",
                amp.name(),
                amp.bbox(),
                bbox
            )));
        }
        Ok(Self {
            name,
            bbox,
            pixel_size,
            orientation,
            amplifiers,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Trimmed detector frame.
    pub fn bbox(&self) -> Box2I {
        self.bbox
    }

    /// Physical pixel size in mm.
    pub fn pixel_size(&self) -> Extent2D {
        self.pixel_size
    }

    pub fn orientation(&self) -> &Orientation {
        &self.orientation
    }

    pub fn amplifiers(&self) -> &[Amplifier] {
        &self.amplifiers
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Amplifier> {
        self.amplifiers.iter()
    }

    pub fn amplifier(&self, name: &str) -> Option<&Amplifier> {
        self.amplifiers.iter().find(|amp| amp.name() == name)
    }

    /// Union of the amplifier placement boxes.
    pub fn amplifier_union(&self) -> Box2I {
        self.amplifiers
            .iter()
            .fold(Box2I::empty(), |acc, amp| acc.include_box(&amp.bbox()))
    }

    /// Focal-plane positions (mm) of the outer pixel-edge corners, counter-clockwise from lower-left.
    pub fn corners_focal_plane(&self) -> [Point2D; 4] {
        let edges = self.bbox.to_box2d();
        let (min, max) = (edges.min(), edges.max());
        [
            Point2D::new(min.x, min.y),
            Point2D::new(max.x, min.y),
            Point2D::new(max.x, max.y),
            Point2D::new(min.x, max.y),
        ]
        .map(|corner| self.orientation.pixel_to_focal_plane(corner, self.pixel_size))
    }

    pub fn fp_bbox(&self) -> Box2D {
        self.corners_focal_plane().into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a Detector {
    type Item = &'a Amplifier;
    type IntoIter = std::slice::Iter<'a, Amplifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.amplifiers.iter()
    }
}
