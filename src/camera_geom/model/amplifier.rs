//! Amplifier geometry

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Extent2I, Point2I};

/// Corner of the amplifier data region where readout starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadoutCorner {
    LowerLeft = 0,
    LowerRight = 1,
    UpperRight = 2,
    UpperLeft = 3,
}

impl ReadoutCorner {
    pub fn index(self) -> i32 {
        self as i32
    }

    /// Pixel of `bbox` at this corner.
    pub fn corner_of(self, bbox: &Box2I) -> Point2I {
        match self {
            ReadoutCorner::LowerLeft => bbox.min(),
            ReadoutCorner::LowerRight => Point2I::new(bbox.max_x(), bbox.min_y()),
            ReadoutCorner::UpperRight => bbox.max(),
            ReadoutCorner::UpperLeft => Point2I::new(bbox.min_x(), bbox.max_y()),
        }
    }

    /// Unit step pointing from the corner into the box.
    pub fn inward(self) -> Extent2I {
        match self {
            ReadoutCorner::LowerLeft => Extent2I::new(1, 1),
            ReadoutCorner::LowerRight => Extent2I::new(-1, 1),
            ReadoutCorner::UpperRight => Extent2I::new(-1, -1),
            ReadoutCorner::UpperLeft => Extent2I::new(1, -1),
        }
    }
}

impl TryFrom<i32> for ReadoutCorner {
    type Error = CameraGeomError;

    fn try_from(value: i32) -> Result<Self> {
        match value {
            0 => Ok(ReadoutCorner::LowerLeft),
            1 => Ok(ReadoutCorner::LowerRight),
            2 => Ok(ReadoutCorner::UpperRight),
            3 => Ok(ReadoutCorner::UpperLeft),
            other => Err(CameraGeomError::InvalidReadoutCornerError(other)),
        }
    }
}

/// Raw (untrimmed) layout of one amplifier segment.
///
/// All boxes are in the amplifier's own raw frame. `raw_xy_offset` places the
/// raw frame inside the untrimmed detector image.
#[derive(Debug, Clone, PartialEq)]
pub struct RawAmplifier {
    raw_bbox: Box2I,
    raw_data_bbox: Box2I,
    raw_horizontal_overscan_bbox: Box2I,
    raw_vertical_overscan_bbox: Box2I,
    raw_prescan_bbox: Box2I,
    flip_x: bool,
    flip_y: bool,
    raw_xy_offset: Extent2I,
}

fn check_inside(raw_bbox: &Box2I, bbox: &Box2I, what: &str) -> Result<()> {
    if !raw_bbox.contains(bbox) {
        return Err(CameraGeomError::InvalidGeometryError(format!(
            "{what} {bbox:?} lies outside raw bbox {raw_bbox:?}"
        )));
    }
    Ok(())
}

impl RawAmplifier {
    pub fn new(raw_bbox: Box2I, raw_data_bbox: Box2I) -> Result<Self> {
        if raw_data_bbox.is_empty() {
            return Err(CameraGeomError::InvalidGeometryError(
                "raw data bbox is empty".to_string(),
            ));
        }
        check_inside(&raw_bbox, &raw_data_bbox, "raw data bbox")?;
        Ok(Self {
            raw_bbox,
            raw_data_bbox,
            raw_horizontal_overscan_bbox: Box2I::empty(),
            raw_vertical_overscan_bbox: Box2I::empty(),
            raw_prescan_bbox: Box2I::empty(),
            flip_x: false,
            flip_y: false,
            raw_xy_offset: Extent2I::new(0, 0),
        })
    }

    pub fn with_flips(mut self, flip_x: bool, flip_y: bool) -> Self {
        self.flip_x = flip_x;
        self.flip_y = flip_y;
        self
    }

    pub fn with_xy_offset(mut self, offset: Extent2I) -> Self {
        self.raw_xy_offset = offset;
        self
    }

    pub fn with_overscan(mut self, horizontal: Box2I, vertical: Box2I, prescan: Box2I) -> Result<Self> {
        check_inside(&self.raw_bbox, &horizontal, "horizontal overscan bbox")?;
        check_inside(&self.raw_bbox, &vertical, "vertical overscan bbox")?;
        check_inside(&self.raw_bbox, &prescan, "prescan bbox")?;
        self.raw_horizontal_overscan_bbox = horizontal;
        self.raw_vertical_overscan_bbox = vertical;
        self.raw_prescan_bbox = prescan;
        Ok(self)
    }

    pub fn raw_bbox(&self) -> Box2I {
        self.raw_bbox
    }

    pub fn raw_data_bbox(&self) -> Box2I {
        self.raw_data_bbox
    }

    pub fn raw_horizontal_overscan_bbox(&self) -> Box2I {
        self.raw_horizontal_overscan_bbox
    }

    pub fn raw_vertical_overscan_bbox(&self) -> Box2I {
        self.raw_vertical_overscan_bbox
    }

    pub fn raw_prescan_bbox(&self) -> Box2I {
        self.raw_prescan_bbox
    }

    pub fn flip_x(&self) -> bool {
        self.flip_x
    }

    pub fn flip_y(&self) -> bool {
        self.flip_y
    }

    pub fn raw_xy_offset(&self) -> Extent2I {
        self.raw_xy_offset
    }

    /// Raw bbox placed in the untrimmed detector frame.
    pub fn placed_raw_bbox(&self) -> Box2I {
        self.raw_bbox.shifted(self.raw_xy_offset)
    }
}

/// One readout segment of a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Amplifier {
    name: String,
    bbox: Box2I,
    gain: f64,
    readout_corner: ReadoutCorner,
    raw: Option<RawAmplifier>,
}

impl Amplifier {
    /// Amplifier occupying `bbox` of the trimmed detector, with unit gain and no raw data.
    pub fn new(name: impl Into<String>, bbox: Box2I) -> Self {
        Self {
            name: name.into(),
            bbox,
            gain: 1.0,
            readout_corner: ReadoutCorner::LowerLeft,
            raw: None,
        }
    }

    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    pub fn with_readout_corner(mut self, readout_corner: ReadoutCorner) -> Self {
        self.readout_corner = readout_corner;
        self
    }

    /// Attach raw layout; its data region must have the same dimensions as `bbox`.
    pub fn with_raw(mut self, raw: RawAmplifier) -> Result<Self> {
        if raw.raw_data_bbox.dimensions() != self.bbox.dimensions() {
            return Err(CameraGeomError::InvalidGeometryError(format!(
                "amplifier {}: raw data bbox {:?} does not match bbox {:?}",
                self.name, raw.raw_data_bbox, self.bbox
            )));
        }
        self.raw = Some(raw);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bbox(&self) -> Box2I {
        self.bbox
    }

    pub fn gain(&self) -> f64 {
        self.gain
    }

    pub fn readout_corner(&self) -> ReadoutCorner {
        self.readout_corner
    }

    pub fn has_raw_info(&self) -> bool {
        self.raw.is_some()
    }

    /// Raw layout, or `MissingRawDataError` when the amplifier has none.
    pub fn raw(&self) -> Result<&RawAmplifier> {
        self.raw.as_ref().ok_or_else(|| {
            CameraGeomError::MissingRawDataError(format!(
                "amplifier {} has no raw amplifier data",
                self.name
            ))
        })
    }
}
