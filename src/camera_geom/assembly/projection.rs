//! Placement of detector and amplifier boxes in binned camera pixels.

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{rotate_bbox_by_90, Box2D, Box2I, Extent2D, Extent2I, Point2I};
use crate::camera_geom::image::binned_bbox;
use crate::camera_geom::model::{Amplifier, Detector};

/// Common pixel size of `detectors`, taken from the first one.
///
/// # Errors
///
/// `InconsistentPixelScaleError` naming the first detector that disagrees,
/// `InvalidGeometryError` when there are no detectors.
pub fn check_pixel_scale<'a, I>(detectors: I) -> Result<Extent2D>
where
    I: IntoIterator<Item = &'a Detector>,
{
    let mut detectors = detectors.into_iter();
    let first = detectors
        .next()
        .ok_or_else(|| CameraGeomError::InvalidGeometryError("no detectors to place".to_string()))?;
    let expected = first.pixel_size();
    for detector in detectors {
        ensure_pixel_size(detector, expected)?;
    }
    Ok(expected)
}

fn ensure_pixel_size(detector: &Detector, expected: Extent2D) -> Result<()> {
    if detector.pixel_size() != expected {
        return Err(CameraGeomError::InconsistentPixelScaleError {
            detector: detector.name().to_string(),
            expected,
            found: detector.pixel_size(),
        });
    }
    Ok(())
}

/// Quotients this close to an integer are taken as that integer before flooring.
const PIXEL_EDGE_TOLERANCE: f64 = 1e-9;

fn floor_to_pixel(mm: f64, pixel_size: f64) -> i32 {
    let q = mm / pixel_size;
    let nearest = q.round();
    if (q - nearest).abs() < PIXEL_EDGE_TOLERANCE {
        nearest as i32
    } else {
        q.floor() as i32
    }
}

/// Pixel index (floor) of a focal-plane position. Positions on a pixel edge
/// up to rounding noise land on that edge's pixel.
fn fp_to_pixel(x: f64, y: f64, pixel_size: Extent2D) -> Point2I {
    Point2I::new(floor_to_pixel(x, pixel_size.x), floor_to_pixel(y, pixel_size.y))
}

/// Unbinned camera pixel box covering `fp_bbox` (mm), grown by `buffer` pixels on every side.
pub fn get_camera_image_bbox(fp_bbox: &Box2D, pixel_size: Extent2D, buffer: i32) -> Result<Box2I> {
    if fp_bbox.is_empty() {
        return Err(CameraGeomError::InvalidGeometryError(
            "empty focal-plane bounding box".to_string(),
        ));
    }
    if pixel_size.x <= 0.0 || pixel_size.y <= 0.0 {
        return Err(CameraGeomError::InvalidGeometryError(format!(
            "non-positive pixel size {pixel_size:?}"
        )));
    }
    let min = fp_to_pixel(fp_bbox.min().x, fp_bbox.min().y, pixel_size);
    let max = fp_to_pixel(fp_bbox.max().x, fp_bbox.max().y, pixel_size);
    Ok(Box2I::from_corners(min, max).grown(buffer))
}

/// Unbinned box of the rotated detector image in a camera grid whose minimum pixel is `origin`.
///
/// # Errors
///
/// `InconsistentPixelScaleError` when the detector pixel size is not `pixel_size`.
pub fn get_ccd_in_cam_pixel_bbox(ccd: &Detector, pixel_size: Extent2D, origin: Point2I) -> Result<Box2I> {
    ensure_pixel_size(ccd, pixel_size)?;
    let dims = ccd.bbox().dimensions();
    let llc = ccd.fp_bbox().min();
    let offset = fp_to_pixel(llc.x, llc.y, pixel_size) - origin;

    let bbox = Box2I::from_min_extent(Point2I::new(0, 0), dims);
    Ok(rotate_bbox_by_90(bbox, ccd.orientation().n_quarter(), dims).shifted(offset))
}

/// Box of the (rotated, binned) detector image in a camera grid whose unbinned minimum pixel is `origin`.
///
/// The binned box holds every block the unbinned box touches, with blocks
/// counted from `origin`. Detectors that abut on a block boundary tile the
/// binned grid; an edge inside a block puts that block in both boxes.
///
/// # Errors
///
/// `InconsistentPixelScaleError` when the detector pixel size is not `pixel_size`,
/// `InvalidBinFactorError` for a non-positive bin.
pub fn get_ccd_in_cam_bbox(ccd: &Detector, bin_size: i32, pixel_size: Extent2D, origin: Point2I) -> Result<Box2I> {
    if bin_size <= 0 {
        return Err(CameraGeomError::InvalidBinFactorError(bin_size));
    }
    binned_bbox(get_ccd_in_cam_pixel_bbox(ccd, pixel_size, origin)?, bin_size)
}

/// [`get_ccd_in_cam_bbox`] for each detector, in order.
pub fn get_ccd_in_cam_bbox_list(
    ccds: &[&Detector],
    bin_size: i32,
    pixel_size: Extent2D,
    origin: Point2I,
) -> Result<Vec<Box2I>> {
    ccds.iter()
        .map(|ccd| get_ccd_in_cam_bbox(ccd, bin_size, pixel_size, origin))
        .collect()
}

/// Amplifier box inside a detector image of `ccd_dims` turned by `n_quarter`.
///
/// Trimmed images use the amplifier bbox; untrimmed images use the raw bbox
/// shifted by the raw XY offset (`MissingRawDataError` without raw data).
pub fn get_amp_in_ccd_bbox(amp: &Amplifier, ccd_dims: Extent2I, n_quarter: i32, is_trimmed: bool) -> Result<Box2I> {
    let bbox = if is_trimmed {
        amp.bbox()
    } else {
        amp.raw()?.placed_raw_bbox()
    };
    Ok(rotate_bbox_by_90(bbox, n_quarter, ccd_dims))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_geom::geom::Point2D;
    use crate::camera_geom::model::{Orientation, RawAmplifier};

    const PIXEL: Extent2D = Extent2D::new(0.125, 0.125);

    fn bx(x0: i32, y0: i32, w: i32, h: i32) -> Box2I {
        Box2I::from_min_extent(Point2I::new(x0, y0), Extent2I::new(w, h))
    }

    /// 16x8 detector whose lower-left pixel edge sits at `llc` (mm) before rotation.
    fn detector(name: &str, fp_position: Point2D, n_quarter: i32) -> Detector {
        let orientation = Orientation::new(fp_position, Point2D::new(-0.5, -0.5), n_quarter);
        let amp = Amplifier::new("A", bx(0, 0, 16, 8));
        Detector::new(name, bx(0, 0, 16, 8), PIXEL, orientation, vec![amp]).unwrap()
    }

    #[test]
    fn test_camera_image_bbox_floors_and_grows() {
        let fp = Box2D::from_corners(Point2D::new(-1.0, -0.5), Point2D::new(1.0, 0.4375));
        let bbox = get_camera_image_bbox(&fp, PIXEL, 2).unwrap();
        assert_eq!(bbox.min(), Point2I::new(-10, -6));
        assert_eq!(bbox.max(), Point2I::new(10, 5));
    }

    #[test]
    fn test_camera_image_bbox_rejects_empty() {
        assert!(matches!(
            get_camera_image_bbox(&Box2D::empty(), PIXEL, 0),
            Err(CameraGeomError::InvalidGeometryError(_))
        ));
    }

    #[test]
    fn test_unrotated_detector_box() {
        let ccd = detector("D0", Point2D::new(1.0, 0.5), 0);
        let bbox = get_ccd_in_cam_bbox(&ccd, 1, PIXEL, Point2I::new(0, 0)).unwrap();
        assert_eq!(bbox, bx(8, 4, 16, 8));
        let shifted = get_ccd_in_cam_bbox(&ccd, 1, PIXEL, Point2I::new(-2, 3)).unwrap();
        assert_eq!(shifted, bx(10, 1, 16, 8));
    }

    #[test]
    fn test_rotated_detector_box_swaps_dimensions() {
        // one quarter turn about the lower-left edge puts the detector to the left of it
        let ccd = detector("D1", Point2D::new(0.0, 0.0), 1);
        let bbox = get_ccd_in_cam_bbox(&ccd, 1, PIXEL, Point2I::new(0, 0)).unwrap();
        assert_eq!(bbox, bx(-8, 0, 8, 16));
    }

    #[test]
    fn test_binned_detector_box() {
        let ccd = detector("D0", Point2D::new(1.0, 0.5), 0);
        let bbox = get_ccd_in_cam_bbox(&ccd, 3, PIXEL, Point2I::new(-4, -4)).unwrap();
        // unbinned box spans x 12..=27 and y 8..=15 from the origin
        assert_eq!(bbox, bx(4, 2, 6, 4));
        assert_eq!(
            get_ccd_in_cam_pixel_bbox(&ccd, PIXEL, Point2I::new(-4, -4)).unwrap(),
            bx(12, 8, 16, 8)
        );
    }

    #[test]
    fn test_abutting_detectors_share_only_the_edge_block() {
        let left = detector("D0", Point2D::new(0.0, 0.0), 0);
        let right = detector("D1", Point2D::new(2.0, 0.0), 0);
        let origin = Point2I::new(0, 0);
        let a = get_ccd_in_cam_pixel_bbox(&left, PIXEL, origin).unwrap();
        let b = get_ccd_in_cam_pixel_bbox(&right, PIXEL, origin).unwrap();
        assert_eq!((a, b), (bx(0, 0, 16, 8), bx(16, 0, 16, 8)));
        assert!(!a.overlaps(&b));

        // pixels 15 and 16 share block 5 at bin 3; at bin 4 the edge is a block boundary
        assert_eq!(get_ccd_in_cam_bbox(&left, 3, PIXEL, origin).unwrap(), bx(0, 0, 6, 3));
        assert_eq!(get_ccd_in_cam_bbox(&right, 3, PIXEL, origin).unwrap(), bx(5, 0, 6, 3));
        assert_eq!(get_ccd_in_cam_bbox(&left, 4, PIXEL, origin).unwrap(), bx(0, 0, 4, 2));
        assert_eq!(get_ccd_in_cam_bbox(&right, 4, PIXEL, origin).unwrap(), bx(4, 0, 4, 2));
    }

    #[test]
    fn test_pixel_edges_survive_decimal_pixel_sizes() {
        let pixel = Extent2D::new(0.1, 0.1);
        assert_eq!(0.3_f64 / 0.1, 2.9999999999999996);
        assert_eq!(fp_to_pixel(0.3, -1.3, pixel), Point2I::new(3, -13));
        assert_eq!(fp_to_pixel(0.35, -0.05, pixel), Point2I::new(3, -1));

        let orientation = |x| Orientation::new(Point2D::new(x, 0.0), Point2D::new(-0.5, -0.5), 0);
        let amp = || vec![Amplifier::new("A", bx(0, 0, 16, 8))];
        let left = Detector::new("D0", bx(0, 0, 16, 8), pixel, orientation(-1.3), amp()).unwrap();
        let right = Detector::new("D1", bx(0, 0, 16, 8), pixel, orientation(0.3), amp()).unwrap();
        let origin = Point2I::new(-13, 0);
        let a = get_ccd_in_cam_pixel_bbox(&left, pixel, origin).unwrap();
        let b = get_ccd_in_cam_pixel_bbox(&right, pixel, origin).unwrap();
        assert_eq!((a, b), (bx(0, 0, 16, 8), bx(16, 0, 16, 8)));

        let fp = Box2D::from_corners(Point2D::new(-1.3, 0.0), Point2D::new(1.9, 0.8));
        assert_eq!(
            get_camera_image_bbox(&fp, pixel, 0).unwrap(),
            Box2I::from_corners(Point2I::new(-13, 0), Point2I::new(19, 8))
        );
    }

    #[test]
    fn test_inconsistent_pixel_scale() {
        let a = detector("A", Point2D::new(0.0, 0.0), 0);
        let amp = Amplifier::new("A", bx(0, 0, 16, 8));
        let b = Detector::new(
            "B",
            bx(0, 0, 16, 8),
            Extent2D::new(0.25, 0.25),
            Orientation::default(),
            vec![amp],
        )
        .unwrap();
        assert_eq!(check_pixel_scale([&a]).unwrap(), PIXEL);
        let err = check_pixel_scale([&a, &b]).unwrap_err();
        assert!(matches!(
            err,
            CameraGeomError::InconsistentPixelScaleError { ref detector, .. } if detector == "B"
        ));
        assert!(get_ccd_in_cam_bbox_list(&[&a, &b], 1, PIXEL, Point2I::new(0, 0)).is_err());
        assert!(check_pixel_scale(std::iter::empty::<&Detector>()).is_err());
    }

    #[test]
    fn test_amp_in_rotated_ccd() {
        let raw = RawAmplifier::new(bx(0, 0, 10, 8), bx(2, 0, 8, 8))
            .unwrap()
            .with_xy_offset(Extent2I::new(10, 0));
        let amp = Amplifier::new("A1", bx(8, 0, 8, 8)).with_raw(raw).unwrap();
        let dims = Extent2I::new(16, 8);
        assert_eq!(get_amp_in_ccd_bbox(&amp, dims, 0, true).unwrap(), bx(8, 0, 8, 8));
        // (x, y) -> (H - 1 - y, x) with H = 8
        assert_eq!(get_amp_in_ccd_bbox(&amp, dims, 1, true).unwrap(), bx(0, 8, 8, 8));
        assert_eq!(get_amp_in_ccd_bbox(&amp, Extent2I::new(20, 8), 0, false).unwrap(), bx(10, 0, 10, 8));
        let bare = Amplifier::new("bare", bx(0, 0, 8, 8));
        assert!(get_amp_in_ccd_bbox(&bare, dims, 0, false).is_err());
    }
}
