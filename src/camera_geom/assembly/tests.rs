use std::sync::{Arc, Mutex};

use approx::assert_relative_eq;
use ndarray::Array2;

use crate::camera_geom::assembly::{
    make_image_from_camera, make_image_from_ccd, AmpFill, CameraLayout, CameraMosaicBuilder, CcdImageOptions,
    ImageSource, MosaicConfig,
};
use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Extent2D, Extent2I, Point2D, Point2I};
use crate::camera_geom::image::{binned_dimensions, Image};
use crate::camera_geom::model::{Amplifier, Camera, Detector, Orientation, RawAmplifier, ReadoutCorner};

const PIXEL: Extent2D = Extent2D::new(0.125, 0.125);

fn bx(x0: i32, y0: i32, w: i32, h: i32) -> Box2I {
    Box2I::from_min_extent(Point2I::new(x0, y0), Extent2I::new(w, h))
}

/// 2x2 amplifiers of 10x8 pixels; raw frames are 12x10 with the data at (1, 1).
/// Flips are (0,0), (1,0), (0,1), (1,1) so every readout corner lands on an outer corner.
fn quad_amps() -> Vec<Amplifier> {
    (0..4)
        .map(|i| {
            let (col, row) = (i % 2, i / 2);
            let raw = RawAmplifier::new(bx(0, 0, 12, 10), bx(1, 1, 10, 8))
                .unwrap()
                .with_flips(col == 1, row == 1)
                .with_xy_offset(Extent2I::new(12 * col, 10 * row));
            Amplifier::new(format!("A{i}"), bx(10 * col, 8 * row, 10, 8))
                .with_gain(1.0 + i as f64)
                .with_readout_corner(ReadoutCorner::LowerLeft)
                .with_raw(raw)
                .unwrap()
        })
        .collect()
}

fn quad_detector(amps: Vec<Amplifier>) -> Detector {
    Detector::new("Q", bx(0, 0, 20, 16), PIXEL, Orientation::default(), amps).unwrap()
}

fn index_options(is_trimmed: bool) -> CcdImageOptions<'static> {
    CcdImageOptions {
        is_trimmed,
        fill: AmpFill::Index,
        mark_size: 2,
        mark_value: 0.0,
        ..CcdImageOptions::default()
    }
}

#[test]
fn test_four_amp_trimmed_assembly() {
    let det = quad_detector(quad_amps());
    assert_eq!(det.amplifier_union(), det.bbox());

    let image: Image<u16> = make_image_from_ccd(&det, &index_options(true)).unwrap();
    assert_eq!(image.bbox(), bx(0, 0, 20, 16));

    let expect = |x, y, value| assert_eq!(image.get(Point2I::new(x, y)), Some(value), "pixel ({x}, {y})");
    // readout marks land on the outer corners
    expect(0, 0, 0);
    expect(1, 1, 0);
    expect(19, 0, 0);
    expect(18, 1, 0);
    expect(0, 15, 0);
    expect(1, 14, 0);
    expect(19, 15, 0);
    expect(18, 14, 0);
    // amplifier bodies carry their index fill
    expect(2, 2, 1000);
    expect(9, 7, 1000);
    expect(10, 0, 2000);
    expect(17, 2, 2000);
    expect(2, 13, 3000);
    expect(9, 8, 3000);
    expect(17, 13, 4000);
    expect(10, 8, 4000);
}

#[test]
fn test_four_amp_untrimmed_assembly() {
    let det = quad_detector(quad_amps());
    let image: Image<u16> = make_image_from_ccd(&det, &index_options(false)).unwrap();
    assert_eq!(image.bbox(), bx(0, 0, 24, 20));
    // raw layout is not flipped: the mark sits at the data origin of every frame
    assert_eq!(image.get(Point2I::new(1, 1)), Some(0));
    assert_eq!(image.get(Point2I::new(13, 1)), Some(0));
    assert_eq!(image.get(Point2I::new(13, 11)), Some(0));
    // overscan and prescan pixels are part of the raw frame
    assert_eq!(image.get(Point2I::new(0, 0)), Some(1000));
    assert_eq!(image.get(Point2I::new(12, 0)), Some(2000));
    assert_eq!(image.get(Point2I::new(23, 19)), Some(4000));
}

#[test]
fn test_missing_amplifier_leaves_gap() {
    let mut amps = quad_amps();
    amps.truncate(3);
    let det = quad_detector(amps);
    assert_ne!(det.amplifier_union(), det.bbox());

    let image: Image<u16> = make_image_from_ccd(&det, &index_options(true)).unwrap();
    assert_eq!(image.get(Point2I::new(15, 12)), Some(0));
    assert_eq!(image.get(Point2I::new(5, 12)), Some(3000));
}

#[test]
fn test_binned_ccd_image() {
    let det = quad_detector(quad_amps());
    let options = CcdImageOptions {
        mark_size: 0,
        bin_size: 10,
        ..index_options(true)
    };
    let image: Image<f32> = make_image_from_ccd(&det, &options).unwrap();
    assert_eq!(image.dimensions(), Extent2I::new(2, 2));
    // lower-left block spans amp A0 (10x8) and two rows of A2
    assert_relative_eq!(image.get(Point2I::new(0, 0)).unwrap(), 1400.0);
}

/// 16x8 detector with one amplifier whose lower-left pixel edge is at `fp_position` before rotation.
fn strip_detector(name: &str, fp_position: Point2D, n_quarter: i32, pixel_size: Extent2D) -> Detector {
    let raw = RawAmplifier::new(bx(0, 0, 18, 8), bx(0, 0, 16, 8)).unwrap();
    let amp = Amplifier::new("A", bx(0, 0, 16, 8)).with_gain(2.0).with_raw(raw).unwrap();
    let orientation = Orientation::new(fp_position, Point2D::new(-0.5, -0.5), n_quarter);
    Detector::new(name, bx(0, 0, 16, 8), pixel_size, orientation, vec![amp]).unwrap()
}

fn two_detector_camera() -> Camera {
    Camera::new(
        "pair",
        vec![
            strip_detector("D0", Point2D::new(0.0, 0.0), 0, PIXEL),
            strip_detector("D1", Point2D::new(4.0, 0.0), 1, PIXEL),
        ],
    )
    .unwrap()
}

/// Detector images whose pixel value encodes the pixel position: `x + 100 * y`.
#[derive(Default)]
struct PatternSource {
    fail_on: Option<String>,
    extra_width: usize,
    requests: Arc<Mutex<Vec<String>>>,
}

impl ImageSource<i32> for PatternSource {
    fn ccd_image(&self, detector: &Detector, bin_size: i32) -> Result<Image<i32>> {
        self.requests.lock().unwrap().push(detector.name().to_string());
        if self.fail_on.as_deref() == Some(detector.name()) {
            return Err(CameraGeomError::MissingRawDataError("Mock source error".to_string()));
        }
        let dims = binned_dimensions(detector.bbox().dimensions(), bin_size)?;
        let shape = (dims.y as usize, dims.x as usize + self.extra_width);
        let array = Array2::from_shape_fn(shape, |(row, col)| (col + 100 * row) as i32);
        Ok(Image::from_array(Point2I::new(0, 0), array))
    }

    fn amp_image(&self, _detector: &Detector, amp: &Amplifier) -> Result<Image<i32>> {
        Image::new(amp.bbox())
    }
}

fn pair_config() -> MosaicConfig {
    MosaicConfig::builder().buffer_size(2).background(-1.0).build()
}

#[test]
fn test_two_detector_layout() {
    let camera = two_detector_camera();
    let layout = CameraLayout::plan(&camera, &pair_config()).unwrap();
    assert_eq!(layout.camera_bbox(), Box2I::from_corners(Point2I::new(-2, -2), Point2I::new(34, 18)));
    assert_eq!(layout.dimensions(), Extent2I::new(37, 21));
    let boxes: Vec<Box2I> = layout.placements().iter().map(|p| p.bbox).collect();
    assert_eq!(boxes, vec![bx(2, 2, 16, 8), bx(26, 2, 8, 16)]);
    assert!(!boxes[0].overlaps(&boxes[1]));
}

#[test]
fn test_two_detector_mosaic_rotates_second_image() {
    let camera = two_detector_camera();
    let source = PatternSource::default();
    let requests = source.requests.clone();
    let mosaic = make_image_from_camera(&camera, &pair_config(), &source).unwrap();
    let image = mosaic.image();

    assert_eq!(*requests.lock().unwrap(), vec!["D0".to_string(), "D1".to_string()]);
    assert_eq!(image.dimensions(), Extent2I::new(37, 21));
    assert_eq!(image.get(Point2I::new(0, 0)), Some(-1));

    // unrotated detector is copied as is
    assert_eq!(image.get(Point2I::new(2, 2)), Some(0));
    assert_eq!(image.get(Point2I::new(17, 9)), Some(15 + 700));

    // one quarter turn: source (x, y) -> (7 - y, x) inside the 8x16 box at (26, 2)
    assert_eq!(image.get(Point2I::new(33, 2)), Some(0));
    assert_eq!(image.get(Point2I::new(26, 17)), Some(15 + 700));
    assert_eq!(image.get(Point2I::new(26, 2)), Some(700));

    let placement = mosaic.placement("D1").unwrap();
    assert_eq!(placement.n_quarter, 1);
    assert_eq!(placement.bbox.dimensions(), Extent2I::new(8, 16));
}

#[test]
fn test_mosaic_wcs() {
    let camera = two_detector_camera();
    let centered = make_image_from_camera(&camera, &pair_config(), &PatternSource::default()).unwrap();
    assert_eq!(centered.wcs().reference_pixel(), Point2D::new(18.0, 10.0));
    assert_relative_eq!(centered.wcs().pixel_scale(), 0.125);

    let config = MosaicConfig::builder()
        .buffer_size(2)
        .bin_size(2)
        .origin_at_center(false)
        .build();
    let corner = make_image_from_camera(&camera, &config, &PatternSource::default()).unwrap();
    assert_eq!(corner.wcs().reference_pixel(), Point2D::new(0.0, 0.0));
    assert_relative_eq!(corner.wcs().pixel_scale(), 0.25);
}

#[test]
fn test_binned_mosaic_with_synthetic_source() {
    let camera = two_detector_camera();
    let config = MosaicConfig::builder().buffer_size(2).bin_size(2).build();
    let mosaic = CameraMosaicBuilder::new(config).build::<u16>(&camera).unwrap();
    assert_eq!(mosaic.image().dimensions(), Extent2I::new(19, 11));
    assert_eq!(mosaic.placement("D0").unwrap().bbox, bx(1, 1, 8, 4));
    assert_eq!(mosaic.placement("D1").unwrap().bbox, bx(13, 1, 4, 8));
    // gain 2.0 scaled by the default scaler, away from the readout mark
    assert_eq!(mosaic.image().get(Point2I::new(8, 4)), Some(200));
    assert_eq!(mosaic.image().get(Point2I::new(0, 0)), Some(0));
}

#[test]
fn test_selected_detectors_only() {
    let camera = two_detector_camera();
    let config = MosaicConfig::builder().detector_names(["D1"]).buffer_size(0).build();
    let source = PatternSource::default();
    let mosaic = make_image_from_camera(&camera, &config, &source).unwrap();
    // the far focal-plane edge is floored into an extra pixel
    assert_eq!(mosaic.image().dimensions(), Extent2I::new(9, 17));
    assert_eq!(mosaic.placements()[0].bbox, bx(0, 0, 8, 16));
    assert_eq!(*source.requests.lock().unwrap(), vec!["D1".to_string()]);
}

#[test]
fn test_unknown_detector() {
    let camera = two_detector_camera();
    let config = MosaicConfig::builder().detector_names(["D9"]).build();
    let result = make_image_from_camera(&camera, &config, &PatternSource::default());
    assert!(matches!(result, Err(CameraGeomError::UnknownDetectorError(name)) if name == "D9"));
}

#[test]
fn test_inconsistent_pixel_scale() {
    let camera = Camera::new(
        "mixed",
        vec![
            strip_detector("D0", Point2D::new(0.0, 0.0), 0, PIXEL),
            strip_detector("D1", Point2D::new(4.0, 0.0), 0, Extent2D::new(0.25, 0.25)),
        ],
    )
    .unwrap();
    let result = make_image_from_camera(&camera, &MosaicConfig::default(), &PatternSource::default());
    assert!(matches!(result, Err(CameraGeomError::InconsistentPixelScaleError { .. })));
}

#[test]
fn test_overlapping_detectors() {
    let camera = Camera::new(
        "stacked",
        vec![
            strip_detector("D0", Point2D::new(0.0, 0.0), 0, PIXEL),
            strip_detector("D1", Point2D::new(1.0, 0.0), 0, PIXEL),
        ],
    )
    .unwrap();
    let result = make_image_from_camera(&camera, &MosaicConfig::default(), &PatternSource::default());
    assert!(matches!(
        result,
        Err(CameraGeomError::OverlappingDetectorsError(a, b)) if a == "D0" && b == "D1"
    ));

    let lenient = MosaicConfig::builder().check_overlap(false).build();
    let mosaic = make_image_from_camera(&camera, &lenient, &PatternSource::default()).unwrap();
    // later detectors overwrite earlier ones
    let d1 = mosaic.placement("D1").unwrap().bbox;
    assert_eq!(mosaic.image().get(d1.min()), Some(0));
}

#[test]
fn test_source_failure_propagates() {
    let camera = two_detector_camera();
    let source = PatternSource {
        fail_on: Some("D1".to_string()),
        ..PatternSource::default()
    };
    let result = make_image_from_camera(&camera, &pair_config(), &source);
    assert!(matches!(result, Err(CameraGeomError::MissingRawDataError(_))));
}

#[test]
fn test_wrong_image_size() {
    let camera = two_detector_camera();
    let source = PatternSource {
        extra_width: 1,
        ..PatternSource::default()
    };
    let result = make_image_from_camera(&camera, &pair_config(), &source);
    assert!(matches!(result, Err(CameraGeomError::DimensionMismatchError { .. })));
}

#[test]
fn test_invalid_bin_size() {
    let camera = two_detector_camera();
    let config = MosaicConfig::builder().bin_size(0).build();
    let result = make_image_from_camera(&camera, &config, &PatternSource::default());
    assert!(matches!(result, Err(CameraGeomError::InvalidBinFactorError(0))));
}

#[test]
fn test_builder_with_custom_source() {
    let camera = two_detector_camera();
    let mut builder = CameraMosaicBuilder::with_custom(PatternSource::default(), pair_config());
    builder.set_config(MosaicConfig::builder().buffer_size(0).build());
    assert_eq!(builder.config().buffer_size, 0);
    let mosaic = builder.build::<i32>(&camera).unwrap();
    assert_eq!(mosaic.image().dimensions(), Extent2I::new(33, 17));
}

fn abutting_camera(left_mm: f64, right_mm: f64, pixel_size: Extent2D) -> Camera {
    Camera::new(
        "abutting",
        vec![
            strip_detector("D0", Point2D::new(left_mm, 0.0), 0, pixel_size),
            strip_detector("D1", Point2D::new(right_mm, 0.0), 0, pixel_size),
        ],
    )
    .unwrap()
}

#[test]
fn test_abutting_detectors_tile_at_any_bin() {
    let camera = abutting_camera(0.0, 2.0, PIXEL);

    let config = MosaicConfig::builder().buffer_size(0).build();
    let unbinned = make_image_from_camera(&camera, &config, &PatternSource::default()).unwrap();
    assert_eq!(unbinned.placement("D0").unwrap().bbox, bx(0, 0, 16, 8));
    assert_eq!(unbinned.placement("D1").unwrap().bbox, bx(16, 0, 16, 8));

    let config = MosaicConfig::builder().buffer_size(0).bin_size(3).build();
    let source = PatternSource::default();
    let mosaic = make_image_from_camera(&camera, &config, &source).unwrap();
    assert_eq!(mosaic.image().dimensions(), Extent2I::new(11, 3));
    assert_eq!(mosaic.placement("D0").unwrap().bbox, bx(0, 0, 6, 3));
    assert_eq!(mosaic.placement("D1").unwrap().bbox, bx(5, 0, 6, 3));
    assert_eq!(mosaic.placement("D1").unwrap().pixel_bbox, bx(16, 0, 16, 8));
    // each detector is fetched once, at full resolution
    assert_eq!(*source.requests.lock().unwrap(), vec!["D0".to_string(), "D1".to_string()]);

    let image = mosaic.image();
    // full block of D0: columns 0..=2, rows 0..=2
    assert_eq!(image.get(Point2I::new(0, 0)), Some(1 + 100));
    assert_eq!(image.get(Point2I::new(4, 0)), Some(13 + 100));
    // the shared block holds D1's columns 0 and 1 (mean 100.5, truncated)
    assert_eq!(image.get(Point2I::new(5, 0)), Some(100));
    assert_eq!(image.get(Point2I::new(6, 0)), Some(3 + 100));
    // top blocks cover rows 6 and 7 only
    assert_eq!(image.get(Point2I::new(0, 2)), Some(1 + 650));
    assert_eq!(image.get(Point2I::new(10, 0)), Some(114));
}

#[test]
fn test_abutting_detectors_with_decimal_pixel_size() {
    let pixel = Extent2D::new(0.1, 0.1);
    let camera = abutting_camera(-1.3, 0.3, pixel);
    let config = MosaicConfig::builder().buffer_size(0).build();
    let mosaic = make_image_from_camera(&camera, &config, &PatternSource::default()).unwrap();

    assert_eq!(mosaic.image().dimensions(), Extent2I::new(33, 9));
    assert_eq!(mosaic.placement("D0").unwrap().bbox, bx(0, 0, 16, 8));
    assert_eq!(mosaic.placement("D1").unwrap().bbox, bx(16, 0, 16, 8));
    assert_eq!(mosaic.image().get(Point2I::new(15, 7)), Some(15 + 700));
    assert_eq!(mosaic.image().get(Point2I::new(16, 0)), Some(0));
    assert_relative_eq!(mosaic.wcs().pixel_scale(), 0.1);
}
