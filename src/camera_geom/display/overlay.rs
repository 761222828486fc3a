//! Bounding-box overlays for amplifier, detector and camera displays.

use crate::camera_geom::assembly::types::DetectorPlacement;
use crate::camera_geom::assembly::get_amp_in_ccd_bbox;
use crate::camera_geom::common::error::Result;
use crate::camera_geom::display::types::{Annotation, BoxAnnotation, LabelAnnotation, OverlayColor, PIXEL_BORDER};
use crate::camera_geom::geom::{rotate_bbox_by_90, Box2I, Extent2I, Point2D, Point2I};
use crate::camera_geom::model::{Amplifier, Detector};

/// Boxes for a single amplifier image of `image_dims`.
///
/// An untrimmed image (same size as the raw bbox) gets the raw frame and its
/// overscan, data and prescan regions; anything else gets the amplifier bbox.
/// Boxes are relative to the first box's minimum.
pub fn overlay_amp_boxes(amp: &Amplifier, image_dims: Extent2I) -> Vec<Annotation> {
    let boxes: Vec<(Box2I, Option<OverlayColor>)> = match amp.raw() {
        Ok(raw) if raw.raw_bbox().dimensions() == image_dims => vec![
            (raw.raw_bbox(), Some(OverlayColor::Green)),
            (raw.raw_horizontal_overscan_bbox(), Some(OverlayColor::Red)),
            (raw.raw_data_bbox(), Some(OverlayColor::Blue)),
            (raw.raw_prescan_bbox(), Some(OverlayColor::Yellow)),
            (raw.raw_vertical_overscan_bbox(), Some(OverlayColor::Magenta)),
        ],
        _ => vec![(amp.bbox(), None)],
    };
    let xy0 = boxes[0].0.min().to_extent();
    boxes
        .into_iter()
        .filter(|(bbox, _)| !bbox.is_empty())
        .map(|(bbox, color)| Annotation::Box(BoxAnnotation::new(bbox.shifted(-xy0), PIXEL_BORDER, color)))
        .collect()
}

/// Boxes and labels for a detector image.
///
/// `ccd_bbox` is the unbinned detector frame the image was built on (trimmed
/// or raw), `n_quarter` the rotation applied to the image and `origin` the
/// detector position in a larger pixel grid. Untrimmed images also get each
/// amplifier's raw regions, colored by kind and moved into raw layout.
pub fn overlay_ccd_boxes(
    ccd: &Detector,
    ccd_bbox: Box2I,
    n_quarter: i32,
    is_trimmed: bool,
    origin: Point2I,
    bin_size: i32,
) -> Result<Vec<Annotation>> {
    let ccd_dims = ccd_bbox.dimensions();
    let place = |bbox: Box2I, color| {
        Annotation::Box(
            BoxAnnotation::new(bbox, PIXEL_BORDER, color)
                .with_origin(origin)
                .with_bin_size(bin_size),
        )
    };
    let bin = bin_size.max(1) as f64;

    let mut annotations = Vec::new();
    for amp in ccd {
        let amp_bbox = get_amp_in_ccd_bbox(amp, ccd_dims, n_quarter, is_trimmed)?;
        annotations.push(place(amp_bbox, None));

        if !is_trimmed {
            if let Ok(raw) = amp.raw() {
                let raw_dims = raw.raw_bbox().dimensions();
                let regions = [
                    (raw.raw_horizontal_overscan_bbox(), OverlayColor::Red),
                    (raw.raw_data_bbox(), OverlayColor::Blue),
                    (raw.raw_vertical_overscan_bbox(), OverlayColor::Magenta),
                    (raw.raw_prescan_bbox(), OverlayColor::Yellow),
                ];
                for (mut bbox, color) in regions {
                    if bbox.is_empty() {
                        continue;
                    }
                    if raw.flip_x() {
                        bbox = bbox.flipped_lr(raw_dims.x);
                    }
                    if raw.flip_y() {
                        bbox = bbox.flipped_tb(raw_dims.y);
                    }
                    bbox = rotate_bbox_by_90(bbox.shifted(raw.raw_xy_offset()), n_quarter, ccd_dims);
                    annotations.push(place(bbox, Some(color)));
                }
            }
        }

        // Labelled at the center of the placed box; the text itself turns with the detector.
        let center = Point2I::new(
            (amp_bbox.min_x() + amp_bbox.max_x()).div_euclid(2) + origin.x,
            (amp_bbox.min_y() + amp_bbox.max_y()).div_euclid(2) + origin.y,
        );
        annotations.push(Annotation::Label(LabelAnnotation {
            text: amp.name().to_string(),
            position: Point2D::new(center.x as f64 / bin, center.y as f64 / bin),
            color: None,
            size: 1.0,
            angle_deg: f64::from(n_quarter * 90),
        }));
    }

    let outline = rotate_bbox_by_90(ccd_bbox, n_quarter, ccd_dims);
    annotations.push(place(outline, Some(OverlayColor::Magenta)));
    Ok(annotations)
}

/// Detector outlines and name labels for a camera mosaic.
pub fn overlay_camera_boxes(placements: &[DetectorPlacement], color: OverlayColor, text_size: f64) -> Vec<Annotation> {
    placements
        .iter()
        .flat_map(|placement| {
            let half = placement.bbox.dimensions() / 2;
            let outline = BoxAnnotation::new(placement.bbox, 0.5, Some(color));
            let label = LabelAnnotation {
                text: placement.name.clone(),
                position: Point2D::new(
                    (placement.bbox.min_x() + half.x) as f64,
                    (placement.bbox.min_y() + half.y) as f64,
                ),
                color: Some(color),
                size: text_size,
                angle_deg: f64::from(placement.n_quarter * 90),
            };
            [Annotation::Box(outline), Annotation::Label(label)]
        })
        .collect()
}
