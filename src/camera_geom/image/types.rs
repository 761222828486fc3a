//! Image container types

use std::fmt::Debug;

use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use num_traits::NumCast;

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::geom::{Box2I, Extent2I, Point2I};
use crate::camera_geom::image::planes::{region_view, region_view_mut, PixelPlanes};

/// Pixel types the pipeline can hold (u16, i32, f32, f64, ...).
pub trait Pixel: Copy + Default + NumCast + PartialEq + Debug + 'static {}

impl<T> Pixel for T where T: Copy + Default + NumCast + PartialEq + Debug + 'static {}

/// Convert a computed value to the pixel type, failing if it does not fit.
pub fn pixel_from_f64<T: Pixel>(value: f64) -> Result<T> {
    <T as NumCast>::from(value).ok_or(CameraGeomError::PixelValueError(value))
}

/// Single-plane image.
///
/// Pixels live in an `Array2` indexed `[row, column]` where row 0 is the
/// minimum y. `xy0` is the parent-frame position of pixel `[0, 0]`; all
/// box-based accessors take parent-frame boxes.
#[derive(Debug, Clone, PartialEq)]
pub struct Image<T> {
    xy0: Point2I,
    array: Array2<T>,
}

fn shape_for(bbox: &Box2I) -> Result<(usize, usize)> {
    if bbox.is_empty() {
        let dims = bbox.dimensions();
        return Err(CameraGeomError::InvalidDimensionsError(dims.x as i64, dims.y as i64));
    }
    Ok((bbox.height() as usize, bbox.width() as usize))
}

impl<T: Pixel> Image<T> {
    /// Image covering `bbox`, filled with the pixel type's default (zero).
    pub fn new(bbox: Box2I) -> Result<Self> {
        Self::filled(bbox, T::default())
    }

    pub fn filled(bbox: Box2I, value: T) -> Result<Self> {
        let shape = shape_for(&bbox)?;
        Ok(Self {
            xy0: bbox.min(),
            array: Array2::from_elem(shape, value),
        })
    }

    /// Image of the given dimensions with its origin at (0, 0).
    pub fn from_dimensions(dimensions: Extent2I) -> Result<Self> {
        Self::new(Box2I::from_min_extent(Point2I::new(0, 0), dimensions))
    }

    pub fn from_array(xy0: Point2I, array: Array2<T>) -> Self {
        Self { xy0, array }
    }

    pub fn xy0(&self) -> Point2I {
        self.xy0
    }

    pub fn set_xy0(&mut self, xy0: Point2I) {
        self.xy0 = xy0;
    }

    pub fn width(&self) -> i32 {
        self.array.ncols() as i32
    }

    pub fn height(&self) -> i32 {
        self.array.nrows() as i32
    }

    pub fn dimensions(&self) -> Extent2I {
        Extent2I::new(self.width(), self.height())
    }

    pub fn bbox(&self) -> Box2I {
        Box2I::from_min_extent(self.xy0, self.dimensions())
    }

    pub fn array(&self) -> &Array2<T> {
        &self.array
    }

    pub fn array_mut(&mut self) -> &mut Array2<T> {
        &mut self.array
    }

    /// Pixel at a parent-frame position, if inside the image.
    pub fn get(&self, point: Point2I) -> Option<T> {
        if !self.bbox().contains_point(point) {
            return None;
        }
        let local = point - self.xy0;
        Some(self.array[[local.y as usize, local.x as usize]])
    }

    pub fn set(&mut self, point: Point2I, value: T) -> Result<()> {
        let bbox = Box2I::from_min_extent(point, Extent2I::new(1, 1));
        self.view_mut(bbox)?.fill(value);
        Ok(())
    }

    pub fn fill(&mut self, value: T) {
        self.array.fill(value);
    }

    pub fn fill_box(&mut self, bbox: Box2I, value: T) -> Result<()> {
        self.view_mut(bbox)?.fill(value);
        Ok(())
    }

    /// Read-only view of the parent-frame region `bbox`.
    pub fn view(&self, bbox: Box2I) -> Result<ArrayView2<'_, T>> {
        region_view(self.array.view(), self.bbox(), bbox)
    }

    pub fn view_mut(&mut self, bbox: Box2I) -> Result<ArrayViewMut2<'_, T>> {
        let image_bbox = self.bbox();
        region_view_mut(self.array.view_mut(), image_bbox, bbox)
    }

    /// Deep copy of the region `bbox`, keeping its parent-frame origin.
    pub fn sub_image(&self, bbox: Box2I) -> Result<Self> {
        Ok(Self {
            xy0: bbox.min(),
            array: self.view(bbox)?.to_owned(),
        })
    }
}

impl<T: Pixel> PixelPlanes for Image<T> {
    type Pixel = T;

    fn bbox(&self) -> Box2I {
        Image::bbox(self)
    }

    fn plane_count(&self) -> usize {
        1
    }

    fn plane_view(&self, index: usize) -> ArrayView2<'_, T> {
        assert_eq!(index, 0, "Image has a single plane");
        self.array.view()
    }

    fn plane_view_mut(&mut self, index: usize) -> ArrayViewMut2<'_, T> {
        assert_eq!(index, 0, "Image has a single plane");
        self.array.view_mut()
    }
}

/// Image, mask and variance planes sharing one bounding box and pixel type.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskedImage<T> {
    image: Image<T>,
    mask: Image<T>,
    variance: Image<T>,
}

impl<T: Pixel> MaskedImage<T> {
    pub fn new(bbox: Box2I) -> Result<Self> {
        Ok(Self {
            image: Image::new(bbox)?,
            mask: Image::new(bbox)?,
            variance: Image::new(bbox)?,
        })
    }

    pub fn from_planes(image: Image<T>, mask: Image<T>, variance: Image<T>) -> Result<Self> {
        for other in [&mask, &variance] {
            if other.bbox() != image.bbox() {
                return Err(CameraGeomError::DimensionMismatchError {
                    source_dims: other.dimensions(),
                    dest_dims: image.dimensions(),
                });
            }
        }
        Ok(Self { image, mask, variance })
    }

    pub fn bbox(&self) -> Box2I {
        self.image.bbox()
    }

    pub fn image(&self) -> &Image<T> {
        &self.image
    }

    pub fn mask(&self) -> &Image<T> {
        &self.mask
    }

    pub fn variance(&self) -> &Image<T> {
        &self.variance
    }

    pub fn image_mut(&mut self) -> &mut Image<T> {
        &mut self.image
    }

    pub fn mask_mut(&mut self) -> &mut Image<T> {
        &mut self.mask
    }

    pub fn variance_mut(&mut self) -> &mut Image<T> {
        &mut self.variance
    }
}

impl<T: Pixel> PixelPlanes for MaskedImage<T> {
    type Pixel = T;

    fn bbox(&self) -> Box2I {
        self.image.bbox()
    }

    fn plane_count(&self) -> usize {
        3
    }

    fn plane_view(&self, index: usize) -> ArrayView2<'_, T> {
        match index {
            0 => self.image.array.view(),
            1 => self.mask.array.view(),
            2 => self.variance.array.view(),
            _ => panic!("MaskedImage plane index {index} out of range"),
        }
    }

    fn plane_view_mut(&mut self, index: usize) -> ArrayViewMut2<'_, T> {
        match index {
            0 => self.image.array.view_mut(),
            1 => self.mask.array.view_mut(),
            2 => self.variance.array.view_mut(),
            _ => panic!("MaskedImage plane index {index} out of range"),
        }
    }
}
