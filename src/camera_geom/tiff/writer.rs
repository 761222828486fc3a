use std::io::Write;

use crate::camera_geom::common::error::Result;
use crate::camera_geom::image::Image;
use crate::camera_geom::tiff::types::TiffConfig;

pub trait MosaicWriter {
    fn write_image(&self, image: &Image<u16>, output: &mut dyn Write, config: &TiffConfig) -> Result<()>;
}
