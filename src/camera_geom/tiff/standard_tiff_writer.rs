use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use ::tiff::encoder::colortype::Gray16;
use ::tiff::encoder::TiffEncoder;
use ::tiff::TiffError;
use ndarray::s;
use tracing::{debug, info, instrument};

use crate::camera_geom::common::error::{CameraGeomError, Result};
use crate::camera_geom::image::Image;
use crate::camera_geom::tiff::types::TiffConfig;
use crate::camera_geom::tiff::writer::MosaicWriter;

/// Grayscale 16-bit TIFF encoder. The first TIFF row is the image's maximum y.
pub struct StandardTiffWriter;

impl MosaicWriter for StandardTiffWriter {
    fn write_image(&self, image: &Image<u16>, output: &mut dyn Write, config: &TiffConfig) -> Result<()> {
        let (width, height) = (image.width() as u32, image.height() as u32);
        debug!(width, height, compression = ?config.compression, "Encoding mosaic TIFF");

        // y grows upward in the image, downward in TIFF
        let rows: Vec<u16> = image.array().slice(s![..;-1, ..]).iter().copied().collect();

        let mut encoded = Vec::new();
        TiffEncoder::new(Cursor::new(&mut encoded))
            .map_err(encode_error)?
            .with_compression(config.compression.into())
            .with_predictor(config.predictor())
            .write_image::<Gray16>(width, height, &rows)
            .map_err(encode_error)?;

        output.write_all(&encoded)?;
        Ok(())
    }
}

fn encode_error(err: TiffError) -> CameraGeomError {
    CameraGeomError::EncodeError(err.to_string())
}

/// Write `image` to `path` with `writer`.
#[instrument(skip(writer, image, config), fields(path = %path.as_ref().display()))]
pub fn write_tiff_file<W, P>(writer: &W, image: &Image<u16>, path: P, config: &TiffConfig) -> Result<()>
where
    W: MosaicWriter + ?Sized,
    P: AsRef<Path>,
{
    let mut output = BufWriter::new(File::create(path.as_ref())?);
    writer.write_image(image, &mut output, config)?;
    output.flush()?;
    info!(width = image.width(), height = image.height(), "TIFF written");
    Ok(())
}
