//! TIFF output module
//!
//! Writes assembled 16-bit mosaics as grayscale TIFF files.

mod standard_tiff_writer;
pub mod types;
mod writer;

pub use standard_tiff_writer::{write_tiff_file, StandardTiffWriter};
pub use types::{TiffCompression, TiffConfig, TiffConfigBuilder};
pub use writer::MosaicWriter;
