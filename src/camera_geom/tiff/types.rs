//! Mosaic TIFF settings

use ::tiff::encoder::compression::DeflateLevel;
use ::tiff::encoder::Compression;
use ::tiff::tags::Predictor;

/// Compression of the written mosaic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TiffCompression {
    #[default]
    None,
    Lzw,
    DeflateFast,
    DeflateBalanced,
    DeflateBest,
}

impl From<TiffCompression> for Compression {
    fn from(compression: TiffCompression) -> Self {
        match compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TiffConfig {
    pub compression: TiffCompression,
    /// Horizontal differencing before compression; mosaics with smooth
    /// backgrounds compress noticeably better with it.
    pub horizontal_predictor: bool,
}

impl TiffConfig {
    pub fn builder() -> TiffConfigBuilder {
        TiffConfigBuilder::default()
    }

    pub(crate) fn predictor(&self) -> Predictor {
        if self.horizontal_predictor {
            Predictor::Horizontal
        } else {
            Predictor::None
        }
    }
}

#[derive(Debug, Default)]
pub struct TiffConfigBuilder {
    compression: Option<TiffCompression>,
    horizontal_predictor: Option<bool>,
}

impl TiffConfigBuilder {
    pub fn compression(mut self, compression: TiffCompression) -> Self {
        self.compression = Some(compression);
        self
    }

    pub fn horizontal_predictor(mut self, enabled: bool) -> Self {
        self.horizontal_predictor = Some(enabled);
        self
    }

    pub fn build(self) -> TiffConfig {
        let default = TiffConfig::default();
        TiffConfig {
            compression: self.compression.unwrap_or(default.compression),
            horizontal_predictor: self.horizontal_predictor.unwrap_or(default.horizontal_predictor),
        }
    }
}
