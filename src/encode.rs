use std::io::Cursor;

use image::ImageEncoder;

use crate::error::{ChartError, Result};
use crate::figure::Figure;

pub const JPEG_MIME: &str = "image/jpeg";

const JPEG_QUALITY: u8 = 95;
const MAX_JPEG_DIMENSION: u32 = u16::MAX as u32;

/// Encoded chart image, ready to hand to a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArtifact {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl ImageArtifact {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn mime(&self) -> &'static str {
        self.mime
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Readable stream positioned at the first byte.
    pub fn into_reader(self) -> Cursor<Vec<u8>> {
        Cursor::new(self.bytes)
    }
}

/// Finalize the figure as a JPEG. The figure is consumed and released
/// whether or not encoding succeeds.
pub fn encode_jpeg(figure: Figure) -> Result<ImageArtifact> {
    let (width, height) = (figure.width(), figure.height());
    if width > MAX_JPEG_DIMENSION || height > MAX_JPEG_DIMENSION {
        return Err(ChartError::Encoding(format!(
            "{}x{} exceeds the JPEG dimension limit of {}",
            width, height, MAX_JPEG_DIMENSION
        )));
    }

    let expected = width as usize * height as usize * 3;
    if figure.pixels().len() != expected {
        return Err(ChartError::Encoding(format!(
            "pixel buffer holds {} bytes, expected {}",
            figure.pixels().len(),
            expected
        )));
    }

    let mut bytes = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .write_image(figure.pixels(), width, height, image::ColorType::Rgb8)
        .map_err(|e| ChartError::Encoding(format!("Failed to encode JPEG: {}", e)))?;

    Ok(ImageArtifact {
        bytes,
        mime: JPEG_MIME,
    })
}
