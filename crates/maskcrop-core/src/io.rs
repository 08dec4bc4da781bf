//! Encoded image I/O for hosts that hand over file bytes.
//!
//! Decoding and encoding are delegated to the `image` crate. Only PNG and
//! JPEG are compiled in.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageReader, RgbaImage};

use crate::error::EditorError;
use crate::raster::SourceImage;

/// Decode PNG or JPEG bytes into a source image.
///
/// # Errors
///
/// Returns `EditorError::Decode` if the format isn't recognized or the data
/// is corrupted.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, EditorError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| EditorError::Decode(e.to_string()))?;

    let img = reader
        .decode()
        .map_err(|e| EditorError::Decode(e.to_string()))?;

    log::debug!("decoded {}x{} image", img.width(), img.height());
    SourceImage::from_rgba_image(img.into_rgba8())
}

/// Encode an RGBA raster (e.g. a crop result) as PNG, keeping transparency.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, EditorError> {
    let (width, height) = raster.dimensions();
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(raster.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EditorError::Encode(e.to_string()))?;

    Ok(buffer.into_inner())
}
