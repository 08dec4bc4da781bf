//! Error types for the editor engine.

use thiserror::Error;

/// Errors that can occur while loading images, configuring the editor or
/// exporting results.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Pixel buffer length doesn't match the declared dimensions.
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero.
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// Zoom limits that cannot be normalized into a usable range.
    #[error("Invalid zoom range: min {min}, max {max}")]
    InvalidZoomRange { min: f32, max: f32 },

    /// Encoded image bytes could not be decoded.
    #[error("Decode failed: {0}")]
    Decode(String),

    /// Raster could not be encoded.
    #[error("Encode failed: {0}")]
    Encode(String),
}
