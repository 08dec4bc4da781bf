//! WASM-compatible wrapper types for image data.
//!
//! Everything crossing the boundary is straight-alpha RGBA, 4 bytes per
//! pixel in row-major order, which is what `ImageData` expects on the
//! JavaScript side.

use image::RgbaImage;
use maskcrop_core::{EditorError, SourceImage};
use wasm_bindgen::prelude::*;

/// An RGBA image wrapper for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`. For large frames, prefer keeping the image
/// in WASM memory and only extracting pixels when needed.
#[wasm_bindgen]
pub struct JsImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

#[wasm_bindgen]
impl JsImage {
    /// Create a new JsImage from dimensions and RGBA pixel data.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> JsImage {
        JsImage {
            width,
            height,
            pixels,
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the number of bytes in the pixel buffer (width * height * 4)
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.pixels.len()
    }

    /// Returns RGBA pixel data as Uint8Array.
    ///
    /// Note: This creates a copy of the pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// This is optional - wasm-bindgen's finalizer will handle cleanup automatically.
    pub fn free(self) {
        // Dropping self releases the memory
    }
}

impl JsImage {
    pub(crate) fn from_rgba(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Validate and convert into a core source image. Clones the pixel data.
    pub(crate) fn to_source(&self) -> Result<SourceImage, EditorError> {
        SourceImage::from_rgba(self.width, self.height, self.pixels.clone())
    }

    /// Borrow as an RGBA raster, if the buffer length matches.
    pub(crate) fn to_rgba(&self) -> Result<RgbaImage, EditorError> {
        let expected = self.width as usize * self.height as usize * 4;
        RgbaImage::from_raw(self.width, self.height, self.pixels.clone()).ok_or(
            EditorError::InvalidPixelData {
                expected,
                actual: self.pixels.len(),
            },
        )
    }
}
