//! Raster types owned by the editor.
//!
//! - [`SourceImage`]: the immutable RGBA8 picture being edited
//! - [`MaskRaster`]: a single-channel alpha buffer with the same dimensions
//!
//! Both are thin wrappers over `image` buffers so hosts can hand results to
//! the wider `image` ecosystem without copying.

use image::{GrayImage, Luma, Rgba, RgbaImage};

use crate::error::EditorError;

/// Immutable source image with RGBA pixel data.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pixels: RgbaImage,
}

impl SourceImage {
    /// Create a source image from RGBA pixel data (4 bytes per pixel, row-major).
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditorError> {
        validate_buffer(width, height, 4, pixels.len())?;
        let pixels = RgbaImage::from_raw(width, height, pixels).ok_or(
            EditorError::InvalidDimensions { width, height },
        )?;
        Ok(Self { pixels })
    }

    /// Create a source image from RGB pixel data (3 bytes per pixel, row-major).
    ///
    /// Every pixel becomes fully opaque.
    pub fn from_rgb(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EditorError> {
        validate_buffer(width, height, 3, pixels.len())?;
        let mut rgba = Vec::with_capacity(pixels.len() / 3 * 4);
        for chunk in pixels.chunks_exact(3) {
            rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
        }
        Self::from_rgba(width, height, rgba)
    }

    /// Wrap an existing `image::RgbaImage`.
    pub fn from_rgba_image(img: RgbaImage) -> Result<Self, EditorError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(EditorError::InvalidDimensions { width, height });
        }
        Ok(Self { pixels: img })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Borrow the underlying RGBA buffer.
    pub fn as_rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Pixel at (x, y). Panics when out of bounds, like `image::ImageBuffer`.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        *self.pixels.get_pixel(x, y)
    }
}

/// Per-pixel alpha buffer describing the selected region.
#[derive(Debug, Clone, PartialEq)]
pub struct MaskRaster {
    alpha: GrayImage,
}

impl MaskRaster {
    /// Allocate a mask with every pixel set to `fill`.
    pub fn new(width: u32, height: u32, fill: u8) -> Self {
        Self {
            alpha: GrayImage::from_pixel(width, height, Luma([fill])),
        }
    }

    /// A zero-sized mask, used before any image has been assigned.
    pub fn empty() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn width(&self) -> u32 {
        self.alpha.width()
    }

    pub fn height(&self) -> u32 {
        self.alpha.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.alpha.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        self.alpha.width() == 0 || self.alpha.height() == 0
    }

    /// Alpha at (x, y), or 0 outside the raster.
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.alpha.get_pixel_checked(x, y).map_or(0, |p| p.0[0])
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u8) {
        for px in self.alpha.pixels_mut() {
            px.0[0] = value;
        }
    }

    /// True if every pixel equals `value`.
    pub fn is_uniform(&self, value: u8) -> bool {
        self.alpha.as_raw().iter().all(|&a| a == value)
    }

    /// Borrow the underlying alpha buffer.
    pub fn as_gray(&self) -> &GrayImage {
        &self.alpha
    }

    pub(crate) fn as_gray_mut(&mut self) -> &mut GrayImage {
        &mut self.alpha
    }

    /// Render the mask as an RGBA image tinted with `tint`, using the mask
    /// value as the alpha channel.
    pub fn to_rgba(&self, tint: [u8; 3]) -> RgbaImage {
        let (width, height) = self.dimensions();
        RgbaImage::from_fn(width, height, |x, y| {
            let a = self.alpha.get_pixel(x, y).0[0];
            Rgba([tint[0], tint[1], tint[2], a])
        })
    }
}

fn validate_buffer(width: u32, height: u32, bpp: usize, actual: usize) -> Result<(), EditorError> {
    if width == 0 || height == 0 {
        return Err(EditorError::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * bpp;
    if actual != expected {
        return Err(EditorError::InvalidPixelData { expected, actual });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_from_rgba() {
        let img = SourceImage::from_rgba(4, 2, vec![7u8; 4 * 2 * 4]).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert_eq!(img.pixel(3, 1), Rgba([7, 7, 7, 7]));
    }

    #[test]
    fn test_source_from_rgb_is_opaque() {
        let img = SourceImage::from_rgb(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        assert_eq!(img.pixel(0, 0), Rgba([10, 20, 30, 255]));
        assert_eq!(img.pixel(1, 0), Rgba([40, 50, 60, 255]));
    }

    #[test]
    fn test_source_rejects_bad_buffer() {
        let err = SourceImage::from_rgba(10, 10, vec![0u8; 12]).unwrap_err();
        assert!(matches!(
            err,
            EditorError::InvalidPixelData {
                expected: 400,
                actual: 12
            }
        ));
    }

    #[test]
    fn test_source_rejects_zero_dimensions() {
        let err = SourceImage::from_rgb(0, 10, vec![]).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDimensions { width: 0, height: 10 }));

        let err = SourceImage::from_rgba_image(RgbaImage::new(5, 0)).unwrap_err();
        assert!(matches!(err, EditorError::InvalidDimensions { .. }));
    }

    #[test]
    fn test_mask_fill_and_alpha() {
        let mut mask = MaskRaster::new(3, 3, 0);
        assert!(mask.is_uniform(0));
        mask.fill(255);
        assert!(mask.is_uniform(255));
        assert_eq!(mask.alpha(2, 2), 255);
        // Outside reads as transparent
        assert_eq!(mask.alpha(3, 0), 0);
    }

    #[test]
    fn test_empty_mask() {
        let mask = MaskRaster::empty();
        assert!(mask.is_empty());
        assert_eq!(mask.to_rgba([255, 0, 0]).dimensions(), (0, 0));
    }

    #[test]
    fn test_mask_to_rgba() {
        let mask = MaskRaster::new(1, 1, 42);
        let rgba = mask.to_rgba([255, 0, 0]);
        assert_eq!(*rgba.get_pixel(0, 0), Rgba([255, 0, 0, 42]));
    }
}
