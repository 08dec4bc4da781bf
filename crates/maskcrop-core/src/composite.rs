//! Frame rendering and masked export.
//!
//! # Rendering
//!
//! Frames are produced by inverse mapping: for each viewport pixel we find the
//! image-space position under its center and sample the source there. The
//! mask overlay is then blended on top, tinted with the paint color.
//!
//! # Export
//!
//! The cropped export keeps source pixels only where the mask is opaque
//! (a DST_IN composite): `alpha_out = alpha_image * alpha_mask / 255`.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::config::OverlayAlignment;
use crate::geometry::Point;
use crate::raster::{MaskRaster, SourceImage};
use crate::transform::Transform;

/// Sampling used when drawing the source through the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationFilter {
    /// Fastest, blocky when zoomed in.
    Nearest,
    /// Smooth interpolation between the four nearest pixels.
    #[default]
    Bilinear,
}

/// Per-frame drawing options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub filter: InterpolationFilter,
    pub overlay: OverlayAlignment,
    /// RGB tint for mask pixels.
    pub tint: [u8; 3],
    /// RGBA fill behind the image.
    pub background: [u8; 4],
}

/// Draw the current view into `frame`.
///
/// The frame's dimensions are the viewport. `image` may be absent, in which
/// case only the background (and an empty mask) is drawn. A non-invertible
/// transform skips the image and the aligned overlay for this frame.
pub fn render_frame(
    frame: &mut RgbaImage,
    image: Option<&SourceImage>,
    mask: &MaskRaster,
    transform: &Transform,
    options: &RenderOptions,
) {
    let background = Rgba(options.background);
    let invertible = transform.is_invertible();

    for (x, y, out) in frame.enumerate_pixels_mut() {
        let mut px = background;
        let screen = Point::new(x as f32 + 0.5, y as f32 + 0.5);
        let image_pos = if invertible {
            transform.screen_to_image(screen)
        } else {
            None
        };

        if let (Some(image), Some(pos)) = (image, image_pos) {
            if let Some(src) = sample_rgba(image, pos, options.filter) {
                px = blend_over(px, src);
            }
        }

        let mask_pos = match options.overlay {
            OverlayAlignment::Transformed => image_pos,
            OverlayAlignment::ScreenOrigin => Some(screen),
        };
        if let Some(pos) = mask_pos {
            let a = sample_alpha(mask, pos);
            if a > 0 {
                let [r, g, b] = options.tint;
                px = blend_over(px, Rgba([r, g, b, a]));
            }
        }

        *out = px;
    }
}

/// Keep only the parts of `image` covered by `mask`.
///
/// Returns a new raster the size of `image`; neither input is modified.
/// With a fully opaque mask the result equals the source pixel for pixel.
pub fn export_cropped(image: &SourceImage, mask: &MaskRaster) -> RgbaImage {
    let src = image.as_rgba();
    RgbaImage::from_fn(src.width(), src.height(), |x, y| {
        let Rgba([r, g, b, a]) = *src.get_pixel(x, y);
        let m = mask.alpha(x, y) as u32;
        let alpha = ((a as u32 * m + 127) / 255) as u8;
        if alpha == 0 {
            Rgba([0, 0, 0, 0])
        } else {
            Rgba([r, g, b, alpha])
        }
    })
}

/// Sample the source at an image-space position.
///
/// Returns `None` outside the image so the background shows through.
fn sample_rgba(image: &SourceImage, pos: Point, filter: InterpolationFilter) -> Option<Rgba<u8>> {
    let (w, h) = image.dimensions();
    if pos.x < 0.0 || pos.y < 0.0 || pos.x >= w as f32 || pos.y >= h as f32 {
        return None;
    }
    match filter {
        InterpolationFilter::Nearest => Some(image.pixel(pos.x as u32, pos.y as u32)),
        InterpolationFilter::Bilinear => Some(sample_bilinear(image, pos)),
    }
}

/// Bilinear sample with clamp-to-edge, using pixel centers at +0.5.
fn sample_bilinear(image: &SourceImage, pos: Point) -> Rgba<u8> {
    let (w, h) = image.dimensions();
    let x = (pos.x - 0.5).clamp(0.0, (w - 1) as f32);
    let y = (pos.y - 0.5).clamp(0.0, (h - 1) as f32);

    let x0 = x.floor() as u32;
    let y0 = y.floor() as u32;
    let x1 = (x0 + 1).min(w - 1);
    let y1 = (y0 + 1).min(h - 1);

    // Fractional distances
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = image.pixel(x0, y0).0;
    let p10 = image.pixel(x1, y0).0;
    let p01 = image.pixel(x0, y1).0;
    let p11 = image.pixel(x1, y1).0;

    let mut result = [0u8; 4];
    for i in 0..4 {
        let v = p00[i] as f32 * (1.0 - fx) * (1.0 - fy)
            + p10[i] as f32 * fx * (1.0 - fy)
            + p01[i] as f32 * (1.0 - fx) * fy
            + p11[i] as f32 * fx * fy;
        result[i] = v.clamp(0.0, 255.0).round() as u8;
    }
    Rgba(result)
}

/// Nearest mask alpha at an image-space (or screen-space) position.
#[inline]
fn sample_alpha(mask: &MaskRaster, pos: Point) -> u8 {
    if pos.x < 0.0 || pos.y < 0.0 {
        return 0;
    }
    mask.alpha(pos.x as u32, pos.y as u32)
}

/// Porter-Duff source-over on straight (non-premultiplied) RGBA.
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src.0[3] as f32 / 255.0;
    if sa >= 1.0 {
        return src;
    }
    if sa <= 0.0 {
        return dst;
    }
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    let mut out = [0u8; 4];
    for i in 0..3 {
        let c = (src.0[i] as f32 * sa + dst.0[i] as f32 * da * (1.0 - sa)) / out_a;
        out[i] = c.clamp(0.0, 255.0).round() as u8;
    }
    out[3] = (out_a * 255.0).clamp(0.0, 255.0).round() as u8;
    Rgba(out)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
