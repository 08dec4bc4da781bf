//! Antialiased stroke rasterization onto an alpha buffer.
//!
//! A stroke is a polyline with round caps and joins. Each pixel's coverage is
//! derived from the distance between its center and the nearest segment:
//!
//! ```text
//! coverage = clamp(radius + 0.5 - distance, 0, 1)
//! ```
//!
//! which gives a one-pixel antialiased rim around the stroke. Coverage over a
//! polyline is the maximum over its segments, so each pixel is blended once
//! per call no matter how many segments touch it.

use image::GrayImage;

use crate::geometry::Point;

/// How stroke coverage combines with the existing mask alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlendOp {
    /// Porter-Duff source-over with the given source alpha.
    SourceOver { alpha: u8 },
    /// Destination clear: alpha is removed in proportion to coverage.
    Clear,
}

/// Rasterize `points` as a stroke of `width` pixels and blend it into `raster`.
///
/// Returns the number of pixels touched.
pub(crate) fn stroke_polyline(
    raster: &mut GrayImage,
    points: &[Point],
    width: f32,
    op: BlendOp,
) -> usize {
    let Some(first) = points.first() else {
        return 0;
    };
    if !(width.is_finite() && width > 0.0) || points.iter().any(|p| !p.is_finite()) {
        return 0;
    }
    let radius = width / 2.0;

    // Bounding box of the stroke, expanded by the radius plus the AA rim
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
    for p in &points[1..] {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    let reach = radius + 1.0;
    let (w, h) = raster.dimensions();
    let x0 = (min_x - reach).floor().max(0.0) as u32;
    let y0 = (min_y - reach).floor().max(0.0) as u32;
    let x1 = ((max_x + reach).ceil().max(0.0) as u32).min(w);
    let y1 = ((max_y + reach).ceil().max(0.0) as u32).min(h);

    let mut touched = 0;
    for py in y0..y1 {
        for px in x0..x1 {
            let center = Point::new(px as f32 + 0.5, py as f32 + 0.5);
            let distance = polyline_distance(points, center);
            let coverage = (radius + 0.5 - distance).clamp(0.0, 1.0);
            if coverage <= 0.0 {
                continue;
            }
            let dst = &mut raster.get_pixel_mut(px, py).0[0];
            *dst = blend(*dst, coverage, op);
            touched += 1;
        }
    }
    touched
}

/// Blend one pixel of coverage into the destination alpha.
#[inline]
fn blend(dst: u8, coverage: f32, op: BlendOp) -> u8 {
    match op {
        BlendOp::SourceOver { alpha } => {
            let src = (alpha as f32 * coverage).round() as u32;
            let dst = dst as u32;
            // Round the increment up so low alphas keep accumulating to 255
            let add = ((255 - dst) * src + 254) / 255;
            (dst + add).min(255) as u8
        }
        BlendOp::Clear => {
            let cov = (coverage * 255.0).round() as u32;
            ((dst as u32 * (255 - cov) + 127) / 255) as u8
        }
    }
}

/// Shortest distance from `p` to the polyline. A single point is a dot.
#[inline]
fn polyline_distance(points: &[Point], p: Point) -> f32 {
    if points.len() == 1 {
        return points[0].distance(p);
    }
    points
        .windows(2)
        .map(|seg| segment_distance(seg[0], seg[1], p))
        .fold(f32::INFINITY, f32::min)
}

/// Distance from `p` to the segment `a`-`b`, projecting onto the segment and
/// clamping the projection to its end points.
#[inline]
fn segment_distance(a: Point, b: Point, p: Point) -> f32 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;

    // Degenerate segment: both ends coincide
    if len_sq < f32::EPSILON {
        return a.distance(p);
    }

    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}
