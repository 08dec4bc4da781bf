//! The image-to-screen transform and its pure update functions.
//!
//! A transform maps image space to screen space:
//!
//! ```text
//! screen_x = image_x * scale + translate_x
//! screen_y = image_y * scale + translate_y
//! ```
//!
//! Updates never mutate in place. `with_pan` and `with_zoom` return a new
//! value, so callers can't observe a half-applied transform.

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

use super::{PanBounds, ZoomLimits};

/// Uniform scale plus translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f32,
    pub translate_x: f32,
    pub translate_y: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
    };

    pub const fn new(scale: f32, translate_x: f32, translate_y: f32) -> Self {
        Self {
            scale,
            translate_x,
            translate_y,
        }
    }

    /// Affine coefficients `[a, b, c, d, e, f]` in canvas `setTransform` order.
    pub fn to_affine(&self) -> [f32; 6] {
        [
            self.scale,
            0.0,
            0.0,
            self.scale,
            self.translate_x,
            self.translate_y,
        ]
    }

    pub fn is_invertible(&self) -> bool {
        self.scale.is_finite()
            && self.scale != 0.0
            && self.translate_x.is_finite()
            && self.translate_y.is_finite()
    }

    /// Map an image-space point to screen space.
    #[inline]
    pub fn image_to_screen(&self, p: Point) -> Point {
        Point::new(
            p.x * self.scale + self.translate_x,
            p.y * self.scale + self.translate_y,
        )
    }

    /// Map a screen-space point to image space.
    ///
    /// Returns `None` when the transform can't be inverted.
    #[inline]
    pub fn screen_to_image(&self, p: Point) -> Option<Point> {
        if !self.is_invertible() {
            return None;
        }
        Some(Point::new(
            (p.x - self.translate_x) / self.scale,
            (p.y - self.translate_y) / self.scale,
        ))
    }

    /// Translate by a screen-space delta, then clamp to `bounds`.
    pub fn with_pan(self, dx: f32, dy: f32, bounds: &PanBounds) -> Transform {
        if !(dx.is_finite() && dy.is_finite()) {
            return self;
        }
        Transform {
            translate_x: self.translate_x + dx,
            translate_y: self.translate_y + dy,
            ..self
        }
        .clamped(bounds)
    }

    /// Scale by `factor` about the screen-space `focal` point.
    ///
    /// The resulting scale is held to `limits`; the factor actually applied is
    /// reduced accordingly so the focal point stays fixed on screen. Pan
    /// clamping is re-applied afterwards.
    pub fn with_zoom(
        self,
        focal: Point,
        factor: f32,
        limits: &ZoomLimits,
        bounds: &PanBounds,
    ) -> Transform {
        if !(factor.is_finite() && factor > 0.0) || !focal.is_finite() || !self.is_invertible() {
            return self;
        }
        let scale = limits.clamp(self.scale * factor);
        let applied = scale / self.scale;
        Transform {
            scale,
            translate_x: focal.x - (focal.x - self.translate_x) * applied,
            translate_y: focal.y - (focal.y - self.translate_y) * applied,
        }
        .clamped(bounds)
    }

    /// Hold translation so the image covers the viewport.
    ///
    /// Per axis: `-(image * scale - viewport) <= translate <= 0`. When the
    /// scaled image is narrower than the viewport the range collapses and
    /// translation becomes 0. Invalid bounds leave the transform untouched.
    pub fn clamped(self, bounds: &PanBounds) -> Transform {
        if !bounds.is_valid() {
            return self;
        }
        Transform {
            translate_x: clamp_axis(
                self.translate_x,
                bounds.image.width,
                self.scale,
                bounds.viewport.width,
            ),
            translate_y: clamp_axis(
                self.translate_y,
                bounds.image.height,
                self.scale,
                bounds.viewport.height,
            ),
            ..self
        }
    }
}

#[inline]
fn clamp_axis(translate: f32, image_len: f32, scale: f32, viewport_len: f32) -> f32 {
    let overflow = image_len * scale - viewport_len;
    if overflow <= 0.0 {
        0.0
    } else {
        translate.clamp(-overflow, 0.0)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
