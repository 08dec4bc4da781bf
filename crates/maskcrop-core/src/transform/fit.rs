//! Cover-fit scaling, zoom limits and pan bounds.

use crate::config::normalize_zoom_range;
use crate::error::EditorError;
use crate::geometry::Size;

use super::Transform;

/// Compute the cover-fit transform for an image inside a viewport.
///
/// The scale is the larger of the two axis ratios so the image fills the
/// viewport with no blank margin, cropping the overflow. The image is anchored
/// at the top-left corner.
///
/// If either size is degenerate (zero, negative or not finite) the identity
/// transform is returned and clamping waits until valid sizes are known.
///
/// # Example
///
/// ```
/// use maskcrop_core::geometry::Size;
/// use maskcrop_core::transform::fit_to_viewport;
///
/// let t = fit_to_viewport(Size::new(1000.0, 800.0), Size::new(2000.0, 1000.0));
/// assert!((t.scale - 0.8).abs() < 1e-6);
/// ```
pub fn fit_to_viewport(viewport: Size, image: Size) -> Transform {
    if viewport.is_degenerate() || image.is_degenerate() {
        return Transform::IDENTITY;
    }
    let scale_x = viewport.width / image.width;
    let scale_y = viewport.height / image.height;
    Transform::new(scale_x.max(scale_y), 0.0, 0.0)
}

/// Inclusive scale range a transform is held to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomLimits {
    pub min: f32,
    pub max: f32,
}

impl Default for ZoomLimits {
    fn default() -> Self {
        Self {
            min: 1.0,
            max: crate::config::DEFAULT_MAX_ZOOM,
        }
    }
}

impl ZoomLimits {
    /// Build limits from explicit bounds. Inverted bounds are swapped.
    pub fn new(min: f32, max: f32) -> Result<Self, EditorError> {
        let (min, max) = normalize_zoom_range(Some(min), max)?;
        Ok(Self {
            min: min.unwrap_or(max),
            max,
        })
    }

    /// Limits for a freshly fitted image.
    ///
    /// `configured_min` overrides the fit scale as the lower bound. The upper
    /// bound is raised to the lower one when a cover-fit already exceeds it,
    /// which happens for images smaller than the viewport.
    pub fn for_fit(fit_scale: f32, configured_min: Option<f32>, configured_max: f32) -> Self {
        let min = configured_min.unwrap_or(fit_scale);
        Self {
            min,
            max: configured_max.max(min),
        }
    }

    #[inline]
    pub fn clamp(&self, scale: f32) -> f32 {
        scale.clamp(self.min, self.max)
    }

    pub fn contains(&self, scale: f32) -> bool {
        scale >= self.min && scale <= self.max
    }
}

/// Image and viewport sizes used to clamp translation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PanBounds {
    pub image: Size,
    pub viewport: Size,
}

impl PanBounds {
    pub fn new(image: Size, viewport: Size) -> Self {
        Self { image, viewport }
    }

    /// Clamping only applies once both sizes are known.
    pub fn is_valid(&self) -> bool {
        !self.image.is_degenerate() && !self.viewport.is_degenerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_wide_image() {
        // Viewport 1000x800, image 2000x1000 -> max(0.5, 0.8) = 0.8
        let t = fit_to_viewport(Size::new(1000.0, 800.0), Size::new(2000.0, 1000.0));
        assert!((t.scale - 0.8).abs() < 1e-6);
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 0.0);
    }

    #[test]
    fn test_fit_tall_image() {
        let t = fit_to_viewport(Size::new(400.0, 400.0), Size::new(200.0, 800.0));
        // max(2.0, 0.5)
        assert!((t.scale - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_fit_degenerate_sizes() {
        assert_eq!(
            fit_to_viewport(Size::new(0.0, 800.0), Size::new(100.0, 100.0)),
            Transform::IDENTITY
        );
        assert_eq!(
            fit_to_viewport(Size::new(800.0, 800.0), Size::new(100.0, 0.0)),
            Transform::IDENTITY
        );
    }

    #[test]
    fn test_limits_for_fit() {
        let limits = ZoomLimits::for_fit(0.8, None, 3.0);
        assert_eq!(limits.min, 0.8);
        assert_eq!(limits.max, 3.0);

        let limits = ZoomLimits::for_fit(0.8, Some(0.5), 3.0);
        assert_eq!(limits.min, 0.5);

        // Fit scale above max raises max
        let limits = ZoomLimits::for_fit(5.0, None, 3.0);
        assert_eq!(limits.min, 5.0);
        assert_eq!(limits.max, 5.0);
    }

    #[test]
    fn test_limits_new_swaps() {
        let limits = ZoomLimits::new(4.0, 1.0).unwrap();
        assert_eq!(limits.min, 1.0);
        assert_eq!(limits.max, 4.0);
        assert!(ZoomLimits::new(-1.0, 2.0).is_err());
    }

    #[test]
    fn test_limits_clamp() {
        let limits = ZoomLimits::new(1.0, 3.0).unwrap();
        assert_eq!(limits.clamp(0.5), 1.0);
        assert_eq!(limits.clamp(5.0), 3.0);
        assert_eq!(limits.clamp(2.0), 2.0);
        assert!(limits.contains(3.0));
        assert!(!limits.contains(3.01));
    }

    #[test]
    fn test_bounds_validity() {
        assert!(!PanBounds::default().is_valid());
        assert!(PanBounds::new(Size::new(10.0, 10.0), Size::new(5.0, 5.0)).is_valid());
    }
}
