//! Editor configuration.
//!
//! Hosts usually pass configuration as a JSON-like object; every field has a
//! serde default so partial objects are accepted.
//!
//! | Field                | Default        |
//! |----------------------|----------------|
//! | `max_zoom`           | 3.0            |
//! | `min_zoom`           | fit scale      |
//! | `mask_mode`          | `Draw`         |
//! | `primary_mode`       | `Paint`        |
//! | `paint_stroke_width` | 50.0           |
//! | `erase_stroke_width` | 20.0           |
//! | `paint_color`        | opaque red     |
//! | `paint_alpha`        | 10             |
//! | `overlay`            | `Transformed`  |
//! | `pinch_source`       | `Detector`     |
//! | `filter`             | `Bilinear`     |
//! | `background`         | transparent    |

use serde::{Deserialize, Serialize};

use crate::composite::InterpolationFilter;
use crate::error::EditorError;
use crate::mask::MaskMode;

/// Default upper zoom bound.
pub const DEFAULT_MAX_ZOOM: f32 = 3.0;
/// Default brush width when painting, in image pixels.
pub const DEFAULT_PAINT_STROKE_WIDTH: f32 = 50.0;
/// Default brush width when erasing, in image pixels.
pub const DEFAULT_ERASE_STROKE_WIDTH: f32 = 20.0;
/// Default paint alpha. Translucent so overlapping strokes darken progressively.
pub const DEFAULT_PAINT_ALPHA: u8 = 10;

/// What a single finger does when it touches down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimaryMode {
    /// Single finger paints (or erases) the mask.
    #[default]
    Paint,
    /// Single finger pans the image.
    Pan,
}

/// Where the mask overlay is drawn during rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayAlignment {
    /// Overlay follows the image transform.
    #[default]
    Transformed,
    /// Overlay is pinned to the screen origin, untransformed.
    ScreenOrigin,
}

/// Where pinch scale events come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PinchSource {
    /// The host runs its own scale detector and calls `on_scale`.
    #[default]
    Detector,
    /// The editor derives scale from the span between two pointers.
    Pointers,
}

/// Full editor configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub max_zoom: f32,
    /// Lower zoom bound. `None` uses the cover-fit scale.
    pub min_zoom: Option<f32>,
    pub mask_mode: MaskMode,
    pub primary_mode: PrimaryMode,
    pub paint_stroke_width: f32,
    pub erase_stroke_width: f32,
    /// RGB of the paint and overlay tint.
    pub paint_color: [u8; 3],
    pub paint_alpha: u8,
    pub overlay: OverlayAlignment,
    pub pinch_source: PinchSource,
    pub filter: InterpolationFilter,
    /// RGBA fill behind the image in rendered frames.
    pub background: [u8; 4],
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            max_zoom: DEFAULT_MAX_ZOOM,
            min_zoom: None,
            mask_mode: MaskMode::default(),
            primary_mode: PrimaryMode::default(),
            paint_stroke_width: DEFAULT_PAINT_STROKE_WIDTH,
            erase_stroke_width: DEFAULT_ERASE_STROKE_WIDTH,
            paint_color: [255, 0, 0],
            paint_alpha: DEFAULT_PAINT_ALPHA,
            overlay: OverlayAlignment::default(),
            pinch_source: PinchSource::default(),
            filter: InterpolationFilter::default(),
            background: [0, 0, 0, 0],
        }
    }
}

impl EditorConfig {
    /// Check and normalize the configuration.
    ///
    /// - zoom bounds must be finite and positive
    /// - `min_zoom > max_zoom` is swapped rather than rejected
    /// - stroke widths are floored at one pixel
    pub fn validated(mut self) -> Result<Self, EditorError> {
        let (min, max) = normalize_zoom_range(self.min_zoom, self.max_zoom)?;
        self.min_zoom = min;
        self.max_zoom = max;

        self.paint_stroke_width =
            sanitize_width(self.paint_stroke_width, DEFAULT_PAINT_STROKE_WIDTH);
        self.erase_stroke_width =
            sanitize_width(self.erase_stroke_width, DEFAULT_ERASE_STROKE_WIDTH);
        Ok(self)
    }
}

/// Validate a zoom pair, swapping the bounds if they are inverted.
pub(crate) fn normalize_zoom_range(
    min: Option<f32>,
    max: f32,
) -> Result<(Option<f32>, f32), EditorError> {
    let valid = |v: f32| v.is_finite() && v > 0.0;
    if !valid(max) || min.is_some_and(|m| !valid(m)) {
        return Err(EditorError::InvalidZoomRange {
            min: min.unwrap_or(f32::NAN),
            max,
        });
    }
    match min {
        Some(min) if min > max => {
            log::warn!("min_zoom {min} exceeds max_zoom {max}; swapping");
            Ok((Some(max), min))
        }
        other => Ok((other, max)),
    }
}

fn sanitize_width(width: f32, fallback: f32) -> f32 {
    if width.is_finite() {
        width.max(1.0)
    } else {
        fallback
    }
}
