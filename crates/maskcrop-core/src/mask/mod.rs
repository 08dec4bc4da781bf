//! Hand-painted selection masks.
//!
//! The mask is a single-channel alpha raster the size of the source image.
//! Strokes arrive in image space, one segment at a time, and are either
//! painted in (source-over) or erased (destination clear).
//!
//! ## Mask Modes
//!
//! - **Draw**: starts transparent; the user paints the region to keep
//! - **NoDraw**: starts fully opaque; the user erases to reveal
//! - **Circle**: reserved, strokes have no effect

mod brush;
mod stroke;

pub use stroke::Stroke;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::raster::MaskRaster;
use brush::{stroke_polyline, BlendOp};

/// Initial mask state and stroke semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskMode {
    #[default]
    Draw,
    NoDraw,
    Circle,
}

impl MaskMode {
    /// Alpha every mask pixel starts with.
    pub fn initial_alpha(self) -> u8 {
        match self {
            MaskMode::NoDraw => 255,
            MaskMode::Draw | MaskMode::Circle => 0,
        }
    }

    /// Brush selected when an image is loaded in this mode.
    pub fn default_brush(self) -> Brush {
        match self {
            MaskMode::NoDraw => Brush::Erase,
            MaskMode::Draw | MaskMode::Circle => Brush::Paint,
        }
    }

    pub fn accepts_strokes(self) -> bool {
        !matches!(self, MaskMode::Circle)
    }
}

/// Whether strokes add to or remove from the mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Brush {
    #[default]
    Paint,
    Erase,
}

/// Stroke widths (image pixels) and paint alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrushStyle {
    pub paint_width: f32,
    pub erase_width: f32,
    pub paint_alpha: u8,
}

/// A mask raster plus the mode it was created in.
#[derive(Debug, Clone)]
pub struct MaskLayer {
    raster: MaskRaster,
    mode: MaskMode,
}

impl MaskLayer {
    /// Allocate a mask of the given size, filled per `mode`.
    pub fn new(width: u32, height: u32, mode: MaskMode) -> Self {
        Self {
            raster: MaskRaster::new(width, height, mode.initial_alpha()),
            mode,
        }
    }

    /// Zero-sized mask for an editor with no image yet.
    pub fn empty(mode: MaskMode) -> Self {
        Self::new(0, 0, mode)
    }

    pub fn raster(&self) -> &MaskRaster {
        &self.raster
    }

    pub fn mode(&self) -> MaskMode {
        self.mode
    }

    /// Composite a translucent stroke along `points` using source-over.
    ///
    /// Overlapping strokes accumulate toward full opacity.
    pub fn paint_segment(&mut self, points: &[Point], stroke_width: f32, alpha: u8) -> usize {
        stroke_polyline(
            self.raster.as_gray_mut(),
            points,
            stroke_width,
            BlendOp::SourceOver { alpha },
        )
    }

    /// Clear the mask under a stroke along `points`, regardless of its alpha.
    pub fn erase_segment(&mut self, points: &[Point], stroke_width: f32) -> usize {
        stroke_polyline(self.raster.as_gray_mut(), points, stroke_width, BlendOp::Clear)
    }

    /// Apply one stroke segment with `brush`, honoring the mask mode.
    ///
    /// Returns the number of pixels touched; `Circle` mode touches none.
    pub fn apply(&mut self, brush: Brush, points: &[Point], style: &BrushStyle) -> usize {
        if !self.mode.accepts_strokes() {
            return 0;
        }
        match brush {
            Brush::Paint => self.paint_segment(points, style.paint_width, style.paint_alpha),
            Brush::Erase => self.erase_segment(points, style.erase_width),
        }
    }

    /// Make the whole mask transparent.
    pub fn clear(&mut self) {
        self.raster.fill(0);
    }

    /// Restore the mode's initial fill.
    pub fn reset(&mut self) {
        self.raster.fill(self.mode.initial_alpha());
    }
}
