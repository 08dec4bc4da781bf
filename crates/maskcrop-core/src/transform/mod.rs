//! Pan/zoom transform engine.
//!
//! # Coordinate System
//!
//! - Image space: source raster pixels, origin at the top-left corner
//! - Screen space: viewport pixels, origin at the top-left corner
//! - The transform is a uniform scale followed by a translation
//!
//! # Invariants
//!
//! Whenever image and viewport sizes are known:
//! - `limits.min <= scale <= limits.max`
//! - the scaled image covers the viewport on every axis where it is large
//!   enough to, so no blank margin is ever exposed

mod affine;
mod fit;

pub use affine::Transform;
pub use fit::{fit_to_viewport, PanBounds, ZoomLimits};
