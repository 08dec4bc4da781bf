//! MaskCrop Core - Interactive mask painting and crop engine
//!
//! This crate provides the platform-independent core of the mask/crop editor:
//! pinch-zoom and pan over a source image, painting and erasing a selection
//! mask, rendering the current view, and exporting the masked region.
//!
//! Hosts (the WASM adapter, native UIs, tests) own the event loop and the
//! display surface. They feed [`MaskCropEditor`] viewport sizes and pointer
//! events and call [`MaskCropEditor::render`] / [`MaskCropEditor::crop`].

pub mod composite;
pub mod config;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod io;
pub mod mask;
pub mod raster;
pub mod transform;

pub use composite::{export_cropped, render_frame, InterpolationFilter, RenderOptions};
pub use config::{EditorConfig, OverlayAlignment, PinchSource, PrimaryMode};
pub use editor::MaskCropEditor;
pub use error::EditorError;
pub use geometry::{Point, Size};
pub use gesture::{
    GestureAction, GestureClassifier, GestureState, PointerAction, PointerEvent, ScaleEvent,
};
pub use io::{decode_image, encode_png};
pub use mask::{Brush, BrushStyle, MaskLayer, MaskMode, Stroke};
pub use raster::{MaskRaster, SourceImage};
pub use transform::{fit_to_viewport, PanBounds, Transform, ZoomLimits};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_to_end_session() {
        let mut editor = MaskCropEditor::new(EditorConfig {
            paint_alpha: 255,
            ..Default::default()
        })
        .unwrap();
        editor.on_viewport_resize(100.0, 100.0);

        let source = image::RgbaImage::from_pixel(50, 50, image::Rgba([10, 20, 30, 255]));
        let png = encode_png(&source).unwrap();
        editor.load_image_bytes(&png).unwrap();
        assert_eq!(editor.transform().scale, 2.0);

        // Screen (50,50) is image (25,25) at 2x
        editor.on_pointer_event(&PointerEvent::single(PointerAction::Down, 50.0, 50.0));
        editor.on_pointer_event(&PointerEvent::single(PointerAction::Up, 50.0, 50.0));
        assert_eq!(editor.mask().alpha(25, 25), 255);

        let out = editor.crop();
        assert_eq!(*out.get_pixel(25, 25), image::Rgba([10, 20, 30, 255]));
        assert_eq!(out.get_pixel(0, 0).0[3], 0);

        let encoded = encode_png(&out).unwrap();
        let back = decode_image(&encoded).unwrap();
        assert_eq!(back.dimensions(), (50, 50));
    }

    #[test]
    fn test_config_round_trip() {
        let config = EditorConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EditorConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }
}
