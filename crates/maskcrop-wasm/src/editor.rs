//! Editor WASM bindings.
//!
//! [`JsMaskCropEditor`] wraps the core editor for a `<canvas>` host. The host
//! forwards pointer events, polls `take_redraw()` once per animation frame and
//! paints `render()` into the canvas with `putImageData`.
//!
//! # Example
//!
//! ```typescript
//! const editor = new JsMaskCropEditor({ max_zoom: 4, mask_mode: 'no_draw' });
//! editor.resize(canvas.width, canvas.height);
//! editor.load_image(bytes);
//!
//! canvas.addEventListener('pointermove', (e) => {
//!   editor.pointer('move', activePointerCoords());
//! });
//!
//! requestAnimationFrame(function frame() {
//!   if (editor.take_redraw()) {
//!     const f = editor.render();
//!     ctx.putImageData(new ImageData(new Uint8ClampedArray(f.pixels()), f.width, f.height), 0, 0);
//!   }
//!   requestAnimationFrame(frame);
//! });
//! ```

use crate::types::JsImage;
use maskcrop_core::{
    Brush, EditorConfig, EditorError, GestureState, MaskCropEditor, PinchSource, Point,
    PointerAction, PointerEvent, PrimaryMode, ScaleEvent,
};
use wasm_bindgen::prelude::*;

fn to_js(e: EditorError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Browsers have no pinch detector, so zoom is derived from pointer spans.
fn browser_config() -> EditorConfig {
    EditorConfig {
        pinch_source: PinchSource::Pointers,
        ..Default::default()
    }
}

/// Map an event name to a pointer action.
///
/// Accepts both the touch-model names (`down`, `pointer_down`, ...) and the
/// DOM ones (`pointerdown`, `pointerup`, `pointercancel`), where the DOM
/// names are resolved against the number of active pointers.
fn parse_action(name: &str, pointer_count: usize) -> Option<PointerAction> {
    let action = match name {
        "down" => PointerAction::Down,
        "pointer_down" => PointerAction::PointerDown,
        "move" | "pointermove" => PointerAction::Move,
        "pointer_up" => PointerAction::PointerUp,
        "up" => PointerAction::Up,
        "cancel" | "pointercancel" => PointerAction::Cancel,
        "pointerdown" if pointer_count > 1 => PointerAction::PointerDown,
        "pointerdown" => PointerAction::Down,
        "pointerup" if pointer_count > 1 => PointerAction::PointerUp,
        "pointerup" => PointerAction::Up,
        _ => return None,
    };
    Some(action)
}

/// Pair up a flat `[x0, y0, x1, y1, ...]` buffer. A trailing odd value is dropped.
fn points_from_coords(coords: &[f32]) -> Vec<Point> {
    coords
        .chunks_exact(2)
        .map(|xy| Point::new(xy[0], xy[1]))
        .collect()
}

fn state_name(state: GestureState) -> &'static str {
    match state {
        GestureState::Idle => "idle",
        GestureState::Panning => "panning",
        GestureState::Zooming => "zooming",
        GestureState::Painting => "painting",
    }
}

/// Mask/crop editor handle for JavaScript.
#[wasm_bindgen]
pub struct JsMaskCropEditor {
    inner: MaskCropEditor,
}

#[wasm_bindgen]
impl JsMaskCropEditor {
    /// Create an editor.
    ///
    /// `config` is an optional object with any of the `EditorConfig` fields
    /// (snake_case). Missing fields take their defaults, except that
    /// `pinch_source` defaults to `pointers`.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<JsMaskCropEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            browser_config()
        } else {
            let mut parsed: EditorConfig = serde_wasm_bindgen::from_value(config.clone())
                .map_err(|e| JsValue::from_str(&format!("Invalid editor config: {}", e)))?;
            let has_pinch_source =
                js_sys::Reflect::has(&config, &JsValue::from_str("pinch_source")).unwrap_or(false);
            if !has_pinch_source {
                parsed.pinch_source = PinchSource::Pointers;
            }
            parsed
        };
        Self::with_config(config).map_err(to_js)
    }

    /// Replace the image with decoded PNG/JPEG bytes.
    pub fn load_image(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load_image_bytes(bytes).map_err(to_js)
    }

    /// Replace the image with an already-decoded RGBA image.
    pub fn set_image(&mut self, image: &JsImage) -> Result<(), JsValue> {
        let source = image.to_source().map_err(to_js)?;
        self.inner.set_image(source);
        Ok(())
    }

    /// The canvas was resized. Refits the image.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.inner.on_viewport_resize(width, height);
    }

    /// Feed a pointer event.
    ///
    /// `coords` holds the positions of every active pointer as
    /// `[x0, y0, x1, y1, ...]`, primary pointer first. Unknown action names
    /// are ignored and return `false`.
    pub fn pointer(&mut self, action: &str, coords: &[f32]) -> bool {
        let pointers = points_from_coords(coords);
        let Some(action) = parse_action(action, pointers.len()) else {
            log::warn!("ignoring unknown pointer action {action:?}");
            return false;
        };
        self.inner.on_pointer_event(&PointerEvent::new(action, pointers))
    }

    /// Feed an incremental scale, e.g. from a wheel or gesture event.
    ///
    /// Only used when the editor was created with `pinch_source: 'detector'`.
    pub fn scale(&mut self, factor: f32, focal_x: f32, focal_y: f32) {
        self.inner.on_scale(ScaleEvent {
            factor,
            focal: Point::new(focal_x, focal_y),
        });
    }

    /// Draw the current view at canvas size.
    pub fn render(&self) -> JsImage {
        JsImage::from_rgba(self.inner.render_to_image())
    }

    /// The masked region of the image at full resolution.
    pub fn crop(&self) -> JsImage {
        JsImage::from_rgba(self.inner.crop())
    }

    /// The masked region encoded as PNG.
    pub fn crop_png(&self) -> Result<Vec<u8>, JsValue> {
        maskcrop_core::encode_png(&self.inner.crop()).map_err(to_js)
    }

    /// Raw mask alpha, one byte per image pixel.
    pub fn mask_alpha(&self) -> Vec<u8> {
        self.inner.mask().as_gray().as_raw().clone()
    }

    pub fn clear_mask(&mut self) {
        self.inner.clear_mask();
    }

    /// `true` to erase with subsequent strokes, `false` to paint.
    pub fn set_erasing(&mut self, erasing: bool) {
        let brush = if erasing { Brush::Erase } else { Brush::Paint };
        self.inner.set_brush(brush);
    }

    /// `true` makes a single finger pan instead of paint.
    pub fn set_pan_mode(&mut self, pan: bool) {
        let mode = if pan { PrimaryMode::Pan } else { PrimaryMode::Paint };
        self.inner.set_primary_mode(mode);
    }

    pub fn set_max_zoom(&mut self, max_zoom: f32) -> Result<(), JsValue> {
        self.inner.set_max_zoom(max_zoom).map_err(to_js)
    }

    pub fn set_min_zoom(&mut self, min_zoom: f32) -> Result<(), JsValue> {
        self.inner.set_min_zoom(min_zoom).map_err(to_js)
    }

    /// Whether a repaint is needed. Clears the flag.
    pub fn take_redraw(&mut self) -> bool {
        self.inner.take_redraw()
    }

    /// Current view as `[a, b, c, d, e, f]` for `CanvasRenderingContext2D.setTransform`.
    pub fn transform(&self) -> Vec<f32> {
        self.inner.transform().to_affine().to_vec()
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f32 {
        self.inner.transform().scale
    }

    #[wasm_bindgen(getter)]
    pub fn gesture_state(&self) -> String {
        state_name(self.inner.gesture_state()).to_string()
    }

    /// Current configuration as a plain object.
    pub fn config(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.inner.config())
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }
}

impl JsMaskCropEditor {
    pub(crate) fn with_config(config: EditorConfig) -> Result<Self, EditorError> {
        Ok(Self {
            inner: MaskCropEditor::new(config)?,
        })
    }
}
