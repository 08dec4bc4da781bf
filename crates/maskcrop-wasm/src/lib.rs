//! MaskCrop WASM - WebAssembly bindings for the MaskCrop editor
//!
//! This crate exposes the maskcrop-core editor to JavaScript/TypeScript
//! applications drawing into a `<canvas>`.
//!
//! # Module Structure
//!
//! - `editor` - The interactive zoom/pan/mask editor handle
//! - `types` - WASM-compatible wrapper types for image data
//! - `codec` - PNG/JPEG decoding and PNG encoding
//! - `logger` - Console backend for the `log` facade
//!
//! # Usage
//!
//! ```typescript
//! import init, { set_log_level, JsMaskCropEditor } from '@maskcrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//! set_log_level('debug');
//!
//! const editor = new JsMaskCropEditor();
//! editor.resize(canvas.width, canvas.height);
//! editor.load_image(new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod codec;
mod editor;
mod logger;
mod types;

// Re-export public types
pub use codec::{decode_image, encode_png};
pub use editor::JsMaskCropEditor;
pub use types::JsImage;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install(log::LevelFilter::Warn);
}

/// Set the console log level: `off`, `error`, `warn`, `info`, `debug` or `trace`.
///
/// Unknown names fall back to `warn`.
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    logger::install(logger::level_from_str(level));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
