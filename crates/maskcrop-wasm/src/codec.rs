//! Image decode/encode bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, encode_png } from '@maskcrop/wasm';
//!
//! const image = decode_image(new Uint8Array(await file.arrayBuffer()));
//! const png = encode_png(image);
//! ```

use crate::types::JsImage;
use maskcrop_core::io;
use wasm_bindgen::prelude::*;

/// Decode PNG or JPEG bytes into an RGBA image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsImage, JsValue> {
    io::decode_image(bytes)
        .map(|img| JsImage::from_rgba(img.as_rgba().clone()))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an RGBA image as PNG bytes, keeping transparency.
#[wasm_bindgen]
pub fn encode_png(image: &JsImage) -> Result<Vec<u8>, JsValue> {
    image
        .to_rgba()
        .and_then(|raster| io::encode_png(&raster))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
