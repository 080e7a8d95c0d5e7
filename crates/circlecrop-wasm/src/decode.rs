//! Image decoding WASM bindings.
//!
//! # Example
//!
//! ```typescript
//! import { decode_image, exceeds_upload_limit } from '@circlecrop/wasm';
//!
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! if (exceeds_upload_limit(bytes.byteLength)) {
//!   showWarning('Files over 10MB may be slow to process');
//! }
//! const image = decode_image(bytes);
//! console.log(`Decoded ${image.width}x${image.height}`);
//! ```

use crate::types::JsRasterImage;
use circlecrop_core::decode;
use wasm_bindgen::prelude::*;

/// Decode an uploaded image (JPEG, PNG, GIF, WebP or BMP) to RGBA.
///
/// EXIF orientation is applied, so the result is upright.
///
/// # Errors
///
/// Returns an error for empty payloads, unrecognised formats and corrupted files.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsRasterImage, JsValue> {
    decode::decode_image(bytes)
        .map(|source| JsRasterImage::from_raster(source.into_raster()))
        .map_err(|e| {
            log::warn!("decode failed: {e}");
            JsValue::from_str(&e.to_string())
        })
}

/// Whether a file is over the 10 MB advisory upload limit.
#[wasm_bindgen]
pub fn exceeds_upload_limit(byte_length: f64) -> bool {
    byte_length > decode::DEFAULT_MAX_UPLOAD_BYTES as f64
}
