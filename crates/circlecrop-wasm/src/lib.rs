//! Circle Crop WASM - WebAssembly bindings for Circle Crop
//!
//! This crate provides WASM bindings to expose the circlecrop-core pipeline
//! to the JavaScript page that hosts the crop widget.
//!
//! # Module Structure
//!
//! - `session` - `CropSession`, the stateful load/crop/export workflow
//! - `types` - WASM-compatible wrapper types for images and exported files
//! - `decode` - Image decoding bindings
//! - `transform` - Circular crop and rotation bindings
//! - `encode` - Resize and export bindings
//! - `download` - Browser download of an exported file
//! - `logger` - Console backend for the `log` crate
//!
//! # Usage
//!
//! ```typescript
//! import init, { CropSession } from '@circlecrop/wasm';
//!
//! // Initialize WASM module (must call first)
//! await init();
//!
//! const session = new CropSession();
//! session.load(new Uint8Array(await file.arrayBuffer()));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod download;
mod encode;
mod logger;
mod session;
mod transform;
mod types;

// Re-export public types
pub use decode::{decode_image, exceeds_upload_limit};
pub use download::download_file;
pub use encode::{export_image, resize_to_policy};
pub use logger::set_log_level;
pub use session::{CropSession, JsLoadTicket};
pub use transform::{apply_rotation, render_circular_crop};
pub use types::{JsExportedFile, JsRasterImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::install();
    log::debug!("circlecrop-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Log an error at the binding boundary and convert it for JavaScript.
pub(crate) fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    log::warn!("{e}");
    JsValue::from_str(&e.to_string())
}
