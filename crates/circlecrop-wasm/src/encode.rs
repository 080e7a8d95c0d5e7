//! Resize and export WASM bindings.
//!
//! # Functions
//!
//! - [`resize_to_policy`] - Apply a size policy (`"original"`, `"256"`, `"1080"`)
//! - [`export_image`] - Encode as `"png"`, `"jpg"` or `"pdf"`
//!
//! # Example
//!
//! ```typescript
//! import { resize_to_policy, export_image, download_file } from '@circlecrop/wasm';
//!
//! const sized = resize_to_policy(circle, '256');
//! const file = export_image(sized, 'jpg');
//! download_file(file);
//! ```

use crate::to_js_error;
use crate::types::{JsExportedFile, JsRasterImage};
use circlecrop_core::{apply_size_policy, export, FormatPolicy, PipelineConfig, SizePolicy};
use wasm_bindgen::prelude::*;

/// Resize an image according to a size policy.
///
/// `"original"` returns an unchanged copy; `"256"` and `"1080"` produce an
/// exactly square image of that side.
#[wasm_bindgen]
pub fn resize_to_policy(image: &JsRasterImage, policy: &str) -> Result<JsRasterImage, JsValue> {
    let policy: SizePolicy = policy.parse().map_err(to_js_error)?;
    let config = PipelineConfig::default();

    apply_size_policy(&image.to_raster(), policy, config.resize_filter)
        .map(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Encode an image for download with the default file naming.
///
/// PNG keeps the transparent corners; JPEG flattens them onto white; PDF
/// places the image across the width of an A4 page.
#[wasm_bindgen]
pub fn export_image(image: &JsRasterImage, format: &str) -> Result<JsExportedFile, JsValue> {
    let format: FormatPolicy = format.parse().map_err(to_js_error)?;

    export(&image.to_raster(), format, &PipelineConfig::default())
        .map(JsExportedFile::from_exported)
        .map_err(to_js_error)
}
