//! Browser download of exported files.
//!
//! Wraps the bytes in a `Blob`, points a temporary `<a download>` at an
//! object URL for it, clicks the anchor and revokes the URL again.

use crate::types::JsExportedFile;
use js_sys::{Array, Uint8Array};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Blob, BlobPropertyBag, HtmlAnchorElement, Url};

/// Trigger a browser download of an exported file.
///
/// # Errors
///
/// Fails outside a browser window or if the DOM refuses the anchor.
#[wasm_bindgen]
pub fn download_file(file: &JsExportedFile) -> Result<(), JsValue> {
    let result = trigger_download(&file.file_name(), &file.mime_type(), file.as_bytes());
    match &result {
        Ok(()) => log::info!("downloaded {}", file.file_name()),
        Err(e) => log::warn!("download of {} failed: {e:?}", file.file_name()),
    }
    result
}

fn trigger_download(file_name: &str, mime_type: &str, bytes: &[u8]) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let document = window
        .document()
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let parts = Array::of1(&Uint8Array::from(bytes));
    let options = BlobPropertyBag::new();
    options.set_type(mime_type);
    let blob = Blob::new_with_u8_array_sequence_and_options(&parts, &options)?;
    let url = Url::create_object_url_with_blob(&blob)?;

    let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
    anchor.set_href(&url);
    anchor.set_download(file_name);

    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("No document body"))?;
    body.append_child(&anchor)?;
    anchor.click();
    body.remove_child(&anchor)?;

    Url::revoke_object_url(&url)
}
