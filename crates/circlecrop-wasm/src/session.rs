//! Stateful crop session exposed to JavaScript.
//!
//! # Example
//!
//! ```typescript
//! import { CropSession, download_file } from '@circlecrop/wasm';
//!
//! const session = new CropSession({ jpegQuality: 95 });
//!
//! input.onchange = async () => {
//!   const ticket = session.begin_load();
//!   const bytes = new Uint8Array(await input.files[0].arrayBuffer());
//!   if (!session.finish_load(ticket, bytes)) return; // superseded
//! };
//!
//! cropper.onCropComplete = (area) =>
//!   session.update_crop_area(area.x, area.y, area.width, area.height);
//!
//! const circle = session.render();
//! session.set_format('jpg');
//! session.download();
//! ```

use crate::download::download_file;
use crate::to_js_error;
use crate::types::{JsExportedFile, JsRasterImage};
use circlecrop_core::{
    CropRect, FormatPolicy, LoadOutcome, LoadTicket, PipelineConfig, Session, SizePolicy,
};
use wasm_bindgen::prelude::*;

/// Handle for an in-flight load, returned by [`CropSession::begin_load`].
#[wasm_bindgen]
pub struct JsLoadTicket {
    inner: LoadTicket,
}

/// One crop workflow: load, adjust, render, export.
#[wasm_bindgen]
pub struct CropSession {
    inner: Session,
}

#[wasm_bindgen]
impl CropSession {
    /// Create a session. `config` may be `undefined` or a partial
    /// `PipelineConfig` object; missing fields take their defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CropSession, JsValue> {
        let config: PipelineConfig = if config.is_undefined() || config.is_null() {
            PipelineConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(to_js_error)?
        };
        Ok(Self::with_config(config))
    }

    /// Current phase: `"idle"`, `"cropping"` or `"result"`.
    #[wasm_bindgen(getter)]
    pub fn phase(&self) -> String {
        self.inner.phase().to_string()
    }

    /// Start reading a file. Tickets from earlier loads become stale.
    pub fn begin_load(&mut self) -> JsLoadTicket {
        JsLoadTicket {
            inner: self.inner.begin_load(),
        }
    }

    /// Finish a load with the file's bytes.
    ///
    /// Returns `false` if the ticket is stale (a reset or newer load
    /// happened meanwhile), in which case nothing changes.
    pub fn finish_load(&mut self, ticket: &JsLoadTicket, bytes: &[u8]) -> Result<bool, JsValue> {
        match self.inner.finish_load(ticket.inner, bytes) {
            Ok(LoadOutcome::Loaded { .. }) => Ok(true),
            Ok(LoadOutcome::Stale) => Ok(false),
            Err(e) => Err(to_js_error(e)),
        }
    }

    /// Load bytes that are already in memory.
    pub fn load(&mut self, bytes: &[u8]) -> Result<(), JsValue> {
        self.inner.load(bytes).map(|_| ()).map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn natural_width(&self) -> Option<u32> {
        self.inner.source().map(|s| s.natural_width())
    }

    #[wasm_bindgen(getter)]
    pub fn natural_height(&self) -> Option<u32> {
        self.inner.source().map(|s| s.natural_height())
    }

    /// Report the size the image is displayed at in the crop widget.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> Result<(), JsValue> {
        self.inner
            .set_display_size(width, height)
            .map_err(to_js_error)
    }

    /// Report the widget's latest crop rectangle, in display pixels.
    pub fn update_crop_area(
        &mut self,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    ) -> Result<(), JsValue> {
        self.inner
            .update_crop_area(CropRect::new(x, y, width, height))
            .map_err(to_js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.controls().zoom()
    }

    #[wasm_bindgen(setter)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    /// Zoom as shown next to the slider, e.g. `150` for 1.5x.
    #[wasm_bindgen(getter)]
    pub fn zoom_percent(&self) -> u32 {
        self.inner.controls().zoom_percent()
    }

    #[wasm_bindgen(getter)]
    pub fn rotation(&self) -> f64 {
        self.inner.controls().rotation()
    }

    #[wasm_bindgen(setter)]
    pub fn set_rotation(&mut self, degrees: f64) {
        self.inner.set_rotation(degrees);
    }

    /// Export format: `"png"`, `"jpg"` or `"pdf"`.
    #[wasm_bindgen(getter)]
    pub fn format(&self) -> String {
        self.inner.format().to_string()
    }

    pub fn set_format(&mut self, format: &str) -> Result<(), JsValue> {
        let format: FormatPolicy = format.parse().map_err(to_js_error)?;
        self.inner.set_format(format);
        Ok(())
    }

    /// Export size: `"original"`, `"256"` or `"1080"`.
    #[wasm_bindgen(getter)]
    pub fn size(&self) -> String {
        self.inner.size().to_string()
    }

    pub fn set_size(&mut self, size: &str) -> Result<(), JsValue> {
        let size: SizePolicy = size.parse().map_err(to_js_error)?;
        self.inner.set_size(size);
        Ok(())
    }

    /// Render the circular crop and return a copy for preview.
    pub fn render(&mut self) -> Result<JsRasterImage, JsValue> {
        self.inner.render().map_err(to_js_error)?;
        self.cropped()
            .ok_or_else(|| JsValue::from_str("Render produced no result"))
    }

    /// The rendered circle, if the session is in the result phase.
    pub fn cropped(&self) -> Option<JsRasterImage> {
        self.inner
            .cropped()
            .cloned()
            .map(JsRasterImage::from_raster)
    }

    /// Encode the result with the current format and size.
    pub fn export(&self) -> Result<JsExportedFile, JsValue> {
        self.inner
            .export()
            .map(JsExportedFile::from_exported)
            .map_err(to_js_error)
    }

    /// Export and immediately trigger a browser download.
    pub fn download(&self) -> Result<(), JsValue> {
        download_file(&self.export()?)
    }

    /// Return to the idle phase, discarding the image and any result.
    pub fn reset(&mut self) {
        self.inner.reset();
    }
}

impl CropSession {
    pub(crate) fn with_config(config: PipelineConfig) -> Self {
        Self {
            inner: Session::new(config),
        }
    }
}
