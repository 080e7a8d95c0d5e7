//! Pipeline configuration.
//!
//! Every field has a default matching the stock web app, and missing fields
//! fall back to those defaults when deserialising, so the JavaScript side can
//! pass a partial object such as `{ jpegQuality: 90 }`.

use serde::{Deserialize, Serialize};

use crate::decode::{FilterType, DEFAULT_MAX_UPLOAD_BYTES};
use crate::encode::{FormatPolicy, PdfPageSpec};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Advisory upload ceiling in bytes; larger files are loaded with a warning.
    pub max_upload_bytes: u64,
    /// Download name without extension.
    pub file_base_name: String,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
    /// Filter used by the fixed-size resize policies.
    pub resize_filter: FilterType,
    pub pdf_page_width_mm: f32,
    pub pdf_page_height_mm: f32,
    pub pdf_dpi: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            file_base_name: "cropped-image".to_string(),
            jpeg_quality: 100,
            resize_filter: FilterType::Bilinear,
            pdf_page_width_mm: PdfPageSpec::A4.width_mm,
            pdf_page_height_mm: PdfPageSpec::A4.height_mm,
            pdf_dpi: PdfPageSpec::A4.dpi,
        }
    }
}

impl PipelineConfig {
    /// Download name for a format, e.g. `cropped-image.jpg`.
    pub fn file_name(&self, format: FormatPolicy) -> String {
        format!("{}.{}", self.file_base_name, format.extension())
    }

    pub fn pdf_page(&self) -> PdfPageSpec {
        PdfPageSpec {
            width_mm: self.pdf_page_width_mm,
            height_mm: self.pdf_page_height_mm,
            dpi: self.pdf_dpi,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert_eq!(config.jpeg_quality, 100);
        assert_eq!(config.pdf_page(), PdfPageSpec::A4);
    }

    #[test]
    fn test_file_names() {
        let config = PipelineConfig::default();
        assert_eq!(config.file_name(FormatPolicy::Png), "cropped-image.png");
        assert_eq!(config.file_name(FormatPolicy::Jpeg), "cropped-image.jpg");
        assert_eq!(config.file_name(FormatPolicy::Pdf), "cropped-image.pdf");
    }

    #[test]
    fn test_custom_base_name() {
        let mut config = PipelineConfig::default();
        config.file_base_name = "avatar".to_string();
        assert_eq!(config.file_name(FormatPolicy::Png), "avatar.png");
    }
}
