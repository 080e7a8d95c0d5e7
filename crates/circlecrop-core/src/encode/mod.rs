//! Export pipeline for Circle Crop.
//!
//! This module turns a rendered raster into a downloadable file:
//! - PNG with the circular transparency intact
//! - JPEG flattened onto white (JPEG has no alpha channel)
//! - A single-page PDF with the image across the page width
//!
//! # Architecture
//!
//! Encoding is pure: the same raster and options always give the same bytes.
//! Triggering the actual browser download is left to the caller.
//!
//! # Examples
//!
//! ```ignore
//! use circlecrop_core::encode::{export, FormatPolicy};
//! use circlecrop_core::PipelineConfig;
//!
//! let file = export(&raster, FormatPolicy::Png, &PipelineConfig::default()).unwrap();
//! assert_eq!(file.file_name, "cropped-image.png");
//! ```

mod jpeg;
mod pdf;
mod png;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::PipelineConfig;
use crate::decode::RasterImage;
use crate::error::ParsePolicyError;

pub use jpeg::{composite_over_white, encode_jpeg, encode_jpeg_over_white};
pub use pdf::{encode_pdf, layout_on_page, PdfLayout, PdfPageSpec};
pub use png::encode_png;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes, got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The underlying encoder failed
    #[error("{format} encoding failed: {message}")]
    EncodingFailed {
        format: &'static str,
        message: String,
    },
}

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FormatPolicy {
    #[default]
    #[serde(rename = "png")]
    Png,
    #[serde(rename = "jpg", alias = "jpeg")]
    Jpeg,
    #[serde(rename = "pdf")]
    Pdf,
}

impl FormatPolicy {
    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            FormatPolicy::Png => "png",
            FormatPolicy::Jpeg => "jpg",
            FormatPolicy::Pdf => "pdf",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            FormatPolicy::Png => "image/png",
            FormatPolicy::Jpeg => "image/jpeg",
            FormatPolicy::Pdf => "application/pdf",
        }
    }
}

impl fmt::Display for FormatPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FormatPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Ok(FormatPolicy::Png),
            "jpg" | "jpeg" => Ok(FormatPolicy::Jpeg),
            "pdf" => Ok(FormatPolicy::Pdf),
            _ => Err(ParsePolicyError::new("format", s)),
        }
    }
}

/// An encoded file ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    /// Download name, e.g. `cropped-image.png`.
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Encode a raster in the requested format.
pub fn export(
    image: &RasterImage,
    format: FormatPolicy,
    config: &PipelineConfig,
) -> Result<ExportedFile, EncodeError> {
    let bytes = match format {
        FormatPolicy::Png => encode_png(image)?,
        FormatPolicy::Jpeg => encode_jpeg_over_white(image, config.jpeg_quality)?,
        FormatPolicy::Pdf => encode_pdf(image, &config.pdf_page(), &config.file_base_name)?,
    };

    let file_name = config.file_name(format);
    log::debug!(
        "exported {}x{} raster as {file_name} ({} bytes)",
        image.width,
        image.height,
        bytes.len()
    );

    Ok(ExportedFile {
        file_name,
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Check that an RGBA raster is encodable.
pub(crate) fn validate_raster(image: &RasterImage) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = image
        .expected_len()
        .ok_or(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        })?;
    if image.pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.pixels.len(),
        });
    }

    Ok(())
}
