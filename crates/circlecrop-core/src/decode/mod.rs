//! Image loading for Circle Crop.
//!
//! This module turns an uploaded file payload into a [`SourceImage`]: a
//! decoded RGBA raster with its natural dimensions plus the size it is shown
//! at in the crop widget.
//!
//! # Architecture
//!
//! Decoding is synchronous. In the browser the asynchronous part (reading the
//! `File`) happens in JavaScript before the bytes are handed to WASM; the
//! session's load tickets sequence those completions.
//!
//! # Examples
//!
//! ```ignore
//! use circlecrop_core::decode::decode_image;
//!
//! let bytes = std::fs::read("portrait.jpg").unwrap();
//! let source = decode_image(&bytes).unwrap();
//! println!("Decoded {}x{}", source.natural_width(), source.natural_height());
//! ```

mod loader;
mod types;

pub use loader::{decode_image, get_orientation};
pub use types::{
    DecodeError, FilterType, Orientation, RasterImage, SourceImage, BYTES_PER_PIXEL,
};

/// Advisory upload ceiling shown to the user (10 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Whether a payload is over the advisory upload ceiling.
///
/// The limit is only surfaced as a warning; oversized files still load.
pub fn exceeds_upload_limit(len: u64, max_bytes: u64) -> bool {
    len > max_bytes
}
