//! Circle Crop Core - Image processing library
//!
//! This crate provides the image pipeline behind the Circle Crop web app:
//! decoding an upload, rendering a circular crop with transparent corners,
//! resizing to a fixed export size and encoding as PNG, JPEG or PDF.
//!
//! [`Session`] ties the pieces together into the `Idle -> Cropping -> Result`
//! workflow the page drives.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod geometry;
pub mod resize;
pub mod session;
pub mod transform;

pub use config::PipelineConfig;
pub use decode::{decode_image, DecodeError, FilterType, RasterImage, SourceImage};
pub use encode::{export, EncodeError, ExportedFile, FormatPolicy};
pub use error::{CropError, ParsePolicyError};
pub use geometry::{CropControls, CropRect, ScaleFactors};
pub use resize::{apply_size_policy, SizePolicy};
pub use session::{LoadOutcome, LoadTicket, Phase, Session};
pub use transform::{apply_rotation, compute_rotated_bounds, render_circular};
