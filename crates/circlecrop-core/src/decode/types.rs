//! Core types for decoded images.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::ScaleFactors;

/// Bytes per RGBA8 pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Error types for image decoding operations.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload contained no bytes.
    #[error("Image payload is empty")]
    Empty,

    /// The file format is not recognized or supported.
    #[error("Invalid or unsupported image format")]
    InvalidFormat,

    /// The image file is corrupted or incomplete.
    #[error("Corrupted or incomplete image file: {0}")]
    CorruptedFile(String),
}

/// Filter type for image resizing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FilterType {
    /// Nearest neighbor interpolation (fastest, lowest quality).
    Nearest,
    /// Bilinear interpolation (fast, acceptable quality).
    #[default]
    Bilinear,
    /// Lanczos3 interpolation (slower, highest quality).
    Lanczos3,
}

impl FilterType {
    /// Convert to the image crate's FilterType.
    pub fn to_image_filter(self) -> image::imageops::FilterType {
        match self {
            FilterType::Nearest => image::imageops::FilterType::Nearest,
            FilterType::Bilinear => image::imageops::FilterType::Triangle,
            FilterType::Lanczos3 => image::imageops::FilterType::Lanczos3,
        }
    }
}

/// EXIF orientation values (1-8).
/// See: https://exiftool.org/TagNames/EXIF.html
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Orientation {
    #[default]
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    /// Flip horizontal + rotate 270 CW.
    Transpose = 5,
    Rotate90CW = 6,
    /// Flip horizontal + rotate 90 CW.
    Transverse = 7,
    Rotate270CW = 8,
}

impl From<u32> for Orientation {
    fn from(value: u32) -> Self {
        match value {
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90CW,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270CW,
            _ => Orientation::Normal,
        }
    }
}

/// An in-memory RGBA8 raster.
///
/// Rasters are plain values: every pipeline stage allocates a fresh one and
/// hands it to the next stage by move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGBA pixel data in row-major order (4 bytes per pixel, straight alpha).
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Create a new RasterImage with the given dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            Some(pixels.len()),
            buffer_len(width, height),
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Create a fully transparent raster.
    ///
    /// Returns `None` when the buffer size does not fit in `usize`.
    pub fn transparent(width: u32, height: u32) -> Option<Self> {
        let len = buffer_len(width, height)?;
        Some(Self {
            width,
            height,
            pixels: vec![0u8; len],
        })
    }

    pub fn from_rgba_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Borrow as an `image::RgbaImage`, copying the buffer.
    ///
    /// Returns `None` when the buffer is too short for the dimensions.
    pub fn to_rgba_image(&self) -> Option<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    /// Expected buffer length for the current dimensions, `None` on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        buffer_len(self.width, self.height)
    }

    /// Check that the pixel buffer matches the dimensions.
    ///
    /// Rasters built field by field (for example from JavaScript) are not
    /// checked on construction.
    pub fn validate(&self) -> Result<(), DecodeError> {
        match self.expected_len() {
            Some(expected) if expected == self.pixels.len() => Ok(()),
            expected => Err(DecodeError::CorruptedFile(format!(
                "pixel buffer of {} bytes does not match {}x{} RGBA ({expected:?} bytes)",
                self.pixels.len(),
                self.width,
                self.height
            ))),
        }
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// RGBA value at `(x, y)`, or `None` outside the raster.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * BYTES_PER_PIXEL;
        self.pixels
            .get(idx..idx + BYTES_PER_PIXEL)
            .map(|p| [p[0], p[1], p[2], p[3]])
    }

    /// True when every pixel has full alpha.
    pub fn is_opaque(&self) -> bool {
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .all(|p| p[3] == u8::MAX)
    }
}

fn buffer_len(width: u32, height: u32) -> Option<usize> {
    (width as usize)
        .checked_mul(height as usize)?
        .checked_mul(BYTES_PER_PIXEL)
}

/// A decoded source image plus the size it is currently displayed at.
///
/// The crop widget reports geometry in display coordinates; the natural
/// (intrinsic) raster may be larger or smaller.
#[derive(Debug, Clone)]
pub struct SourceImage {
    raster: RasterImage,
    display_width: f64,
    display_height: f64,
}

impl SourceImage {
    /// Wrap a raster; the display size starts out equal to the natural size.
    pub fn new(raster: RasterImage) -> Self {
        let display_width = raster.width as f64;
        let display_height = raster.height as f64;
        Self {
            raster,
            display_width,
            display_height,
        }
    }

    pub fn with_display_size(mut self, width: f64, height: f64) -> Self {
        self.set_display_size(width, height);
        self
    }

    /// Record the on-screen size of the image.
    ///
    /// Non-finite or non-positive sizes are ignored and `false` is returned.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> bool {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return false;
        }
        self.display_width = width;
        self.display_height = height;
        true
    }

    pub fn raster(&self) -> &RasterImage {
        &self.raster
    }

    pub fn into_raster(self) -> RasterImage {
        self.raster
    }

    pub fn natural_width(&self) -> u32 {
        self.raster.width
    }

    pub fn natural_height(&self) -> u32 {
        self.raster.height
    }

    pub fn display_width(&self) -> f64 {
        self.display_width
    }

    pub fn display_height(&self) -> f64 {
        self.display_height
    }

    /// Factors that map display coordinates onto natural pixels.
    pub fn scale_factors(&self) -> ScaleFactors {
        ScaleFactors::from_dimensions(
            self.raster.width as f64,
            self.raster.height as f64,
            self.display_width,
            self.display_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_type_conversion() {
        assert!(matches!(
            FilterType::Nearest.to_image_filter(),
            image::imageops::FilterType::Nearest
        ));
        assert!(matches!(
            FilterType::Bilinear.to_image_filter(),
            image::imageops::FilterType::Triangle
        ));
        assert!(matches!(
            FilterType::Lanczos3.to_image_filter(),
            image::imageops::FilterType::Lanczos3
        ));
    }

    #[test]
    fn test_orientation_from_u32() {
        assert_eq!(Orientation::from(1), Orientation::Normal);
        assert_eq!(Orientation::from(6), Orientation::Rotate90CW);
        assert_eq!(Orientation::from(99), Orientation::Normal);
    }

    #[test]
    fn test_raster_creation() {
        let img = RasterImage::new(100, 50, vec![0u8; 100 * 50 * 4]);

        assert_eq!(img.expected_len(), Some(20000));
        assert!(img.validate().is_ok());
        assert!(!img.is_empty());
    }

    #[test]
    fn test_validate_short_buffer() {
        let img = RasterImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(matches!(img.validate(), Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_transparent_overflow() {
        assert!(RasterImage::transparent(u32::MAX, u32::MAX).is_none());
        assert!(RasterImage {
            width: u32::MAX,
            height: u32::MAX,
            pixels: vec![],
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_raster_empty() {
        let img = RasterImage::new(0, 0, vec![]);
        assert!(img.is_empty());
    }

    #[test]
    fn test_transparent_raster() {
        let img = RasterImage::transparent(3, 2).unwrap();
        assert_eq!(img.pixels.len(), 24);
        assert_eq!(img.pixel(2, 1), Some([0, 0, 0, 0]));
        assert!(!img.is_opaque());
    }

    #[test]
    fn test_pixel_out_of_bounds() {
        let img = RasterImage::transparent(3, 2).unwrap();
        assert_eq!(img.pixel(3, 0), None);
        assert_eq!(img.pixel(0, 2), None);
    }

    #[test]
    fn test_rgba_image_round_trip_keeps_alpha() {
        let pixels = vec![10, 20, 30, 40, 50, 60, 70, 80];
        let img = RasterImage::new(2, 1, pixels.clone());
        let back = RasterImage::from_rgba_image(img.to_rgba_image().unwrap());
        assert_eq!(back.pixels, pixels);
    }

    #[test]
    fn test_to_rgba_image_short_buffer() {
        let img = RasterImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 12],
        };
        assert!(img.to_rgba_image().is_none());
    }

    #[test]
    fn test_source_display_defaults_to_natural() {
        let source = SourceImage::new(RasterImage::transparent(40, 20).unwrap());
        assert_eq!(source.display_width(), 40.0);
        assert_eq!(source.display_height(), 20.0);
        assert_eq!(source.scale_factors(), ScaleFactors::identity());
    }

    #[test]
    fn test_source_display_size_rejects_invalid() {
        let mut source = SourceImage::new(RasterImage::transparent(40, 20).unwrap());
        assert!(!source.set_display_size(0.0, 10.0));
        assert!(!source.set_display_size(f64::NAN, 10.0));
        assert!(source.set_display_size(10.0, 5.0));

        let scale = source.scale_factors();
        assert_eq!(scale.x, 4.0);
        assert_eq!(scale.y, 4.0);
    }

    #[test]
    fn test_decode_error_display() {
        assert_eq!(
            DecodeError::InvalidFormat.to_string(),
            "Invalid or unsupported image format"
        );
        assert_eq!(
            DecodeError::CorruptedFile("truncated".to_string()).to_string(),
            "Corrupted or incomplete image file: truncated"
        );
    }
}
