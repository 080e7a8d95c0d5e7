//! JPEG encoding for export.
//!
//! JPEG has no alpha channel. The raster is first composited onto an opaque
//! white canvas of the same size, so the transparent corners around the
//! circle come out white instead of black.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate_raster, EncodeError};
use crate::decode::{RasterImage, BYTES_PER_PIXEL};

/// Encode RGB pixel data to JPEG bytes.
///
/// # Arguments
///
/// * `pixels` - RGB pixel data (3 bytes per pixel, row-major order)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
pub fn encode_jpeg(
    pixels: &[u8],
    width: u32,
    height: u32,
    quality: u8,
) -> Result<Vec<u8>, EncodeError> {
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let expected = (width as usize) * (height as usize) * 3;
    if pixels.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: pixels.len(),
        });
    }

    let quality = quality.clamp(1, 100);
    let mut buffer = Cursor::new(Vec::new());

    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(pixels, width, height, ExtendedColorType::Rgb8)
        .map_err(|e| EncodeError::EncodingFailed {
            format: "JPEG",
            message: e.to_string(),
        })?;

    Ok(buffer.into_inner())
}

/// Draw the raster over an opaque white canvas of identical dimensions.
///
/// Every pixel of the result has full alpha.
pub fn composite_over_white(image: &RasterImage) -> RasterImage {
    let mut pixels = Vec::with_capacity(image.pixels.len());

    for p in image.pixels.chunks_exact(BYTES_PER_PIXEL) {
        let a = p[3] as u32;
        let inv = 255 - a;
        for &c in &p[..3] {
            pixels.push(((c as u32 * a + 255 * inv + 127) / 255) as u8);
        }
        pixels.push(u8::MAX);
    }

    RasterImage {
        width: image.width,
        height: image.height,
        pixels,
    }
}

/// Flatten onto white and encode as JPEG.
pub fn encode_jpeg_over_white(image: &RasterImage, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate_raster(image)?;

    let flattened = composite_over_white(image);
    let rgb: Vec<u8> = flattened
        .pixels
        .chunks_exact(BYTES_PER_PIXEL)
        .flat_map(|p| [p[0], p[1], p[2]])
        .collect();

    encode_jpeg(&rgb, image.width, image.height, quality)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_jpeg_basic() {
        let pixels = vec![128u8; 100 * 100 * 3];
        let jpeg_bytes = encode_jpeg(&pixels, 100, 100, 90).unwrap();

        // SOI / EOI markers
        assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8]);
        let len = jpeg_bytes.len();
        assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9]);
    }

    #[test]
    fn test_encode_jpeg_quality_clamping() {
        let pixels = vec![128u8; 10 * 10 * 3];
        assert!(encode_jpeg(&pixels, 10, 10, 0).is_ok());
        assert!(encode_jpeg(&pixels, 10, 10, 255).is_ok());
    }

    #[test]
    fn test_encode_jpeg_invalid_pixel_data() {
        let pixels = vec![128u8; 99 * 100 * 3];
        let result = encode_jpeg(&pixels, 100, 100, 90);
        assert!(matches!(result, Err(EncodeError::InvalidPixelData { .. })));
    }

    #[test]
    fn test_encode_jpeg_zero_dimensions() {
        assert!(matches!(
            encode_jpeg(&[], 0, 100, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            encode_jpeg(&[], 100, 0, 90),
            Err(EncodeError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_composite_transparent_becomes_white() {
        let img = RasterImage::new(2, 1, vec![10, 20, 30, 0, 10, 20, 30, 255]);
        let flat = composite_over_white(&img);

        assert_eq!(flat.pixel(0, 0), Some([255, 255, 255, 255]));
        assert_eq!(flat.pixel(1, 0), Some([10, 20, 30, 255]));
        assert!(flat.is_opaque());
    }

    #[test]
    fn test_composite_half_alpha_blends() {
        let img = RasterImage::new(1, 1, vec![0, 0, 0, 128]);
        let flat = composite_over_white(&img);
        // 255 * 127 / 255 = 127
        assert_eq!(flat.pixel(0, 0), Some([127, 127, 127, 255]));
    }

    #[test]
    fn test_jpeg_of_transparent_corners_is_opaque_white() {
        // Opaque dark disc-ish centre, transparent border
        let side = 32u32;
        let mut img = RasterImage::transparent(side, side).unwrap();
        for y in 12..20 {
            for x in 12..20 {
                let idx = ((y * side + x) * 4) as usize;
                img.pixels[idx..idx + 4].copy_from_slice(&[0, 0, 0, 255]);
            }
        }

        let bytes = encode_jpeg_over_white(&img, 100).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(!decoded.color().has_alpha());

        let rgb = decoded.into_rgb8();
        for (x, y) in [(0, 0), (31, 0), (0, 31), (31, 31)] {
            let p = rgb.get_pixel(x, y).0;
            assert!(p.iter().all(|&c| c >= 250), "corner ({x}, {y}) = {p:?}");
        }
        assert!(rgb.get_pixel(16, 16).0.iter().all(|&c| c <= 10));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
