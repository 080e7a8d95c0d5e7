//! Output resizing according to the selected size policy.
//!
//! The rendered circle is square, so the fixed sizes stretch each axis to
//! the target independently; for square input that is the same as a uniform
//! scale. All functions return new rasters without modifying the input.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::decode::{DecodeError, FilterType, RasterImage};
use crate::error::ParsePolicyError;

/// Target dimensions for the exported image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SizePolicy {
    /// Keep the rendered size.
    #[default]
    #[serde(rename = "original")]
    Original,
    /// 256 x 256 pixels.
    #[serde(rename = "256")]
    Fixed256,
    /// 1080 x 1080 pixels.
    #[serde(rename = "1080")]
    Fixed1080,
}

impl SizePolicy {
    /// Square side for fixed policies, `None` for `Original`.
    pub fn target_dimension(self) -> Option<u32> {
        match self {
            SizePolicy::Original => None,
            SizePolicy::Fixed256 => Some(256),
            SizePolicy::Fixed1080 => Some(1080),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SizePolicy::Original => "original",
            SizePolicy::Fixed256 => "256",
            SizePolicy::Fixed1080 => "1080",
        }
    }
}

impl fmt::Display for SizePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SizePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "original" => Ok(SizePolicy::Original),
            "256" => Ok(SizePolicy::Fixed256),
            "1080" => Ok(SizePolicy::Fixed1080),
            _ => Err(ParsePolicyError::new("size", s)),
        }
    }
}

/// Apply a size policy to a rendered raster.
///
/// `Original` returns a copy with the same dimensions; fixed policies return
/// exactly `d x d`.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the pixel buffer does not match the
/// raster's dimensions.
pub fn apply_size_policy(
    image: &RasterImage,
    policy: SizePolicy,
    filter: FilterType,
) -> Result<RasterImage, DecodeError> {
    match policy.target_dimension() {
        None => resize(image, image.width, image.height, filter),
        Some(side) => {
            if image.width != image.height {
                log::warn!(
                    "stretching non-square {}x{} raster to {side}x{side}",
                    image.width,
                    image.height
                );
            }
            resize(image, side, side, filter)
        }
    }
}

/// Resize an image to exact dimensions.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` for a zero target dimension and
/// `DecodeError::CorruptedFile` if the source buffer cannot be wrapped.
pub fn resize(
    image: &RasterImage,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RasterImage, DecodeError> {
    if width == 0 || height == 0 {
        return Err(DecodeError::InvalidFormat);
    }

    let rgba = image
        .to_rgba_image()
        .ok_or_else(|| DecodeError::CorruptedFile("Failed to create RgbaImage".to_string()))?;

    // Fast path: if dimensions match, just hand back the copy
    if image.width == width && image.height == height {
        return Ok(RasterImage::from_rgba_image(rgba));
    }

    let resized = image::imageops::resize(&rgba, width, height, filter.to_image_filter());

    log::debug!(
        "resized {}x{} -> {}x{} ({:?})",
        image.width,
        image.height,
        width,
        height,
        filter
    );

    Ok(RasterImage::from_rgba_image(resized))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_image(width: u32, height: u32) -> RasterImage {
        let mut pixels = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.push(((x * 255) / width.max(1)) as u8);
                pixels.push(((y * 255) / height.max(1)) as u8);
                pixels.push(128);
                pixels.push(if (x + y) % 2 == 0 { 255 } else { 0 });
            }
        }
        RasterImage::new(width, height, pixels)
    }

    #[test]
    fn test_policy_dimensions() {
        assert_eq!(SizePolicy::Original.target_dimension(), None);
        assert_eq!(SizePolicy::Fixed256.target_dimension(), Some(256));
        assert_eq!(SizePolicy::Fixed1080.target_dimension(), Some(1080));
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("original".parse::<SizePolicy>().unwrap(), SizePolicy::Original);
        assert_eq!("256".parse::<SizePolicy>().unwrap(), SizePolicy::Fixed256);
        assert_eq!(" 1080 ".parse::<SizePolicy>().unwrap(), SizePolicy::Fixed1080);
        assert!("512".parse::<SizePolicy>().is_err());
    }

    #[test]
    fn test_policy_display_round_trips() {
        for policy in [SizePolicy::Original, SizePolicy::Fixed256, SizePolicy::Fixed1080] {
            assert_eq!(policy.to_string().parse::<SizePolicy>().unwrap(), policy);
        }
    }

    #[test]
    fn test_original_keeps_pixels() {
        let img = create_test_image(80, 80);
        let out = apply_size_policy(&img, SizePolicy::Original, FilterType::Bilinear).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_fixed_256() {
        let img = create_test_image(800, 800);
        let out = apply_size_policy(&img, SizePolicy::Fixed256, FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (256, 256));
        assert_eq!(out.pixels.len(), 256 * 256 * 4);
    }

    #[test]
    fn test_fixed_1080_upscales() {
        let img = create_test_image(100, 100);
        let out = apply_size_policy(&img, SizePolicy::Fixed1080, FilterType::Nearest).unwrap();
        assert_eq!((out.width, out.height), (1080, 1080));
    }

    #[test]
    fn test_fixed_stretches_non_square() {
        let img = create_test_image(300, 100);
        let out = apply_size_policy(&img, SizePolicy::Fixed256, FilterType::Bilinear).unwrap();
        assert_eq!((out.width, out.height), (256, 256));
    }

    #[test]
    fn test_resize_zero_dimensions_error() {
        let img = create_test_image(10, 10);
        assert!(resize(&img, 0, 5, FilterType::Bilinear).is_err());
        assert!(resize(&img, 5, 0, FilterType::Bilinear).is_err());
    }

    #[test]
    fn test_resize_bad_buffer_error() {
        let img = RasterImage {
            width: 10,
            height: 10,
            pixels: vec![0u8; 7],
        };
        let result = apply_size_policy(&img, SizePolicy::Fixed256, FilterType::Bilinear);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_resize_keeps_transparency() {
        let img = RasterImage::transparent(64, 64).unwrap();
        let out = apply_size_policy(&img, SizePolicy::Fixed256, FilterType::Lanczos3).unwrap();
        assert!(out.pixels.chunks_exact(4).all(|p| p[3] == 0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn policy_strategy() -> impl Strategy<Value = SizePolicy> {
        prop_oneof![
            Just(SizePolicy::Original),
            Just(SizePolicy::Fixed256),
            Just(SizePolicy::Fixed1080),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        /// Property: Fixed policies always produce exactly the target size.
        #[test]
        fn prop_fixed_policy_exact_size(
            (width, height) in (1u32..=64, 1u32..=64),
            policy in policy_strategy(),
        ) {
            let img = RasterImage::transparent(width, height).unwrap();
            let out = apply_size_policy(&img, policy, FilterType::Nearest).unwrap();

            let expected = policy.target_dimension().map_or((width, height), |d| (d, d));
            prop_assert_eq!((out.width, out.height), expected);
        }

        /// Property: Re-applying "original" keeps the dimensions.
        #[test]
        fn prop_original_idempotent(
            (width, height) in (1u32..=64, 1u32..=64),
        ) {
            let img = RasterImage::transparent(width, height).unwrap();
            let once = apply_size_policy(&img, SizePolicy::Original, FilterType::Bilinear).unwrap();
            let twice = apply_size_policy(&once, SizePolicy::Original, FilterType::Bilinear).unwrap();

            prop_assert_eq!((once.width, once.height), (width, height));
            prop_assert_eq!((twice.width, twice.height), (once.width, once.height));
        }
    }
}
