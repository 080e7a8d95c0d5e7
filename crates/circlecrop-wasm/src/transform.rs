//! WASM bindings for rotation and circular cropping.

use crate::to_js_error;
use crate::types::JsRasterImage;
use circlecrop_core::transform::{apply_rotation as core_rotate, render_circular};
use circlecrop_core::{CropRect, SourceImage};
use wasm_bindgen::prelude::*;

/// Render a circular crop from an image.
///
/// The crop rectangle is given in display coordinates, as reported by the
/// crop widget; `display_width`/`display_height` give the size the image was
/// shown at. The output is a square RGBA image with transparent corners.
///
/// # Arguments
///
/// * `image` - Source image at its natural size
/// * `x`, `y`, `width`, `height` - Crop rectangle in display pixels
/// * `display_width`, `display_height` - On-screen size of the image
/// * `rotation_degrees` - Rotation applied in the widget (positive = clockwise)
///
/// # Example (TypeScript)
///
/// ```typescript
/// const circle = render_circular_crop(
///   image, area.x, area.y, area.width, area.height,
///   imgElement.width, imgElement.height, rotation,
/// );
/// ```
#[allow(clippy::too_many_arguments)]
#[wasm_bindgen]
pub fn render_circular_crop(
    image: &JsRasterImage,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    display_width: f64,
    display_height: f64,
    rotation_degrees: f64,
) -> Result<JsRasterImage, JsValue> {
    let mut source = SourceImage::new(image.to_raster());
    if !source.set_display_size(display_width, display_height) {
        log::warn!("ignoring invalid display size {display_width}x{display_height}");
    }

    let rect = CropRect::new(x, y, width, height);
    render_circular(&source, Some(&rect), rotation_degrees)
        .map(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

/// Rotate an image about its centre onto an expanded transparent canvas.
///
/// Positive angles rotate clockwise.
///
/// # Errors
///
/// Returns an error if the pixel buffer does not match the dimensions.
#[wasm_bindgen]
pub fn apply_rotation(
    image: &JsRasterImage,
    angle_degrees: f64,
) -> Result<JsRasterImage, JsValue> {
    core_rotate(&image.to_raster(), angle_degrees)
        .map(JsRasterImage::from_raster)
        .map_err(to_js_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_image(width: u32, height: u32) -> JsRasterImage {
        JsRasterImage::new(width, height, vec![200u8; (width * height * 4) as usize])
    }

    #[test]
    fn test_rotation_no_change() {
        let result = apply_rotation(&test_image(100, 100), 0.0).unwrap();
        assert_eq!((result.width(), result.height()), (100, 100));
    }

    #[test]
    fn test_rotation_90_degrees() {
        let result = apply_rotation(&test_image(100, 50), 90.0).unwrap();
        assert_eq!((result.width(), result.height()), (50, 100));
    }

    #[test]
    fn test_rotation_45_degrees_expands() {
        let result = apply_rotation(&test_image(100, 100), 45.0).unwrap();
        assert!(result.width() > 100);
        assert!(result.height() > 100);
    }

    // Error paths build a JsValue, so only the success path runs natively.
    #[test]
    fn test_render_circular_crop_scales_to_natural() {
        let img = test_image(400, 400);
        let out = render_circular_crop(&img, 10.0, 10.0, 50.0, 50.0, 100.0, 100.0, 0.0)
            .unwrap();

        assert_eq!((out.width(), out.height()), (200, 200));
        let pixels = out.pixels();
        assert_eq!(pixels[3], 0);
        let centre = ((100 * 200 + 100) * 4) as usize;
        assert_eq!(pixels[centre + 3], 255);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_render_rejects_empty_rect() {
        let img = JsRasterImage::new(10, 10, vec![0u8; 400]);
        assert!(render_circular_crop(&img, 0.0, 0.0, 0.0, 0.0, 10.0, 10.0, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_short_pixel_buffer_is_an_error() {
        let img = JsRasterImage::new(10, 10, vec![0u8; 12]);
        assert!(render_circular_crop(&img, 0.0, 0.0, 10.0, 10.0, 10.0, 10.0, 0.0).is_err());
        assert!(apply_rotation(&img, 30.0).is_err());
    }
}
