//! Circular crop rendering.
//!
//! Draws a rectangular region of the source into a square canvas and masks
//! everything outside the inscribed circle. The canvas side is the longer
//! side of the region in natural pixels, so a slightly non-square selection
//! is stretched to fill the square rather than clipped.
//!
//! The side is capped at [`MAX_CANVAS_SIDE`], the largest canvas browsers
//! reliably allocate.

use super::rotation::{apply_rotation, is_identity_rotation};
use super::sample::sample_bilinear;
use crate::decode::{RasterImage, SourceImage, BYTES_PER_PIXEL};
use crate::error::CropError;
use crate::geometry::CropRect;

/// Largest output side in pixels.
pub const MAX_CANVAS_SIDE: u32 = 16_384;

/// Render the circular crop for a selection reported by the crop widget.
///
/// # Arguments
///
/// * `source` - The loaded source image (its display size supplies the scale factors)
/// * `rect` - Crop rectangle in display coordinates, `None` if the widget
///   has not reported one yet
/// * `rotation_degrees` - Rotation applied in the widget (positive = clockwise)
///
/// # Errors
///
/// Returns `CropError::MissingGeometry` when `rect` is `None`,
/// `CropError::InvalidGeometry` for rectangles with a non-positive or
/// non-finite size or an output side above [`MAX_CANVAS_SIDE`], and
/// `CropError::Decode` if the source buffer does not match its dimensions.
pub fn render_circular(
    source: &SourceImage,
    rect: Option<&CropRect>,
    rotation_degrees: f64,
) -> Result<RasterImage, CropError> {
    let rect = rect.ok_or(CropError::MissingGeometry)?;
    if !rect.is_valid() {
        return Err(CropError::InvalidGeometry(*rect));
    }

    source.raster().validate()?;

    let region = rect.scaled(source.scale_factors());
    if canvas_side(&region) > MAX_CANVAS_SIDE {
        return Err(CropError::InvalidGeometry(*rect));
    }

    log::debug!(
        "circular crop: display {:?} -> natural {:?}, rotation {}°",
        rect,
        region,
        rotation_degrees
    );

    if !rotation_degrees.is_finite() || is_identity_rotation(rotation_degrees) {
        return draw_circular(source.raster(), &region);
    }

    let rotated = apply_rotation(source.raster(), rotation_degrees)?;
    draw_circular(&rotated, &region)
}

/// Draw `region` (natural pixel coordinates) of `image` into a circle.
///
/// The output is `side x side` with `side = round(max(width, height))`,
/// at least one pixel. Pixels whose centre lies outside the circle of radius
/// `side / 2` are fully transparent; pixels on the rim get partial coverage.
///
/// # Errors
///
/// Returns `CropError::InvalidGeometry` if the side exceeds
/// [`MAX_CANVAS_SIDE`].
pub fn draw_circular(image: &RasterImage, region: &CropRect) -> Result<RasterImage, CropError> {
    let side = canvas_side(region);
    if side > MAX_CANVAS_SIDE {
        return Err(CropError::InvalidGeometry(*region));
    }
    let side_f = side as f64;

    let step_x = region.width / side_f;
    let step_y = region.height / side_f;

    let mut output =
        RasterImage::transparent(side, side).ok_or(CropError::InvalidGeometry(*region))?;

    for (i, out) in output.pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let cx = (i % side as usize) as f64 + 0.5;
        let cy = (i / side as usize) as f64 + 0.5;

        let coverage = circle_coverage(cx, cy, side_f);
        if coverage <= 0.0 {
            continue;
        }

        let src_x = region.x + cx * step_x;
        let src_y = region.y + cy * step_y;

        let mut pixel = sample_bilinear(image, src_x, src_y);
        pixel[3] = (pixel[3] as f64 * coverage).round() as u8;
        out.copy_from_slice(&pixel);
    }

    Ok(output)
}

/// Output side length for a region.
pub fn canvas_side(region: &CropRect) -> u32 {
    let side = region.longest_side().round();
    if side.is_finite() && side >= 1.0 {
        side.min(u32::MAX as f64) as u32
    } else {
        1
    }
}

/// True if the pixel centre `(cx, cy)` lies inside the circle inscribed in a
/// `side x side` square.
pub fn inside_circle(cx: f64, cy: f64, side: f64) -> bool {
    let r = side / 2.0;
    let (dx, dy) = (cx - r, cy - r);
    dx * dx + dy * dy <= r * r
}

/// Fraction of a pixel covered by the circle, approximated from the distance
/// of its centre to the rim. Zero for centres outside the circle.
fn circle_coverage(cx: f64, cy: f64, side: f64) -> f64 {
    if !inside_circle(cx, cy, side) {
        return 0.0;
    }
    let r = side / 2.0;
    let dist = (cx - r).hypot(cy - r);
    (r - dist + 0.5).clamp(0.0, 1.0)
}


// ============================================================================
// Property-Based Tests
// ============================================================================
