//! Source rotation for the crop widget's rotate slider.
//!
//! The widget rotates the image about its centre and reports the crop
//! rectangle in the coordinate space of the rotated image's bounding box.
//! [`apply_rotation`] produces exactly that canvas: the rotated image on an
//! expanded, transparent background.
//!
//! # Algorithm
//!
//! Inverse mapping: for each destination pixel centre we rotate back by the
//! angle and sample the source bilinearly. With the y axis pointing down, a
//! clockwise rotation by θ has the inverse
//! ```text
//! src_x =  dx * cos(θ) + dy * sin(θ) + src_cx
//! src_y = -dx * sin(θ) + dy * cos(θ) + src_cy
//! ```

use super::sample::sample_bilinear;
use crate::decode::{DecodeError, RasterImage, BYTES_PER_PIXEL};

const ANGLE_EPSILON: f64 = 0.001;

/// True when the angle is a whole number of turns.
pub fn is_identity_rotation(angle_degrees: f64) -> bool {
    let turn = angle_degrees.rem_euclid(360.0);
    turn < ANGLE_EPSILON || 360.0 - turn < ANGLE_EPSILON
}

/// Size of the bounding box of a `width x height` image rotated by the angle.
///
/// Right-angle rotations are special-cased so they come out exact.
pub fn compute_rotated_bounds(width: u32, height: u32, angle_degrees: f64) -> (u32, u32) {
    let turn = angle_degrees.rem_euclid(180.0);

    if turn < ANGLE_EPSILON || 180.0 - turn < ANGLE_EPSILON {
        return (width, height);
    }
    if (turn - 90.0).abs() < ANGLE_EPSILON {
        return (height, width);
    }

    let rad = angle_degrees.to_radians();
    let (sin, cos) = (rad.sin().abs(), rad.cos().abs());
    let (w, h) = (width as f64, height as f64);

    let new_w = (w * cos + h * sin).round() as u32;
    let new_h = (w * sin + h * cos).round() as u32;

    (new_w.max(1), new_h.max(1))
}

/// Rotate an image clockwise about its centre.
///
/// The output canvas grows to hold the whole rotated image; areas not
/// covered by the source are transparent.
///
/// # Errors
///
/// Returns `DecodeError::CorruptedFile` if the pixel buffer does not match
/// the raster's dimensions or the rotated canvas cannot be allocated.
pub fn apply_rotation(
    image: &RasterImage,
    angle_degrees: f64,
) -> Result<RasterImage, DecodeError> {
    image.validate()?;

    if !angle_degrees.is_finite() || is_identity_rotation(angle_degrees) || image.is_empty() {
        return Ok(image.clone());
    }

    let (dst_w, dst_h) = compute_rotated_bounds(image.width, image.height, angle_degrees);

    let rad = angle_degrees.to_radians();
    let (sin, cos) = (rad.sin(), rad.cos());

    let src_cx = image.width as f64 / 2.0;
    let src_cy = image.height as f64 / 2.0;
    let dst_cx = dst_w as f64 / 2.0;
    let dst_cy = dst_h as f64 / 2.0;

    let mut output = RasterImage::transparent(dst_w, dst_h).ok_or_else(|| {
        DecodeError::CorruptedFile(format!("rotated canvas {dst_w}x{dst_h} is too large"))
    })?;

    for (i, out) in output.pixels.chunks_exact_mut(BYTES_PER_PIXEL).enumerate() {
        let dst_x = (i % dst_w as usize) as f64 + 0.5;
        let dst_y = (i / dst_w as usize) as f64 + 0.5;

        let dx = dst_x - dst_cx;
        let dy = dst_y - dst_cy;

        let src_x = dx * cos + dy * sin + src_cx;
        let src_y = -dx * sin + dy * cos + src_cy;

        out.copy_from_slice(&sample_bilinear(image, src_x, src_y));
    }

    log::debug!(
        "rotated {}x{} by {}° into {}x{}",
        image.width,
        image.height,
        angle_degrees,
        dst_w,
        dst_h
    );

    Ok(output)
}
