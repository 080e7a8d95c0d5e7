//! Pixel sampling shared by the rotation and circular crop passes.
//!
//! Coordinates are continuous: pixel `(i, j)` covers `[i, i+1) x [j, j+1)`
//! and its centre sits at `(i + 0.5, j + 0.5)`. Sampling exactly at a pixel
//! centre returns that pixel unchanged.

use crate::decode::{RasterImage, BYTES_PER_PIXEL};

/// Sample a pixel using bilinear interpolation.
///
/// Points outside the raster are fully transparent. Inside the raster,
/// neighbours past the edge are clamped to the border pixel, which matches
/// how a canvas `drawImage` treats its source. Colour is weighted by alpha so
/// transparent neighbours do not darken the result.
pub(crate) fn sample_bilinear(image: &RasterImage, x: f64, y: f64) -> [u8; 4] {
    let (w, h) = (image.width as f64, image.height as f64);
    if image.is_empty() || !(x >= 0.0 && x < w && y >= 0.0 && y < h) {
        return [0, 0, 0, 0];
    }

    // Shift to centre-aligned lattice
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let max_x = image.width as i64 - 1;
    let max_y = image.height as i64 - 1;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let taps = [
        (x0, y0, (1.0 - tx) * (1.0 - ty)),
        (x0 + 1, y0, tx * (1.0 - ty)),
        (x0, y0 + 1, (1.0 - tx) * ty),
        (x0 + 1, y0 + 1, tx * ty),
    ];

    let mut rgb = [0.0f64; 3];
    let mut alpha = 0.0f64;

    for (px, py, weight) in taps {
        if weight <= 0.0 {
            continue;
        }
        let px = px.clamp(0, max_x) as usize;
        let py = py.clamp(0, max_y) as usize;
        let idx = (py * image.width as usize + px) * BYTES_PER_PIXEL;
        let Some(p) = image.pixels.get(idx..idx + BYTES_PER_PIXEL) else {
            continue;
        };

        let a = p[3] as f64 * weight;
        rgb[0] += p[0] as f64 * a;
        rgb[1] += p[1] as f64 * a;
        rgb[2] += p[2] as f64 * a;
        alpha += a;
    }

    if alpha <= 0.0 {
        return [0, 0, 0, 0];
    }

    [
        (rgb[0] / alpha).clamp(0.0, 255.0).round() as u8,
        (rgb[1] / alpha).clamp(0.0, 255.0).round() as u8,
        (rgb[2] / alpha).clamp(0.0, 255.0).round() as u8,
        alpha.clamp(0.0, 255.0).round() as u8,
    ]
}
