//! Crop geometry reported by the crop widget.
//!
//! The widget reports the selected region in *display* coordinates, i.e. in
//! the pixel space of the image as laid out on screen. [`ScaleFactors`] maps
//! that onto the natural pixel grid of the decoded source before sampling.
//!
//! Zoom and rotation are only observed here: the widget owns gesture
//! handling, this module just keeps the values inside the ranges the controls
//! expose.

use serde::{Deserialize, Serialize};

/// Minimum zoom factor offered by the zoom slider.
pub const ZOOM_MIN: f64 = 1.0;
/// Maximum zoom factor offered by the zoom slider.
pub const ZOOM_MAX: f64 = 3.0;
/// Zoom slider granularity.
pub const ZOOM_STEP: f64 = 0.1;

/// Rotation range in degrees (positive = clockwise on screen).
pub const ROTATION_MIN: f64 = -180.0;
pub const ROTATION_MAX: f64 = 180.0;
pub const ROTATION_STEP: f64 = 1.0;

/// A crop rectangle with top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A rectangle is usable when all fields are finite and the size is positive.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width > 0.0
            && self.height > 0.0
    }

    /// Map display coordinates onto natural pixels.
    pub fn scaled(&self, scale: ScaleFactors) -> CropRect {
        CropRect {
            x: self.x * scale.x,
            y: self.y * scale.y,
            width: self.width * scale.x,
            height: self.height * scale.y,
        }
    }

    /// Length of the longer side.
    pub fn longest_side(&self) -> f64 {
        self.width.max(self.height)
    }
}

/// Ratio between natural and display dimensions on each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    pub fn identity() -> Self {
        Self { x: 1.0, y: 1.0 }
    }

    /// `natural / display` per axis.
    ///
    /// An axis whose display size is zero or not finite falls back to 1.0.
    pub fn from_dimensions(
        natural_width: f64,
        natural_height: f64,
        display_width: f64,
        display_height: f64,
    ) -> Self {
        let ratio = |natural: f64, display: f64| {
            let r = natural / display;
            if r.is_finite() && r > 0.0 {
                r
            } else {
                1.0
            }
        };
        Self {
            x: ratio(natural_width, display_width),
            y: ratio(natural_height, display_height),
        }
    }
}

impl Default for ScaleFactors {
    fn default() -> Self {
        Self::identity()
    }
}

/// Zoom and rotation as set through the crop widget's sliders.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropControls {
    zoom: f64,
    rotation: f64,
}

impl Default for CropControls {
    fn default() -> Self {
        Self {
            zoom: ZOOM_MIN,
            rotation: 0.0,
        }
    }
}

impl CropControls {
    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Set zoom, snapped to the slider step and clamped to its range.
    /// Non-finite values are ignored.
    pub fn set_zoom(&mut self, zoom: f64) {
        if let Some(v) = snap(zoom, ZOOM_STEP, ZOOM_MIN, ZOOM_MAX) {
            self.zoom = v;
        }
    }

    /// Set rotation in degrees, snapped and clamped like [`set_zoom`](Self::set_zoom).
    pub fn set_rotation(&mut self, degrees: f64) {
        if let Some(v) = snap(degrees, ROTATION_STEP, ROTATION_MIN, ROTATION_MAX) {
            self.rotation = v;
        }
    }

    /// Zoom as a whole percentage, as shown next to the slider.
    pub fn zoom_percent(&self) -> u32 {
        (self.zoom * 100.0).round() as u32
    }
}

fn snap(value: f64, step: f64, min: f64, max: f64) -> Option<f64> {
    if !value.is_finite() {
        return None;
    }
    let snapped = ((value - min) / step).round() * step + min;
    // Trim float noise from the step multiplication (0.1 * 3 etc).
    let snapped = (snapped * 1e9).round() / 1e9;
    Some(snapped.clamp(min, max))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_validity() {
        assert!(CropRect::new(0.0, 0.0, 10.0, 10.0).is_valid());
        assert!(CropRect::new(-5.0, -5.0, 10.0, 10.0).is_valid());
        assert!(!CropRect::new(0.0, 0.0, 0.0, 10.0).is_valid());
        assert!(!CropRect::new(0.0, 0.0, 10.0, -1.0).is_valid());
        assert!(!CropRect::new(f64::NAN, 0.0, 10.0, 10.0).is_valid());
        assert!(!CropRect::new(0.0, 0.0, f64::INFINITY, 10.0).is_valid());
    }

    #[test]
    fn test_rect_scaled_by_display_ratio() {
        let scale = ScaleFactors::from_dimensions(2000.0, 2000.0, 500.0, 500.0);
        let natural = CropRect::new(100.0, 100.0, 200.0, 200.0).scaled(scale);
        assert_eq!(natural, CropRect::new(400.0, 400.0, 800.0, 800.0));
    }

    #[test]
    fn test_rect_scaled_per_axis() {
        let scale = ScaleFactors { x: 2.0, y: 0.5 };
        let natural = CropRect::new(10.0, 10.0, 20.0, 20.0).scaled(scale);
        assert_eq!(natural, CropRect::new(20.0, 5.0, 40.0, 10.0));
    }

    #[test]
    fn test_longest_side() {
        assert_eq!(CropRect::new(0.0, 0.0, 30.0, 40.0).longest_side(), 40.0);
        assert_eq!(CropRect::new(0.0, 0.0, 50.0, 40.0).longest_side(), 50.0);
    }

    #[test]
    fn test_scale_factors_zero_display() {
        let scale = ScaleFactors::from_dimensions(100.0, 100.0, 0.0, 50.0);
        assert_eq!(scale.x, 1.0);
        assert_eq!(scale.y, 2.0);
    }

    #[test]
    fn test_zoom_clamped_and_snapped() {
        let mut controls = CropControls::default();
        assert_eq!(controls.zoom(), 1.0);

        controls.set_zoom(1.26);
        assert_eq!(controls.zoom(), 1.3);
        assert_eq!(controls.zoom_percent(), 130);

        controls.set_zoom(10.0);
        assert_eq!(controls.zoom(), 3.0);

        controls.set_zoom(0.2);
        assert_eq!(controls.zoom(), 1.0);

        controls.set_zoom(f64::NAN);
        assert_eq!(controls.zoom(), 1.0);
    }

    #[test]
    fn test_rotation_clamped_and_snapped() {
        let mut controls = CropControls::default();

        controls.set_rotation(44.6);
        assert_eq!(controls.rotation(), 45.0);

        controls.set_rotation(-270.0);
        assert_eq!(controls.rotation(), -180.0);

        controls.set_rotation(181.0);
        assert_eq!(controls.rotation(), 180.0);

        controls.set_rotation(f64::INFINITY);
        assert_eq!(controls.rotation(), 180.0);
    }
}
