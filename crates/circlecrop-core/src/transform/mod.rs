//! Image transformation operations: rotation and circular cropping.
//!
//! # Transform Order
//!
//! When the user confirms a crop, transforms are applied in this order:
//! 1. Rotation (only when the rotate slider is off zero)
//! 2. Display-to-natural scaling of the crop rectangle
//! 3. Circular crop into a square canvas
//!
//! # Coordinate System
//!
//! - Rotation angles are in degrees, positive = clockwise on screen
//! - Crop rectangles are in pixels with the origin at the top-left corner
//! - Pixel `(i, j)` has its centre at `(i + 0.5, j + 0.5)`

mod circle;
mod rotation;
mod sample;

pub use circle::{canvas_side, draw_circular, inside_circle, render_circular, MAX_CANVAS_SIDE};
pub use rotation::{apply_rotation, compute_rotated_bounds, is_identity_rotation};
