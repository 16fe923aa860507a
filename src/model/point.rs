//! Percentage coordinate space.

use serde::{Deserialize, Serialize};

use crate::constants::{PERCENT_MAX, PERCENT_MIN};

/// A position on the base image, as a percentage of the image container's
/// width (`x`) and height (`y`).
///
/// Stored values never carry device pixels, so the same point renders at the
/// right spot whatever size the image is displayed at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Clamp both axes into `[0, 100]`.
    pub fn clamped(self) -> Self {
        Self {
            x: self.x.clamp(PERCENT_MIN, PERCENT_MAX),
            y: self.y.clamp(PERCENT_MIN, PERCENT_MAX),
        }
    }

    /// Whether both axes already lie within `[0, 100]`.
    pub fn is_within_bounds(&self) -> bool {
        (PERCENT_MIN..=PERCENT_MAX).contains(&self.x) && (PERCENT_MIN..=PERCENT_MAX).contains(&self.y)
    }

    /// Map onto a pixel box of the given size.
    pub fn to_pixels(&self, width: f32, height: f32) -> (f32, f32) {
        (self.x / PERCENT_MAX * width, self.y / PERCENT_MAX * height)
    }
}
