//! Device-to-percentage coordinate normalization.
//!
//! Pointer events arrive in device pixels relative to the viewport. Everything
//! stored is expressed as a percentage of the annotation container's box, which
//! makes annotations independent of the size the image is displayed at.

use serde::{Deserialize, Serialize};

use crate::constants::PERCENT_MAX;
use crate::error::AnnotationError;
use crate::model::Point;

/// A pointer position in device pixels (viewport space).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f32,
    pub y: f32,
}

impl ClientPoint {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Bounding rectangle of the annotation container, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContainerRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl ContainerRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Whether the box has no usable area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Convert a device position into percentage space without clamping.
    ///
    /// Used for placement and draw clicks, which originate inside the
    /// container; a click on the edge yields exactly 0 or 100.
    pub fn normalize(&self, client: ClientPoint) -> Result<Point, AnnotationError> {
        if self.is_degenerate() {
            return Err(AnnotationError::DegenerateContainer {
                width: self.width,
                height: self.height,
            });
        }
        Ok(Point::new(
            (client.x - self.left) * PERCENT_MAX / self.width,
            (client.y - self.top) * PERCENT_MAX / self.height,
        ))
    }

    /// Convert a device position into percentage space, clamped to `[0, 100]`.
    ///
    /// Used while dragging, where the pointer may leave the container.
    pub fn normalize_clamped(&self, client: ClientPoint) -> Result<Point, AnnotationError> {
        self.normalize(client).map(Point::clamped)
    }

    /// Inverse mapping: a percentage point back to device pixels.
    pub fn to_client(&self, point: Point) -> ClientPoint {
        let (x, y) = point.to_pixels(self.width, self.height);
        ClientPoint::new(self.left + x, self.top + y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_normalize_relative_to_container() {
        let rect = ContainerRect::new(100.0, 50.0, 400.0, 200.0);
        let p = rect.normalize(ClientPoint::new(140.0, 70.0)).unwrap();
        assert!(approx_eq(p.x, 10.0));
        assert!(approx_eq(p.y, 10.0));
    }

    #[test]
    fn test_normalize_edges_are_exact() {
        let rect = ContainerRect::new(100.0, 50.0, 400.0, 200.0);
        assert_eq!(
            rect.normalize(ClientPoint::new(100.0, 50.0)).unwrap(),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            rect.normalize(ClientPoint::new(500.0, 250.0)).unwrap(),
            Point::new(100.0, 100.0)
        );
    }

    #[test]
    fn test_normalize_does_not_clamp() {
        let rect = ContainerRect::new(0.0, 0.0, 200.0, 100.0);
        let p = rect.normalize(ClientPoint::new(240.0, -10.0)).unwrap();
        assert!(approx_eq(p.x, 120.0));
        assert!(approx_eq(p.y, -10.0));
    }

    #[test]
    fn test_normalize_clamped() {
        let rect = ContainerRect::new(0.0, 0.0, 200.0, 100.0);
        let p = rect.normalize_clamped(ClientPoint::new(240.0, 50.0)).unwrap();
        assert_eq!(p, Point::new(100.0, 50.0));
        let p = rect.normalize_clamped(ClientPoint::new(-5.0, 130.0)).unwrap();
        assert_eq!(p, Point::new(0.0, 100.0));
    }

    #[test]
    fn test_resize_invariance() {
        // Same stored point lands on the same relative spot at any display size
        let point = Point::new(25.0, 75.0);
        for rect in [
            ContainerRect::new(0.0, 0.0, 400.0, 300.0),
            ContainerRect::new(20.0, 40.0, 1000.0, 750.0),
        ] {
            let back = rect.normalize(rect.to_client(point)).unwrap();
            assert!(approx_eq(back.x, point.x));
            assert!(approx_eq(back.y, point.y));
        }
    }

    #[test]
    fn test_degenerate_container_is_rejected() {
        let rect = ContainerRect::new(0.0, 0.0, 0.0, 100.0);
        assert!(rect.is_degenerate());
        assert!(matches!(
            rect.normalize(ClientPoint::new(1.0, 1.0)),
            Err(AnnotationError::DegenerateContainer { .. })
        ));
    }
}
