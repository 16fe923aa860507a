//! Freehand polygon boundaries ("plot ranges").

use serde::{Deserialize, Serialize};

use super::Point;

/// Fewest vertices that enclose an area. Shorter ranges are kept, just drawn degenerate.
pub const MIN_ENCLOSING_VERTICES: usize = 3;

/// A polygon traced by clicking, vertices in click order.
///
/// Always rendered as implicitly closed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotRange {
    pub id: String,
    #[serde(default)]
    pub points: Vec<Point>,
}

impl PlotRange {
    /// An empty range, as created when a draw session starts.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points: Vec::new(),
        }
    }

    /// Copy of this range with one more vertex at the end.
    pub fn with_point(&self, point: Point) -> Self {
        let mut points = Vec::with_capacity(self.points.len() + 1);
        points.extend_from_slice(&self.points);
        points.push(point);
        Self {
            id: self.id.clone(),
            points,
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Fewer than three vertices.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < MIN_ENCLOSING_VERTICES
    }

    /// Signed shoelace area in percent² (positive for clockwise on screen).
    pub fn signed_area(&self) -> f32 {
        if self.is_degenerate() {
            return 0.0;
        }
        let n = self.points.len();
        let mut twice = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice += a.x * b.y - b.x * a.y;
        }
        twice / 2.0
    }
}
