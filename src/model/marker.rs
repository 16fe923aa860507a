//! Point markers placed on the base image.

use serde::{Deserialize, Serialize};

use super::Point;

/// Semantic type of a point marker. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarkerKind {
    /// Groundwater well
    Well,
    /// Water inlet
    Inlet,
    /// Inlet fed through another inlet
    SeriesInlet,
    /// Soil sample point
    Sample,
}

impl MarkerKind {
    /// Get the display name for this marker kind.
    pub fn name(&self) -> &'static str {
        match self {
            MarkerKind::Well => "Well",
            MarkerKind::Inlet => "Inlet",
            MarkerKind::SeriesInlet => "Series Inlet",
            MarkerKind::Sample => "Sample Point",
        }
    }

    /// Wire name, as stored in project files.
    pub fn code(&self) -> &'static str {
        match self {
            MarkerKind::Well => "WELL",
            MarkerKind::Inlet => "INLET",
            MarkerKind::SeriesInlet => "SERIES_INLET",
            MarkerKind::Sample => "SAMPLE",
        }
    }

    /// Get all marker kinds in toolbar order.
    pub fn all() -> &'static [MarkerKind] {
        &[
            MarkerKind::Well,
            MarkerKind::Inlet,
            MarkerKind::SeriesInlet,
            MarkerKind::Sample,
        ]
    }
}

/// A typed point annotation.
///
/// Serialized flat (`{id, type, x, y}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: MarkerKind,
    #[serde(flatten)]
    pub position: Point,
}

impl Marker {
    pub fn new(id: impl Into<String>, kind: MarkerKind, position: Point) -> Self {
        Self {
            id: id.into(),
            kind,
            position,
        }
    }

    /// Same marker at another position.
    pub fn moved_to(&self, position: Point) -> Self {
        Self {
            id: self.id.clone(),
            kind: self.kind,
            position,
        }
    }
}
