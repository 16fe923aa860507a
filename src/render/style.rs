//! Visual style for the render surface.

use serde::{Deserialize, Serialize};

use crate::model::MarkerKind;

/// Colors and sizes used when composing a scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Polygon fill (any CSS color)
    pub range_fill: String,
    /// Polygon outline color
    pub range_stroke: String,
    /// Polygon outline width in device pixels
    pub range_stroke_width: f32,
    /// Radius of the in-progress vertex dots, in device pixels
    pub indicator_radius: f32,
    /// Indicator dot color
    pub indicator_fill: String,
    /// Edge length of a marker glyph, in device pixels
    pub glyph_size: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            range_fill: "rgba(16, 185, 129, 0.35)".to_string(),
            range_stroke: "#10b981".to_string(),
            range_stroke_width: 4.0,
            indicator_radius: 8.0,
            indicator_fill: "#10b981".to_string(),
            glyph_size: 24.0,
        }
    }
}

/// How a marker glyph is painted: an SVG path in a 24x24 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub path: &'static str,
    pub fill: Option<&'static str>,
    pub stroke: Option<&'static str>,
    pub stroke_width: u8,
}

/// Size of the box glyph paths are authored in.
pub const GLYPH_VIEWBOX: f32 = 24.0;

impl Glyph {
    /// Glyph for a marker kind.
    pub fn for_kind(kind: MarkerKind) -> Self {
        match kind {
            // Blue cross
            MarkerKind::Well => Self {
                path: "M12 4v16M4 12h16",
                fill: None,
                stroke: Some("#3b82f6"),
                stroke_width: 4,
            },
            // Yellow triangle
            MarkerKind::Inlet => Self {
                path: "M12 2L2 20h20L12 2z",
                fill: Some("#eab308"),
                stroke: None,
                stroke_width: 0,
            },
            // Yellow diamond
            MarkerKind::SeriesInlet => Self {
                path: "M12 2l10 10-10 10L2 12z",
                fill: Some("#eab308"),
                stroke: None,
                stroke_width: 0,
            },
            // Red star
            MarkerKind::Sample => Self {
                path: "M12 2l3.09 6.26L22 9.27l-5 4.87 1.18 6.88L12 17.77l-6.18 3.25L7 14.14 2 9.27l6.91-1.01L12 2z",
                fill: Some("#ef4444"),
                stroke: None,
                stroke_width: 0,
            },
        }
    }
}
