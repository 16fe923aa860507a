//! Render surface.
//!
//! [`compose`] turns the current annotations and interaction mode into a
//! [`Scene`]: the base image, one filled polygon per plot range, one glyph
//! per marker, and vertex dots for the range being drawn. The scene stays in
//! percentage space; the substrate maps it onto the container's pixel box.

mod style;

pub use style::{GLYPH_VIEWBOX, Glyph, RenderStyle};

use crate::model::{MarkerKind, Point};
use crate::session::{ActiveTool, InteractionMode};
use crate::store::Annotations;

/// A plot range polygon, implicitly closed (last vertex joins the first).
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonShape {
    pub range_id: String,
    pub points: Vec<Point>,
}

impl PolygonShape {
    /// Fewer than three vertices: drawn, but encloses no area.
    pub fn is_degenerate(&self) -> bool {
        self.points.len() < crate::model::MIN_ENCLOSING_VERTICES
    }
}

/// A marker glyph centered on its position.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerGlyph {
    pub marker_id: String,
    pub kind: MarkerKind,
    pub center: Point,
    pub glyph: Glyph,
    /// Accepts pointer-down to start a drag
    pub draggable: bool,
    /// Shows the delete affordance
    pub deletable: bool,
}

/// Everything to paint for one frame, back to front.
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub base_image: String,
    pub polygons: Vec<PolygonShape>,
    pub markers: Vec<MarkerGlyph>,
    /// Vertices of the range being drawn
    pub indicators: Vec<Point>,
    pub style: RenderStyle,
}

/// Build the scene for the current state. Pure: same inputs, same scene.
///
/// `drawing_range` is the draw controller's in-progress handle; its vertices
/// are shown as indicator dots while the draw tool is active.
pub fn compose(
    base_image: &str,
    annotations: &Annotations,
    mode: &InteractionMode,
    drawing_range: Option<&str>,
    style: &RenderStyle,
) -> Scene {
    let polygons = annotations
        .ranges()
        .iter()
        .map(|range| PolygonShape {
            range_id: range.id.clone(),
            points: range.points.clone(),
        })
        .collect();

    let markers = annotations
        .markers()
        .iter()
        .map(|marker| MarkerGlyph {
            marker_id: marker.id.clone(),
            kind: marker.kind,
            center: marker.position,
            glyph: Glyph::for_kind(marker.kind),
            draggable: mode.is_editing_map,
            deletable: mode.is_editing_map,
        })
        .collect();

    let indicators = match (mode.active_tool, drawing_range) {
        (Some(ActiveTool::Draw), Some(id)) => annotations
            .range(id)
            .map(|range| range.points.clone())
            .unwrap_or_default(),
        _ => Vec::new(),
    };

    Scene {
        base_image: base_image.to_string(),
        polygons,
        markers,
        indicators,
        style: style.clone(),
    }
}
