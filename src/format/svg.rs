//! SVG export of a composed scene.
//!
//! The document is laid out back to front: base image, polygon layer, marker
//! glyphs, then indicator dots. Polygons live in a nested `<svg>` whose
//! viewBox is the percentage space itself, stretched over the container, so
//! stored points are written as-is. Glyphs and dots use percentage `x`/`y`.

use std::io::Write;
use std::path::Path;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::error::FormatError;
use crate::render::{GLYPH_VIEWBOX, Glyph, MarkerGlyph, PolygonShape, Scene};

const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Delete affordance color (dark badge with a white cross).
const DELETE_BADGE_FILL: &str = "#0f172a";

/// Serialize a scene as a standalone SVG document of the given pixel size.
pub fn write_svg(scene: &Scene, width: u32, height: u32) -> Result<String, FormatError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| FormatError::Xml(e.into()))?;

    let mut root = BytesStart::new("svg");
    root.push_attribute(("xmlns", SVG_NS));
    root.push_attribute(("width", width.to_string().as_str()));
    root.push_attribute(("height", height.to_string().as_str()));
    root.push_attribute(("viewBox", format!("0 0 {} {}", width, height).as_str()));
    start(&mut writer, root)?;

    if !scene.base_image.is_empty() {
        empty(
            &mut writer,
            "image",
            &[
                ("href", scene.base_image.as_str()),
                ("width", "100%"),
                ("height", "100%"),
                ("preserveAspectRatio", "none"),
            ],
        )?;
    }

    write_polygons(&mut writer, scene)?;

    let mut layer = BytesStart::new("g");
    layer.push_attribute(("class", "markers"));
    start(&mut writer, layer)?;
    for marker in &scene.markers {
        write_marker(&mut writer, marker, scene.style.glyph_size)?;
    }
    end(&mut writer, "g")?;

    if !scene.indicators.is_empty() {
        let radius = scene.style.indicator_radius.to_string();
        let mut layer = BytesStart::new("g");
        layer.push_attribute(("class", "indicators"));
        start(&mut writer, layer)?;
        for point in &scene.indicators {
            empty(
                &mut writer,
                "circle",
                &[
                    ("cx", percent(point.x).as_str()),
                    ("cy", percent(point.y).as_str()),
                    ("r", radius.as_str()),
                    ("fill", scene.style.indicator_fill.as_str()),
                    ("stroke", "white"),
                    ("stroke-width", "2"),
                ],
            )?;
        }
        end(&mut writer, "g")?;
    }

    end(&mut writer, "svg")?;

    String::from_utf8(writer.into_inner())
        .map_err(|_| FormatError::invalid_format("Invalid UTF-8 in SVG"))
}

/// Write a scene to an SVG file.
pub fn save_svg(scene: &Scene, width: u32, height: u32, path: &Path) -> Result<(), FormatError> {
    let svg = write_svg(scene, width, height)?;
    std::fs::write(path, svg)?;
    log::info!("🖼️ Exported {}x{} SVG to {:?}", width, height, path);
    Ok(())
}

fn write_polygons<W: Write>(writer: &mut Writer<W>, scene: &Scene) -> Result<(), FormatError> {
    let mut layer = BytesStart::new("svg");
    layer.push_attribute(("class", "ranges"));
    layer.push_attribute(("width", "100%"));
    layer.push_attribute(("height", "100%"));
    layer.push_attribute(("viewBox", "0 0 100 100"));
    layer.push_attribute(("preserveAspectRatio", "none"));
    start(writer, layer)?;

    let stroke_width = scene.style.range_stroke_width.to_string();
    for polygon in &scene.polygons {
        empty(
            writer,
            "polygon",
            &[
                ("id", polygon.range_id.as_str()),
                ("points", polygon_points(polygon).as_str()),
                ("fill", scene.style.range_fill.as_str()),
                ("stroke", scene.style.range_stroke.as_str()),
                ("stroke-width", stroke_width.as_str()),
                ("vector-effect", "non-scaling-stroke"),
            ],
        )?;
    }

    end(writer, "svg")
}

fn write_marker<W: Write>(
    writer: &mut Writer<W>,
    marker: &MarkerGlyph,
    size: f32,
) -> Result<(), FormatError> {
    // Zero-size viewport at the marker position; content is drawn around it
    let mut anchor = BytesStart::new("svg");
    anchor.push_attribute(("id", marker.marker_id.as_str()));
    anchor.push_attribute(("class", marker.kind.code()));
    anchor.push_attribute(("x", percent(marker.center.x).as_str()));
    anchor.push_attribute(("y", percent(marker.center.y).as_str()));
    anchor.push_attribute(("width", "0"));
    anchor.push_attribute(("height", "0"));
    anchor.push_attribute(("overflow", "visible"));
    start(writer, anchor)?;

    let half = size / 2.0;
    let transform = format!("translate({} {}) scale({})", -half, -half, size / GLYPH_VIEWBOX);
    write_glyph(writer, &marker.glyph, &transform)?;

    if marker.deletable {
        let badge = size * 0.25;
        let (cx, cy) = (half + badge / 2.0, -half - badge / 2.0);
        empty(
            writer,
            "circle",
            &[
                ("class", "delete"),
                ("cx", cx.to_string().as_str()),
                ("cy", cy.to_string().as_str()),
                ("r", badge.to_string().as_str()),
                ("fill", DELETE_BADGE_FILL),
                ("stroke", "white"),
                ("stroke-width", "2"),
            ],
        )?;
        let mut label = BytesStart::new("text");
        label.push_attribute(("x", cx.to_string().as_str()));
        label.push_attribute(("y", cy.to_string().as_str()));
        label.push_attribute(("fill", "white"));
        label.push_attribute(("font-size", badge.to_string().as_str()));
        label.push_attribute(("text-anchor", "middle"));
        label.push_attribute(("dominant-baseline", "central"));
        start(writer, label)?;
        writer
            .write_event(Event::Text(BytesText::new("✕")))
            .map_err(|e| FormatError::Xml(e.into()))?;
        end(writer, "text")?;
    }

    end(writer, "svg")
}

fn write_glyph<W: Write>(writer: &mut Writer<W>, glyph: &Glyph, transform: &str) -> Result<(), FormatError> {
    let stroke_width = glyph.stroke_width.to_string();
    let mut attrs = vec![("d", glyph.path), ("transform", transform)];
    attrs.push(("fill", glyph.fill.unwrap_or("none")));
    if let Some(stroke) = glyph.stroke {
        attrs.push(("stroke", stroke));
        attrs.push(("stroke-width", stroke_width.as_str()));
        attrs.push(("stroke-linecap", "round"));
    }
    empty(writer, "path", &attrs)
}

/// `x,y` pairs in percentage units, space separated.
fn polygon_points(polygon: &PolygonShape) -> String {
    polygon
        .points
        .iter()
        .map(|p| format!("{},{}", p.x, p.y))
        .collect::<Vec<_>>()
        .join(" ")
}

fn percent(value: f32) -> String {
    format!("{}%", value)
}

fn start<W: Write>(writer: &mut Writer<W>, element: BytesStart<'_>) -> Result<(), FormatError> {
    writer
        .write_event(Event::Start(element))
        .map_err(|e| FormatError::Xml(e.into()))
}

fn end<W: Write>(writer: &mut Writer<W>, name: &str) -> Result<(), FormatError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(|e| FormatError::Xml(e.into()))
}

fn empty<W: Write>(
    writer: &mut Writer<W>,
    name: &str,
    attrs: &[(&str, &str)],
) -> Result<(), FormatError> {
    let mut element = BytesStart::new(name);
    for &attr in attrs {
        element.push_attribute(attr);
    }
    writer
        .write_event(Event::Empty(element))
        .map_err(|e| FormatError::Xml(e.into()))
}
