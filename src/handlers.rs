//! Message handlers for the editor session.
//!
//! Each handler processes one category of messages against the pieces of
//! session state it needs, keeping [`EditorSession::update`] small. Handlers
//! that can change annotations return the next snapshot (or `None` when the
//! message was ignored); the session decides whether to commit it.
//!
//! [`EditorSession::update`]: crate::session::EditorSession::update

use crate::coords::{ClientPoint, ContainerRect};
use crate::drag::DragController;
use crate::draw::DrawController;
use crate::error::AnnotationError;
use crate::input::{DocumentInput, InputEvent, PointerPhase, PointerTarget};
use crate::model::{MarkerKind, Point};
use crate::session::{ActiveTool, InteractionMode};
use crate::store::Annotations;

/// Place a marker from the toolbar. The new marker is not entered into a drag.
pub fn handle_place_marker(kind: MarkerKind, position: Point, annotations: &Annotations) -> Annotations {
    let (next, id) = annotations.add_marker_at(kind, position);
    log::info!(
        "📍 Placed {} marker {} at ({:.1}, {:.1})",
        kind.name(),
        id,
        position.x,
        position.y
    );
    next
}

/// Delete a marker by id.
pub fn handle_delete_marker(id: &str, annotations: &Annotations) -> Result<Annotations, AnnotationError> {
    let next = annotations.delete_marker(id)?;
    log::info!("🗑️ Deleted marker {}", id);
    Ok(next)
}

/// Arm the polygon tool. Any marker tool is replaced; a draw session already
/// in progress is left behind and a new range started.
pub fn handle_start_draw(
    mode: &mut InteractionMode,
    draw: &mut DrawController,
    annotations: &Annotations,
) -> Annotations {
    let (next, _) = draw.start(annotations);
    mode.active_tool = Some(ActiveTool::Draw);
    next
}

/// End the draw session and clear the polygon tool.
pub fn handle_finish_draw(mode: &mut InteractionMode, draw: &mut DrawController, annotations: &Annotations) {
    if draw.finish(annotations).is_none() {
        log::debug!("Finish draw with no draw session in progress");
    }
    if mode.active_tool == Some(ActiveTool::Draw) {
        mode.active_tool = None;
    }
}

/// Arm click-to-place for a marker kind, or clear the active tool.
///
/// Switching away from the polygon tool finishes its draw session.
pub fn handle_select_tool(
    kind: Option<MarkerKind>,
    mode: &mut InteractionMode,
    draw: &mut DrawController,
    annotations: &Annotations,
) {
    if draw.is_drawing() {
        draw.finish(annotations);
    }
    let previous = mode.active_tool.map_or("none", |tool| tool.name());
    mode.active_tool = kind.map(ActiveTool::Marker);
    match mode.active_tool {
        Some(tool) => log::debug!("🔧 Tool {} -> {}", previous, tool.name()),
        None => log::debug!("🔧 Tool {} cleared", previous),
    }
}

/// Toggle map edit mode.
pub fn handle_toggle_map_edit(mode: &mut InteractionMode) {
    mode.is_editing_map = !mode.is_editing_map;
    log::debug!(
        "🗺️ Map edit mode {}",
        if mode.is_editing_map { "on" } else { "off" }
    );
}

/// Route a pointer event to the drag or draw controller.
///
/// Move and release go to the drag controller whenever it holds the document
/// subscription, wherever the pointer is. Pointer-down on a glyph starts a
/// drag; pointer-down on a delete affordance does not. Clicks on the bare
/// surface feed the active tool.
pub fn handle_pointer(
    event: &InputEvent,
    mode: &InteractionMode,
    container: Option<ContainerRect>,
    drag: &mut DragController,
    draw: &DrawController,
    input: &DocumentInput,
    annotations: &Annotations,
) -> Result<Option<Annotations>, AnnotationError> {
    match event.phase {
        PointerPhase::Down => {
            if let PointerTarget::Marker(id) = &event.target {
                let Some(rect) = container else {
                    log::warn!("Pointer-down on marker {} before container layout", id);
                    return Ok(None);
                };
                drag.begin(id, rect, mode.is_editing_map, annotations, input);
            }
            Ok(None)
        }
        PointerPhase::Move => {
            if !input.is_subscribed() {
                return Ok(None);
            }
            Ok(event
                .position
                .and_then(|client| drag.pointer_moved(client, annotations)))
        }
        PointerPhase::Up => {
            if input.is_subscribed() {
                drag.release();
            }
            Ok(None)
        }
        PointerPhase::Click => handle_click(event, mode, container, draw, annotations),
    }
}

fn handle_click(
    event: &InputEvent,
    mode: &InteractionMode,
    container: Option<ContainerRect>,
    draw: &DrawController,
    annotations: &Annotations,
) -> Result<Option<Annotations>, AnnotationError> {
    match &event.target {
        PointerTarget::DeleteButton(id) => {
            if !mode.is_editing_map {
                log::debug!("Ignoring delete of {}: map is not editable", id);
                return Ok(None);
            }
            handle_delete_marker(id, annotations).map(Some)
        }
        PointerTarget::Surface => {
            let (Some(client), Some(rect)) = (event.position, container) else {
                log::warn!("Surface click without position or container layout");
                return Ok(None);
            };
            match mode.active_tool {
                Some(ActiveTool::Draw) => draw.click(client, rect, mode.is_editing_map, annotations),
                Some(ActiveTool::Marker(kind)) if mode.is_editing_map => {
                    place_at(kind, client, rect, annotations).map(Some)
                }
                _ => Ok(None),
            }
        }
        // Clicks on glyphs never add vertices
        PointerTarget::Marker(_) | PointerTarget::Outside => Ok(None),
    }
}

fn place_at(
    kind: MarkerKind,
    client: ClientPoint,
    rect: ContainerRect,
    annotations: &Annotations,
) -> Result<Annotations, AnnotationError> {
    let point = rect.normalize(client)?;
    Ok(handle_place_marker(kind, point, annotations))
}
