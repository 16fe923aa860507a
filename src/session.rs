//! Editor session for one task.
//!
//! Owns the transient interaction mode, the container layout, both
//! interaction controllers and the document input, plus the current
//! annotation snapshot. Messages are applied one at a time, in delivery
//! order; each either produces a new snapshot or leaves it untouched.

use crate::config::AppConfig;
use crate::coords::ContainerRect;
use crate::drag::DragController;
use crate::draw::DrawController;
use crate::error::AnnotationError;
use crate::handlers;
use crate::input::DocumentInput;
use crate::message::Message;
use crate::model::{MarkerKind, Point, SurveyTask};
use crate::render::{self, RenderStyle, Scene};
use crate::store::Annotations;

/// Tool selected in the editor toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTool {
    /// Click-to-place for one marker kind
    Marker(MarkerKind),
    /// Polygon tracing
    Draw,
}

impl ActiveTool {
    pub fn name(&self) -> &'static str {
        match self {
            ActiveTool::Marker(kind) => kind.name(),
            ActiveTool::Draw => "Draw",
        }
    }
}

/// Transient UI state. Never persisted with the task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InteractionMode {
    pub active_tool: Option<ActiveTool>,
    pub is_editing_map: bool,
}

/// Interactive editing of one task's annotations.
#[derive(Debug)]
pub struct EditorSession {
    task_id: String,
    base_image: String,
    annotations: Annotations,
    mode: InteractionMode,
    container: Option<ContainerRect>,
    drag: DragController,
    draw: DrawController,
    input: DocumentInput,
    default_marker_position: Point,
    style: RenderStyle,
}

impl EditorSession {
    /// Open a session on a task's current annotations.
    pub fn open(task: &SurveyTask, config: &AppConfig) -> Self {
        let preferences = &config.preferences;
        log::info!(
            "📂 Opened task {} ({} markers, {} plot ranges)",
            task.id,
            task.annotations.markers().len(),
            task.annotations.ranges().len()
        );
        Self {
            task_id: task.id.clone(),
            base_image: task.base_image.clone(),
            annotations: task.annotations.clone(),
            mode: InteractionMode {
                active_tool: None,
                is_editing_map: preferences.start_in_edit_mode,
            },
            container: None,
            drag: DragController::new(),
            draw: DrawController::new(),
            input: DocumentInput::new(),
            default_marker_position: preferences.default_marker_position.clamped(),
            style: config.style.clone(),
        }
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    /// Current annotation snapshot.
    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn container(&self) -> Option<ContainerRect> {
        self.container
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    /// Id of the range receiving vertices, if a draw session is open.
    pub fn drawing_range(&self) -> Option<&str> {
        self.draw.active_range()
    }

    /// Whether document-level move/release events are being routed.
    pub fn has_document_listeners(&self) -> bool {
        self.input.is_subscribed()
    }

    /// Apply one message. Returns whether the annotation snapshot changed.
    ///
    /// References to missing markers are absorbed as no-ops. A precondition
    /// violation is logged and returned; it means the mode gating let through
    /// something it should not have.
    pub fn update(&mut self, message: Message) -> Result<bool, AnnotationError> {
        log::trace!("Message: {}", message.name());
        let result = match message {
            Message::PlaceMarker { kind } => Ok(Some(handlers::handle_place_marker(
                kind,
                self.default_marker_position,
                &self.annotations,
            ))),
            Message::DeleteMarker { id } => {
                handlers::handle_delete_marker(&id, &self.annotations).map(Some)
            }
            Message::StartDraw => Ok(Some(handlers::handle_start_draw(
                &mut self.mode,
                &mut self.draw,
                &self.annotations,
            ))),
            Message::FinishDraw => {
                handlers::handle_finish_draw(&mut self.mode, &mut self.draw, &self.annotations);
                Ok(None)
            }
            Message::SelectTool { kind } => {
                handlers::handle_select_tool(kind, &mut self.mode, &mut self.draw, &self.annotations);
                Ok(None)
            }
            Message::ToggleMapEdit => {
                handlers::handle_toggle_map_edit(&mut self.mode);
                Ok(None)
            }
            Message::ResizeContainer { rect } => {
                log::debug!(
                    "📐 Container at ({:.0}, {:.0}) size {:.0}x{:.0}",
                    rect.left,
                    rect.top,
                    rect.width,
                    rect.height
                );
                self.container = Some(rect);
                Ok(None)
            }
            Message::Pointer { event } => handlers::handle_pointer(
                &event,
                &self.mode,
                self.container,
                &mut self.drag,
                &self.draw,
                &self.input,
                &self.annotations,
            ),
        };

        match result {
            Ok(Some(next)) => Ok(self.commit(next)),
            Ok(None) => Ok(false),
            Err(e) if e.is_recoverable() => {
                log::debug!("Ignored: {}", e);
                Ok(false)
            }
            Err(e @ AnnotationError::DegenerateContainer { .. }) => {
                log::warn!("Ignored pointer input: {}", e);
                Ok(false)
            }
            Err(e) => {
                log::error!("❌ {} in task {}", e, self.task_id);
                Err(e)
            }
        }
    }

    fn commit(&mut self, next: Annotations) -> bool {
        if next.is_same_snapshot(&self.annotations) {
            return false;
        }
        self.annotations = next;
        true
    }

    /// Compose the current frame.
    pub fn scene(&self) -> Scene {
        render::compose(
            &self.base_image,
            &self.annotations,
            &self.mode,
            self.draw.active_range(),
            &self.style,
        )
    }

    /// Leave the task. Any drag is released and its listeners detached; the
    /// interaction mode is discarded. Returns the final snapshot.
    pub fn close(mut self) -> Annotations {
        if let Some(marker_id) = self.drag.release() {
            log::debug!("Drag on {} released by closing task {}", marker_id, self.task_id);
        }
        if let Some(range_id) = self.draw.finish(&self.annotations) {
            log::debug!("Draw of {} ended by closing task {}", range_id, self.task_id);
        }
        log::info!("📁 Closed task {}", self.task_id);
        self.annotations
    }
}
