//! Marker drag controller.
//!
//! Two states: idle, or dragging one marker. Starting a drag captures the
//! container rectangle once and takes the document pointer subscription;
//! releasing drops both. There is no cancel: release keeps the last position.

use crate::coords::{ClientPoint, ContainerRect};
use crate::input::{DocumentInput, Subscription};
use crate::store::Annotations;

/// Current drag state.
#[derive(Debug, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        marker_id: String,
        /// Container bounds captured at drag start.
        rect: ContainerRect,
        subscription: Subscription,
    },
}

/// Drives a marker drag from pointer-down to pointer-up.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Id of the marker being dragged.
    pub fn dragged_marker(&self) -> Option<&str> {
        match &self.state {
            DragState::Dragging { marker_id, .. } => Some(marker_id),
            DragState::Idle => None,
        }
    }

    /// Pointer-down on a marker glyph. Only starts a drag in map edit mode
    /// and on a marker present in `annotations`.
    ///
    /// Returns whether a drag started.
    pub fn begin(
        &mut self,
        marker_id: &str,
        rect: ContainerRect,
        editing: bool,
        annotations: &Annotations,
        input: &DocumentInput,
    ) -> bool {
        if !editing {
            log::debug!("Ignoring pointer-down on marker {}: map is not editable", marker_id);
            return false;
        }
        if annotations.marker(marker_id).is_none() {
            log::debug!("Ignoring pointer-down on unknown marker {}", marker_id);
            return false;
        }
        if rect.is_degenerate() {
            log::warn!(
                "Cannot drag marker {}: container is {}x{}",
                marker_id,
                rect.width,
                rect.height
            );
            return false;
        }
        if let Some(previous) = self.dragged_marker() {
            log::warn!(
                "Drag of {} replaced by drag of {} before release",
                previous,
                marker_id
            );
        }

        // Assigning drops any previous subscription after the new one is taken.
        self.state = DragState::Dragging {
            marker_id: marker_id.to_string(),
            rect,
            subscription: input.subscribe(),
        };
        log::debug!("🖐️ Drag started on marker {}", marker_id);
        true
    }

    /// Document-level move. Returns the updated snapshot, or `None` when idle
    /// or when the dragged marker no longer exists.
    pub fn pointer_moved(&self, client: ClientPoint, annotations: &Annotations) -> Option<Annotations> {
        let DragState::Dragging {
            marker_id, rect, ..
        } = &self.state
        else {
            return None;
        };

        let point = match rect.normalize_clamped(client) {
            Ok(point) => point,
            Err(e) => {
                log::warn!("Drag move ignored: {}", e);
                return None;
            }
        };

        match annotations.move_marker(marker_id, point) {
            Ok(next) => {
                log::trace!(
                    "Marker {} dragged to ({:.1}, {:.1})",
                    marker_id,
                    point.x,
                    point.y
                );
                Some(next)
            }
            Err(e) => {
                log::debug!("Drag move ignored: {}", e);
                None
            }
        }
    }

    /// Document-level release. Ends the drag and detaches listeners.
    ///
    /// Returns the id of the marker that was being dragged.
    pub fn release(&mut self) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging { marker_id, .. } => {
                log::debug!("🖐️ Drag ended on marker {}", marker_id);
                Some(marker_id)
            }
            DragState::Idle => None,
        }
    }
}
