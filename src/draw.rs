//! Plot range draw controller.
//!
//! Arming the draw tool creates an empty range and keeps an explicit handle
//! to it. Clicks on the surface append vertices to that range until the
//! session is finished. Finished ranges are never touched again, whatever
//! their vertex count.

use crate::coords::{ClientPoint, ContainerRect};
use crate::error::AnnotationError;
use crate::store::Annotations;

/// Current draw state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DrawState {
    #[default]
    Idle,
    Drawing {
        /// The range receiving vertices.
        range_id: String,
    },
}

/// Drives a polygon trace from tool activation to finish.
#[derive(Debug, Default)]
pub struct DrawController {
    state: DrawState,
}

impl DrawController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, DrawState::Drawing { .. })
    }

    /// The range currently receiving vertices.
    pub fn active_range(&self) -> Option<&str> {
        match &self.state {
            DrawState::Drawing { range_id } => Some(range_id),
            DrawState::Idle => None,
        }
    }

    /// Arm the draw tool: create a new empty range and target it.
    ///
    /// Starting again while drawing leaves the previous range as it is,
    /// however few vertices it has, and targets a fresh one.
    pub fn start(&mut self, annotations: &Annotations) -> (Annotations, String) {
        if let Some(previous) = self.active_range() {
            let count = annotations.range(previous).map_or(0, |r| r.len());
            log::debug!(
                "📝 Leaving plot range {} with {} points for a new one",
                previous,
                count
            );
        }
        let (next, range_id) = annotations.start_range();
        log::info!("✏️ Started plot range {}", range_id);
        self.state = DrawState::Drawing {
            range_id: range_id.clone(),
        };
        (next, range_id)
    }

    /// Click on the container surface.
    ///
    /// Only accepted while drawing and in map edit mode; otherwise `Ok(None)`.
    /// The position is normalized without clamping.
    pub fn click(
        &self,
        client: ClientPoint,
        rect: ContainerRect,
        editing: bool,
        annotations: &Annotations,
    ) -> Result<Option<Annotations>, AnnotationError> {
        let DrawState::Drawing { range_id } = &self.state else {
            return Ok(None);
        };
        if !editing {
            log::debug!("Ignoring draw click: map is not editable");
            return Ok(None);
        }

        let point = rect.normalize(client)?;
        let next = annotations.append_point(range_id, point)?;
        log::debug!(
            "✏️ Added point ({:.1}, {:.1}) to plot range {}, total: {}",
            point.x,
            point.y,
            range_id,
            next.range(range_id).map_or(0, |r| r.len())
        );
        Ok(Some(next))
    }

    /// Finish the draw session. The range stays as drawn.
    ///
    /// Returns the id of the finished range.
    pub fn finish(&mut self, annotations: &Annotations) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DrawState::Drawing { range_id } => {
                let range = annotations.range(&range_id);
                let count = range.map_or(0, |r| r.len());
                if range.is_some_and(|r| r.is_degenerate()) {
                    log::warn!(
                        "Finished plot range {} with only {} points",
                        range_id,
                        count
                    );
                } else {
                    log::info!("✅ Finished plot range {} ({} points)", range_id, count);
                }
                Some(range_id)
            }
            DrawState::Idle => None,
        }
    }
}
