//! Editor message types.
//!
//! Everything the surrounding editor screen can tell the session, as one
//! serializable enum: toolbar actions, container layout changes and raw
//! pointer events. Scripts replayed by the binary are JSON arrays of these.

use serde::{Deserialize, Serialize};

use crate::coords::ContainerRect;
use crate::input::InputEvent;
use crate::model::MarkerKind;

/// Messages that can be sent to update an editor session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Message {
    // Toolbar
    /// Place a new marker of this kind at the default position
    PlaceMarker { kind: MarkerKind },
    /// Remove a marker (toolbar or delete affordance)
    DeleteMarker { id: String },
    /// Arm the polygon tool and start a new plot range
    StartDraw,
    /// End the current draw session
    FinishDraw,
    /// Arm click-to-place for a marker kind, or clear the active tool
    SelectTool {
        #[serde(default)]
        kind: Option<MarkerKind>,
    },
    /// Enter or leave map edit mode
    ToggleMapEdit,

    // Layout
    /// The annotation container moved or resized
    ResizeContainer { rect: ContainerRect },

    // Input
    /// Raw pointer or touch event
    Pointer { event: InputEvent },
}

impl Message {
    /// Short label for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Message::PlaceMarker { .. } => "place_marker",
            Message::DeleteMarker { .. } => "delete_marker",
            Message::StartDraw => "start_draw",
            Message::FinishDraw => "finish_draw",
            Message::SelectTool { .. } => "select_tool",
            Message::ToggleMapEdit => "toggle_map_edit",
            Message::ResizeContainer { .. } => "resize_container",
            Message::Pointer { .. } => "pointer",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{PointerPhase, PointerTarget};

    #[test]
    fn test_parse_script() {
        let json = r#"[
            {"action": "place_marker", "kind": "SERIES_INLET"},
            {"action": "start_draw"},
            {"action": "resize_container", "rect": {"left": 0, "top": 0, "width": 800, "height": 600}},
            {"action": "pointer", "event": {
                "phase": "click", "device": "mouse",
                "position": {"x": 80, "y": 60}, "target": "surface"
            }},
            {"action": "finish_draw"}
        ]"#;
        let messages: Vec<Message> = serde_json::from_str(json).unwrap();
        assert_eq!(messages.len(), 5);
        assert_eq!(
            messages[0],
            Message::PlaceMarker {
                kind: MarkerKind::SeriesInlet
            }
        );
        assert_eq!(
            messages[3],
            Message::Pointer {
                event: InputEvent::mouse(PointerPhase::Click, 80.0, 60.0, PointerTarget::Surface)
            }
        );
        assert_eq!(messages[4].name(), "finish_draw");
    }

    #[test]
    fn test_select_tool_without_kind_clears() {
        let message: Message = serde_json::from_str(r#"{"action": "select_tool"}"#).unwrap();
        assert_eq!(message, Message::SelectTool { kind: None });
    }

    #[test]
    fn test_unknown_action_rejected() {
        let result: Result<Message, _> = serde_json::from_str(r#"{"action": "undo"}"#);
        assert!(result.is_err());
    }
}
