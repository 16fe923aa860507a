//! Pointer input model.
//!
//! Mouse and touch events are folded into one [`InputEvent`] type. Touch
//! events use their first contact point, and a touch end may carry no
//! position at all.
//!
//! [`DocumentInput`] stands in for document-level listeners. A controller that
//! needs every move and release, wherever the pointer goes, takes a
//! [`Subscription`]. Dropping the subscription detaches it, so a drag cannot
//! leak listeners past its release.

use std::cell::Cell;
use std::rc::{Rc, Weak};

use serde::{Deserialize, Serialize};

use crate::coords::ClientPoint;

/// Which input device produced an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerDevice {
    Mouse,
    Touch,
}

/// Phase of a pointer interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// mousedown / touchstart
    Down,
    /// mousemove / touchmove
    Move,
    /// mouseup / touchend
    Up,
    /// A completed click on the target
    Click,
}

/// What the pointer was over when the event fired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerTarget {
    /// The image surface itself (not a marker)
    Surface,
    /// A marker glyph
    Marker(String),
    /// The delete affordance of a marker
    DeleteButton(String),
    /// Anywhere outside the annotation container
    Outside,
}

/// A single pointer event in device coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub phase: PointerPhase,
    pub device: PointerDevice,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<ClientPoint>,
    pub target: PointerTarget,
}

impl InputEvent {
    /// A mouse event at `(x, y)`.
    pub fn mouse(phase: PointerPhase, x: f32, y: f32, target: PointerTarget) -> Self {
        Self {
            phase,
            device: PointerDevice::Mouse,
            position: Some(ClientPoint::new(x, y)),
            target,
        }
    }

    /// A touch event; only the first contact point is used.
    pub fn touch(phase: PointerPhase, touches: &[ClientPoint], target: PointerTarget) -> Self {
        Self {
            phase,
            device: PointerDevice::Touch,
            position: touches.first().copied(),
            target,
        }
    }
}

/// Document-wide pointer listeners.
///
/// At most one subscription is live. Subscribing again replaces the previous
/// holder (last writer wins); the replaced subscription then drops as a no-op.
#[derive(Debug, Default)]
pub struct DocumentInput {
    slot: Rc<ListenerSlot>,
}

#[derive(Debug, Default)]
struct ListenerSlot {
    active: Cell<Option<u64>>,
    next_token: Cell<u64>,
}

impl DocumentInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach move/end listeners for both mouse and touch.
    pub fn subscribe(&self) -> Subscription {
        let token = self.slot.next_token.get();
        self.slot.next_token.set(token + 1);
        if self.slot.active.replace(Some(token)).is_some() {
            log::warn!("Document pointer listeners taken over by a new subscription");
        }
        log::trace!("Document pointer listeners attached (token {})", token);
        Subscription {
            token,
            slot: Rc::downgrade(&self.slot),
        }
    }

    /// Whether move/end events should be routed to a subscriber.
    pub fn is_subscribed(&self) -> bool {
        self.slot.active.get().is_some()
    }
}

/// Scoped ownership of the document pointer listeners.
#[derive(Debug)]
pub struct Subscription {
    token: u64,
    slot: Weak<ListenerSlot>,
}

impl Subscription {
    /// Whether this subscription still owns the listeners.
    pub fn is_active(&self) -> bool {
        self.slot
            .upgrade()
            .is_some_and(|slot| slot.active.get() == Some(self.token))
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.upgrade() {
            if slot.active.get() == Some(self.token) {
                slot.active.set(None);
                log::trace!("Document pointer listeners detached (token {})", self.token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscription_detaches_on_drop() {
        let input = DocumentInput::new();
        assert!(!input.is_subscribed());
        let sub = input.subscribe();
        assert!(input.is_subscribed());
        assert!(sub.is_active());
        drop(sub);
        assert!(!input.is_subscribed());
    }

    #[test]
    fn test_last_subscriber_wins() {
        let input = DocumentInput::new();
        let first = input.subscribe();
        let second = input.subscribe();
        assert!(!first.is_active());
        assert!(second.is_active());

        // Dropping the replaced subscription must not detach the new one
        drop(first);
        assert!(input.is_subscribed());
        drop(second);
        assert!(!input.is_subscribed());
    }

    #[test]
    fn test_subscription_outliving_input_is_harmless() {
        let input = DocumentInput::new();
        let sub = input.subscribe();
        drop(input);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_touch_uses_first_contact() {
        let touches = [ClientPoint::new(3.0, 4.0), ClientPoint::new(9.0, 9.0)];
        let event = InputEvent::touch(PointerPhase::Move, &touches, PointerTarget::Outside);
        assert_eq!(event.position, Some(ClientPoint::new(3.0, 4.0)));

        let end = InputEvent::touch(PointerPhase::Up, &[], PointerTarget::Outside);
        assert_eq!(end.position, None);
    }

    #[test]
    fn test_event_json_shape() {
        let event = InputEvent::mouse(
            PointerPhase::Down,
            10.0,
            20.0,
            PointerTarget::Marker("mk-1".into()),
        );
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["phase"], "down");
        assert_eq!(json["device"], "mouse");
        assert_eq!(json["target"]["marker"], "mk-1");
    }
}
