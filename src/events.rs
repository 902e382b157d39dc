//! Notifications emitted by the component, and click interception.
//!
//! Every notification bubbles, is cancelable, and crosses shadow boundaries
//! (composed). Delivery goes through an [`EventSink`] supplied by the host.

use crate::hover::NodeId;
use crate::render::{ImageElement, PictureElement};

/// A host event the component reacts to (click, load, error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostEvent {
    pub kind: String,
    pub target: Option<NodeId>,
}

impl HostEvent {
    pub fn new(kind: impl Into<String>, target: Option<NodeId>) -> Self {
        Self {
            kind: kind.into(),
            target,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    ModalOpen {
        orig_event: HostEvent,
        child: NodeId,
    },
    Loaded {
        orig_event: HostEvent,
        child: NodeId,
        img: Option<ImageElement>,
        picture: PictureElement,
    },
    Failed {
        error: HostEvent,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub name: String,
    pub detail: Detail,
    pub bubbles: bool,
    pub cancelable: bool,
    pub composed: bool,
}

impl Notification {
    pub fn new(name: impl Into<String>, detail: Detail) -> Self {
        Self {
            name: name.into(),
            detail,
            bubbles: true,
            cancelable: true,
            composed: true,
        }
    }
}

/// Receiver of dispatched notifications.
pub trait EventSink {
    fn dispatch(&mut self, notification: Notification);
}

impl EventSink for Vec<Notification> {
    fn dispatch(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// What the host should do with an intercepted click.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickOutcome {
    pub stop_propagation: bool,
    pub notification: Notification,
}

/// Re-emit a click as a modal-open notification. Propagation of the original
/// click is stopped unless the component is already marked open.
pub fn intercept_click(
    event_name: &str,
    is_open: bool,
    event: HostEvent,
    child: NodeId,
) -> ClickOutcome {
    ClickOutcome {
        stop_propagation: !is_open,
        notification: Notification::new(
            event_name,
            Detail::ModalOpen {
                orig_event: event,
                child,
            },
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_on_closed_component_stops_propagation() {
        let click = HostEvent::new("click", Some(NodeId(7)));
        let outcome = intercept_click("open-gallery", false, click.clone(), NodeId(7));
        assert!(outcome.stop_propagation);
        assert_eq!(outcome.notification.name, "open-gallery");
        assert!(outcome.notification.bubbles);
        assert!(outcome.notification.cancelable);
        assert_eq!(
            outcome.notification.detail,
            Detail::ModalOpen {
                orig_event: click,
                child: NodeId(7),
            }
        );
    }

    #[test]
    fn click_on_open_component_propagates() {
        let outcome = intercept_click("m", true, HostEvent::new("click", None), NodeId(1));
        assert!(!outcome.stop_propagation);
    }
}
