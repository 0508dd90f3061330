//! Events flowing from the host into the controllers.

use serde::{Deserialize, Serialize};

use crate::page::{ListenTarget, NodeId};

/// DOM event types the controllers subscribe to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Click,
    Submit,
    Scroll,
    Resize,
    KeyDown,
}

impl EventKind {
    /// DOM event name, as passed to `addEventListener`.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Click => "click",
            EventKind::Submit => "submit",
            EventKind::Scroll => "scroll",
            EventKind::Resize => "resize",
            EventKind::KeyDown => "keydown",
        }
    }
}

/// A native event as seen by one listener.
#[derive(Clone, Debug, PartialEq)]
pub struct DomEvent {
    pub kind: EventKind,
    /// Where the listener that received the event is attached.
    pub current: ListenTarget,
    /// The element the event originated from, if it was an element.
    pub target: Option<NodeId>,
    /// `KeyboardEvent.key` for key events.
    pub key: Option<String>,
}

impl DomEvent {
    pub fn new(kind: EventKind, current: ListenTarget, target: Option<NodeId>) -> Self {
        Self {
            kind,
            current,
            target,
            key: None,
        }
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// The node the listener is attached to, when it is an element.
    pub fn current_node(&self) -> Option<NodeId> {
        match self.current {
            ListenTarget::Node(node) => Some(node),
            _ => None,
        }
    }
}

/// Deferred work scheduled through [`Page::schedule`](crate::page::Page::schedule).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerTask {
    /// First reveal pass shortly after load.
    InitialReveal,
    /// Trailing run of a throttled scroll burst.
    ScrollSettled,
    /// Layout changed without scrolling; check reveal targets again.
    RevealPass,
    /// The simulated contact submission finished.
    SubmissionSettled,
    /// Hide the contact status message.
    HideStatus,
    /// Drop the "copied" feedback from a skill tag.
    ClearCopied(NodeId),
}

/// Everything a controller can be asked to handle.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    /// The document finished loading. Broadcast once after install.
    Load,
    Dom(DomEvent),
    Timer(TimerTask),
}

/// What the host should do with the native event after dispatch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum Outcome {
    #[default]
    Ignored,
    Handled,
    /// Handled, and the browser default action must be cancelled.
    PreventDefault,
}

impl Outcome {
    /// Combines the outcomes of several listeners for one native event.
    pub fn merge(self, other: Outcome) -> Outcome {
        self.max(other)
    }

    pub fn prevents_default(self) -> bool {
        self == Outcome::PreventDefault
    }
}
