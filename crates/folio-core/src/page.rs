//! Host abstraction over the document.
//!
//! Controllers never talk to a browser directly. Everything they read or
//! mutate goes through [`Page`], which the browser host implements over
//! `web-sys` and `FragmentTree` (feature `test-util`) implements
//! in memory for tests.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::PageResult;
use crate::event::{EventKind, TimerTask};

/// Opaque handle to an element registered with a [`Page`] host.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub const fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle to a registered event listener, released with [`Page::unlisten`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u32);

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ListenTarget {
    Window,
    Document,
    Node(NodeId),
}

/// A listener a controller asks the host to register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Subscription {
    pub target: ListenTarget,
    pub kind: EventKind,
}

impl Subscription {
    pub fn new(target: ListenTarget, kind: EventKind) -> Self {
        Self { target, kind }
    }

    pub fn node(node: NodeId, kind: EventKind) -> Self {
        Self::new(ListenTarget::Node(node), kind)
    }
}

/// How [`Page::scroll_to`] moves the viewport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Instant,
    #[default]
    Smooth,
}

/// The DOM surface the controllers depend on.
///
/// Class, style and text mutations are infallible from the controller's
/// point of view; hosts log whatever their platform reports and move on.
pub trait Page {
    /// The document element (`<html>`).
    fn root(&self) -> NodeId;

    /// The `<body>` element.
    fn body(&self) -> NodeId;

    /// All elements matching `selector`, in document order. With a scope,
    /// only descendants of that element are returned.
    fn query_all(&self, scope: Option<NodeId>, selector: &str) -> PageResult<Vec<NodeId>>;

    /// First element matching `selector`.
    fn query(&self, scope: Option<NodeId>, selector: &str) -> PageResult<Option<NodeId>> {
        Ok(self.query_all(scope, selector)?.into_iter().next())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// True when `node` is `ancestor` or one of its descendants.
    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool;

    fn attribute(&self, node: NodeId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> PageResult<()>;

    fn has_class(&self, node: NodeId, class: &str) -> bool;
    fn add_class(&mut self, node: NodeId, class: &str);
    fn remove_class(&mut self, node: NodeId, class: &str);

    /// Inline style property, `None` when unset.
    fn style(&self, node: NodeId, property: &str) -> Option<String>;
    /// Sets an inline style property; an empty value removes it.
    fn set_style(&mut self, node: NodeId, property: &str, value: &str);

    fn text(&self, node: NodeId) -> String;
    fn set_text(&mut self, node: NodeId, text: &str);
    fn set_disabled(&mut self, node: NodeId, disabled: bool);

    /// Whether the element currently takes part in layout.
    fn is_displayed(&self, node: NodeId) -> bool;

    /// Forces a synchronous layout so a following class change transitions.
    fn reflow(&mut self, node: NodeId);

    /// Distance from the top of the document, in CSS pixels.
    fn offset_top(&self, node: NodeId) -> f64;
    fn offset_height(&self, node: NodeId) -> f64;
    /// Top edge relative to the viewport (`getBoundingClientRect().top`).
    fn viewport_top(&self, node: NodeId) -> f64;

    fn scroll_y(&self) -> f64;
    fn viewport_height(&self) -> f64;
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Updates the URL fragment without navigating.
    fn push_fragment(&mut self, fragment: &str) -> PageResult<()>;

    /// Named control values of a form, in document order.
    fn form_fields(&self, form: NodeId) -> Vec<(String, String)>;
    fn reset_form(&mut self, form: NodeId) -> PageResult<()>;

    fn load_preference(&self, key: &str) -> PageResult<Option<String>>;
    fn store_preference(&mut self, key: &str, value: &str) -> PageResult<()>;
    fn prefers_dark_scheme(&self) -> bool;
    fn write_clipboard(&mut self, text: &str) -> PageResult<()>;

    /// Monotonic clock in milliseconds.
    fn now(&self) -> f64;

    /// Delivers `task` back to the runtime after `delay_ms`. There is no
    /// cancellation.
    fn schedule(&mut self, delay_ms: u32, task: TimerTask);

    fn listen(&mut self, subscription: Subscription) -> PageResult<ListenerId>;
    fn unlisten(&mut self, listener: ListenerId);
}
