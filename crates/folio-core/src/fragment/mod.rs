//! In-memory [`Page`] host.
//!
//! `FragmentTree` is a small synthetic document: elements with attributes,
//! classes, inline styles, text and a fixed layout box, plus a scroll
//! position, a preference store, a clipboard, a history log, a virtual
//! clock and a listener registry. It lets the controllers run end to end
//! without a browser.
//!
//! ## Usage
//!
//! ```ignore
//! let mut tree = FragmentTree::new();
//! let body = tree.body();
//! let nav = tree.add(body, El::new("nav"));
//! let link = tree.add(nav, El::new("a").attr("href", "#about"));
//! let about = tree.add(body, El::new("section").id("about").layout(800.0, 600.0));
//!
//! let context = PageContext::discover(&tree, &config);
//! let (mut runtime, _report) = PageRuntime::install(&mut tree, setup_steps(&context, &config));
//! runtime.load(&mut tree);
//!
//! tree.click(&mut runtime, link);
//! assert_eq!(tree.scroll_y(), 720.0);
//! ```

mod selector;

pub use selector::{ElementView, SelectorList};

use std::collections::BTreeMap;

use crate::error::{PageError, PageResult};
use crate::event::{DomEvent, EventKind, Outcome, TimerTask};
use crate::page::{ListenTarget, ListenerId, NodeId, Page, ScrollBehavior, Subscription};
use crate::runtime::PageRuntime;

/// Builder for an element added with [`FragmentTree::add`].
#[derive(Debug, Clone, Default)]
pub struct El {
    tag: String,
    attrs: BTreeMap<String, String>,
    classes: Vec<String>,
    styles: BTreeMap<String, String>,
    text: String,
    value: String,
    top: f64,
    height: f64,
}

impl El {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn class(mut self, class: &str) -> Self {
        self.classes.extend(class.split_whitespace().map(str::to_string));
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn style(mut self, property: &str, value: &str) -> Self {
        self.styles.insert(property.to_string(), value.to_string());
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Current value of a form control.
    pub fn value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    /// Document offset and height of the element's box.
    pub fn layout(mut self, top: f64, height: f64) -> Self {
        self.top = top;
        self.height = height;
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    el: El,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    disabled: bool,
    reflows: usize,
}

impl ElementView for NodeData {
    fn tag(&self) -> &str {
        &self.el.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.el.attrs.get(name).map(String::as_str)
    }

    fn has_class(&self, class: &str) -> bool {
        self.el.classes.iter().any(|c| c == class)
    }
}

#[derive(Debug, Clone)]
struct PendingTimer {
    due: f64,
    seq: u64,
    task: TimerTask,
}

/// Synthetic document implementing [`Page`].
#[derive(Debug, Clone)]
pub struct FragmentTree {
    nodes: Vec<NodeData>,
    scroll_y: f64,
    viewport_height: f64,
    storage: BTreeMap<String, String>,
    storage_fails: bool,
    prefers_dark: bool,
    clipboard: Vec<String>,
    clipboard_fails: bool,
    history: Vec<String>,
    history_fails: bool,
    scrolls: Vec<(f64, ScrollBehavior)>,
    clock: f64,
    timers: Vec<PendingTimer>,
    next_seq: u64,
    listeners: BTreeMap<ListenerId, Subscription>,
    next_listener: u32,
}

const ROOT: NodeId = NodeId::new(0);
const BODY: NodeId = NodeId::new(1);

impl Default for FragmentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl FragmentTree {
    /// An empty document with `<html>` and `<body>` and an 800px viewport.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            scroll_y: 0.0,
            viewport_height: 800.0,
            storage: BTreeMap::new(),
            storage_fails: false,
            prefers_dark: false,
            clipboard: Vec::new(),
            clipboard_fails: false,
            history: Vec::new(),
            history_fails: false,
            scrolls: Vec::new(),
            clock: 0.0,
            timers: Vec::new(),
            next_seq: 0,
            listeners: BTreeMap::new(),
            next_listener: 0,
        };
        tree.push_node(None, El::new("html"));
        tree.push_node(Some(ROOT), El::new("body"));
        tree
    }

    /// Append an element as the last child of `parent`.
    pub fn add(&mut self, parent: NodeId, el: El) -> NodeId {
        self.push_node(Some(parent), el)
    }

    fn push_node(&mut self, parent: Option<NodeId>, el: El) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            el,
            parent,
            children: Vec::new(),
            disabled: false,
            reflows: 0,
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    fn ancestors(&self, id: NodeId) -> impl Iterator<Item = &NodeData> + Clone + '_ {
        std::iter::successors(self.node(id).parent, move |p| self.node(*p).parent)
            .map(move |p| self.node(p))
    }

    /// Descendants of `scope` in document order (pre-order), excluding it.
    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    // ------------------------------------------------------------------
    // Test controls
    // ------------------------------------------------------------------

    pub fn set_scroll_y(&mut self, y: f64) {
        self.scroll_y = y.max(0.0);
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    pub fn set_layout(&mut self, node: NodeId, top: f64, height: f64) {
        let el = &mut self.node_mut(node).el;
        el.top = top;
        el.height = height;
    }

    pub fn set_value(&mut self, node: NodeId, value: &str) {
        self.node_mut(node).el.value = value.to_string();
    }

    pub fn set_prefers_dark(&mut self, dark: bool) {
        self.prefers_dark = dark;
    }

    /// Preload the preference store.
    pub fn set_stored(&mut self, key: &str, value: &str) {
        self.storage.insert(key.to_string(), value.to_string());
    }

    pub fn stored(&self, key: &str) -> Option<&str> {
        self.storage.get(key).map(String::as_str)
    }

    /// Make every storage access fail, like a browser with storage disabled.
    pub fn fail_storage(&mut self, fail: bool) {
        self.storage_fails = fail;
    }

    pub fn fail_clipboard(&mut self, fail: bool) {
        self.clipboard_fails = fail;
    }

    /// Make [`Page::push_fragment`] fail, like a sandboxed frame.
    pub fn fail_history(&mut self, fail: bool) {
        self.history_fails = fail;
    }

    pub fn clipboard(&self) -> &[String] {
        &self.clipboard
    }

    /// Fragments pushed with [`Page::push_fragment`].
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Every [`Page::scroll_to`] call.
    pub fn scroll_log(&self) -> &[(f64, ScrollBehavior)] {
        &self.scrolls
    }

    pub fn value(&self, node: NodeId) -> &str {
        &self.node(node).el.value
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.node(node).disabled
    }

    pub fn reflow_count(&self, node: NodeId) -> usize {
        self.node(node).reflows
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn pending_timers(&self) -> Vec<TimerTask> {
        let mut timers = self.timers.clone();
        timers.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)));
        timers.into_iter().map(|t| t.task).collect()
    }

    // ------------------------------------------------------------------
    // Event simulation
    // ------------------------------------------------------------------

    /// Dispatch an event the way the DOM bubbles it: target, ancestors,
    /// document, window.
    pub fn fire(
        &mut self,
        runtime: &mut PageRuntime<Self>,
        target: Option<NodeId>,
        kind: EventKind,
        key: Option<&str>,
    ) -> Outcome {
        let mut path = Vec::new();
        if let Some(node) = target {
            path.push(ListenTarget::Node(node));
            path.extend(
                std::iter::successors(self.node(node).parent, |p| self.node(*p).parent)
                    .map(ListenTarget::Node),
            );
            path.push(ListenTarget::Document);
        }
        path.push(ListenTarget::Window);

        let deliveries: Vec<(ListenerId, ListenTarget)> = path
            .iter()
            .flat_map(|current| {
                self.listeners
                    .iter()
                    .filter(move |(_, sub)| sub.target == *current && sub.kind == kind)
                    .map(move |(id, _)| (*id, *current))
            })
            .collect();

        let mut outcome = Outcome::Ignored;
        for (listener, current) in deliveries {
            let mut event = DomEvent::new(kind, current, target);
            if let Some(key) = key {
                event = event.with_key(key);
            }
            outcome = outcome.merge(runtime.deliver(self, listener, &event));
        }
        outcome
    }

    pub fn click(&mut self, runtime: &mut PageRuntime<Self>, node: NodeId) -> Outcome {
        self.fire(runtime, Some(node), EventKind::Click, None)
    }

    pub fn submit(&mut self, runtime: &mut PageRuntime<Self>, form: NodeId) -> Outcome {
        self.fire(runtime, Some(form), EventKind::Submit, None)
    }

    /// Key press with the body as the event target.
    pub fn press_key(&mut self, runtime: &mut PageRuntime<Self>, key: &str) -> Outcome {
        self.fire(runtime, Some(BODY), EventKind::KeyDown, Some(key))
    }

    /// Move the viewport and fire `scroll` on the window.
    pub fn scroll_window(&mut self, runtime: &mut PageRuntime<Self>, y: f64) -> Outcome {
        self.set_scroll_y(y);
        self.fire(runtime, None, EventKind::Scroll, None)
    }

    pub fn resize(&mut self, runtime: &mut PageRuntime<Self>, viewport_height: f64) -> Outcome {
        self.viewport_height = viewport_height;
        self.fire(runtime, None, EventKind::Resize, None)
    }

    /// Advance the virtual clock, running due timers in order. Timers
    /// scheduled by those timers run too if they fall inside the window.
    pub fn advance(&mut self, runtime: &mut PageRuntime<Self>, ms: f64) {
        let deadline = self.clock + ms;
        loop {
            let next = self
                .timers
                .iter()
                .enumerate()
                .filter(|(_, timer)| timer.due <= deadline)
                .min_by(|(_, a), (_, b)| a.due.total_cmp(&b.due).then(a.seq.cmp(&b.seq)))
                .map(|(i, _)| i);
            let Some(index) = next else {
                break;
            };
            let timer = self.timers.remove(index);
            self.clock = self.clock.max(timer.due);
            runtime.timer(self, timer.task);
        }
        self.clock = deadline;
    }
}

impl Page for FragmentTree {
    fn root(&self) -> NodeId {
        ROOT
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn query_all(&self, scope: Option<NodeId>, selector: &str) -> PageResult<Vec<NodeId>> {
        let selector = SelectorList::parse(selector)?;
        let candidates = match scope {
            Some(scope) => self.descendants(scope),
            None => {
                let mut all = vec![ROOT];
                all.extend(self.descendants(ROOT));
                all
            }
        };
        Ok(candidates
            .into_iter()
            .filter(|id| selector.matches(self.node(*id), self.ancestors(*id)))
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        if id.is_empty() {
            return None;
        }
        (0..self.nodes.len())
            .map(NodeId::new)
            .find(|node| self.node(*node).attr("id") == Some(id))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        std::iter::successors(Some(node), |n| self.node(*n).parent).any(|n| n == ancestor)
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        if name == "class" {
            let classes = &self.node(node).el.classes;
            return (!classes.is_empty()).then(|| classes.join(" "));
        }
        self.node(node).attr(name).map(str::to_string)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> PageResult<()> {
        if node.index() >= self.nodes.len() {
            return Err(PageError::UnknownNode(node));
        }
        self.node_mut(node)
            .el
            .attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        Ok(())
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        ElementView::has_class(self.node(node), class)
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        let classes = &mut self.node_mut(node).el.classes;
        if !classes.iter().any(|c| c == class) {
            classes.push(class.to_string());
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        self.node_mut(node).el.classes.retain(|c| c != class);
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.node(node).el.styles.get(property).cloned()
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let styles = &mut self.node_mut(node).el.styles;
        if value.is_empty() {
            styles.remove(property);
        } else {
            styles.insert(property.to_string(), value.to_string());
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.node(node).el.text.clone()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        self.node_mut(node).el.text = text.to_string();
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        self.node_mut(node).disabled = disabled;
    }

    fn is_displayed(&self, node: NodeId) -> bool {
        std::iter::successors(Some(node), |n| self.node(*n).parent)
            .all(|n| self.node(n).el.styles.get("display").map(String::as_str) != Some("none"))
    }

    fn reflow(&mut self, node: NodeId) {
        self.node_mut(node).reflows += 1;
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.node(node).el.top
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.node(node).el.height
    }

    fn viewport_top(&self, node: NodeId) -> f64 {
        self.node(node).el.top - self.scroll_y
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.scrolls.push((top, behavior));
        self.set_scroll_y(top);
    }

    fn push_fragment(&mut self, fragment: &str) -> PageResult<()> {
        if self.history_fails {
            return Err(PageError::Host("history is unavailable".to_string()));
        }
        self.history.push(fragment.to_string());
        Ok(())
    }

    fn form_fields(&self, form: NodeId) -> Vec<(String, String)> {
        self.descendants(form)
            .into_iter()
            .map(|id| self.node(id))
            .filter(|node| matches!(node.tag(), "input" | "textarea" | "select"))
            .filter_map(|node| {
                node.attr("name")
                    .map(|name| (name.to_string(), node.el.value.clone()))
            })
            .collect()
    }

    fn reset_form(&mut self, form: NodeId) -> PageResult<()> {
        for id in self.descendants(form) {
            self.node_mut(id).el.value.clear();
        }
        Ok(())
    }

    fn load_preference(&self, key: &str) -> PageResult<Option<String>> {
        if self.storage_fails {
            return Err(PageError::Storage("storage is disabled".to_string()));
        }
        Ok(self.storage.get(key).cloned())
    }

    fn store_preference(&mut self, key: &str, value: &str) -> PageResult<()> {
        if self.storage_fails {
            return Err(PageError::Storage("storage is disabled".to_string()));
        }
        self.storage.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.prefers_dark
    }

    fn write_clipboard(&mut self, text: &str) -> PageResult<()> {
        if self.clipboard_fails {
            return Err(PageError::Clipboard("permission denied".to_string()));
        }
        self.clipboard.push(text.to_string());
        Ok(())
    }

    fn now(&self) -> f64 {
        self.clock
    }

    fn schedule(&mut self, delay_ms: u32, task: TimerTask) {
        self.timers.push(PendingTimer {
            due: self.clock + f64::from(delay_ms),
            seq: self.next_seq,
            task,
        });
        self.next_seq += 1;
    }

    fn listen(&mut self, subscription: Subscription) -> PageResult<ListenerId> {
        if let ListenTarget::Node(node) = subscription.target {
            if node.index() >= self.nodes.len() {
                return Err(PageError::UnknownNode(node));
            }
        }
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        self.listeners.insert(id, subscription);
        Ok(id)
    }

    fn unlisten(&mut self, listener: ListenerId) {
        self.listeners.remove(&listener);
    }
}
