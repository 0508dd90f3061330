//! [`Page`] over the live DOM.
//!
//! Elements are registered on first sight and addressed by their index in
//! the registry afterwards. Listeners and timers hold a weak handle to the
//! application and drop the event once it has been torn down.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Weak;

use folio_core::{
    EventKind, ListenTarget, ListenerId, NodeId, Page, PageError, PageResult, ScrollBehavior,
    Subscription, TimerTask,
};
use gloo::events::{EventListener, EventListenerOptions};
use gloo::timers::callback::Timeout;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::{spawn_local, JsFuture};
use web_sys::{
    Document, Element, Event, EventTarget, FormData, HtmlElement, HtmlFormElement,
    KeyboardEvent, Performance, ScrollToOptions, Storage, Window,
};

use crate::app::App;

const ROOT: NodeId = NodeId::new(0);
const BODY: NodeId = NodeId::new(1);

pub(crate) fn host_error(value: JsValue) -> PageError {
    PageError::Host(describe(&value))
}

fn storage_error(value: JsValue) -> PageError {
    PageError::Storage(describe(&value))
}

fn describe(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

pub struct WebPage {
    window: Window,
    performance: Performance,
    document: Document,
    nodes: RefCell<Vec<Element>>,
    listeners: HashMap<ListenerId, EventListener>,
    next_listener: u32,
    app: Weak<RefCell<App>>,
}

impl WebPage {
    pub fn new() -> PageResult<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::Host("no window".into()))?;
        let performance = window
            .performance()
            .ok_or_else(|| PageError::Host("no performance timer".into()))?;
        let document = window
            .document()
            .ok_or_else(|| PageError::Host("no document".into()))?;
        let root = document
            .document_element()
            .ok_or_else(|| PageError::Host("no document element".into()))?;
        let body = document
            .body()
            .ok_or_else(|| PageError::Host("no body".into()))?;

        Ok(Self {
            window,
            performance,
            document,
            nodes: RefCell::new(vec![root, body.into()]),
            listeners: HashMap::new(),
            next_listener: 0,
            app: Weak::new(),
        })
    }

    /// Point listeners and timers at the application that owns this page.
    pub fn bind(&mut self, app: Weak<RefCell<App>>) {
        self.app = app;
    }

    /// Registry handle for `element`, registering it on first sight.
    pub fn register(&self, element: Element) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        if let Some(index) = nodes.iter().position(|known| *known == element) {
            return NodeId::new(index);
        }
        nodes.push(element);
        NodeId::new(nodes.len() - 1)
    }

    fn element(&self, node: NodeId) -> PageResult<Element> {
        self.nodes
            .borrow()
            .get(node.index())
            .cloned()
            .ok_or(PageError::UnknownNode(node))
    }

    fn el(&self, node: NodeId) -> Option<Element> {
        self.element(node).ok()
    }

    fn html(&self, node: NodeId) -> Option<HtmlElement> {
        self.el(node)?.dyn_into::<HtmlElement>().ok()
    }

    fn event_target(&self, target: ListenTarget) -> PageResult<EventTarget> {
        Ok(match target {
            ListenTarget::Window => self.window.clone().into(),
            ListenTarget::Document => self.document.clone().into(),
            ListenTarget::Node(node) => self.element(node)?.into(),
        })
    }

    fn storage(&self) -> PageResult<Storage> {
        self.window
            .local_storage()
            .map_err(storage_error)?
            .ok_or_else(|| PageError::Storage("local storage unavailable".into()))
    }
}

/// Hand a native event to the runtime and apply its outcome.
fn dispatch(
    app: &Weak<RefCell<App>>,
    listener: ListenerId,
    kind: EventKind,
    current: ListenTarget,
    event: &Event,
) {
    let Some(app) = app.upgrade() else {
        return;
    };
    let Ok(mut app) = app.try_borrow_mut() else {
        debug!(event = kind.as_str(), "Nested event dropped");
        return;
    };

    let target = event.target().and_then(|t| t.dyn_into::<Element>().ok());
    let key = event.dyn_ref::<KeyboardEvent>().map(KeyboardEvent::key);
    let outcome = app.deliver(listener, kind, current, target, key);
    if outcome.prevents_default() {
        event.prevent_default();
    }
}

impl Page for WebPage {
    fn root(&self) -> NodeId {
        ROOT
    }

    fn body(&self) -> NodeId {
        BODY
    }

    fn query_all(&self, scope: Option<NodeId>, selector: &str) -> PageResult<Vec<NodeId>> {
        let found = match scope {
            Some(node) => self.element(node)?.query_selector_all(selector),
            None => self.document.query_selector_all(selector),
        }
        .map_err(|_| PageError::InvalidSelector(selector.to_string()))?;

        Ok((0..found.length())
            .filter_map(|i| found.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .map(|element| self.register(element))
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.document
            .get_element_by_id(id)
            .map(|element| self.register(element))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        match (self.el(ancestor), self.el(node)) {
            (Some(ancestor), Some(node)) => ancestor.contains(Some(&node)),
            _ => false,
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.el(node)?.get_attribute(name)
    }

    fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> PageResult<()> {
        self.element(node)?
            .set_attribute(name, value)
            .map_err(host_error)
    }

    fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.el(node)
            .is_some_and(|element| element.class_list().contains(class))
    }

    fn add_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.el(node) {
            if let Err(e) = element.class_list().add_1(class) {
                warn!(class, error = %host_error(e), "Failed to add class");
            }
        }
    }

    fn remove_class(&mut self, node: NodeId, class: &str) {
        if let Some(element) = self.el(node) {
            if let Err(e) = element.class_list().remove_1(class) {
                warn!(class, error = %host_error(e), "Failed to remove class");
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.html(node)?
            .style()
            .get_property_value(property)
            .ok()
            .filter(|value| !value.is_empty())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: &str) {
        let Some(element) = self.html(node) else {
            return;
        };
        let style = element.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(drop)
        } else {
            style.set_property(property, value)
        };
        if let Err(e) = result {
            warn!(property, error = %host_error(e), "Failed to set style");
        }
    }

    fn text(&self, node: NodeId) -> String {
        self.el(node)
            .and_then(|element| element.text_content())
            .unwrap_or_default()
    }

    fn set_text(&mut self, node: NodeId, text: &str) {
        if let Some(element) = self.el(node) {
            element.set_text_content(Some(text));
        }
    }

    fn set_disabled(&mut self, node: NodeId, disabled: bool) {
        let Some(element) = self.el(node) else {
            return;
        };
        let result = if disabled {
            element.set_attribute("disabled", "")
        } else {
            element.remove_attribute("disabled")
        };
        if let Err(e) = result {
            warn!(disabled, error = %host_error(e), "Failed to toggle disabled");
        }
    }

    fn is_displayed(&self, node: NodeId) -> bool {
        self.el(node)
            .is_some_and(|element| element.get_client_rects().length() > 0)
    }

    fn reflow(&mut self, node: NodeId) {
        if let Some(element) = self.html(node) {
            let _ = element.offset_height();
        }
    }

    fn offset_top(&self, node: NodeId) -> f64 {
        self.html(node)
            .map_or(0.0, |element| f64::from(element.offset_top()))
    }

    fn offset_height(&self, node: NodeId) -> f64 {
        self.html(node)
            .map_or(0.0, |element| f64::from(element.offset_height()))
    }

    fn viewport_top(&self, node: NodeId) -> f64 {
        self.el(node)
            .map_or(0.0, |element| element.get_bounding_client_rect().top())
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.window
            .inner_height()
            .ok()
            .and_then(|height| height.as_f64())
            .unwrap_or(0.0)
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Instant => web_sys::ScrollBehavior::Instant,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn push_fragment(&mut self, fragment: &str) -> PageResult<()> {
        self.window
            .history()
            .map_err(host_error)?
            .push_state_with_url(&JsValue::NULL, "", Some(fragment))
            .map_err(host_error)
    }

    fn form_fields(&self, form: NodeId) -> Vec<(String, String)> {
        let Some(form) = self
            .el(form)
            .and_then(|element| element.dyn_into::<HtmlFormElement>().ok())
        else {
            return Vec::new();
        };
        let Ok(data) = FormData::new_with_form(&form) else {
            return Vec::new();
        };
        let Ok(Some(entries)) = js_sys::try_iter(&data) else {
            return Vec::new();
        };

        // File inputs have no string value and are skipped.
        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pair = js_sys::Array::from(&entry);
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn reset_form(&mut self, form: NodeId) -> PageResult<()> {
        let form = self
            .element(form)?
            .dyn_into::<HtmlFormElement>()
            .map_err(|_| PageError::Host("not a form".into()))?;
        form.reset();
        Ok(())
    }

    fn load_preference(&self, key: &str) -> PageResult<Option<String>> {
        self.storage()?.get_item(key).map_err(storage_error)
    }

    fn store_preference(&mut self, key: &str, value: &str) -> PageResult<()> {
        self.storage()?.set_item(key, value).map_err(storage_error)
    }

    fn prefers_dark_scheme(&self) -> bool {
        self.window
            .match_media("(prefers-color-scheme: dark)")
            .ok()
            .flatten()
            .is_some_and(|query| query.matches())
    }

    fn write_clipboard(&mut self, text: &str) -> PageResult<()> {
        let clipboard = self.window.navigator().clipboard();
        if clipboard.is_undefined() {
            return Err(PageError::Clipboard("clipboard unavailable".into()));
        }

        // The write settles later; a rejection can only be logged.
        let promise = clipboard.write_text(text);
        spawn_local(async move {
            if let Err(e) = JsFuture::from(promise).await {
                warn!(error = %describe(&e), "Clipboard write rejected");
            }
        });
        Ok(())
    }

    fn now(&self) -> f64 {
        self.performance.now()
    }

    fn schedule(&mut self, delay_ms: u32, task: TimerTask) {
        let app = self.app.clone();
        Timeout::new(delay_ms, move || {
            let Some(app) = app.upgrade() else {
                return;
            };
            match app.try_borrow_mut() {
                Ok(mut app) => app.timer(task),
                Err(_) => debug!(?task, "Timer fired during dispatch, dropped"),
            };
        })
        .forget();
    }

    fn listen(&mut self, subscription: Subscription) -> PageResult<ListenerId> {
        let target = self.event_target(subscription.target)?;
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;

        let Subscription { target: current, kind } = subscription;
        let options = match kind {
            EventKind::Scroll | EventKind::Resize => EventListenerOptions::default(),
            _ => EventListenerOptions::enable_prevent_default(),
        };
        let app = self.app.clone();
        let listener = EventListener::new_with_options(
            &target,
            kind.as_str(),
            options,
            move |event: &Event| dispatch(&app, id, kind, current, event),
        );

        self.listeners.insert(id, listener);
        Ok(id)
    }

    fn unlisten(&mut self, listener: ListenerId) {
        // Dropping the gloo listener detaches it.
        self.listeners.remove(&listener);
    }
}
