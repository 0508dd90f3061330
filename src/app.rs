//! Boot sequence and the live application handle.

use std::cell::RefCell;
use std::rc::Rc;

use folio_core::logging::LoggingBuilder;
use folio_core::{
    setup_steps, DomEvent, EventKind, ListenTarget, ListenerId, Outcome, PageContext,
    PageResult, PageRuntime, TimerTask,
};
use gloo::events::EventListener;
use tracing::{error, info, warn};
use web_sys::Element;

use crate::console::ConsoleSink;
use crate::host::WebPage;
use crate::settings::{page_config_or_default, CONFIG_ELEMENT_ID};

thread_local! {
    static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
}

/// The page host together with the controllers installed on it.
pub(crate) struct App {
    page: WebPage,
    runtime: PageRuntime<WebPage>,
}

impl App {
    pub(crate) fn deliver(
        &mut self,
        listener: ListenerId,
        kind: EventKind,
        current: ListenTarget,
        target: Option<Element>,
        key: Option<String>,
    ) -> Outcome {
        let target = target.map(|element| self.page.register(element));
        let mut event = DomEvent::new(kind, current, target);
        if let Some(key) = key {
            event = event.with_key(key);
        }
        self.runtime.deliver(&mut self.page, listener, &event)
    }

    pub(crate) fn timer(&mut self, task: TimerTask) {
        self.runtime.timer(&mut self.page, task);
    }
}

/// Boot now, or on `DOMContentLoaded` while the document is still parsing.
pub(crate) fn start() {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        return;
    };
    if document.ready_state() == "loading" {
        EventListener::once(&document, "DOMContentLoaded", |_| run()).forget();
    } else {
        run();
    }
}

fn run() {
    if let Err(e) = boot() {
        error!(error = %e, "Folio failed to start");
    }
}

fn read_config_source() -> Option<String> {
    web_sys::window()?
        .document()?
        .get_element_by_id(CONFIG_ELEMENT_ID)?
        .text_content()
}

fn boot() -> PageResult<()> {
    let (config, config_error) = page_config_or_default(read_config_source().as_deref());
    if let Err(e) = LoggingBuilder::new("folio")
        .with_level(config.log_level.clone())
        .init(ConsoleSink)
    {
        web_sys::console::warn_1(&e.to_string().into());
    }
    if let Some(e) = config_error {
        warn!(error = %e, "Invalid page config, using defaults");
    }

    // A second boot replaces the first.
    teardown();

    let page = WebPage::new()?;
    let context = PageContext::discover(&page, &config);
    let app = Rc::new(RefCell::new(App {
        page,
        runtime: PageRuntime::default(),
    }));

    {
        let mut guard = app.borrow_mut();
        let App { page, runtime } = &mut *guard;
        page.bind(Rc::downgrade(&app));

        let (installed, report) = PageRuntime::install(page, setup_steps(&context, &config));
        *runtime = installed;
        runtime.load(page);
        info!(
            installed = ?report.installed,
            skipped = report.skipped.len(),
            "Folio ready"
        );
    }

    APP.with(|slot| slot.borrow_mut().replace(app));
    Ok(())
}

pub(crate) fn teardown() {
    let Some(app) = APP.with(|slot| slot.borrow_mut().take()) else {
        return;
    };
    let Ok(mut guard) = app.try_borrow_mut() else {
        warn!("Teardown requested during dispatch, ignored");
        return;
    };
    let App { page, runtime } = &mut *guard;
    std::mem::take(runtime).dispose(page);
    info!("Folio torn down");
}
