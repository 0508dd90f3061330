//! Installs the controllers and routes events to them.

use std::collections::HashMap;

use crate::controllers::Controller;
use crate::error::PageError;
use crate::event::{DomEvent, Outcome, PageEvent, TimerTask};
use crate::page::{ListenerId, Page};

/// Releases the listeners of one installed controller.
#[derive(Debug, Default)]
pub struct Disposer {
    listeners: Vec<ListenerId>,
}

impl Disposer {
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    pub fn dispose<P: Page>(self, page: &mut P) {
        for listener in self.listeners {
            page.unlisten(listener);
        }
    }
}

/// Result of running the initialization list.
#[derive(Debug, Default)]
pub struct SetupReport {
    pub installed: Vec<&'static str>,
    pub skipped: Vec<(&'static str, PageError)>,
}

impl SetupReport {
    pub fn is_installed(&self, name: &str) -> bool {
        self.installed.contains(&name)
    }

    pub fn is_skipped(&self, name: &str) -> bool {
        self.skipped.iter().any(|(skipped, _)| *skipped == name)
    }
}

struct Installed<P: Page> {
    controller: Box<dyn Controller<P>>,
    disposer: Disposer,
}

/// The page interaction controller: installed controllers plus routing.
pub struct PageRuntime<P: Page> {
    installed: Vec<Installed<P>>,
    routes: HashMap<ListenerId, usize>,
}

impl<P: Page> Default for PageRuntime<P> {
    fn default() -> Self {
        Self {
            installed: Vec::new(),
            routes: HashMap::new(),
        }
    }
}

impl<P: Page> PageRuntime<P> {
    /// Run each setup step in order. A failing step is logged and reported;
    /// it never stops the steps after it.
    pub fn install(page: &mut P, steps: Vec<Box<dyn Controller<P>>>) -> (Self, SetupReport) {
        let mut runtime = Self::default();
        let mut report = SetupReport::default();

        for mut controller in steps {
            let name = controller.name();
            match Self::install_one(page, controller.as_mut()) {
                Ok(disposer) => {
                    let index = runtime.installed.len();
                    for listener in disposer.listeners() {
                        runtime.routes.insert(*listener, index);
                    }
                    tracing::debug!(
                        controller = name,
                        listeners = disposer.listeners().len(),
                        "Controller installed"
                    );
                    runtime.installed.push(Installed {
                        controller,
                        disposer,
                    });
                    report.installed.push(name);
                }
                Err(e) => {
                    tracing::warn!(controller = name, error = %e, "Controller skipped");
                    report.skipped.push((name, e));
                }
            }
        }

        tracing::info!(
            installed = report.installed.len(),
            skipped = report.skipped.len(),
            "Page controllers ready"
        );
        (runtime, report)
    }

    fn install_one(page: &mut P, controller: &mut dyn Controller<P>) -> Result<Disposer, PageError> {
        let subscriptions = controller.install(page)?;
        let mut disposer = Disposer::default();
        for subscription in subscriptions {
            match page.listen(subscription) {
                Ok(listener) => disposer.listeners.push(listener),
                Err(e) => {
                    disposer.dispose(page);
                    return Err(e);
                }
            }
        }
        Ok(disposer)
    }

    /// Names of the installed controllers, in setup order.
    pub fn controllers(&self) -> Vec<&'static str> {
        self.installed
            .iter()
            .map(|installed| installed.controller.name())
            .collect()
    }

    /// Broadcast the load event.
    pub fn load(&mut self, page: &mut P) {
        self.broadcast(page, &PageEvent::Load);
    }

    /// Route a native event to the controller owning `listener`.
    pub fn deliver(&mut self, page: &mut P, listener: ListenerId, event: &DomEvent) -> Outcome {
        let Some(&index) = self.routes.get(&listener) else {
            tracing::debug!(?listener, "Event for unknown listener dropped");
            return Outcome::Ignored;
        };
        let installed = &mut self.installed[index];
        Self::run(installed.controller.as_mut(), page, &PageEvent::Dom(event.clone()))
    }

    /// Broadcast a fired timer.
    pub fn timer(&mut self, page: &mut P, task: TimerTask) {
        self.broadcast(page, &PageEvent::Timer(task));
    }

    fn broadcast(&mut self, page: &mut P, event: &PageEvent) {
        for installed in &mut self.installed {
            Self::run(installed.controller.as_mut(), page, event);
        }
    }

    fn run(controller: &mut dyn Controller<P>, page: &mut P, event: &PageEvent) -> Outcome {
        match controller.handle(page, event) {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::warn!(controller = controller.name(), error = %e, "Event handling failed");
                Outcome::Ignored
            }
        }
    }

    /// Release every listener. The runtime is inert afterwards.
    pub fn dispose(self, page: &mut P) {
        for installed in self.installed {
            installed.disposer.dispose(page);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PageResult;
    use crate::event::EventKind;
    use crate::fragment::{El, FragmentTree};
    use crate::page::{ListenTarget, Subscription};

    /// Listens on the body and the document; fails to install when `fail`
    /// is set.
    struct Recorder {
        name: &'static str,
        fail: bool,
        errors_on_click: bool,
    }

    impl Recorder {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                fail: false,
                errors_on_click: false,
            }
        }
    }

    impl Controller<FragmentTree> for Recorder {
        fn name(&self) -> &'static str {
            self.name
        }

        fn install(&mut self, page: &mut FragmentTree) -> PageResult<Vec<Subscription>> {
            if self.fail {
                return Err(PageError::missing(self.name, "recorder element"));
            }
            Ok(vec![
                Subscription::new(ListenTarget::Document, EventKind::Click),
                Subscription::node(page.body(), EventKind::Click),
            ])
        }

        fn handle(&mut self, page: &mut FragmentTree, event: &PageEvent) -> PageResult<Outcome> {
            if self.errors_on_click && matches!(event, PageEvent::Dom(_)) {
                let body = page.body();
                page.add_class(body, "touched");
                return Err(PageError::Host("recorder failure".to_string()));
            }
            Ok(Outcome::Handled)
        }
    }

    #[test]
    fn failing_step_does_not_block_later_steps() {
        let mut tree = FragmentTree::new();
        let mut broken = Recorder::new("broken");
        broken.fail = true;

        let (runtime, report) = PageRuntime::install(
            &mut tree,
            vec![Box::new(broken), Box::new(Recorder::new("healthy"))],
        );

        assert_eq!(runtime.controllers(), vec!["healthy"]);
        assert!(report.is_skipped("broken"));
        assert!(report.is_installed("healthy"));
        assert_eq!(tree.listener_count(), 2);
    }

    #[test]
    fn handler_errors_are_contained() {
        let mut tree = FragmentTree::new();
        let button = tree.add(tree.body(), El::new("button"));
        let mut noisy = Recorder::new("noisy");
        noisy.errors_on_click = true;

        let (mut runtime, _) = PageRuntime::install(
            &mut tree,
            vec![Box::new(noisy), Box::new(Recorder::new("quiet"))],
        );

        let outcome = tree.click(&mut runtime, button);
        assert_eq!(outcome, Outcome::Handled);
        assert!(tree.has_class(tree.body(), "touched"));
    }

    #[test]
    fn dispose_releases_every_listener() {
        let mut tree = FragmentTree::new();
        let (runtime, _) = PageRuntime::install(
            &mut tree,
            vec![Box::new(Recorder::new("a")), Box::new(Recorder::new("b"))],
        );
        assert_eq!(tree.listener_count(), 4);

        runtime.dispose(&mut tree);
        assert_eq!(tree.listener_count(), 0);
    }

    #[test]
    fn unknown_listener_is_ignored() {
        let mut tree = FragmentTree::new();
        let (mut runtime, _) = PageRuntime::install(&mut tree, vec![Box::new(Recorder::new("a"))]);
        let event = DomEvent::new(EventKind::Click, ListenTarget::Document, None);

        assert_eq!(
            runtime.deliver(&mut tree, ListenerId(42), &event),
            Outcome::Ignored
        );
    }
}
