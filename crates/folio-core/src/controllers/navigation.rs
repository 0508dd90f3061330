//! Smooth in-page navigation and the mobile menu.

use tracing::{debug, info, warn};

use crate::config::NavigationConfig;
use crate::context::PageContext;
use crate::error::{PageError, PageResult};
use crate::event::{DomEvent, EventKind, Outcome, PageEvent};
use crate::page::{ListenTarget, NodeId, Page, Subscription};

use super::Controller;

pub struct NavigationController {
    config: NavigationConfig,
    body: NodeId,
    header: Option<NodeId>,
    nav: Option<NodeId>,
    toggle: Option<NodeId>,
    /// Anchors plus nav links, deduplicated.
    links: Vec<NodeId>,
    menu_open: bool,
}

impl NavigationController {
    pub fn new(context: &PageContext, config: NavigationConfig) -> Self {
        let mut links = context.anchors.clone();
        for link in &context.nav_links {
            if !links.contains(link) {
                links.push(*link);
            }
        }

        Self {
            config,
            body: context.body,
            header: context.header,
            nav: context.nav,
            toggle: context.menu_toggle,
            links,
            menu_open: false,
        }
    }

    fn header_height<P: Page>(&self, page: &P) -> f64 {
        self.header
            .map(|header| page.offset_height(header))
            .filter(|height| *height > 0.0)
            .unwrap_or(self.config.header_offset)
    }

    fn on_link_click<P: Page>(&mut self, page: &mut P, link: NodeId) -> PageResult<Outcome> {
        let href = page.attribute(link, "href").unwrap_or_default();
        self.set_menu(page, false)?;

        // Links leaving the page keep their native navigation.
        let Some(fragment) = href.strip_prefix('#') else {
            return Ok(Outcome::Handled);
        };
        if fragment.is_empty() {
            return Ok(Outcome::PreventDefault);
        }

        match page.element_by_id(fragment) {
            Some(target) => {
                let top = (page.offset_top(target) - self.header_height(page)).max(0.0);
                page.scroll_to(top, self.config.scroll_behavior);
                if let Err(e) = page.push_fragment(&href) {
                    warn!(%href, error = %e, "Failed to update URL fragment");
                }
                debug!(%href, top, "Scrolled to section");
            }
            None => debug!(%href, "Anchor target not found"),
        }
        Ok(Outcome::PreventDefault)
    }

    fn on_outside_click<P: Page>(&mut self, page: &mut P, event: &DomEvent) -> PageResult<Outcome> {
        if !self.menu_open {
            return Ok(Outcome::Ignored);
        }
        let inside = |region: Option<NodeId>| match (region, event.target) {
            (Some(region), Some(target)) => page.contains(region, target),
            _ => false,
        };
        if inside(self.nav) || inside(self.toggle) {
            return Ok(Outcome::Ignored);
        }
        self.set_menu(page, false)?;
        Ok(Outcome::Handled)
    }

    fn set_menu<P: Page>(&mut self, page: &mut P, open: bool) -> PageResult<()> {
        if self.menu_open == open {
            return Ok(());
        }
        self.menu_open = open;

        let class = &self.config.open_class;
        for node in [self.nav, self.toggle].into_iter().flatten() {
            if open {
                page.add_class(node, class);
            } else {
                page.remove_class(node, class);
            }
        }
        if let Some(toggle) = self.toggle {
            page.set_attribute(toggle, "aria-expanded", if open { "true" } else { "false" })?;
        }
        page.set_style(self.body, "overflow", if open { "hidden" } else { "" });

        info!(open, "Menu toggled");
        Ok(())
    }
}

impl<P: Page> Controller<P> for NavigationController {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn install(&mut self, page: &mut P) -> PageResult<Vec<Subscription>> {
        if self.links.is_empty() && self.toggle.is_none() {
            return Err(PageError::missing("navigation", "anchors or menu toggle"));
        }

        let mut subscriptions: Vec<Subscription> = self
            .links
            .iter()
            .map(|link| Subscription::node(*link, EventKind::Click))
            .collect();

        if let Some(toggle) = self.toggle {
            page.set_attribute(toggle, "aria-expanded", "false")?;
            subscriptions.push(Subscription::node(toggle, EventKind::Click));
            subscriptions.push(Subscription::new(ListenTarget::Document, EventKind::Click));
            subscriptions.push(Subscription::new(ListenTarget::Document, EventKind::KeyDown));
        }

        Ok(subscriptions)
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        let PageEvent::Dom(dom) = event else {
            return Ok(Outcome::Ignored);
        };

        match (dom.kind, dom.current) {
            (EventKind::Click, ListenTarget::Node(node)) if Some(node) == self.toggle => {
                let open = !self.menu_open;
                self.set_menu(page, open)?;
                Ok(Outcome::Handled)
            }
            (EventKind::Click, ListenTarget::Node(node)) if self.links.contains(&node) => {
                self.on_link_click(page, node)
            }
            (EventKind::Click, ListenTarget::Document) => self.on_outside_click(page, dom),
            (EventKind::KeyDown, _) if dom.key.as_deref() == Some("Escape") && self.menu_open => {
                self.set_menu(page, false)?;
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Ignored),
        }
    }
}
