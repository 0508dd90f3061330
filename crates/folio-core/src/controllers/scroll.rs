//! Active-section highlighting and reveal passes driven by scrolling.

use tracing::debug;

use crate::config::{RevealConfig, ScrollConfig};
use crate::context::PageContext;
use crate::error::{PageError, PageResult};
use crate::event::{EventKind, Outcome, PageEvent, TimerTask};
use crate::page::{ListenTarget, NodeId, Page, Subscription};

use super::{Controller, Reveal};

/// What the throttle decided for one incoming event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Admission {
    /// Run the work now.
    RunNow,
    /// Schedule one trailing run after this many milliseconds.
    Defer(u32),
    /// A trailing run is already scheduled.
    Coalesced,
}

/// Leading and trailing edge throttle over a millisecond clock.
#[derive(Clone, Debug)]
pub struct Throttle {
    interval_ms: u32,
    last_run: Option<f64>,
    trailing: bool,
}

impl Throttle {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_run: None,
            trailing: false,
        }
    }

    pub fn admit(&mut self, now: f64) -> Admission {
        if self.trailing {
            return Admission::Coalesced;
        }
        let interval = f64::from(self.interval_ms);
        match self.last_run {
            // A clock that went backwards starts a fresh window.
            Some(last) if (last..last + interval).contains(&now) => {
                self.trailing = true;
                Admission::Defer((last + interval - now).ceil().max(1.0) as u32)
            }
            _ => {
                self.last_run = Some(now);
                Admission::RunNow
            }
        }
    }

    /// Record the trailing run.
    pub fn settle(&mut self, now: f64) {
        self.trailing = false;
        self.last_run = Some(now);
    }
}

pub struct ScrollTracker {
    config: ScrollConfig,
    initial_delay_ms: u32,
    sections: Vec<NodeId>,
    nav_links: Vec<NodeId>,
    reveal: Reveal,
    throttle: Throttle,
    active: Option<String>,
}

impl ScrollTracker {
    pub fn new(context: &PageContext, config: ScrollConfig, reveal: RevealConfig) -> Self {
        Self {
            throttle: Throttle::new(config.throttle_ms),
            initial_delay_ms: reveal.initial_delay_ms,
            sections: context.sections.clone(),
            nav_links: context.nav_links.clone(),
            reveal: Reveal::new(context.reveal_groups.clone(), reveal),
            config,
            active: None,
        }
    }

    fn locate<P: Page>(&self, page: &P) -> Option<String> {
        let position = page.scroll_y() + self.config.lookahead;
        self.sections
            .iter()
            .filter_map(|section| {
                let id = page.attribute(*section, "id").filter(|id| !id.is_empty())?;
                let top = page.offset_top(*section);
                let bottom = top + page.offset_height(*section);
                (top <= position && position < bottom).then_some(id)
            })
            .last()
    }

    fn highlight<P: Page>(&mut self, page: &mut P) {
        let active = self.locate(page);
        let wanted = active.as_ref().map(|id| format!("#{id}"));
        let mut matched = false;

        for link in &self.nav_links {
            let is_match = !matched
                && wanted.is_some()
                && page.attribute(*link, "href") == wanted;
            if is_match {
                matched = true;
                page.add_class(*link, &self.config.active_class);
            } else {
                page.remove_class(*link, &self.config.active_class);
            }
        }

        if active != self.active {
            debug!(section = ?active, "Active section changed");
            self.active = active;
        }
    }

    fn pass<P: Page>(&mut self, page: &mut P) {
        self.highlight(page);
        self.reveal.reveal_visible(page);
    }
}

impl<P: Page> Controller<P> for ScrollTracker {
    fn name(&self) -> &'static str {
        "scroll"
    }

    fn install(&mut self, _page: &mut P) -> PageResult<Vec<Subscription>> {
        if self.sections.is_empty() && self.reveal.is_empty() {
            return Err(PageError::missing("scroll", "sections or reveal targets"));
        }
        Ok(vec![
            Subscription::new(ListenTarget::Window, EventKind::Scroll),
            Subscription::new(ListenTarget::Window, EventKind::Resize),
        ])
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        match event {
            PageEvent::Load => {
                self.reveal.prepare(page);
                self.highlight(page);
                page.schedule(self.initial_delay_ms, TimerTask::InitialReveal);
                Ok(Outcome::Handled)
            }
            PageEvent::Timer(TimerTask::InitialReveal | TimerTask::RevealPass) => {
                self.reveal.reveal_visible(page);
                Ok(Outcome::Handled)
            }
            PageEvent::Timer(TimerTask::ScrollSettled) => {
                self.throttle.settle(page.now());
                self.pass(page);
                Ok(Outcome::Handled)
            }
            PageEvent::Dom(dom) if dom.kind == EventKind::Scroll => {
                match self.throttle.admit(page.now()) {
                    Admission::RunNow => self.pass(page),
                    Admission::Defer(delay) => page.schedule(delay, TimerTask::ScrollSettled),
                    Admission::Coalesced => return Ok(Outcome::Ignored),
                }
                Ok(Outcome::Handled)
            }
            PageEvent::Dom(dom) if dom.kind == EventKind::Resize => {
                self.pass(page);
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Ignored),
        }
    }
}
