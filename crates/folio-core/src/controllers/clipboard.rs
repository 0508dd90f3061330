//! Copy a skill name to the clipboard when its tag is clicked.

use tracing::{debug, warn};

use crate::config::ClipboardConfig;
use crate::context::PageContext;
use crate::error::{PageError, PageResult};
use crate::event::{EventKind, Outcome, PageEvent, TimerTask};
use crate::page::{NodeId, Page, Subscription};

use super::Controller;

pub struct ClipboardController {
    config: ClipboardConfig,
    skills: Vec<NodeId>,
}

impl ClipboardController {
    pub fn new(context: &PageContext, config: ClipboardConfig) -> Self {
        Self {
            config,
            skills: context.skills.clone(),
        }
    }

    fn copy<P: Page>(&self, page: &mut P, skill: NodeId) {
        let text = page.text(skill);
        let text = text.trim();
        match page.write_clipboard(text) {
            Ok(()) => {
                page.add_class(skill, &self.config.copied_class);
                page.schedule(self.config.feedback_ms, TimerTask::ClearCopied(skill));
                debug!(skill = text, "Copied to clipboard");
            }
            Err(e) => warn!(error = %e, skill = text, "Clipboard write failed"),
        }
    }
}

impl<P: Page> Controller<P> for ClipboardController {
    fn name(&self) -> &'static str {
        "clipboard"
    }

    fn install(&mut self, _page: &mut P) -> PageResult<Vec<Subscription>> {
        if self.skills.is_empty() {
            return Err(PageError::missing("clipboard", "skill tags"));
        }
        Ok(self
            .skills
            .iter()
            .map(|skill| Subscription::node(*skill, EventKind::Click))
            .collect())
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        match event {
            PageEvent::Dom(dom) if dom.kind == EventKind::Click => {
                let Some(skill) = dom.current_node() else {
                    return Ok(Outcome::Ignored);
                };
                self.copy(page, skill);
                Ok(Outcome::Handled)
            }
            PageEvent::Timer(TimerTask::ClearCopied(skill)) if self.skills.contains(skill) => {
                page.remove_class(*skill, &self.config.copied_class);
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Ignored),
        }
    }
}
