//! Category filter over the project cards.

use tracing::info;

use crate::config::FilterConfig;
use crate::context::PageContext;
use crate::error::{PageError, PageResult};
use crate::event::{EventKind, Outcome, PageEvent, TimerTask};
use crate::page::{NodeId, Page, Subscription};

use super::Controller;

/// Category value that matches every card.
pub const ALL_CATEGORIES: &str = "all";

pub struct FilterController {
    config: FilterConfig,
    buttons: Vec<NodeId>,
    cards: Vec<NodeId>,
    active: String,
}

impl FilterController {
    pub fn new(context: &PageContext, config: FilterConfig) -> Self {
        Self {
            config,
            buttons: context.filter_buttons.clone(),
            cards: context.cards.clone(),
            active: ALL_CATEGORIES.to_string(),
        }
    }

    pub fn active_category(&self) -> &str {
        &self.active
    }

    fn category_of<P: Page>(&self, page: &P, button: NodeId) -> String {
        page.attribute(button, &self.config.filter_attribute)
            .filter(|category| !category.is_empty())
            .unwrap_or_else(|| ALL_CATEGORIES.to_string())
    }

    fn select<P: Page>(&mut self, page: &mut P, button: NodeId) {
        for other in &self.buttons {
            page.remove_class(*other, &self.config.active_class);
        }
        page.add_class(button, &self.config.active_class);
        self.active = self.category_of(page, button);

        let mut shown = 0;
        for card in &self.cards {
            let matches = self.active == ALL_CATEGORIES
                || page.attribute(*card, &self.config.category_attribute).as_deref()
                    == Some(self.active.as_str());
            if matches {
                // Drop the class and force layout so re-adding it replays the animation.
                page.remove_class(*card, &self.config.animation_class);
                page.set_style(*card, "display", &self.config.shown_display);
                page.reflow(*card);
                page.add_class(*card, &self.config.animation_class);
                shown += 1;
            } else {
                page.set_style(*card, "display", "none");
                page.remove_class(*card, &self.config.animation_class);
            }
        }

        // Shown cards may have been hidden while in view or moved up into it.
        page.schedule(0, TimerTask::RevealPass);

        info!(category = %self.active, shown, total = self.cards.len(), "Projects filtered");
    }
}

impl<P: Page> Controller<P> for FilterController {
    fn name(&self) -> &'static str {
        "filter"
    }

    fn install(&mut self, page: &mut P) -> PageResult<Vec<Subscription>> {
        if self.buttons.is_empty() {
            return Err(PageError::missing("filter", "filter buttons"));
        }

        if let Some(button) = self
            .buttons
            .iter()
            .copied()
            .find(|button| page.has_class(*button, &self.config.active_class))
        {
            self.active = self.category_of(page, button);
        }

        Ok(self
            .buttons
            .iter()
            .map(|button| Subscription::node(*button, EventKind::Click))
            .collect())
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        match event {
            PageEvent::Dom(dom) if dom.kind == EventKind::Click => match dom.current_node() {
                Some(button) => {
                    self.select(page, button);
                    Ok(Outcome::Handled)
                }
                None => Ok(Outcome::Ignored),
            },
            _ => Ok(Outcome::Ignored),
        }
    }
}
