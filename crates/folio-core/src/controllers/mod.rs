//! The page interaction controllers.
//!
//! Each controller owns one slice of UI state and reacts to the events it
//! subscribed to at install time. Controllers never call each other; the
//! only thing they share is the page.

mod clipboard;
mod contact;
mod filter;
mod navigation;
mod reveal;
mod scroll;
mod theme;

pub use clipboard::ClipboardController;
pub use contact::{ContactController, ContactMessage, FormState, SimulatedTransport, Transport};
pub use filter::{FilterController, ALL_CATEGORIES};
pub use navigation::NavigationController;
pub use reveal::Reveal;
pub use scroll::{Admission, ScrollTracker, Throttle};
pub use theme::{Theme, ThemeController};

use crate::config::PageConfig;
use crate::context::PageContext;
use crate::error::PageResult;
use crate::event::{Outcome, PageEvent};
use crate::page::{Page, Subscription};

/// One independently installable piece of page behaviour.
pub trait Controller<P: Page> {
    /// Short name used in logs and setup reports.
    fn name(&self) -> &'static str;

    /// Prepare the page and return the listeners this controller needs.
    ///
    /// Returning an error skips this controller only.
    fn install(&mut self, page: &mut P) -> PageResult<Vec<Subscription>>;

    /// React to an event from one of this controller's listeners, a timer,
    /// or the load broadcast.
    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome>;
}

/// The ordered initialization list for a page.
pub fn setup_steps<P: Page + 'static>(
    context: &PageContext,
    config: &PageConfig,
) -> Vec<Box<dyn Controller<P>>> {
    vec![
        Box::new(ThemeController::new(context, config.theme.clone())),
        Box::new(NavigationController::new(context, config.navigation.clone())),
        Box::new(ScrollTracker::new(context, config.scroll.clone(), config.reveal.clone())),
        Box::new(FilterController::new(context, config.filter.clone())),
        Box::new(ContactController::new(context, config.contact.clone())),
        Box::new(ClipboardController::new(context, config.clipboard.clone())),
    ]
}
