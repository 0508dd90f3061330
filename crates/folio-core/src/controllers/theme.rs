//! Light/dark theme switching with a persisted preference.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ThemeConfig;
use crate::context::PageContext;
use crate::error::{PageError, PageResult};
use crate::event::{EventKind, Outcome, PageEvent};
use crate::page::{NodeId, Page, Subscription};

use super::Controller;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = PageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(PageError::Storage(format!("unknown theme {other:?}"))),
        }
    }
}

/// Applies the theme to the root element and flips it from the toggle.
pub struct ThemeController {
    config: ThemeConfig,
    root: NodeId,
    toggle: Option<NodeId>,
    icon: Option<NodeId>,
    theme: Theme,
}

impl ThemeController {
    pub fn new(context: &PageContext, config: ThemeConfig) -> Self {
        Self {
            config,
            root: context.root,
            toggle: context.theme_toggle,
            icon: context.theme_icon,
            theme: Theme::default(),
        }
    }

    /// Stored preference, then the system color scheme, then light.
    fn initial_theme<P: Page>(&self, page: &P) -> Theme {
        let stored = match page.load_preference(&self.config.storage_key) {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "Theme preference unavailable");
                None
            }
        };

        match stored.as_deref().map(Theme::from_str) {
            Some(Ok(theme)) => theme,
            Some(Err(e)) => {
                debug!(error = %e, "Ignoring stored theme");
                self.system_theme(page)
            }
            None => self.system_theme(page),
        }
    }

    fn system_theme<P: Page>(&self, page: &P) -> Theme {
        if page.prefers_dark_scheme() {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    fn apply<P: Page>(&self, page: &mut P) -> PageResult<()> {
        page.set_attribute(self.root, &self.config.attribute, self.theme.as_str())?;
        if let Some(icon) = self.icon {
            let (show, hide) = match self.theme {
                Theme::Dark => (&self.config.dark_icon, &self.config.light_icon),
                Theme::Light => (&self.config.light_icon, &self.config.dark_icon),
            };
            page.remove_class(icon, hide);
            page.add_class(icon, show);
        }
        Ok(())
    }

    fn toggle<P: Page>(&mut self, page: &mut P) -> PageResult<()> {
        self.theme = self.theme.toggled();
        self.apply(page)?;
        if let Err(e) = page.store_preference(&self.config.storage_key, self.theme.as_str()) {
            warn!(error = %e, theme = %self.theme, "Theme preference not saved");
        }
        info!(theme = %self.theme, "Theme toggled");
        Ok(())
    }
}

impl<P: Page> Controller<P> for ThemeController {
    fn name(&self) -> &'static str {
        "theme"
    }

    fn install(&mut self, page: &mut P) -> PageResult<Vec<Subscription>> {
        self.theme = self.initial_theme(page);
        self.apply(page)?;
        debug!(theme = %self.theme, "Theme applied");

        Ok(self
            .toggle
            .map(|toggle| Subscription::node(toggle, EventKind::Click))
            .into_iter()
            .collect())
    }

    fn handle(&mut self, page: &mut P, event: &PageEvent) -> PageResult<Outcome> {
        match event {
            PageEvent::Dom(dom) if dom.kind == EventKind::Click => {
                self.toggle(page)?;
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Ignored),
        }
    }
}
