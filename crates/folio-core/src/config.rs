//! Page configuration.
//!
//! Every field has a default matching the stock portfolio markup, and every
//! struct is `#[serde(default)]`, so a host can ship a partial JSON document
//! (for example `{"contact": {"submit_delay_ms": 500}}`) and keep the rest.

use serde::{Deserialize, Serialize};

use crate::error::PageResult;
use crate::page::ScrollBehavior;

/// Complete configuration for the interaction controllers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub selectors: Selectors,
    pub navigation: NavigationConfig,
    pub scroll: ScrollConfig,
    pub reveal: RevealConfig,
    pub theme: ThemeConfig,
    pub filter: FilterConfig,
    pub contact: ContactConfig,
    pub clipboard: ClipboardConfig,
    /// Maximum log level: `trace`, `debug`, `info`, `warn` or `error`.
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            selectors: Selectors::default(),
            navigation: NavigationConfig::default(),
            scroll: ScrollConfig::default(),
            reveal: RevealConfig::default(),
            theme: ThemeConfig::default(),
            filter: FilterConfig::default(),
            contact: ContactConfig::default(),
            clipboard: ClipboardConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON configuration document.
    pub fn from_json(json: &str) -> PageResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// CSS selectors used to discover the page structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub header: String,
    pub nav: String,
    pub menu_toggle: String,
    pub nav_links: String,
    pub anchors: String,
    pub sections: String,
    pub theme_toggle: String,
    pub theme_icon: String,
    pub filter_buttons: String,
    pub cards: String,
    pub contact_form: String,
    /// Resolved inside the contact form.
    pub submit: String,
    /// Resolved inside the contact form first, then document-wide.
    pub form_status: String,
    pub skills: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: "header".to_string(),
            nav: "nav".to_string(),
            menu_toggle: ".menu-toggle".to_string(),
            nav_links: "nav a".to_string(),
            anchors: "a[href^=\"#\"]".to_string(),
            sections: "section".to_string(),
            theme_toggle: ".theme-toggle".to_string(),
            theme_icon: ".theme-toggle i".to_string(),
            filter_buttons: ".filter-btn".to_string(),
            cards: ".project-card".to_string(),
            contact_form: "#contact-form".to_string(),
            submit: "button[type=\"submit\"]".to_string(),
            form_status: ".form-status".to_string(),
            skills: ".skill-tag".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Header height used when the page has no measurable header.
    pub header_offset: f64,
    /// Class put on the nav region and the toggle while the menu is open.
    pub open_class: String,
    /// `smooth`, or `instant` for sites that honour reduced motion.
    pub scroll_behavior: ScrollBehavior,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            header_offset: 80.0,
            open_class: "active".to_string(),
            scroll_behavior: ScrollBehavior::Smooth,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Added to `scrollY` before testing section bounds.
    pub lookahead: f64,
    /// Class marking the nav link of the active section.
    pub active_class: String,
    /// Minimum spacing between two scroll passes; 0 disables throttling.
    pub throttle_ms: u32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            lookahead: 100.0,
            active_class: "active".to_string(),
            throttle_ms: 16,
        }
    }
}

/// Delay applied to each member of a reveal group.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StaggerPolicy {
    None,
    Fixed { delay_ms: u32 },
    /// `base_ms + index * step_ms`, index counted within the group.
    PerIndex { base_ms: u32, step_ms: u32 },
}

impl StaggerPolicy {
    pub fn delay_ms(&self, index: usize) -> u32 {
        match *self {
            StaggerPolicy::None => 0,
            StaggerPolicy::Fixed { delay_ms } => delay_ms,
            StaggerPolicy::PerIndex { base_ms, step_ms } => {
                base_ms.saturating_add(step_ms.saturating_mul(index as u32))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevealGroupConfig {
    pub selector: String,
    pub stagger: StaggerPolicy,
}

impl RevealGroupConfig {
    pub fn new(selector: impl Into<String>, stagger: StaggerPolicy) -> Self {
        Self {
            selector: selector.into(),
            stagger,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub groups: Vec<RevealGroupConfig>,
    /// An element reveals once its top is above `viewport_height - margin`.
    pub margin: f64,
    pub duration_ms: u32,
    /// Vertical offset of hidden elements, in pixels.
    pub offset: f64,
    pub initial_delay_ms: u32,
    pub visible_class: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            groups: vec![
                RevealGroupConfig::new(".project-card", StaggerPolicy::None),
                RevealGroupConfig::new(".about p", StaggerPolicy::Fixed { delay_ms: 200 }),
                RevealGroupConfig::new(
                    ".social-links a",
                    StaggerPolicy::PerIndex {
                        base_ms: 300,
                        step_ms: 100,
                    },
                ),
            ],
            margin: 100.0,
            duration_ms: 600,
            offset: 20.0,
            initial_delay_ms: 100,
            visible_class: "visible".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub storage_key: String,
    /// Root attribute carrying the theme name.
    pub attribute: String,
    /// Icon class shown while the dark theme is active.
    pub dark_icon: String,
    /// Icon class shown while the light theme is active.
    pub light_icon: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            storage_key: "theme".to_string(),
            attribute: "data-theme".to_string(),
            dark_icon: "fa-sun".to_string(),
            light_icon: "fa-moon".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub active_class: String,
    /// Attribute on filter buttons naming the category.
    pub filter_attribute: String,
    /// Attribute on cards naming their category.
    pub category_attribute: String,
    /// `display` value for shown cards.
    pub shown_display: String,
    /// Entrance animation class replayed when a card is shown.
    pub animation_class: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            active_class: "active".to_string(),
            filter_attribute: "data-filter".to_string(),
            category_attribute: "data-category".to_string(),
            shown_display: "flex".to_string(),
            animation_class: "fade-in".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub busy_label: String,
    pub submit_delay_ms: u32,
    pub status_display_ms: u32,
    pub success_message: String,
    pub error_message: String,
    pub success_class: String,
    pub error_class: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            busy_label: "Sending...".to_string(),
            submit_delay_ms: 1500,
            status_display_ms: 5000,
            success_message: "Thank you! Your message has been sent.".to_string(),
            error_message: "Something went wrong. Please try again.".to_string(),
            success_class: "success".to_string(),
            error_class: "error".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub copied_class: String,
    pub feedback_ms: u32,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            copied_class: "copied".to_string(),
            feedback_ms: 1500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config =
            PageConfig::from_json(r#"{"contact": {"submit_delay_ms": 250}, "log_level": "debug"}"#)
                .unwrap();

        assert_eq!(config.contact.submit_delay_ms, 250);
        assert_eq!(config.contact.busy_label, "Sending...");
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.scroll.lookahead, 100.0);
        assert_eq!(config.reveal.groups.len(), 3);
    }

    #[test]
    fn stagger_policy_from_json() {
        let config = PageConfig::from_json(
            r#"{"reveal": {"groups": [
                {"selector": ".card", "stagger": {"kind": "per_index", "base_ms": 50, "step_ms": 25}}
            ]}}"#,
        )
        .unwrap();

        let group = &config.reveal.groups[0];
        assert_eq!(group.selector, ".card");
        assert_eq!(group.stagger.delay_ms(0), 50);
        assert_eq!(group.stagger.delay_ms(4), 150);
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(PageConfig::from_json("{ nope").is_err());
    }
}
