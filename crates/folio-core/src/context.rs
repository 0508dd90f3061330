//! Page context: the elements the controllers work on.
//!
//! The context is resolved once, up front, from the configured selectors
//! and handed to each controller at construction. Nothing here fails: an
//! invalid selector or a missing element leaves the corresponding entry
//! empty, and the controller that needs it declines to install.

use crate::config::{PageConfig, StaggerPolicy};
use crate::page::{NodeId, Page};

/// Elements making up the contact form.
#[derive(Debug, Clone, PartialEq)]
pub struct ContactElements {
    pub form: NodeId,
    pub submit: Option<NodeId>,
    pub status: Option<NodeId>,
}

/// Nodes animated in by the scroll tracker, sharing one stagger policy.
#[derive(Debug, Clone, PartialEq)]
pub struct RevealGroup {
    pub nodes: Vec<NodeId>,
    pub stagger: StaggerPolicy,
}

/// Explicit references to the structural elements of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageContext {
    pub root: NodeId,
    pub body: NodeId,
    pub header: Option<NodeId>,
    pub nav: Option<NodeId>,
    pub menu_toggle: Option<NodeId>,
    /// Every in-page anchor (`href` starting with `#`).
    pub anchors: Vec<NodeId>,
    pub nav_links: Vec<NodeId>,
    pub sections: Vec<NodeId>,
    pub reveal_groups: Vec<RevealGroup>,
    pub theme_toggle: Option<NodeId>,
    pub theme_icon: Option<NodeId>,
    pub filter_buttons: Vec<NodeId>,
    pub cards: Vec<NodeId>,
    pub contact: Option<ContactElements>,
    pub skills: Vec<NodeId>,
}

impl PageContext {
    /// A context with only the root and body, for building by hand.
    pub fn empty(root: NodeId, body: NodeId) -> Self {
        Self {
            root,
            body,
            header: None,
            nav: None,
            menu_toggle: None,
            anchors: Vec::new(),
            nav_links: Vec::new(),
            sections: Vec::new(),
            reveal_groups: Vec::new(),
            theme_toggle: None,
            theme_icon: None,
            filter_buttons: Vec::new(),
            cards: Vec::new(),
            contact: None,
            skills: Vec::new(),
        }
    }

    /// Resolve every configured selector against the page.
    pub fn discover<P: Page>(page: &P, config: &PageConfig) -> Self {
        let selectors = &config.selectors;
        let all = |selector: &str| query_all(page, None, selector);
        let first = |selector: &str| all(selector).into_iter().next();

        let contact = first(&selectors.contact_form).map(|form| {
            let status = query_all(page, Some(form), &selectors.form_status)
                .into_iter()
                .next()
                .or_else(|| first(&selectors.form_status));
            ContactElements {
                form,
                submit: query_all(page, Some(form), &selectors.submit).into_iter().next(),
                status,
            }
        });

        let reveal_groups = config
            .reveal
            .groups
            .iter()
            .map(|group| RevealGroup {
                nodes: all(&group.selector),
                stagger: group.stagger,
            })
            .filter(|group| !group.nodes.is_empty())
            .collect();

        let context = Self {
            root: page.root(),
            body: page.body(),
            header: first(&selectors.header),
            nav: first(&selectors.nav),
            menu_toggle: first(&selectors.menu_toggle),
            anchors: all(&selectors.anchors),
            nav_links: all(&selectors.nav_links),
            sections: all(&selectors.sections),
            reveal_groups,
            theme_toggle: first(&selectors.theme_toggle),
            theme_icon: first(&selectors.theme_icon),
            filter_buttons: all(&selectors.filter_buttons),
            cards: all(&selectors.cards),
            contact,
            skills: all(&selectors.skills),
        };

        tracing::debug!(
            anchors = context.anchors.len(),
            sections = context.sections.len(),
            cards = context.cards.len(),
            filters = context.filter_buttons.len(),
            contact = context.contact.is_some(),
            "Page context discovered"
        );
        context
    }
}

fn query_all<P: Page>(page: &P, scope: Option<NodeId>, selector: &str) -> Vec<NodeId> {
    match page.query_all(scope, selector) {
        Ok(nodes) => nodes,
        Err(e) => {
            tracing::warn!(selector, error = %e, "Selector skipped");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::{El, FragmentTree};

    #[test]
    fn discovers_stock_markup() {
        let mut tree = FragmentTree::new();
        let body = tree.body();
        let header = tree.add(body, El::new("header"));
        let nav = tree.add(header, El::new("nav"));
        let link = tree.add(nav, El::new("a").attr("href", "#about"));
        let toggle = tree.add(header, El::new("button").class("menu-toggle"));
        let about = tree.add(body, El::new("section").id("about").class("about"));
        let para = tree.add(about, El::new("p"));
        let form = tree.add(body, El::new("form").id("contact-form"));
        let submit = tree.add(form, El::new("button").attr("type", "submit"));
        let status = tree.add(body, El::new("div").class("form-status"));

        let context = PageContext::discover(&tree, &PageConfig::default());

        assert_eq!(context.header, Some(header));
        assert_eq!(context.nav, Some(nav));
        assert_eq!(context.menu_toggle, Some(toggle));
        assert_eq!(context.anchors, vec![link]);
        assert_eq!(context.nav_links, vec![link]);
        assert_eq!(context.sections, vec![about]);
        assert_eq!(context.reveal_groups.len(), 1);
        assert_eq!(context.reveal_groups[0].nodes, vec![para]);
        assert_eq!(
            context.contact,
            Some(ContactElements {
                form,
                submit: Some(submit),
                status: Some(status),
            })
        );
        assert!(context.theme_toggle.is_none());
        assert!(context.skills.is_empty());
    }

    #[test]
    fn invalid_selector_leaves_entry_empty() {
        let mut tree = FragmentTree::new();
        tree.add(tree.body(), El::new("div").class("project-card"));

        let mut config = PageConfig::default();
        config.selectors.cards = ".project-card[".to_string();

        let context = PageContext::discover(&tree, &config);
        assert!(context.cards.is_empty());
        // The reveal group using the same class still resolves.
        assert_eq!(context.reveal_groups.len(), 1);
    }
}
