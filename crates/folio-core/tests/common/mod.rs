//! Shared portfolio page used by the integration tests.

#![allow(dead_code)]

use folio_core::{
    setup_steps, El, FragmentTree, NodeId, Page, PageConfig, PageContext, PageRuntime,
    SetupReport,
};

/// Handles to the interesting elements of [`portfolio`].
pub struct Nodes {
    pub header: NodeId,
    pub nav: NodeId,
    pub menu_toggle: NodeId,
    /// `#home`, `#about`, `#projects`, `#contact`.
    pub links: Vec<NodeId>,
    /// `home`, `about`, `projects`, `contact`.
    pub sections: Vec<NodeId>,
    pub about_text: NodeId,
    pub theme_toggle: NodeId,
    pub theme_icon: NodeId,
    /// `all`, `web`, `mobile`, `design`.
    pub filters: Vec<NodeId>,
    /// Tagged `web`, `mobile`, `web`, `design`.
    pub cards: Vec<NodeId>,
    pub form: NodeId,
    pub name_input: NodeId,
    pub email_input: NodeId,
    pub message_input: NodeId,
    pub submit: NodeId,
    pub status: NodeId,
    pub skills: Vec<NodeId>,
    pub social: Vec<NodeId>,
}

/// A one-page portfolio with the stock markup, 3400px tall.
///
/// Header 70px; sections at 0, 600, 1200 and 2200.
pub fn portfolio() -> (FragmentTree, Nodes) {
    let mut tree = FragmentTree::new();
    let body = tree.body();

    let header = tree.add(body, El::new("header").layout(0.0, 70.0));
    let nav = tree.add(header, El::new("nav"));
    let links = ["home", "about", "projects", "contact"]
        .iter()
        .map(|id| tree.add(nav, El::new("a").attr("href", &format!("#{id}")).text(id)))
        .collect();
    let menu_toggle = tree.add(header, El::new("button").class("menu-toggle"));
    let theme_toggle = tree.add(header, El::new("button").class("theme-toggle"));
    let theme_icon = tree.add(theme_toggle, El::new("i").class("fas fa-moon"));

    let home = tree.add(body, El::new("section").id("home").layout(0.0, 600.0));
    tree.add(home, El::new("a").attr("href", "#").text("Top"));

    let about = tree.add(
        body,
        El::new("section").id("about").class("about").layout(600.0, 600.0),
    );
    let about_text = tree.add(about, El::new("p").text("Hello").layout(650.0, 100.0));
    let skill_list = tree.add(about, El::new("div").class("skills"));
    let skills = ["Rust", "WebAssembly", "CSS"]
        .iter()
        .map(|skill| {
            tree.add(
                skill_list,
                El::new("span").class("skill-tag").text(skill).layout(800.0, 30.0),
            )
        })
        .collect();

    let projects = tree.add(body, El::new("section").id("projects").layout(1200.0, 1000.0));
    let filter_bar = tree.add(projects, El::new("div").class("filters"));
    let filters = ["all", "web", "mobile", "design"]
        .iter()
        .map(|category| {
            let el = El::new("button")
                .class("filter-btn")
                .attr("data-filter", category);
            let el = if *category == "all" { el.class("active") } else { el };
            tree.add(filter_bar, el)
        })
        .collect();
    let grid = tree.add(projects, El::new("div").class("project-grid"));
    let cards = ["web", "mobile", "web", "design"]
        .iter()
        .enumerate()
        .map(|(i, category)| {
            let top = 1300.0 + (i / 2) as f64 * 400.0;
            tree.add(
                grid,
                El::new("div")
                    .class("project-card")
                    .attr("data-category", category)
                    .layout(top, 350.0),
            )
        })
        .collect();

    let contact = tree.add(body, El::new("section").id("contact").layout(2200.0, 800.0));
    let form = tree.add(contact, El::new("form").id("contact-form"));
    let name_input = tree.add(form, El::new("input").attr("name", "name"));
    let email_input = tree.add(form, El::new("input").attr("name", "email"));
    let message_input = tree.add(form, El::new("textarea").attr("name", "message"));
    let submit = tree.add(
        form,
        El::new("button").attr("type", "submit").text("Send Message"),
    );
    let status = tree.add(
        form,
        El::new("div").class("form-status").style("display", "none"),
    );

    let footer = tree.add(body, El::new("footer").layout(3000.0, 400.0));
    let social_list = tree.add(footer, El::new("div").class("social-links"));
    let social = ["github", "linkedin", "mail"]
        .iter()
        .map(|name| tree.add(social_list, El::new("a").attr("href", name).layout(3100.0, 40.0)))
        .collect();

    let nodes = Nodes {
        header,
        nav,
        menu_toggle,
        links,
        sections: vec![home, about, projects, contact],
        about_text,
        theme_toggle,
        theme_icon,
        filters,
        cards,
        form,
        name_input,
        email_input,
        message_input,
        submit,
        status,
        skills,
        social,
    };
    (tree, nodes)
}

/// Discover, install every controller and broadcast the load event.
pub fn boot(tree: &mut FragmentTree, config: &PageConfig) -> (PageRuntime<FragmentTree>, SetupReport) {
    let context = PageContext::discover(tree, config);
    let (mut runtime, report) = PageRuntime::install(tree, setup_steps(&context, config));
    runtime.load(tree);
    (runtime, report)
}

/// The stock portfolio, booted with the default configuration.
pub fn booted() -> (FragmentTree, Nodes, PageRuntime<FragmentTree>) {
    let (mut tree, nodes) = portfolio();
    let (runtime, _) = boot(&mut tree, &PageConfig::default());
    (tree, nodes, runtime)
}

pub fn active_links(tree: &FragmentTree, links: &[NodeId]) -> Vec<NodeId> {
    links
        .iter()
        .copied()
        .filter(|link| tree.has_class(*link, "active"))
        .collect()
}

pub fn shown_cards(tree: &FragmentTree, cards: &[NodeId]) -> Vec<usize> {
    cards
        .iter()
        .enumerate()
        .filter(|(_, card)| tree.is_displayed(**card))
        .map(|(i, _)| i)
        .collect()
}
