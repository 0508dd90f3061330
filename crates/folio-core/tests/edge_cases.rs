//! Edge case and boundary condition tests
//!
//! Missing markup, failing platform services and awkward event orderings.

mod common;

use common::{active_links, boot, booted, portfolio, shown_cards};
use folio_core::controllers::{
    ClipboardController, ContactController, ContactMessage, FilterController, Transport,
};
use folio_core::logging::{ConsoleLayer, MemorySink};
use folio_core::{
    setup_steps, Controller, DomEvent, El, EventKind, FormState, FragmentTree, ListenTarget, Page,
    PageConfig, PageContext, PageError, PageEvent, PageResult, PageRuntime, ScrollBehavior,
    TimerTask,
};
use tracing_subscriber::layer::SubscriberExt;

// ============================================================================
// Missing markup
// ============================================================================

/// A page with no contact form, theme toggle or skills still gets the rest
#[test]
fn test_partial_page_installs_remaining_controllers() {
    let mut tree = FragmentTree::new();
    let body = tree.body();
    let nav = tree.add(body, El::new("nav"));
    tree.add(nav, El::new("a").attr("href", "#work"));
    tree.add(body, El::new("section").id("work").layout(0.0, 900.0));
    tree.add(body, El::new("button").class("filter-btn").attr("data-filter", "all"));
    tree.add(body, El::new("div").class("project-card").attr("data-category", "web"));

    let (_, report) = boot(&mut tree, &PageConfig::default());

    assert_eq!(report.installed, vec!["theme", "navigation", "scroll", "filter"]);
    assert!(report.is_skipped("contact"));
    assert!(report.is_skipped("clipboard"));
    assert!(matches!(
        report.skipped[0].1,
        PageError::MissingElement {
            controller: "contact",
            ..
        }
    ));
}

/// An empty document only gets the theme applied
#[test]
fn test_empty_document() {
    let mut tree = FragmentTree::new();

    let (runtime, report) = boot(&mut tree, &PageConfig::default());

    assert_eq!(runtime.controllers(), vec!["theme"]);
    assert_eq!(report.skipped.len(), 5);
    assert_eq!(tree.attribute(tree.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(tree.listener_count(), 0);
}

/// Anchors pointing at nothing never scroll
#[test]
fn test_unmatched_anchor_is_silent() {
    let mut tree = FragmentTree::new();
    let link = tree.add(tree.body(), El::new("a").attr("href", "#missing"));
    let (mut runtime, report) = boot(&mut tree, &PageConfig::default());
    assert!(report.is_installed("navigation"));

    let outcome = tree.click(&mut runtime, link);

    assert!(outcome.prevents_default());
    assert!(tree.scroll_log().is_empty());
    assert!(tree.history().is_empty());
}

/// Without a header the configured offset is used
#[test]
fn test_headerless_page_uses_default_offset() {
    let mut tree = FragmentTree::new();
    let link = tree.add(tree.body(), El::new("a").attr("href", "#end"));
    tree.add(tree.body(), El::new("section").id("end").layout(50.0, 100.0));
    let (mut runtime, _) = boot(&mut tree, &PageConfig::default());

    tree.click(&mut runtime, link);

    // 50 - 80 clamps at the top of the page.
    assert_eq!(tree.scroll_y(), 0.0);
    assert_eq!(tree.history(), &["#end".to_string()]);
}

/// Reduced-motion sites can ask for instant jumps
#[test]
fn test_instant_scroll_from_config() {
    let (mut tree, nodes) = portfolio();
    let config =
        PageConfig::from_json(r#"{ "navigation": { "scroll_behavior": "instant" } }"#).unwrap();
    let (mut runtime, _) = boot(&mut tree, &config);

    tree.click(&mut runtime, nodes.links[1]);

    assert_eq!(tree.scroll_log(), &[(530.0, ScrollBehavior::Instant)]);
}

// ============================================================================
// Scroll tracker
// ============================================================================

/// Sections without an id never become active
#[test]
fn test_section_without_id_is_ignored() {
    let mut tree = FragmentTree::new();
    let body = tree.body();
    let nav = tree.add(body, El::new("nav"));
    let link = tree.add(nav, El::new("a").attr("href", "#intro"));
    tree.add(body, El::new("section").id("intro").layout(0.0, 1000.0));
    tree.add(body, El::new("section").layout(500.0, 1000.0));
    tree.set_scroll_y(600.0);

    boot(&mut tree, &PageConfig::default());

    // position 700 lies in both; the later one has no id.
    assert!(tree.has_class(link, "active"));
}

/// Two links to the same section: only the first is marked
#[test]
fn test_duplicate_links_mark_only_first() {
    let mut tree = FragmentTree::new();
    let body = tree.body();
    let nav = tree.add(body, El::new("nav"));
    let first = tree.add(nav, El::new("a").attr("href", "#about"));
    let second = tree.add(nav, El::new("a").attr("href", "#about"));
    tree.add(body, El::new("section").id("about").layout(0.0, 800.0));

    boot(&mut tree, &PageConfig::default());

    assert_eq!(active_links(&tree, &[first, second]), vec![first]);
}

/// Past the last section nothing is active
#[test]
fn test_no_active_link_below_sections() {
    let (mut tree, nodes, mut runtime) = booted();

    tree.scroll_window(&mut runtime, 5000.0);

    assert!(active_links(&tree, &nodes.links).is_empty());
}

/// Filtering never undoes a reveal, and a re-shown card is not hidden again
#[test]
fn test_filter_keeps_revealed_cards() {
    let (mut tree, nodes, mut runtime) = booted();
    tree.advance(&mut runtime, 100.0);
    tree.scroll_window(&mut runtime, 1000.0);
    assert!(tree.has_class(nodes.cards[0], "visible"));

    tree.click(&mut runtime, nodes.filters[3]);
    tree.click(&mut runtime, nodes.filters[0]);
    tree.advance(&mut runtime, 20.0);
    tree.scroll_window(&mut runtime, 0.0);

    assert!(tree.has_class(nodes.cards[0], "visible"));
    assert_eq!(tree.style(nodes.cards[0], "opacity").as_deref(), Some("1"));
    assert!(tree.has_class(nodes.cards[0], "fade-in"));
}

/// A hidden card is not revealed until it is shown again
#[test]
fn test_hidden_card_waits_for_filter() {
    let (mut tree, nodes, mut runtime) = booted();
    tree.click(&mut runtime, nodes.filters[2]);
    assert_eq!(shown_cards(&tree, &nodes.cards), vec![1]);

    tree.advance(&mut runtime, 100.0);
    tree.scroll_window(&mut runtime, 1500.0);
    assert!(!tree.has_class(nodes.cards[0], "visible"));
    assert!(tree.has_class(nodes.cards[1], "visible"));

    tree.click(&mut runtime, nodes.filters[0]);
    assert!(!tree.has_class(nodes.cards[0], "visible"));
    tree.advance(&mut runtime, 0.0);
    assert!(tree.has_class(nodes.cards[0], "visible"));
}

// ============================================================================
// Theme
// ============================================================================

/// Storage disabled at boot: fall back to the system scheme
#[test]
fn test_theme_without_storage() {
    let (mut tree, nodes) = portfolio();
    tree.fail_storage(true);
    tree.set_prefers_dark(true);

    let (mut runtime, report) = boot(&mut tree, &PageConfig::default());
    assert!(report.is_installed("theme"));
    assert_eq!(tree.attribute(tree.root(), "data-theme").as_deref(), Some("dark"));

    tree.click(&mut runtime, nodes.theme_toggle);
    assert_eq!(tree.attribute(tree.root(), "data-theme").as_deref(), Some("light"));
    assert_eq!(tree.stored("theme"), None);
}

/// Custom attribute and storage key from config
#[test]
fn test_theme_config_overrides() {
    let (mut tree, nodes) = portfolio();
    let config = PageConfig::from_json(
        r#"{ "theme": { "storage_key": "folio-theme", "attribute": "data-mode" } }"#,
    )
    .unwrap();
    let (mut runtime, _) = boot(&mut tree, &config);

    tree.click(&mut runtime, nodes.theme_toggle);

    assert_eq!(tree.attribute(tree.root(), "data-mode").as_deref(), Some("dark"));
    assert_eq!(tree.stored("folio-theme"), Some("dark"));
    assert_eq!(tree.stored("theme"), None);
}

// ============================================================================
// Contact form
// ============================================================================

struct RejectingTransport;

impl Transport for RejectingTransport {
    fn send(&mut self, _message: &ContactMessage) -> PageResult<()> {
        Err(PageError::Submission("mailbox unavailable".to_string()))
    }
}

fn install_contact(
    tree: &mut FragmentTree,
    transport: Box<dyn Transport>,
) -> PageRuntime<FragmentTree> {
    let config = PageConfig::default();
    let context = PageContext::discover(&*tree, &config);
    let controller = ContactController::with_transport(&context, config.contact, transport);
    let (runtime, _) = PageRuntime::install(tree, vec![Box::new(controller)]);
    runtime
}

/// A failed delivery shows the retry message and still restores the button
#[test]
fn test_failed_submission_restores_submit() {
    let (mut tree, nodes) = portfolio();
    let mut runtime = install_contact(&mut tree, Box::new(RejectingTransport));
    tree.set_value(nodes.name_input, "Ada");

    tree.submit(&mut runtime, nodes.form);
    tree.advance(&mut runtime, 1500.0);

    assert_eq!(tree.text(nodes.status), "Something went wrong. Please try again.");
    assert!(tree.has_class(nodes.status, "error"));
    assert!(!tree.has_class(nodes.status, "success"));
    assert!(!tree.is_disabled(nodes.submit));
    assert_eq!(tree.text(nodes.submit), "Send Message");
    // The form keeps its content so the visitor can retry.
    assert_eq!(tree.value(nodes.name_input), "Ada");
}

/// Submitting again while pending does not start a second submission
#[test]
fn test_resubmit_while_pending_is_ignored() {
    let (mut tree, nodes, mut runtime) = booted();

    tree.submit(&mut runtime, nodes.form);
    let outcome = tree.submit(&mut runtime, nodes.form);

    assert!(outcome.prevents_default());
    let settles = tree
        .pending_timers()
        .into_iter()
        .filter(|task| *task == TimerTask::SubmissionSettled)
        .count();
    assert_eq!(settles, 1);

    tree.advance(&mut runtime, 1500.0);
    assert_eq!(tree.text(nodes.submit), "Send Message");
}

/// A second submission after success goes through the full cycle again
#[test]
fn test_submit_again_after_success() {
    let (mut tree, nodes, mut runtime) = booted();

    tree.submit(&mut runtime, nodes.form);
    tree.advance(&mut runtime, 2000.0);
    assert!(tree.has_class(nodes.status, "success"));

    tree.submit(&mut runtime, nodes.form);
    assert!(tree.is_disabled(nodes.submit));
    assert_eq!(tree.text(nodes.submit), "Sending...");

    tree.advance(&mut runtime, 1500.0);
    assert!(!tree.is_disabled(nodes.submit));
    assert_eq!(tree.text(nodes.submit), "Send Message");
}

/// The state machine is observable on the controller itself
#[test]
fn test_contact_state_transitions() {
    let (mut tree, nodes) = portfolio();
    let context = PageContext::discover(&tree, &PageConfig::default());
    let mut controller = ContactController::new(&context, Default::default());
    let submit = DomEvent::new(
        EventKind::Submit,
        ListenTarget::Node(nodes.form),
        Some(nodes.form),
    );

    Controller::<FragmentTree>::install(&mut controller, &mut tree).unwrap();
    assert_eq!(controller.state(), FormState::Idle);

    controller
        .handle(&mut tree, &PageEvent::Dom(submit))
        .unwrap();
    assert_eq!(controller.state(), FormState::Pending);

    controller
        .handle(&mut tree, &PageEvent::Timer(TimerTask::SubmissionSettled))
        .unwrap();
    assert_eq!(controller.state(), FormState::Success);

    controller
        .handle(&mut tree, &PageEvent::Timer(TimerTask::HideStatus))
        .unwrap();
    assert_eq!(controller.state(), FormState::Idle);
}

// ============================================================================
// Clipboard and filter
// ============================================================================

/// Clipboard failures are logged as warnings, not surfaced
#[test]
fn test_clipboard_failure_logged() {
    let (mut tree, nodes) = portfolio();
    tree.fail_clipboard(true);
    let context = PageContext::discover(&tree, &PageConfig::default());
    let controller = ClipboardController::new(&context, Default::default());
    let (mut runtime, _) = PageRuntime::install(&mut tree, vec![Box::new(controller)]);

    let sink = MemorySink::new();
    let subscriber = tracing_subscriber::registry().with(ConsoleLayer::new("folio", sink.clone()));
    tracing::subscriber::with_default(subscriber, || {
        tree.click(&mut runtime, nodes.skills[0]);
    });

    let warnings = sink.at_level("warn");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].msg, "Clipboard write failed");
    assert!(!tree.has_class(nodes.skills[0], "copied"));
}

/// A filter button without a category shows everything
#[test]
fn test_filter_button_without_category() {
    let mut tree = FragmentTree::new();
    let body = tree.body();
    let bare = tree.add(body, El::new("button").class("filter-btn"));
    let web = tree.add(body, El::new("button").class("filter-btn").attr("data-filter", "web"));
    let cards: Vec<_> = ["web", "print"]
        .iter()
        .map(|c| tree.add(body, El::new("div").class("project-card").attr("data-category", c)))
        .collect();
    let context = PageContext::discover(&tree, &PageConfig::default());
    let controller = FilterController::new(&context, Default::default());
    let (mut runtime, _) = PageRuntime::install(&mut tree, vec![Box::new(controller)]);

    tree.click(&mut runtime, web);
    assert_eq!(shown_cards(&tree, &cards), vec![0]);

    tree.click(&mut runtime, bare);
    assert_eq!(shown_cards(&tree, &cards), vec![0, 1]);
}

/// Every default step is present even when the page is empty
#[test]
fn test_setup_steps_order() {
    let tree = FragmentTree::new();
    let config = PageConfig::default();
    let context = PageContext::discover(&tree, &config);

    let names: Vec<&str> = setup_steps::<FragmentTree>(&context, &config)
        .iter()
        .map(|step| step.name())
        .collect();

    assert_eq!(
        names,
        vec!["theme", "navigation", "scroll", "filter", "contact", "clipboard"]
    );
}
