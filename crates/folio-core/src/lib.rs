//! Folio Core Library
//!
//! Page interaction controllers for a static portfolio site.
//!
//! ## Overview
//!
//! The markup and styling of the site live elsewhere. This crate owns the
//! small amount of UI state layered on top of them: the mobile menu, the
//! active nav section, the light/dark theme, the project filter, the reveal
//! animations, the contact form and the "copy skill" affordance.
//!
//! ## Core Principles
//!
//! - **Host-agnostic**: controllers only see the [`Page`] trait; the browser
//!   host implements it over `web-sys`, tests use the in-memory
//!   `FragmentTree` (behind the `test-util` feature)
//! - **Guarded setup**: each controller installs on its own; a missing
//!   element skips that controller and nothing else
//! - **Single-threaded**: every event runs to completion before the next
//!
//! ## Quick Start
//!
//! ```ignore
//! use folio_core::{setup_steps, FragmentTree, PageConfig, PageContext, PageRuntime};
//!
//! let config = PageConfig::default();
//! let mut page = FragmentTree::new();
//! // ... build the page ...
//!
//! let context = PageContext::discover(&page, &config);
//! let (mut runtime, report) = PageRuntime::install(&mut page, setup_steps(&context, &config));
//! for (name, error) in &report.skipped {
//!     println!("{name} skipped: {error}");
//! }
//! runtime.load(&mut page);
//! ```

pub mod config;
pub mod context;
pub mod controllers;
pub mod error;
pub mod event;
#[cfg(any(test, feature = "test-util"))]
pub mod fragment;
pub mod logging;
pub mod page;
pub mod runtime;

// Re-exports
pub use config::{PageConfig, StaggerPolicy};
pub use context::PageContext;
pub use controllers::{setup_steps, Controller, FormState, Theme};
pub use error::{PageError, PageResult};
pub use event::{DomEvent, EventKind, Outcome, PageEvent, TimerTask};
#[cfg(any(test, feature = "test-util"))]
pub use fragment::{El, FragmentTree};
pub use page::{ListenTarget, ListenerId, NodeId, Page, ScrollBehavior, Subscription};
pub use runtime::{PageRuntime, SetupReport};
