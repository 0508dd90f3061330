//! Structured logging for the page controllers.
//!
//! Controllers log with the ordinary `tracing` macros. This module provides
//! the subscriber side: a [`ConsoleLayer`] that turns each event into a
//! [`LogEntry`] and hands it to a [`LogSink`]. The browser host supplies a
//! sink that writes to the developer console; tests use [`MemorySink`].
//!
//! ## Usage
//!
//! ```ignore
//! use folio_core::logging::{LoggingBuilder, MemorySink};
//!
//! let sink = MemorySink::new();
//! LoggingBuilder::new("folio")
//!     .with_level("debug")
//!     .init(sink.clone())?;
//!
//! tracing::info!(section = "about", "Active section changed");
//! assert_eq!(sink.entries().len(), 1);
//! ```

pub mod entry;
pub mod layer;
pub mod sink;

// Re-exports for convenience
pub use entry::LogEntry;
pub use layer::{ConsoleLayer, LoggingBuilder};
pub use sink::{LogSink, MemorySink};
