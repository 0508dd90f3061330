//! Custom tracing Layer that forwards events to a [`LogSink`].
//!
//! This layer integrates with the `tracing` crate to capture all log events
//! and turn them into [`LogEntry`] records.

use std::fmt::Write as FmtWrite;

use tracing::field::{Field, Visit};
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

use super::entry::LogEntry;
use super::sink::LogSink;
use crate::error::{PageError, PageResult};

/// A tracing Layer that writes every event to a sink.
pub struct ConsoleLayer<K> {
    source: String,
    sink: K,
}

impl<K: LogSink> ConsoleLayer<K> {
    /// Create a new layer tagging entries with `source`.
    pub fn new(source: impl Into<String>, sink: K) -> Self {
        Self {
            source: source.into(),
            sink,
        }
    }
}

impl<S, K> Layer<S> for ConsoleLayer<K>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    K: LogSink,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let level = metadata.level().as_str().to_lowercase();

        let mut visitor = JsonVisitor::new();
        event.record(&mut visitor);

        let message = visitor.message.unwrap_or_default();
        let mut entry = LogEntry::new(&level, &self.source, metadata.target(), message);

        if !visitor.fields.is_empty() {
            entry = entry.with_fields(serde_json::Value::Object(visitor.fields));
        }

        if let Some(scope) = ctx.event_scope(event) {
            let spans: Vec<String> = scope.from_root().map(|span| span.name().to_string()).collect();
            if !spans.is_empty() {
                entry = entry.with_span(spans.join(" > "));
            }
        }

        self.sink.write(&entry);
    }
}

/// Visitor that extracts fields from tracing events.
struct JsonVisitor {
    message: Option<String>,
    fields: serde_json::Map<String, serde_json::Value>,
}

impl JsonVisitor {
    fn new() -> Self {
        Self {
            message: None,
            fields: serde_json::Map::new(),
        }
    }

    fn insert(&mut self, field: &Field, value: serde_json::Value) {
        self.fields.insert(field.name().to_string(), value);
    }
}

impl Visit for JsonVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        let mut buf = String::new();
        let _ = write!(&mut buf, "{:?}", value);

        if field.name() == "message" {
            self.message = Some(buf);
        } else {
            self.insert(field, serde_json::Value::String(buf));
        }
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = Some(value.to_string());
        } else {
            self.insert(field, serde_json::Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, serde_json::Value::Number(value.into()));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, serde_json::Value::Number(value.into()));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, serde_json::Value::Bool(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        if let Some(n) = serde_json::Number::from_f64(value) {
            self.insert(field, serde_json::Value::Number(n));
        }
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, serde_json::Value::String(value.to_string()));
    }
}

/// Builder for installing the global subscriber.
pub struct LoggingBuilder {
    source: String,
    level: String,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            level: "info".to_string(),
        }
    }

    /// Set the maximum level (e.g., "debug"). Unknown names fall back to info.
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.level.parse().unwrap_or(LevelFilter::INFO)
    }

    /// Build the layer (for manual composition).
    pub fn build_layer<K: LogSink>(&self, sink: K) -> ConsoleLayer<K> {
        ConsoleLayer::new(&self.source, sink)
    }

    /// Install a registry with the filtered layer as the global default.
    pub fn init<K: LogSink>(self, sink: K) -> PageResult<()> {
        let filter = self.level_filter();
        let subscriber =
            tracing_subscriber::registry().with(self.build_layer(sink).with_filter(filter));

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| PageError::Host(format!("logging already initialised: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    #[test]
    fn test_console_layer_captures_events() {
        let sink = MemorySink::new();
        let layer = ConsoleLayer::new("folio", sink.clone());

        let subscriber = tracing_subscriber::registry().with(layer);

        tracing::subscriber::with_default(subscriber, || {
            tracing::info!("Test message");
            tracing::warn!(count = 42, "Warning with field");
        });

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].msg, "Test message");
        assert_eq!(entries[0].level, "info");
        assert_eq!(entries[0].source, "folio");
        assert_eq!(entries[1].msg, "Warning with field");
        assert_eq!(entries[1].fields, Some(serde_json::json!({ "count": 42 })));
    }

    #[test]
    fn test_level_filter_drops_debug() {
        let sink = MemorySink::new();
        let builder = LoggingBuilder::new("folio").with_level("warn");
        let filter = builder.level_filter();
        let subscriber =
            tracing_subscriber::registry().with(builder.build_layer(sink.clone()).with_filter(filter));

        tracing::subscriber::with_default(subscriber, || {
            tracing::debug!("dropped");
            tracing::info!("dropped too");
            tracing::warn!("kept");
        });

        let entries = sink.entries();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].msg, "kept");
    }

    #[test]
    fn test_unknown_level_defaults_to_info() {
        let builder = LoggingBuilder::new("folio").with_level("chatty");
        assert_eq!(builder.level_filter(), LevelFilter::INFO);
    }

    #[test]
    fn test_span_path_is_recorded() {
        let sink = MemorySink::new();
        let subscriber =
            tracing_subscriber::registry().with(ConsoleLayer::new("folio", sink.clone()));

        tracing::subscriber::with_default(subscriber, || {
            let span = tracing::info_span!("dispatch");
            let _guard = span.enter();
            tracing::info!("inside");
        });

        assert_eq!(sink.entries()[0].span.as_deref(), Some("dispatch"));
    }
}
