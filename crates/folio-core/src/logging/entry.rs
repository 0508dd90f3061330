//! Log entry type handed to sinks.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single structured log record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// ISO 8601 timestamp (e.g., "2026-01-21T14:30:45.123Z")
    pub ts: String,

    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Name of the page application emitting the entry
    pub source: String,

    /// Module path / target (e.g., "folio_core::controllers::filter")
    pub target: String,

    /// Human-readable message
    pub msg: String,

    /// Optional structured fields
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,

    /// Optional span path if this entry is from within a span
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<String>,
}

impl LogEntry {
    /// Create a new log entry with the current timestamp.
    pub fn new(
        level: impl Into<String>,
        source: impl Into<String>,
        target: impl Into<String>,
        msg: impl Into<String>,
    ) -> Self {
        Self {
            ts: chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
            level: level.into(),
            source: source.into(),
            target: target.into(),
            msg: msg.into(),
            fields: None,
            span: None,
        }
    }

    /// Add structured fields to the entry.
    pub fn with_fields(mut self, fields: Value) -> Self {
        self.fields = Some(fields);
        self
    }

    /// Add span path to the entry.
    pub fn with_span(mut self, span: impl Into<String>) -> Self {
        self.span = Some(span.into());
        self
    }

    /// Serialize to a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// One-line human readable rendering used by console sinks.
    ///
    /// `[level] target: message {fields}`
    pub fn to_console_line(&self) -> String {
        let mut line = format!("[{}] {}: {}", self.level, self.target, self.msg);
        if let Some(span) = &self.span {
            line.push_str(&format!(" ({})", span));
        }
        if let Some(fields) = &self.fields {
            line.push(' ');
            line.push_str(&fields.to_string());
        }
        line
    }
}
