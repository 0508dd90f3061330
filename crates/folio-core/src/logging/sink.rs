//! Destinations for formatted log entries.

use std::sync::Arc;

use parking_lot::Mutex;

use super::entry::LogEntry;

/// Receives every entry that passes the layer's level filter.
pub trait LogSink: Send + Sync + 'static {
    fn write(&self, entry: &LogEntry);
}

/// Keeps entries in memory. Clones share the same buffer.
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Entries at the given level (`"warn"`, `"info"`, ...).
    pub fn at_level(&self, level: &str) -> Vec<LogEntry> {
        self.entries
            .lock()
            .iter()
            .filter(|entry| entry.level == level)
            .cloned()
            .collect()
    }
}

impl LogSink for MemorySink {
    fn write(&self, entry: &LogEntry) {
        self.entries.lock().push(entry.clone());
    }
}
