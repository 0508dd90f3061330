//! Log sink writing to the browser developer console.

use folio_core::logging::{LogEntry, LogSink};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Routes each entry to the console method matching its level.
pub struct ConsoleSink;

impl LogSink for ConsoleSink {
    fn write(&self, entry: &LogEntry) {
        let line = JsValue::from_str(&entry.to_console_line());
        match entry.level.as_str() {
            "error" => console::error_1(&line),
            "warn" => console::warn_1(&line),
            "info" => console::info_1(&line),
            _ => console::debug_1(&line),
        }
    }
}
