//! Folio browser entry point.
//!
//! Compiled to WebAssembly and loaded by the portfolio page. On start it
//! reads the optional `<script id="folio-config">` JSON block, installs the
//! [`folio_core`] controllers over the live DOM and keeps them alive until
//! [`teardown`] is called.
//!
//! ```html
//! <script type="application/json" id="folio-config">
//!   {"contact": {"submit_delay_ms": 800}, "log_level": "debug"}
//! </script>
//! <script type="module">
//!   import init from "./pkg/folio.js";
//!   init();
//! </script>
//! ```

pub mod settings;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod console;
#[cfg(target_arch = "wasm32")]
mod host;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::wasm_bindgen;

/// Boots the controllers once the document has been parsed.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    app::start();
}

/// Removes every listener the controllers registered and drops their state.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn teardown() {
    app::teardown();
}
