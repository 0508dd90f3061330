//! Where the page configuration comes from.

use folio_core::{PageConfig, PageResult};

/// Id of the inline JSON block holding the configuration.
pub const CONFIG_ELEMENT_ID: &str = "folio-config";

/// Parse the text of the config block. A missing or blank block means the
/// stock configuration.
pub fn page_config(source: Option<&str>) -> PageResult<PageConfig> {
    match source.map(str::trim).filter(|text| !text.is_empty()) {
        Some(json) => PageConfig::from_json(json),
        None => Ok(PageConfig::default()),
    }
}

/// Like [`page_config`], but falls back to the defaults on a parse error and
/// hands the error back so it can be logged once logging is up.
pub fn page_config_or_default(
    source: Option<&str>,
) -> (PageConfig, Option<folio_core::PageError>) {
    match page_config(source) {
        Ok(config) => (config, None),
        Err(e) => (PageConfig::default(), Some(e)),
    }
}
