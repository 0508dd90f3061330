//! Error types for Folio

use thiserror::Error;

use crate::page::NodeId;

/// Main error type for page interaction operations
///
/// None of these are fatal to the page: the runtime logs them and keeps
/// the remaining controllers running.
#[derive(Error, Debug)]
pub enum PageError {
    /// A controller could not find an element it needs to install
    #[error("{controller}: missing {element}")]
    MissingElement {
        controller: &'static str,
        element: &'static str,
    },

    /// A selector could not be parsed by the host
    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// A node handle does not belong to the host's registry
    #[error("Unknown node: {0:?}")]
    UnknownNode(NodeId),

    /// Reading or writing the persisted preference failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Writing to the clipboard failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Delivering a contact message failed
    #[error("Submission failed: {0}")]
    Submission(String),

    /// Any other failure reported by the host environment
    #[error("Host error: {0}")]
    Host(String),

    /// Page configuration could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}

impl PageError {
    /// Shorthand for a [`PageError::MissingElement`].
    pub fn missing(controller: &'static str, element: &'static str) -> Self {
        Self::MissingElement {
            controller,
            element,
        }
    }
}

/// Result type alias using PageError
pub type PageResult<T> = Result<T, PageError>;
