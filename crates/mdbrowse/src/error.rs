//! Error types for mdbrowse
//!
//! Only failures that stop a document from being fetched live here. Malformed
//! content (bad charset, broken markup, unterminated frontmatter) is always
//! recovered locally and never becomes a `BrowseError`.

use thiserror::Error;

/// Errors that can occur while fetching a document
#[derive(Debug, Error)]
pub enum BrowseError {
    /// URL is missing
    #[error("URL is required")]
    MissingUrl,

    /// URL does not parse, has an unsupported scheme, or is filtered out
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Failed to build HTTP client
    #[error("Failed to create HTTP client")]
    ClientBuildError(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,

    /// Failed to connect to server
    #[error("Failed to connect to server: {0}")]
    ConnectError(#[source] reqwest::Error),

    /// Other request error
    #[error("Request failed: {0}")]
    RequestError(String),
}

impl BrowseError {
    /// Create an error from a reqwest error
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            BrowseError::Timeout
        } else if err.is_connect() {
            BrowseError::ConnectError(err)
        } else {
            BrowseError::RequestError(err.to_string())
        }
    }
}
