//! Browse entry points
//!
//! Validates the request, fetches through a [`Transport`] and hands the
//! response to the normalization pipeline.

use std::time::Duration;

use tracing::{debug, error};
use url::Url;

use crate::error::BrowseError;
use crate::pipeline::normalize_response;
use crate::transport::{HttpTransport, Transport};
use crate::types::{BrowseRequest, PageContent};
use crate::DEFAULT_USER_AGENT;

/// Options shared by every request made through a client or tool
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    /// Custom User-Agent
    pub user_agent: Option<String>,
    /// Total request timeout, none by default
    pub timeout: Option<Duration>,
    /// Allow list of URL prefixes
    pub allow_prefixes: Vec<String>,
    /// Block list of URL prefixes
    pub block_prefixes: Vec<String>,
}

impl BrowseOptions {
    /// HTTP transport configured from these options
    pub fn http_transport(&self) -> HttpTransport {
        HttpTransport::new()
            .with_user_agent(self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT))
            .with_timeout(self.timeout)
    }
}

/// Fetch and normalize a URL with default options
pub async fn fetch(req: BrowseRequest) -> Result<PageContent, BrowseError> {
    fetch_with_options(req, BrowseOptions::default()).await
}

/// Fetch and normalize a URL with custom options over HTTP
pub async fn fetch_with_options(
    req: BrowseRequest,
    options: BrowseOptions,
) -> Result<PageContent, BrowseError> {
    let transport = options.http_transport();
    fetch_with_transport(&req, &options, &transport).await
}

/// Fetch and normalize a URL, folding any failure into an error document
pub async fn browse(req: BrowseRequest) -> PageContent {
    match fetch(req).await {
        Ok(page) => page,
        Err(e) => {
            error!(error = %e, "Browse failed");
            PageContent::from_error(&e)
        }
    }
}

/// Fetch and normalize a URL through the given transport
pub async fn fetch_with_transport(
    req: &BrowseRequest,
    options: &BrowseOptions,
    transport: &dyn Transport,
) -> Result<PageContent, BrowseError> {
    let url = validate_url(&req.url, options)?;

    debug!(transport = transport.name(), url = %url, accept = req.accept_header(), "Fetching");
    let envelope = transport.fetch(&url, req.accept_header()).await?;

    Ok(normalize_response(&envelope, req.wants_conversion()))
}

/// Check that a URL is present, absolute http(s), and passes the prefix lists
pub fn validate_url(raw: &str, options: &BrowseOptions) -> Result<Url, BrowseError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(BrowseError::MissingUrl);
    }

    let url = Url::parse(raw).map_err(|e| BrowseError::InvalidUrl(e.to_string()))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(BrowseError::InvalidUrl(
            "must start with http:// or https://".to_string(),
        ));
    }

    if !options.allow_prefixes.is_empty()
        && !options
            .allow_prefixes
            .iter()
            .any(|prefix| raw.starts_with(prefix))
    {
        return Err(BrowseError::InvalidUrl("not in allow list".to_string()));
    }

    if options
        .block_prefixes
        .iter()
        .any(|prefix| raw.starts_with(prefix))
    {
        return Err(BrowseError::InvalidUrl("blocked by policy".to_string()));
    }

    Ok(url)
}
