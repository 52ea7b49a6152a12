//! Fetch transport
//!
//! The pipeline only needs "GET this URL with this Accept header and give me
//! the bytes". [`Transport`] is that seam; [`HttpTransport`] implements it
//! with reqwest, following redirects and reporting the post-redirect URL.

use crate::error::BrowseError;
use crate::types::ResponseEnvelope;
use crate::DEFAULT_USER_AGENT;
use async_trait::async_trait;
use bytes::Bytes;
use futures::StreamExt;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{error, info};
use url::Url;

/// Something that can fetch a URL
///
/// Implementations must follow redirects themselves and report the final
/// URL in the returned envelope.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Identifier for logging
    fn name(&self) -> &'static str;

    /// GET `url` sending `accept` as the Accept header
    async fn fetch(&self, url: &Url, accept: &str) -> Result<ResponseEnvelope, BrowseError>;
}

/// reqwest-backed transport
///
/// Redirects follow reqwest's default policy. No timeout applies unless one
/// is configured.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    user_agent: String,
    timeout: Option<Duration>,
}

impl HttpTransport {
    /// Create a transport with the default User-Agent and no timeout
    pub fn new() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }

    /// Override the User-Agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a total request timeout
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn build_client(&self, accept: &str) -> Result<reqwest::Client, BrowseError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&self.user_agent)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_USER_AGENT)),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(accept).unwrap_or_else(|_| HeaderValue::from_static("*/*")),
        );

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(BrowseError::ClientBuildError)
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn fetch(&self, url: &Url, accept: &str) -> Result<ResponseEnvelope, BrowseError> {
        let client = self.build_client(accept)?;

        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(BrowseError::from_reqwest)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        info!(url = %url, final_url = %final_url, status, content_type = %content_type, "Fetched");

        let body = read_body(response).await?;

        Ok(ResponseEnvelope {
            content_type,
            body,
            final_url,
            status,
        })
    }
}

/// Read the full response body as a byte stream
async fn read_body(response: reqwest::Response) -> Result<Bytes, BrowseError> {
    let mut body = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => body.extend_from_slice(&bytes),
            Err(e) => {
                error!("Error reading body chunk: {}", e);
                return Err(BrowseError::from_reqwest(e));
            }
        }
    }

    Ok(Bytes::from(body))
}
