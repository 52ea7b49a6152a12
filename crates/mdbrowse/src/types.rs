//! Core types for mdbrowse

use crate::error::BrowseError;
use bytes::Bytes;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Accept header sent when the upstream may answer with Markdown
pub const ACCEPT_MARKDOWN: &str = "text/markdown, text/x-markdown, text/plain, text/html, */*";

/// Accept header sent when Markdown negotiation is disabled
pub const ACCEPT_HTML: &str = "text/html, */*";

/// Request to fetch and normalize a URL
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrowseRequest {
    /// The URL to fetch (required, must be http:// or https://)
    ///
    /// Absent decodes to empty so validation reports it as missing.
    #[serde(default)]
    pub url: String,

    /// Advertise Markdown in the Accept header (optional, default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_accept_md: Option<bool>,

    /// Convert HTML responses to Markdown (optional, default true)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_convert: Option<bool>,
}

impl BrowseRequest {
    /// Create a new request with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Only ask the upstream for HTML
    pub fn without_accept_md(mut self) -> Self {
        self.send_accept_md = Some(false);
        self
    }

    /// Keep HTML responses as raw HTML instead of converting them
    pub fn raw(mut self) -> Self {
        self.auto_convert = Some(false);
        self
    }

    /// Check if Markdown should be advertised upstream
    pub fn accepts_markdown(&self) -> bool {
        self.send_accept_md.unwrap_or(true)
    }

    /// Check if HTML should be converted to Markdown
    pub fn wants_conversion(&self) -> bool {
        self.auto_convert.unwrap_or(true)
    }

    /// Accept header value for this request
    pub fn accept_header(&self) -> &'static str {
        if self.accepts_markdown() {
            ACCEPT_MARKDOWN
        } else {
            ACCEPT_HTML
        }
    }
}

/// Raw upstream response handed to the normalization pipeline
#[derive(Debug, Clone, Default)]
pub struct ResponseEnvelope {
    /// Content-Type header value (empty when absent)
    pub content_type: String,
    /// Undecoded response body
    pub body: Bytes,
    /// URL after redirects; base for all reference resolution
    pub final_url: String,
    /// HTTP status code
    pub status: u16,
}

impl ResponseEnvelope {
    /// Create an envelope for a 200 response
    pub fn new(
        content_type: impl Into<String>,
        body: impl Into<Bytes>,
        final_url: impl Into<String>,
    ) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
            final_url: final_url.into(),
            status: 200,
        }
    }
}

/// Normalized document returned to callers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Final URL of the document (empty on error)
    pub url: String,

    /// Markdown body (raw HTML when conversion is disabled)
    pub markdown: String,

    /// Decoded HTML source; empty for Markdown and sitemap documents
    pub raw_html: String,

    /// Document title, never empty
    pub title: String,

    /// True when the document needed no HTML conversion
    pub was_markdown: bool,

    /// Error message when the fetch failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageContent {
    /// Build the placeholder document for a failed fetch
    pub fn from_error(err: &BrowseError) -> Self {
        let message = err.to_string();
        Self {
            url: String::new(),
            markdown: format!(
                "# Error Loading Page\n\nFailed to load the URL.\n\n**Error:** {}",
                message
            ),
            raw_html: String::new(),
            title: "Error".to_string(),
            was_markdown: false,
            error: Some(message),
        }
    }

    /// Check if this document reports a failed fetch
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = BrowseRequest::new("https://example.com");
        assert!(req.accepts_markdown());
        assert!(req.wants_conversion());
        assert_eq!(req.accept_header(), ACCEPT_MARKDOWN);
    }

    #[test]
    fn test_request_builder() {
        let req = BrowseRequest::new("https://example.com")
            .without_accept_md()
            .raw();

        assert_eq!(req.url, "https://example.com");
        assert_eq!(req.send_accept_md, Some(false));
        assert_eq!(req.auto_convert, Some(false));
        assert_eq!(req.accept_header(), ACCEPT_HTML);
    }

    #[test]
    fn test_request_deserialization_camel_case() {
        let req: BrowseRequest = serde_json::from_str(
            r#"{"url":"https://example.com","sendAcceptMd":false,"autoConvert":false}"#,
        )
        .unwrap();
        assert!(!req.accepts_markdown());
        assert!(!req.wants_conversion());

        let req: BrowseRequest = serde_json::from_str(r#"{"url":"https://example.com"}"#).unwrap();
        assert!(req.accepts_markdown());
        assert!(req.wants_conversion());
    }

    #[test]
    fn test_request_without_url_deserializes() {
        let req: BrowseRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.url, "");
        assert!(req.send_accept_md.is_none());
        assert!(req.auto_convert.is_none());
    }

    #[test]
    fn test_page_content_serialization() {
        let page = PageContent {
            url: "https://example.com".to_string(),
            markdown: "# Hi".to_string(),
            raw_html: "<h1>Hi</h1>".to_string(),
            title: "Hi".to_string(),
            was_markdown: false,
            error: None,
        };
        let json = serde_json::to_string(&page).unwrap();
        assert!(json.contains("\"rawHtml\":\"<h1>Hi</h1>\""));
        assert!(json.contains("\"wasMarkdown\":false"));
        // Optional None fields should be omitted
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_page_content_from_error() {
        let page = PageContent::from_error(&BrowseError::RequestError("dns failure".to_string()));
        assert!(page.is_error());
        assert_eq!(page.title, "Error");
        assert_eq!(page.url, "");
        assert_eq!(page.raw_html, "");
        assert!(!page.was_markdown);
        assert!(page.markdown.starts_with("# Error Loading Page"));
        assert!(page.markdown.contains("**Error:** Request failed: dns failure"));
        assert_eq!(page.error.as_deref(), Some("Request failed: dns failure"));
    }
}
