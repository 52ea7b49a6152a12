//! Tool builder and contract for mdbrowse

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use schemars::schema_for;
use tracing::error;

use crate::client::{fetch_with_transport, BrowseOptions};
use crate::error::BrowseError;
use crate::transport::Transport;
use crate::types::{BrowseRequest, PageContent};
use crate::{TOOL_DESCRIPTION, TOOL_LLMTXT};

/// Builder for configuring the mdbrowse tool
#[derive(Default)]
pub struct ToolBuilder {
    options: BrowseOptions,
    transport: Option<Arc<dyn Transport>>,
}

impl ToolBuilder {
    /// Create a new tool builder with stock options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom User-Agent
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.options.user_agent = Some(ua.into());
        self
    }

    /// Set a total request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.options.timeout = Some(timeout);
        self
    }

    /// Add URL prefix to allow list
    pub fn allow_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.allow_prefixes.push(prefix.into());
        self
    }

    /// Add URL prefix to block list
    pub fn block_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.options.block_prefixes.push(prefix.into());
        self
    }

    /// Replace the HTTP transport
    ///
    /// User-Agent and timeout settings only apply to the built-in transport.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the tool
    pub fn build(self) -> Tool {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(self.options.http_transport()),
        };
        Tool {
            options: self.options,
            transport,
        }
    }
}

/// Configured mdbrowse tool
#[derive(Clone)]
pub struct Tool {
    options: BrowseOptions,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tool")
            .field("options", &self.options)
            .field("transport", &self.transport.name())
            .finish()
    }
}

impl Default for Tool {
    fn default() -> Self {
        ToolBuilder::new().build()
    }
}

impl Tool {
    /// Create a new tool builder
    pub fn builder() -> ToolBuilder {
        ToolBuilder::new()
    }

    /// Get tool description
    pub fn description(&self) -> &'static str {
        TOOL_DESCRIPTION
    }

    /// Get full documentation (llmtxt)
    pub fn llmtxt(&self) -> &'static str {
        TOOL_LLMTXT
    }

    /// Options this tool was built with
    pub fn options(&self) -> &BrowseOptions {
        &self.options
    }

    /// Get input schema as JSON
    pub fn input_schema(&self) -> serde_json::Value {
        let schema = schema_for!(BrowseRequest);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Get output schema as JSON
    pub fn output_schema(&self) -> serde_json::Value {
        let schema = schema_for!(PageContent);
        serde_json::to_value(schema).unwrap_or_default()
    }

    /// Execute the tool with the given request
    pub async fn execute(&self, req: BrowseRequest) -> Result<PageContent, BrowseError> {
        fetch_with_transport(&req, &self.options, self.transport.as_ref()).await
    }

    /// Execute the tool, turning any failure into an error document
    pub async fn browse(&self, req: BrowseRequest) -> PageContent {
        match self.execute(req).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "Browse failed");
                PageContent::from_error(&e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ResponseEnvelope, ACCEPT_HTML, ACCEPT_MARKDOWN};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use url::Url;

    /// Transport returning a canned response and recording Accept headers
    struct StubTransport {
        content_type: &'static str,
        body: &'static str,
        final_url: &'static str,
        accepts: Mutex<Vec<String>>,
    }

    impl StubTransport {
        fn new(content_type: &'static str, body: &'static str) -> Self {
            Self {
                content_type,
                body,
                final_url: "https://stub.test/docs/page",
                accepts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for StubTransport {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, _url: &Url, accept: &str) -> Result<ResponseEnvelope, BrowseError> {
            self.accepts.lock().unwrap().push(accept.to_string());
            Ok(ResponseEnvelope::new(
                self.content_type,
                self.body,
                self.final_url,
            ))
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl Transport for FailingTransport {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _url: &Url, _accept: &str) -> Result<ResponseEnvelope, BrowseError> {
            Err(BrowseError::Timeout)
        }
    }

    #[test]
    fn test_tool_builder() {
        let tool = Tool::builder()
            .user_agent("TestAgent/1.0")
            .timeout(Duration::from_secs(3))
            .allow_prefix("https://allowed.com")
            .block_prefix("https://blocked.com")
            .build();

        assert_eq!(tool.options().user_agent.as_deref(), Some("TestAgent/1.0"));
        assert_eq!(tool.options().timeout, Some(Duration::from_secs(3)));
        assert_eq!(tool.options().allow_prefixes, vec!["https://allowed.com"]);
        assert_eq!(tool.options().block_prefixes, vec!["https://blocked.com"]);
        assert!(format!("{:?}", tool).contains("\"http\""));
    }

    #[test]
    fn test_tool_description() {
        let tool = Tool::default();
        assert!(!tool.description().is_empty());
        assert!(tool.llmtxt().contains("sendAcceptMd"));
    }

    #[test]
    fn test_tool_schemas() {
        let tool = Tool::default();
        let input_schema = tool.input_schema();
        let output_schema = tool.output_schema();

        assert!(input_schema["properties"]["url"].is_object());
        assert!(input_schema["properties"]["sendAcceptMd"].is_object());
        assert!(input_schema["properties"]["autoConvert"].is_object());

        assert!(output_schema["properties"]["markdown"].is_object());
        assert!(output_schema["properties"]["rawHtml"].is_object());
        assert!(output_schema["properties"]["wasMarkdown"].is_object());
    }

    #[tokio::test]
    async fn test_execute_with_stub_transport() {
        let stub = Arc::new(StubTransport::new(
            "text/html",
            "<html><head><title>Stub</title></head><body><p><a href=\"../up.html\">up</a></p></body></html>",
        ));
        let tool = Tool::builder().transport(stub.clone()).build();

        let page = tool
            .execute(BrowseRequest::new("https://stub.test/start"))
            .await
            .unwrap();

        assert_eq!(page.title, "Stub");
        assert_eq!(page.url, "https://stub.test/docs/page");
        assert!(page.markdown.contains("[up](../up.html)"));
        assert_eq!(stub.accepts.lock().unwrap().as_slice(), [ACCEPT_MARKDOWN]);
    }

    #[tokio::test]
    async fn test_execute_without_accept_md() {
        let stub = Arc::new(StubTransport::new("text/markdown", "# Doc"));
        let tool = Tool::builder().transport(stub.clone()).build();

        let page = tool
            .execute(BrowseRequest::new("https://stub.test/").without_accept_md())
            .await
            .unwrap();

        assert!(page.was_markdown);
        assert_eq!(page.title, "Doc");
        assert_eq!(stub.accepts.lock().unwrap().as_slice(), [ACCEPT_HTML]);
    }

    #[tokio::test]
    async fn test_validation_happens_before_transport() {
        let stub = Arc::new(StubTransport::new("text/html", "<p>x</p>"));
        let tool = Tool::builder()
            .transport(stub.clone())
            .block_prefix("https://stub.test/private")
            .build();

        let result = tool
            .execute(BrowseRequest::new("https://stub.test/private/a"))
            .await;
        assert!(matches!(result, Err(BrowseError::InvalidUrl(_))));
        assert!(stub.accepts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_browse_returns_error_document() {
        let tool = Tool::builder().transport(Arc::new(FailingTransport)).build();
        let page = tool.browse(BrowseRequest::new("https://stub.test/")).await;

        assert_eq!(page.error.as_deref(), Some("Request timed out"));
        assert_eq!(page.title, "Error");
        assert_eq!(page.url, "");
        assert_eq!(page.raw_html, "");
        assert!(!page.was_markdown);
        assert_eq!(
            page.markdown,
            "# Error Loading Page\n\nFailed to load the URL.\n\n**Error:** Request timed out"
        );
    }

    #[tokio::test]
    async fn test_browse_missing_url() {
        let page = Tool::default().browse(BrowseRequest::new("")).await;
        assert_eq!(page.error.as_deref(), Some("URL is required"));
    }
}
