//! mdbrowse - fetch web resources as canonical Markdown
//!
//! This crate fetches a URL and normalizes whatever comes back into a single
//! Markdown document shape ([`PageContent`]). Native Markdown is passed
//! through untouched, sitemaps become link listings, and HTML goes through
//! content extraction, conversion and cleanup.
//!
//! ## Pipeline
//!
//! ```text
//! Transport ─▶ decode ─▶ classify ─┬─▶ sitemap listing
//!                                  ├─▶ Markdown passthrough
//!                                  └─▶ extract ─▶ convert ─▶ normalize
//! ```
//!
//! [`render_page`] is the display-side counterpart: it strips frontmatter,
//! resolves relative references and renders the result to HTML.
//!
//! The fetch seam is the [`Transport`] trait. [`HttpTransport`] is the
//! reqwest-backed default; tests inject their own through [`ToolBuilder`].

pub mod charset;
pub mod classify;
pub mod client;
mod convert;
mod error;
pub mod extract;
pub mod frontmatter;
mod normalize;
pub mod pipeline;
pub mod render;
pub mod resolve;
pub mod sitemap;
pub mod title;
mod tool;
pub mod transport;
mod types;

pub use classify::{classify, DocumentKind};
pub use client::{browse, fetch, fetch_with_options, BrowseOptions};
pub use convert::{convert_html, html_to_markdown};
pub use error::BrowseError;
pub use frontmatter::{parse_frontmatter, Frontmatter, FrontmatterValue, ParsedMarkdown};
pub use normalize::normalize_markdown;
pub use pipeline::normalize_response;
pub use render::render_page;
pub use resolve::resolve_references;
pub use sitemap::{render_sitemap, SitemapEntry};
pub use tool::{Tool, ToolBuilder};
pub use transport::{HttpTransport, Transport};
pub use types::{BrowseRequest, PageContent, ResponseEnvelope, ACCEPT_HTML, ACCEPT_MARKDOWN};

/// Default User-Agent string
pub const DEFAULT_USER_AGENT: &str = "MDBrowser/1.0 (Web Markdown Browser)";

/// Tool description for LLM consumption
pub const TOOL_DESCRIPTION: &str = r#"Fetches a URL and returns it as clean Markdown.

- Asks servers for Markdown first and passes it through unchanged
- Converts HTML pages to Markdown, keeping only the main content
- Renders XML sitemaps as link listings
- Failures come back as an error document, never an exception"#;

/// Extended documentation for LLM consumption (llmtxt)
pub const TOOL_LLMTXT: &str = r#"# mdbrowse Tool

Fetches a URL and normalizes the response into one Markdown document.

## Capabilities
- Markdown content negotiation via the Accept header
- Native Markdown passthrough (text/markdown, text/x-markdown, text/plain)
- HTML main-content extraction and conversion to Markdown
- XML sitemap and sitemap index listings
- Charset decoding from the Content-Type header

## Input Parameters
- `url` (required): The URL to fetch (must be http:// or https://)
- `sendAcceptMd` (optional): Advertise Markdown to the server (default: true)
- `autoConvert` (optional): Convert HTML to Markdown (default: true)

## Output Fields
- `url`: Final URL after redirects
- `markdown`: The document as Markdown (raw HTML when autoConvert is false)
- `rawHtml`: Decoded HTML source, empty for Markdown and sitemaps
- `title`: Document title, never empty
- `wasMarkdown`: True when no HTML conversion was needed
- `error`: Error message when the fetch failed

## Examples

### Fetch a page as Markdown
```json
{"url": "https://example.com/docs"}
```

### Keep HTML as-is
```json
{"url": "https://example.com", "autoConvert": false}
```

### Do not ask for Markdown
```json
{"url": "https://example.com", "sendAcceptMd": false}
```

## Error Handling
- Missing or non-http(s) URLs return an error document
- Connection failures and timeouts return an error document
- HTTP error statuses are not errors; the returned page is normalized
"#;
