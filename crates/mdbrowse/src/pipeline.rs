//! Content normalization pipeline
//!
//! decode → classify → (sitemap | Markdown passthrough | HTML extract,
//! convert, clean up). Every branch produces a document; nothing here fails.

use tracing::debug;

use crate::charset::decode_body;
use crate::classify::{classify, DocumentKind};
use crate::convert::convert_html;
use crate::extract::extract_content;
use crate::sitemap::render_sitemap;
use crate::title::{fallback_title, html_title, markdown_title};
use crate::types::{PageContent, ResponseEnvelope};

/// Normalize a fetched response into a [`PageContent`]
///
/// With `auto_convert` off, HTML is returned as-is in `markdown`; the title
/// is still extracted.
pub fn normalize_response(envelope: &ResponseEnvelope, auto_convert: bool) -> PageContent {
    let text = decode_body(&envelope.body, &envelope.content_type);
    normalize_text(&envelope.content_type, text, &envelope.final_url, auto_convert)
}

/// Normalize an already decoded body
pub fn normalize_text(
    content_type: &str,
    text: String,
    final_url: &str,
    auto_convert: bool,
) -> PageContent {
    let kind = classify(content_type, &text);
    debug!(?kind, content_type, url = final_url, "Classified document");

    match kind {
        DocumentKind::Sitemap => {
            let sitemap = render_sitemap(&text, final_url);
            PageContent {
                url: final_url.to_string(),
                markdown: sitemap.markdown,
                raw_html: String::new(),
                title: sitemap.title,
                was_markdown: true,
                error: None,
            }
        }
        DocumentKind::NativeMarkdown => {
            let title = markdown_title(&text).unwrap_or_else(|| fallback_title(final_url));
            PageContent {
                url: final_url.to_string(),
                markdown: text,
                raw_html: String::new(),
                title,
                was_markdown: true,
                error: None,
            }
        }
        DocumentKind::Html => {
            let title = html_title(&text).unwrap_or_else(|| fallback_title(final_url));
            let markdown = if auto_convert {
                convert_html(&extract_content(&text))
            } else {
                text.clone()
            };
            PageContent {
                url: final_url.to_string(),
                markdown,
                raw_html: text,
                title,
                was_markdown: false,
                error: None,
            }
        }
    }
}
