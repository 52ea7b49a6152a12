//! HTML to Markdown conversion
//!
//! Structural translation is delegated to `htmd`. One converter is built per
//! thread on first use and never reconfigured afterwards.

use htmd::options::{BulletListMarker, CodeBlockStyle, HeadingStyle, Options};
use htmd::HtmlToMarkdown;
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::normalize::normalize_markdown;

/// Elements whose contents never reach the Markdown output
const SKIP_TAGS: &[&str] = &["script", "style", "noscript", "iframe", "svg"];

static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

thread_local! {
    static CONVERTER: HtmlToMarkdown = build_converter();
}

fn build_converter() -> HtmlToMarkdown {
    HtmlToMarkdown::builder()
        .options(Options {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            bullet_list_marker: BulletListMarker::Dash,
            ..Default::default()
        })
        .skip_tags(SKIP_TAGS.to_vec())
        .build()
}

/// Convert an HTML fragment to Markdown without post-processing
///
/// A converter failure degrades to the fragment's text with tags removed.
pub fn html_to_markdown(html: &str) -> String {
    CONVERTER.with(|converter| match converter.convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            warn!(error = %e, "HTML conversion failed, falling back to stripped text");
            ANY_TAG.replace_all(html, "").into_owned()
        }
    })
}

/// Convert an HTML fragment to normalized Markdown
pub fn convert_html(html: &str) -> String {
    let raw = html_to_markdown(html);
    debug!(html_len = html.len(), markdown_len = raw.len(), "Converted HTML fragment");
    normalize_markdown(&raw)
}
