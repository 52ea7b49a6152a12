//! Markdown to HTML rendering for display
//!
//! Frontmatter is stripped and references resolved before the Markdown is
//! handed to pulldown-cmark. In-page anchors are then pinned to the source
//! document so they keep working when the fragment is shown elsewhere.

use pulldown_cmark::{html, Options, Parser};
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::frontmatter::parse_frontmatter;
use crate::resolve::resolve_references;

static FRAGMENT_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r##"href="#([^"]*)""##).unwrap());

/// Parser options: GFM tables, strikethrough and task lists
///
/// Soft line breaks stay soft.
pub fn parser_options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render Markdown to HTML without any pre- or post-processing
pub fn markdown_to_html(markdown: &str) -> String {
    let parser = Parser::new_ext(markdown, parser_options());
    let mut output = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut output, parser);
    output
}

/// Point `href="#frag"` at `{base_url without fragment}#frag`
pub fn pin_fragment_links(html: &str, base_url: &str) -> String {
    let base = base_url.split('#').next().unwrap_or_default();
    if base.is_empty() {
        return html.to_string();
    }

    FRAGMENT_HREF
        .replace_all(html, |caps: &Captures| format!(r#"href="{}#{}""#, base, &caps[1]))
        .into_owned()
}

/// Render a fetched Markdown document for display
pub fn render_page(markdown: &str, base_url: &str) -> String {
    let parsed = parse_frontmatter(markdown);
    let resolved = resolve_references(&parsed.content, base_url);
    let html = markdown_to_html(&resolved);
    pin_fragment_links(&html, base_url)
}
