//! Relative reference resolution
//!
//! Rewrites relative Markdown image and link destinations to absolute URLs
//! using standard URL joining against the document's final URL.

use regex::{Captures, Regex};
use std::sync::LazyLock;
use url::Url;

static IMAGE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

static LINK_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Destinations left untouched in image references
const IMAGE_EXEMPT: &[&str] = &["http://", "https://", "data:"];

/// Destinations left untouched in link references
const LINK_EXEMPT: &[&str] = &["http://", "https://", "data:", "#", "mailto:"];

/// Resolve `reference` against `base`, returning it unchanged on failure
pub fn resolve_url(base: &str, reference: &str) -> String {
    Url::parse(base)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .unwrap_or_else(|_| reference.to_string())
}

/// Rewrite relative image and link destinations in `markdown`
///
/// A `base_url` that does not parse leaves the input unchanged.
pub fn resolve_references(markdown: &str, base_url: &str) -> String {
    let Ok(base) = Url::parse(base_url) else {
        return markdown.to_string();
    };

    let images = IMAGE_REF.replace_all(markdown, |caps: &Captures| {
        rewrite(caps, &base, IMAGE_EXEMPT, "![")
    });

    LINK_REF
        .replace_all(&images, |caps: &Captures| rewrite(caps, &base, LINK_EXEMPT, "["))
        .into_owned()
}

fn rewrite(caps: &Captures, base: &Url, exempt: &[&str], opener: &str) -> String {
    let text = &caps[1];
    let target = caps[2].trim();

    // Only a quoted or parenthesized tail is a title
    let (path, title) = match target.find(char::is_whitespace) {
        Some(split) if target[split..].trim_start().starts_with(['"', '\'', '(']) => {
            target.split_at(split)
        }
        _ => (target, ""),
    };

    if exempt.iter().any(|prefix| path.starts_with(prefix)) {
        return caps[0].to_string();
    }

    match base.join(path) {
        Ok(absolute) => format!("{}{}]({}{})", opener, text, absolute, title),
        Err(_) => caps[0].to_string(),
    }
}
