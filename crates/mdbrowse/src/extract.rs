//! HTML content extraction
//!
//! Approximates "readable content" without building a DOM: non-content
//! regions are stripped with independent, non-greedy patterns, then the
//! document is narrowed to the first `<main>`, `<article>` or `<body>`.
//! Unterminated tags never match, so malformed markup is left in place
//! instead of swallowing the rest of the page.

use regex::Regex;
use std::sync::LazyLock;

/// Regions removed before conversion, in removal order
static STRIP_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?is)<head\b.*?</head\s*>",
        r"(?is)<script\b.*?</script\s*>",
        r"(?is)<style\b.*?</style\s*>",
        r"(?is)<noscript\b.*?</noscript\s*>",
        r"(?s)<!--.*?-->",
        r"(?is)<nav\b.*?</nav\s*>",
        r"(?is)<footer\b.*?</footer\s*>",
        r"(?is)<aside\b.*?</aside\s*>",
        r"(?is)<form\b.*?</form\s*>",
        r"(?is)<iframe\b.*?</iframe\s*>",
        r"(?i)<a\b[^>]*>\s*</a\s*>",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Content containers, in priority order
static CONTAINER_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    ["main", "article", "body"]
        .iter()
        .map(|tag| Regex::new(&format!(r"(?is)<{tag}\b[^>]*>(.*?)</{tag}\s*>")).unwrap())
        .collect()
});

/// Remove non-content regions from an HTML document
pub fn strip_non_content(html: &str) -> String {
    let mut cleaned = html.to_string();
    for pattern in STRIP_PATTERNS.iter() {
        if pattern.is_match(&cleaned) {
            cleaned = pattern.replace_all(&cleaned, "").into_owned();
        }
    }
    cleaned
}

/// Narrow a cleaned document to its primary content region
///
/// Returns the inner HTML of the first matching container, or the whole
/// input when none is present.
pub fn select_content(html: &str) -> &str {
    CONTAINER_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(html).and_then(|caps| caps.get(1)))
        .map_or(html, |m| m.as_str())
}

/// Strip non-content markup and select the primary content region
pub fn extract_content(html: &str) -> String {
    let cleaned = strip_non_content(html);
    select_content(&cleaned).to_string()
}
