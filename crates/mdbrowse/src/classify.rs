//! Document classification
//!
//! Decides how a decoded response body is normalized. Sitemaps are checked
//! first, then native Markdown; anything else is treated as HTML.

/// Namespace every sitemaps.org document declares
pub const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap";

/// Kind of document received from upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    /// sitemaps.org `<urlset>` or `<sitemapindex>`
    Sitemap,
    /// Markdown served as such (or as plain text)
    NativeMarkdown,
    /// Everything else
    Html,
}

/// Classify a response by its Content-Type and decoded body
pub fn classify(content_type: &str, text: &str) -> DocumentKind {
    let ct_lower = content_type.to_lowercase();
    if is_sitemap(&ct_lower, text) {
        DocumentKind::Sitemap
    } else if is_markdown(&ct_lower, text) {
        DocumentKind::NativeMarkdown
    } else {
        DocumentKind::Html
    }
}

fn is_sitemap(ct_lower: &str, text: &str) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    let looks_like_xml = ct_lower.contains("xml")
        || trimmed.starts_with("<?xml")
        || trimmed.starts_with("<urlset")
        || trimmed.starts_with("<sitemapindex");

    looks_like_xml && trimmed.contains(SITEMAP_NAMESPACE)
}

fn is_markdown(ct_lower: &str, text: &str) -> bool {
    if ct_lower.contains("text/markdown") || ct_lower.contains("text/x-markdown") {
        return true;
    }

    // Plain text servers sometimes deliver HTML
    let trimmed = text.trim();
    ct_lower.contains("text/plain") && !trimmed.starts_with("<!") && !trimmed.starts_with("<html")
}
