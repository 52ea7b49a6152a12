//! Sitemap rendering
//!
//! Turns a sitemaps.org `<urlset>` or `<sitemapindex>` document into a
//! Markdown link listing. Extraction is regex based and tolerant: blocks
//! without a `<loc>` are skipped and unknown markup is ignored.

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static URL_BLOCK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?is)<url\b.*?</url>").unwrap());

static SITEMAP_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<sitemap\b.*?</sitemap>").unwrap());

static LOC: LazyLock<Regex> = LazyLock::new(|| tag_pattern("loc"));
static LASTMOD: LazyLock<Regex> = LazyLock::new(|| tag_pattern("lastmod"));
static CHANGEFREQ: LazyLock<Regex> = LazyLock::new(|| tag_pattern("changefreq"));
static PRIORITY: LazyLock<Regex> = LazyLock::new(|| tag_pattern("priority"));

fn tag_pattern(tag: &str) -> Regex {
    Regex::new(&format!(r"(?is)<{tag}[^>]*>(.*?)</{tag}>")).unwrap()
}

/// One `<url>` or `<sitemap>` entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SitemapEntry {
    pub location: String,
    pub last_modified: Option<String>,
    pub change_frequency: Option<String>,
    pub priority: Option<String>,
}

impl SitemapEntry {
    /// Metadata suffix fields in display order
    fn metadata(&self) -> Vec<String> {
        let mut meta = Vec::new();
        if let Some(ref lastmod) = self.last_modified {
            meta.push(format!("lastmod: {}", lastmod));
        }
        if let Some(ref changefreq) = self.change_frequency {
            meta.push(format!("changefreq: {}", changefreq));
        }
        if let Some(ref priority) = self.priority {
            meta.push(format!("priority: {}", priority));
        }
        meta
    }

    fn to_markdown_line(&self) -> String {
        let meta = self.metadata();
        if meta.is_empty() {
            format!("- [{0}]({0})", self.location)
        } else {
            format!("- [{0}]({0}) — {1}", self.location, meta.join(" · "))
        }
    }
}

/// Entries found in a sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SitemapListing {
    /// `<urlset>`: page entries
    Urls {
        /// Number of `<url>` blocks, including ones without `<loc>`
        blocks: usize,
        entries: Vec<SitemapEntry>,
    },
    /// `<sitemapindex>`: child sitemap entries (location and lastmod only)
    Index {
        /// Number of `<sitemap>` blocks, including ones without `<loc>`
        blocks: usize,
        entries: Vec<SitemapEntry>,
    },
    /// Neither block kind present
    Empty,
}

/// Rendered sitemap document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedSitemap {
    pub title: String,
    pub markdown: String,
}

/// Read the trimmed text of the first `<tag>…</tag>` in a block
///
/// Empty values count as absent.
fn tag_value(pattern: &Regex, block: &str) -> Option<String> {
    pattern
        .captures(block)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_xml_entities(m.as_str().trim()))
        .filter(|value| !value.is_empty())
}

fn decode_xml_entities(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }
    value
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

/// Extract entries from sitemap XML
///
/// `<url>` blocks take precedence; `<sitemap>` blocks are only read when the
/// document has no `<url>` block.
pub fn parse_sitemap(xml: &str) -> SitemapListing {
    let url_blocks: Vec<&str> = URL_BLOCK.find_iter(xml).map(|m| m.as_str()).collect();
    if !url_blocks.is_empty() {
        let entries = url_blocks
            .iter()
            .filter_map(|block| {
                Some(SitemapEntry {
                    location: tag_value(&LOC, block)?,
                    last_modified: tag_value(&LASTMOD, block),
                    change_frequency: tag_value(&CHANGEFREQ, block),
                    priority: tag_value(&PRIORITY, block),
                })
            })
            .collect();
        return SitemapListing::Urls {
            blocks: url_blocks.len(),
            entries,
        };
    }

    let sitemap_blocks: Vec<&str> = SITEMAP_BLOCK.find_iter(xml).map(|m| m.as_str()).collect();
    if !sitemap_blocks.is_empty() {
        let entries = sitemap_blocks
            .iter()
            .filter_map(|block| {
                Some(SitemapEntry {
                    location: tag_value(&LOC, block)?,
                    last_modified: tag_value(&LASTMOD, block),
                    ..Default::default()
                })
            })
            .collect();
        return SitemapListing::Index {
            blocks: sitemap_blocks.len(),
            entries,
        };
    }

    SitemapListing::Empty
}

/// Title for a sitemap fetched from `base_url`
pub fn sitemap_title(base_url: &str) -> String {
    let hostname = Url::parse(base_url)
        .ok()
        .and_then(|url| url.host_str().map(str::to_string))
        .unwrap_or_default();

    if hostname.is_empty() {
        "Sitemap".to_string()
    } else {
        format!("Sitemap - {}", hostname)
    }
}

/// Render sitemap XML as a Markdown listing
pub fn render_sitemap(xml: &str, base_url: &str) -> RenderedSitemap {
    let title = sitemap_title(base_url);
    let mut lines = vec![format!("# {}", title)];

    match parse_sitemap(xml) {
        SitemapListing::Urls { blocks, entries } => {
            lines.push(format!("\nFound {} URLs:\n", blocks));
            lines.extend(entries.iter().map(SitemapEntry::to_markdown_line));
        }
        SitemapListing::Index { blocks, entries } => {
            lines.push(format!("\nFound {} sitemaps:\n", blocks));
            lines.extend(entries.iter().map(SitemapEntry::to_markdown_line));
        }
        SitemapListing::Empty => {
            lines.push("\n_No sitemap entries found._\n".to_string());
        }
    }

    RenderedSitemap {
        title,
        markdown: lines.join("\n"),
    }
}
