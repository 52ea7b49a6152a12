//! Frontmatter parsing
//!
//! Reads a leading `---` delimited metadata block using a small YAML-like
//! subset: `key: value` scalars and `key:` followed by `- item` lines.
//! Anything the subset does not understand is skipped, and a block without
//! a closing delimiter is treated as ordinary Markdown.

use serde::Serialize;
use std::collections::BTreeMap;

/// Frontmatter delimiter line
const DELIMITER: &str = "---";

/// A frontmatter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FrontmatterValue {
    Text(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    /// Scalar value, if this is one
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FrontmatterValue::Text(text) => Some(text),
            FrontmatterValue::List(_) => None,
        }
    }

    /// Sequence value, if this is one
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FrontmatterValue::Text(_) => None,
            FrontmatterValue::List(items) => Some(items),
        }
    }
}

/// Parsed frontmatter keys; duplicate keys keep the last value
pub type Frontmatter = BTreeMap<String, FrontmatterValue>;

/// Result of splitting a document into frontmatter and body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMarkdown {
    /// Metadata block, `None` when the document has none
    pub frontmatter: Option<Frontmatter>,
    /// Body after the block (trimmed), or the untouched input
    pub content: String,
}

impl ParsedMarkdown {
    fn passthrough(markdown: &str) -> Self {
        Self {
            frontmatter: None,
            content: markdown.to_string(),
        }
    }
}

/// Split a leading frontmatter block from a Markdown document
pub fn parse_frontmatter(markdown: &str) -> ParsedMarkdown {
    let trimmed = markdown.trim();
    if !trimmed.starts_with(DELIMITER) {
        return ParsedMarkdown::passthrough(markdown);
    }

    let Some(end) = trimmed[DELIMITER.len()..]
        .find("\n---")
        .map(|pos| pos + DELIMITER.len())
    else {
        return ParsedMarkdown::passthrough(markdown);
    };

    let block = trimmed[DELIMITER.len()..end].trim();
    let content = trimmed[end + "\n---".len()..].trim();

    ParsedMarkdown {
        frontmatter: Some(parse_block(block)),
        content: content.to_string(),
    }
}

/// Parse the key/value lines between the delimiters
fn parse_block(block: &str) -> Frontmatter {
    let mut frontmatter = Frontmatter::new();
    let mut pending: Option<(String, Vec<String>)> = None;

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(item) = line.strip_prefix("- ") {
            if let Some((_, items)) = pending.as_mut() {
                items.push(unquote(item.trim()).to_string());
                continue;
            }
        }

        let Some(colon) = line.find(':').filter(|&pos| pos > 0) else {
            continue;
        };
        let key = line[..colon].trim().to_string();
        let value = line[colon + 1..].trim();

        if let Some((array_key, items)) = pending.take() {
            frontmatter.insert(array_key, FrontmatterValue::List(items));
        }

        if value.is_empty() || value == "|" || value == ">" {
            pending = Some((key, Vec::new()));
        } else {
            frontmatter.insert(key, FrontmatterValue::Text(unquote(value).to_string()));
        }
    }

    if let Some((array_key, items)) = pending {
        frontmatter.insert(array_key, FrontmatterValue::List(items));
    }

    frontmatter
}

/// Strip one pair of matching surrounding quotes
fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
