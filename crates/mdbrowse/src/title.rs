//! Document title extraction

use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static HTML_TITLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<title[^>]*>([^<]+)</title>").unwrap());

static MARKDOWN_H1: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^#\s+(.+)$").unwrap());

/// Title from the first `<title>` element
pub fn html_title(html: &str) -> Option<String> {
    HTML_TITLE
        .captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| decode_entities(m.as_str()).trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Title from the first level-one ATX heading
pub fn markdown_title(markdown: &str) -> Option<String> {
    MARKDOWN_H1
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|title| !title.is_empty())
}

/// Title used when the document carries none: the hostname, else the URL
pub fn fallback_title(url: &str) -> String {
    match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_string)) {
        Some(host) if !host.is_empty() => host,
        _ if !url.is_empty() => url.to_string(),
        _ => "Untitled".to_string(),
    }
}

/// Decode the handful of entities that routinely appear in titles
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut output = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        output.push_str(&rest[..start]);
        let candidate = &rest[start..];
        let decoded = candidate
            .find(';')
            .filter(|&end| end <= 10)
            .and_then(|end| decode_entity(&candidate[1..end]).map(|ch| (ch, end)));
        match decoded {
            Some((ch, end)) => {
                output.push(ch);
                rest = &candidate[end + 1..];
            }
            None => {
                output.push('&');
                rest = &candidate[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        "mdash" => Some('—'),
        "ndash" => Some('–'),
        _ => {
            let num = entity.strip_prefix('#')?;
            let code = match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => num.parse::<u32>().ok()?,
            };
            char::from_u32(code)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_title() {
        assert_eq!(
            html_title("<html><head><title>T</title></head></html>"),
            Some("T".to_string())
        );
        assert_eq!(
            html_title("<TITLE data-x=\"1\">\n  Spaced Title \n</TITLE>"),
            Some("Spaced Title".to_string())
        );
        assert_eq!(html_title("<title></title>"), None);
        assert_eq!(html_title("<p>no title</p>"), None);
    }

    #[test]
    fn test_html_title_entities() {
        assert_eq!(
            html_title("<title>Tom &amp; Jerry &#8211; &#x27;Cartoons&#x27;</title>"),
            Some("Tom & Jerry – 'Cartoons'".to_string())
        );
        assert_eq!(
            html_title("<title>A &unknown; B & C</title>"),
            Some("A &unknown; B & C".to_string())
        );
    }

    #[test]
    fn test_html_title_blank_after_decoding() {
        assert_eq!(html_title("<title>&nbsp;</title>"), None);
        assert_eq!(html_title("<title> &#32; </title>"), None);
        assert_eq!(
            html_title("<title>&nbsp;Padded&nbsp;</title>"),
            Some("Padded".to_string())
        );
        assert_eq!(
            fallback_title("https://example.com/"),
            html_title("<title>&nbsp;</title>")
                .unwrap_or_else(|| fallback_title("https://example.com/"))
        );
    }

    #[test]
    fn test_markdown_title() {
        assert_eq!(markdown_title("# Hello\nworld"), Some("Hello".to_string()));
        assert_eq!(
            markdown_title("intro\n\n## Sub\n# Main Title  \ntext"),
            Some("Main Title".to_string())
        );
        assert_eq!(markdown_title("## Only h2"), None);
        assert_eq!(markdown_title("#hashtag"), None);
    }

    #[test]
    fn test_fallback_title() {
        assert_eq!(fallback_title("https://example.com/a/b"), "example.com");
        assert_eq!(fallback_title("mailto:someone@example.com"), "mailto:someone@example.com");
        assert_eq!(fallback_title(""), "Untitled");
    }
}
