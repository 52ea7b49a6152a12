//! Markdown output cleanup
//!
//! Post-processes converter output: line endings, stray escapes, spacing
//! around headings and lists, blank-line runs. Fenced code blocks pass
//! through untouched. The transform is idempotent.

/// Characters whose backslash escape is meaningless away from the start of a line
const MIDLINE_ESCAPES: &[char] = &['-', '+', '.', '=', '#', '>'];

/// Clean up converter output
pub fn normalize_markdown(markdown: &str) -> String {
    let text = markdown.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = Vec::new();
    let mut fence: Option<Fence> = None;
    for line in text.split('\n') {
        if let Some(open) = fence {
            if open.is_closed_by(line) {
                fence = None;
            }
            lines.push(line.to_string());
            continue;
        }
        if let Some(open) = Fence::open(line) {
            fence = Some(open);
            lines.push(line.to_string());
            continue;
        }
        if line.trim().is_empty() {
            lines.push(String::new());
        } else {
            lines.push(unescape_line(line));
        }
    }

    let spaced = tidy_block_spacing(&lines).join("\n");
    filter_excessive_newlines(&spaced).trim().to_string()
}

/// Keep at most 2 consecutive newlines
pub fn filter_excessive_newlines(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut newline_count = 0;

    for c in s.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                result.push(c);
            }
        } else {
            newline_count = 0;
            result.push(c);
        }
    }

    result
}

/// Opening fence of a fenced code block
#[derive(Debug, Clone, Copy)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    fn open(line: &str) -> Option<Self> {
        let trimmed = strip_indent(line)?;
        let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Fence { marker, len })
    }

    fn is_closed_by(&self, line: &str) -> bool {
        let Some(trimmed) = strip_indent(line) else {
            return false;
        };
        let run = trimmed.chars().take_while(|c| *c == self.marker).count();
        run >= self.len && trimmed[run * self.marker.len_utf8()..].trim().is_empty()
    }
}

/// Strip up to three spaces of indentation; deeper lines are code
fn strip_indent(line: &str) -> Option<&str> {
    let indent = line.len() - line.trim_start_matches(' ').len();
    (indent <= 3).then(|| &line[indent..])
}

/// Byte offset where a line's inline content starts, past indentation,
/// blockquote markers and list markers
fn content_start(line: &str) -> usize {
    let bytes = line.as_bytes();
    let mut pos = 0;
    loop {
        while pos < bytes.len() && (bytes[pos] == b' ' || bytes[pos] == b'\t') {
            pos += 1;
        }
        let rest = &line[pos..];
        if rest.starts_with('>') {
            pos += 1;
        } else if let Some(len) = list_marker_len(rest) {
            pos += len;
        } else {
            return pos;
        }
    }
}

/// Length of a leading list marker including its trailing space
fn list_marker_len(text: &str) -> Option<usize> {
    if text.starts_with("- ") || text.starts_with("* ") || text.starts_with("+ ") {
        return Some(2);
    }
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let rest = &text[digits..];
    (rest.starts_with(". ") || rest.starts_with(") ")).then_some(digits + 2)
}

fn is_list_item(line: &str) -> bool {
    list_marker_len(line.trim_start()).is_some()
}

fn is_heading(line: &str) -> bool {
    let Some(trimmed) = strip_indent(line) else {
        return false;
    };
    let hashes = trimmed.chars().take_while(|c| *c == '#').count();
    (1..=6).contains(&hashes)
        && trimmed[hashes..]
            .chars()
            .next()
            .map_or(true, |c| c == ' ' || c == '\t')
}

/// Drop backslash escapes that carry no meaning, outside inline code
fn unescape_line(line: &str) -> String {
    let start = content_start(line);
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut out = String::with_capacity(line.len());
    let mut code_run: Option<usize> = None;
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        if c == '`' {
            let run = chars[i..].iter().take_while(|(_, ch)| *ch == '`').count();
            code_run = match code_run {
                None => Some(run),
                Some(open) if open == run => None,
                other => other,
            };
            for _ in 0..run {
                out.push('`');
            }
            i += run;
            continue;
        }

        if c == '\\' && code_run.is_none() {
            if let Some(&(_, next)) = chars.get(i + 1) {
                if next == '\\' {
                    out.push_str("\\\\");
                    i += 2;
                    continue;
                }
                if is_redundant_escape(line, &chars, i, next, offset, start) {
                    out.push(next);
                    i += 2;
                    continue;
                }
            }
        }

        out.push(c);
        i += 1;
    }

    out
}

fn is_redundant_escape(
    line: &str,
    chars: &[(usize, char)],
    i: usize,
    next: char,
    offset: usize,
    start: usize,
) -> bool {
    if next == '_' {
        let before = i.checked_sub(1).map(|j| chars[j].1);
        let after = chars.get(i + 2).map(|(_, ch)| *ch);
        return before.is_some_and(char::is_alphanumeric) && after.is_some_and(char::is_alphanumeric);
    }

    if !MIDLINE_ESCAPES.contains(&next) || offset <= start {
        return false;
    }

    // "1\." would become an ordered list marker
    if next == '.' {
        let lead = &line[start..offset];
        if !lead.is_empty() && lead.bytes().all(|b| b.is_ascii_digit()) {
            return false;
        }
    }

    true
}

/// Tighten lists and give headings exactly one blank line on each side
fn tidy_block_spacing(lines: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(lines.len());
    let mut fence: Option<Fence> = None;
    let mut blank_after_heading = false;

    for (i, line) in lines.iter().enumerate() {
        if let Some(open) = fence {
            if open.is_closed_by(line) {
                fence = None;
            }
            out.push(line.clone());
            continue;
        }

        if line.is_empty() {
            let prev = out.iter().rev().find(|l| !l.is_empty());
            let next = lines[i + 1..].iter().find(|l| !l.is_empty());
            let between_items = prev.is_some_and(|l| is_list_item(l))
                && next.is_some_and(|l| is_list_item(l));
            if !between_items {
                out.push(String::new());
            }
            blank_after_heading = false;
            continue;
        }

        if blank_after_heading {
            out.push(String::new());
            blank_after_heading = false;
        }

        if let Some(open) = Fence::open(line) {
            fence = Some(open);
            out.push(line.clone());
            continue;
        }

        if is_heading(line) {
            if out.last().is_some_and(|l| !l.is_empty()) {
                out.push(String::new());
            }
            blank_after_heading = true;
        }

        out.push(line.clone());
    }

    out
}
