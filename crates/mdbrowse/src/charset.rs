//! Response body decoding
//!
//! The declared `charset=` parameter of the Content-Type header selects the
//! decoder. Missing or unknown labels fall back to UTF-8; decoding never fails.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, warn};

/// Charset assumed when the Content-Type does not declare one
pub const DEFAULT_CHARSET: &str = "utf-8";

static CHARSET_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)charset=([^;]+)").unwrap());

/// Extract the charset label from a Content-Type value
///
/// Quotes are stripped and the label is lowercased. Returns
/// [`DEFAULT_CHARSET`] when no parameter is present.
pub fn charset_label(content_type: &str) -> String {
    CHARSET_PARAM
        .captures(content_type)
        .and_then(|caps| caps.get(1))
        .map(|m| {
            m.as_str()
                .trim()
                .trim_matches(|c| c == '"' || c == '\'')
                .trim()
                .to_lowercase()
        })
        .filter(|label| !label.is_empty())
        .unwrap_or_else(|| DEFAULT_CHARSET.to_string())
}

/// Decode a response body using the charset declared in `content_type`
pub fn decode_body(body: &[u8], content_type: &str) -> String {
    let label = charset_label(content_type);

    let Some(encoding) = Encoding::for_label(label.as_bytes()) else {
        warn!(charset = %label, "Unsupported charset, decoding as UTF-8");
        return decode_utf8(body);
    };

    let (decoded, used, had_errors) = encoding.decode(body);
    if had_errors && used != UTF_8 {
        debug!(charset = used.name(), "Malformed input for charset, decoding as UTF-8");
        return decode_utf8(body);
    }

    decoded.into_owned()
}

fn decode_utf8(body: &[u8]) -> String {
    let (decoded, _, _) = UTF_8.decode(body);
    decoded.into_owned()
}
