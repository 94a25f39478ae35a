//! Utility functions for text processing and HTML cleaning.
//!
//! Telegram rejects messages whose HTML does not parse, so model output goes
//! through [`sanitize_html`] before it is sent.

// lazy_regex! stores patterns in once_cell statics
#![allow(clippy::non_std_lazy_statics)]

use lazy_regex::lazy_regex;

/// Match any HTML tag: <...>
static RE_HTML_TAG: lazy_regex::Lazy<regex::Regex> = lazy_regex!(r"<[^>]*>");

/// Marker appended to text cut by [`truncate_with_ellipsis`]
pub const ELLIPSIS: &str = "…";

/// Replace naked angle brackets with HTML entities, preserving Telegram-allowed HTML tags.
///
/// Allowed tags left open (e.g. by truncation) are closed at the end, and
/// closers without a matching opener are escaped.
fn escape_angle_brackets(text: &str) -> String {
    // Whitelist of HTML tags supported by Telegram
    const TELEGRAM_ALLOWED_TAGS: &[&str] = &["b", "i", "u", "s", "code", "pre", "a"];

    let mut result = String::with_capacity(text.len());
    let mut open_tags: Vec<String> = Vec::new();
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '<' => {
                let slash = if chars.next_if_eq(&'/').is_some() { "/" } else { "" };
                let mut name = String::new();
                while let Some(next_char) = chars.next_if(char::is_ascii_alphanumeric) {
                    name.push(next_char);
                }

                // A tag name must end at whitespace or '>', otherwise "<bold" would pass as "<b"
                let terminated = matches!(chars.peek(), Some(&'>') | Some(&' '));
                if !terminated || !TELEGRAM_ALLOWED_TAGS.contains(&name.as_str()) {
                    result.push_str("&lt;");
                    result.push_str(slash);
                    result.push_str(&name);
                    continue;
                }

                let mut attrs = String::new();
                let mut complete = false;
                for next_char in chars.by_ref() {
                    if next_char == '>' {
                        complete = true;
                        break;
                    }
                    attrs.push(next_char);
                }

                if !complete {
                    result.push_str("&lt;");
                    result.push_str(slash);
                    result.push_str(&name);
                    result.push_str(&html_escape::encode_text(&attrs));
                } else if slash.is_empty() {
                    result.push('<');
                    result.push_str(&name);
                    result.push_str(&attrs);
                    result.push('>');
                    open_tags.push(name);
                } else if let Some(pos) = open_tags.iter().rposition(|tag| *tag == name) {
                    // Inner tags are closed first so nesting stays valid
                    for tag in open_tags.drain(pos..).rev() {
                        result.push_str(&format!("</{tag}>"));
                    }
                } else {
                    result.push_str(&format!("&lt;/{name}{}&gt;", html_escape::encode_text(&attrs)));
                }
            }
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    for tag in open_tags.iter().rev() {
        result.push_str(&format!("</{tag}>"));
    }
    result
}

/// Make model output safe for Telegram's HTML parse mode.
///
/// # Examples
///
/// ```
/// use study_agent_core::utils::sanitize_html;
/// let input = "Check this: 1 < 2 but <b>bold</b> works";
/// assert_eq!(sanitize_html(input), "Check this: 1 &lt; 2 but <b>bold</b> works");
/// ```
#[must_use]
pub fn sanitize_html(text: &str) -> String {
    escape_angle_brackets(text)
}

/// Remove HTML tags and decode entities, leaving plain text.
#[must_use]
pub fn strip_html_tags(text: &str) -> String {
    let without_tags = RE_HTML_TAG.replace_all(text, "");
    html_escape::decode_html_entities(&without_tags).into_owned()
}

/// Plain-text preview: tags removed, then cut to `max_chars` characters.
#[must_use]
pub fn plain_preview(text: &str, max_chars: usize) -> String {
    truncate_str(strip_html_tags(text), max_chars)
}

/// Truncates a string to a maximum number of characters (not bytes).
#[must_use]
pub fn truncate_str(s: impl AsRef<str>, max_chars: usize) -> String {
    let s = s.as_ref();
    s.char_indices()
        .nth(max_chars)
        .map_or_else(|| s.to_string(), |(pos, _)| s[..pos].to_string())
}

/// Truncates to `max_chars` characters including the trailing [`ELLIPSIS`].
#[must_use]
pub fn truncate_with_ellipsis(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let mut cut = truncate_str(s, max_chars.saturating_sub(1));
    cut.push_str(ELLIPSIS);
    cut
}
