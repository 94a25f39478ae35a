//! View layer for bot UI components
//!
//! Contains static texts, keyboards, and the inline result card layout.

use study_agent_core::tutor::AiReply;
use study_agent_core::utils::{plain_preview, sanitize_html, truncate_with_ellipsis};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

// ─────────────────────────────────────────────────────────────────────────────
// Texts
// ─────────────────────────────────────────────────────────────────────────────

/// Topics offered under the welcome message
pub const WELCOME_TOPICS: [&str; 2] = ["Quick Quiz 🧠", "Math Help 📐"];

/// Reply to a bare mention in a group
pub const GREETING_TEXT: &str = "Yes? How can I help you? 🤓";

/// Shown when the completion request fails
pub const APOLOGY_TEXT: &str =
    "⚠️ <b>System Alert</b>\nMy brain had a small hiccup. Please try again in a moment.";

/// Option attached to [`APOLOGY_TEXT`]
pub const APOLOGY_OPTIONS: [&str; 1] = ["Main Menu 🏠"];

/// Longest AI text sent as-is; Telegram caps messages at 4096 characters
pub const MAX_REPLY_CHARS: usize = 4000;

/// Length of the plain-text description on inline result cards
pub const INLINE_PREVIEW_CHARS: usize = 100;

/// Welcome message for `/start`.
///
/// The sharing hint is only shown when the bot knows its own username.
#[must_use]
pub fn welcome_text(mention: Option<&str>) -> String {
    let mut text = String::from("🧬 <b>Study Agent v3 Active</b>\n\nAsk me anything! In groups, tag me.");
    if let Some(tag) = mention {
        text.push_str(&format!(
            " To share answers, type <code>{}</code> in any chat.",
            html_escape::encode_text(tag)
        ));
    }
    text
}

/// AI text prepared for HTML parse mode: capped in length, stray brackets escaped
#[must_use]
pub fn reply_body(text: &str) -> String {
    sanitize_html(&truncate_with_ellipsis(text, MAX_REPLY_CHARS))
}

// ─────────────────────────────────────────────────────────────────────────────
// Keyboards
// ─────────────────────────────────────────────────────────────────────────────

/// Group option labels into rows of at most two
#[must_use]
pub fn keyboard_rows(options: &[String]) -> Vec<Vec<String>> {
    options.chunks(2).map(<[String]>::to_vec).collect()
}

/// Inline keyboard whose buttons send their own label as callback data
#[must_use]
pub fn options_keyboard(options: &[String]) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(keyboard_rows(options).into_iter().map(|row| {
        row.into_iter()
            .map(|label| InlineKeyboardButton::callback(label.clone(), label))
            .collect::<Vec<_>>()
    }))
}

/// Owned labels from a static list
#[must_use]
pub fn labels(options: &[&str]) -> Vec<String> {
    options.iter().map(ToString::to_string).collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline results
// ─────────────────────────────────────────────────────────────────────────────

/// Content of the single article answered to an inline query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineArticle {
    /// Card title
    pub title: String,
    /// Plain-text description under the title
    pub summary: String,
    /// HTML message posted when the card is picked
    pub body: String,
}

/// Lay out the inline result card for `query`
#[must_use]
pub fn inline_article(query: &str, reply: &AiReply) -> InlineArticle {
    InlineArticle {
        title: format!("AI Explanation: {query}"),
        summary: plain_preview(&reply.text, INLINE_PREVIEW_CHARS),
        body: format!(
            "<b>Topic:</b> {}\n\n{}",
            html_escape::encode_text(query),
            reply_body(&reply.text)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyboard_rows_pairs_options() {
        let rows = keyboard_rows(&labels(&["A", "B", "C"]));
        assert_eq!(rows, vec![vec!["A", "B"], vec!["C"]]);

        assert!(keyboard_rows(&[]).is_empty());
        assert_eq!(keyboard_rows(&labels(&["A", "B", "C", "D"])).len(), 2);
    }

    #[test]
    fn test_options_keyboard_uses_label_as_payload() {
        let keyboard = options_keyboard(&labels(&WELCOME_TOPICS));
        assert_eq!(keyboard.inline_keyboard.len(), 1);

        let value = serde_json::to_value(&keyboard).unwrap_or_default();
        assert_eq!(value["inline_keyboard"][0][0]["text"], "Quick Quiz 🧠");
        assert_eq!(value["inline_keyboard"][0][0]["callback_data"], "Quick Quiz 🧠");
        assert_eq!(value["inline_keyboard"][0][1]["callback_data"], "Math Help 📐");
    }

    #[test]
    fn test_welcome_text_share_hint() {
        let with_tag = welcome_text(Some("@studybot"));
        assert!(with_tag.starts_with("🧬 <b>Study Agent v3 Active</b>"));
        assert!(with_tag.contains("<code>@studybot</code>"));

        assert!(!welcome_text(None).contains("<code>"));
    }

    #[test]
    fn test_reply_body_truncates_and_escapes() {
        let long = "x".repeat(MAX_REPLY_CHARS + 50);
        let body = reply_body(&long);
        assert_eq!(body.chars().count(), MAX_REPLY_CHARS);
        assert!(body.ends_with('…'));

        assert_eq!(reply_body("1 < 2 is <b>true</b>"), "1 &lt; 2 is <b>true</b>");
    }

    #[test]
    fn test_reply_body_closes_formatting_cut_by_length_cap() {
        let long = format!("<b>Summary</b> <i>{}</i>", "x".repeat(MAX_REPLY_CHARS + 1000));
        let body = reply_body(&long);

        assert!(body.ends_with("…</i>"));
        assert_eq!(body.matches("<i>").count(), body.matches("</i>").count());
        assert_eq!(body.matches("<b>").count(), body.matches("</b>").count());
    }

    #[test]
    fn test_inline_article_layout() {
        let reply = AiReply {
            text: "<b>Tides</b> are caused by the Moon.".to_string(),
            options: Vec::new(),
        };
        let article = inline_article("tides & moon", &reply);

        assert_eq!(article.title, "AI Explanation: tides & moon");
        assert_eq!(article.summary, "Tides are caused by the Moon.");
        assert_eq!(
            article.body,
            "<b>Topic:</b> tides &amp; moon\n\n<b>Tides</b> are caused by the Moon."
        );
    }
}
