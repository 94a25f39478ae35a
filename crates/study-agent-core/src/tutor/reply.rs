//! Best-effort decoding of model output into an [`AiReply`].

use crate::config::FALLBACK_OPTIONS;
use serde::{Deserialize, Deserializer, Serialize};

/// Reply shown to the user: HTML text plus follow-up button labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiReply {
    /// Message body, may contain `<b>`, `<i>` and `<code>`
    pub text: String,
    /// Follow-up suggestions, each becomes one inline button
    #[serde(default, deserialize_with = "null_as_empty")]
    pub options: Vec<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl AiReply {
    /// Wrap raw model text with the default follow-up pair
    #[must_use]
    pub fn fallback(raw: impl Into<String>) -> Self {
        Self {
            text: raw.into(),
            options: FALLBACK_OPTIONS.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Outcome of decoding model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedReply {
    /// Output was a JSON object with a string `text`
    Structured(AiReply),
    /// Anything else; holds the fence-stripped raw text
    Unstructured(String),
}

impl ParsedReply {
    /// Strip code fences and try to decode the remainder as an [`AiReply`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let stripped = strip_code_fences(raw);
        match serde_json::from_str::<AiReply>(stripped) {
            Ok(reply) => Self::Structured(reply),
            Err(_) => Self::Unstructured(stripped.to_string()),
        }
    }

    /// Whether the output decoded cleanly
    #[must_use]
    pub const fn is_structured(&self) -> bool {
        matches!(self, Self::Structured(_))
    }

    /// Collapse into a reply, applying the fallback options to raw text
    #[must_use]
    pub fn into_reply(self) -> AiReply {
        match self {
            Self::Structured(reply) => reply,
            Self::Unstructured(raw) => AiReply::fallback(raw),
        }
    }
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` marker and a trailing ```` ``` ````.
#[must_use]
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = rest
            .strip_prefix("json")
            .or_else(|| rest.strip_prefix("JSON"))
            .unwrap_or(rest);
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHOTOSYNTHESIS: &str =
        r#"{"text":"Photosynthesis is...","options":["Quiz","Next"]}"#;

    fn expected() -> AiReply {
        AiReply {
            text: "Photosynthesis is...".to_string(),
            options: vec!["Quiz".to_string(), "Next".to_string()],
        }
    }

    #[test]
    fn bare_and_fenced_json_decode_identically() {
        let fenced = format!("```json\n{PHOTOSYNTHESIS}\n```");
        let plain_fence = format!("```\n{PHOTOSYNTHESIS}\n```");

        for raw in [PHOTOSYNTHESIS.to_string(), fenced, plain_fence] {
            assert_eq!(ParsedReply::parse(&raw), ParsedReply::Structured(expected()));
        }
    }

    #[test]
    fn non_json_falls_back_to_trimmed_text() {
        let reply = ParsedReply::parse("  Gravity pulls things down.\n").into_reply();
        assert_eq!(reply, AiReply::fallback("Gravity pulls things down."));
        assert_eq!(reply.options, vec!["Help", "Menu"]);
    }

    #[test]
    fn missing_options_defaults_to_empty() {
        let parsed = ParsedReply::parse(r#"{"text":"Only text"}"#);
        assert!(parsed.is_structured());
        assert!(parsed.into_reply().options.is_empty());
    }

    #[test]
    fn null_options_defaults_to_empty() {
        let parsed = ParsedReply::parse(r#"{"text":"Only text","options":null}"#);
        assert_eq!(
            parsed,
            ParsedReply::Structured(AiReply {
                text: "Only text".to_string(),
                options: Vec::new(),
            })
        );
    }

    #[test]
    fn wrong_shape_is_unstructured() {
        let raw = r#"{"answer": "42"}"#;
        assert_eq!(
            ParsedReply::parse(raw),
            ParsedReply::Unstructured(raw.to_string())
        );
        assert!(!ParsedReply::parse(r#"["a","b"]"#).is_structured());
    }

    #[test]
    fn strip_code_fences_leaves_inner_backticks() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("use `x` here"), "use `x` here");
        assert_eq!(strip_code_fences("```"), "");
    }
}
