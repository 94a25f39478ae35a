//! Prompt templates for the tutor adapter.

/// Which flavour of answer the model is asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionMode {
    /// Chat reply from the tutor persona
    Standard,
    /// One-paragraph summary for an inline result card
    InlineSummary,
}

impl CompletionMode {
    /// Instruction placed in front of the user query
    #[must_use]
    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Standard => "You are an expert tutor for Class 8-10 students.",
            Self::InlineSummary => "Give a concise 1-paragraph summary.",
        }
    }
}

const OUTPUT_CONTRACT: &str = r#"Rules:
1. Keep it concise. Use only the HTML tags <b>, <i> and <code>.
2. ALWAYS return your output as a valid JSON object.
3. Format: {"text": "your educational response", "options": ["Follow up 1", "Follow up 2"]}"#;

/// Build the single-turn prompt for `query` in the given mode.
///
/// The query is embedded literally between double quotes.
#[must_use]
pub fn build_prompt(mode: CompletionMode, query: &str) -> String {
    format!(
        "{} User Query: \"{query}\"\n{OUTPUT_CONTRACT}",
        mode.instruction()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn modes_differ_only_in_instruction() {
        let standard = build_prompt(CompletionMode::Standard, "gravity");
        let inline = build_prompt(CompletionMode::InlineSummary, "gravity");

        assert!(standard.starts_with(CompletionMode::Standard.instruction()));
        assert!(inline.starts_with(CompletionMode::InlineSummary.instruction()));

        let standard_tail = standard.trim_start_matches(CompletionMode::Standard.instruction());
        let inline_tail = inline.trim_start_matches(CompletionMode::InlineSummary.instruction());
        assert_eq!(standard_tail, inline_tail);
    }

    #[test]
    fn query_is_embedded_verbatim() {
        let prompt = build_prompt(CompletionMode::Standard, "what is 2 < 3?");
        assert!(prompt.contains("User Query: \"what is 2 < 3?\""));
    }
}
