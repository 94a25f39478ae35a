use insta::assert_snapshot;
use study_agent_core::tutor::{build_prompt, CompletionMode};

#[test]
fn test_standard_prompt_snapshot() {
    assert_snapshot!(build_prompt(CompletionMode::Standard, "explain gravity"), @r#"
    You are an expert tutor for Class 8-10 students. User Query: "explain gravity"
    Rules:
    1. Keep it concise. Use only the HTML tags <b>, <i> and <code>.
    2. ALWAYS return your output as a valid JSON object.
    3. Format: {"text": "your educational response", "options": ["Follow up 1", "Follow up 2"]}
    "#);
}

#[test]
fn test_inline_summary_prompt_snapshot() {
    assert_snapshot!(build_prompt(CompletionMode::InlineSummary, "photosynthesis"), @r#"
    Give a concise 1-paragraph summary. User Query: "photosynthesis"
    Rules:
    1. Keep it concise. Use only the HTML tags <b>, <i> and <code>.
    2. ALWAYS return your output as a valid JSON object.
    3. Format: {"text": "your educational response", "options": ["Follow up 1", "Follow up 2"]}
    "#);
}
