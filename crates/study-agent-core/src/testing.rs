//! Testing helpers and mock utilities.
//!
//! Provides convenient constructors for mocked LLM providers.

use crate::llm::{LlmError, MockLlmProvider};

/// Create a mock LLM provider that returns `response_text` for every prompt.
///
/// # Example
///
/// ```rust,ignore
/// use study_agent_core::testing::mock_llm_reply;
///
/// let mock = mock_llm_reply(r#"{"text": "Hello", "options": []}"#);
/// ```
#[must_use]
pub fn mock_llm_reply(response_text: &'static str) -> MockLlmProvider {
    let mut mock = MockLlmProvider::new();
    mock.expect_generate_content()
        .returning(move |_, _| Ok(response_text.to_string()));
    mock
}

/// Create a mock LLM provider whose every call fails with `LlmError::ApiError`.
#[must_use]
pub fn mock_llm_failure(message: &'static str) -> MockLlmProvider {
    let mut mock = MockLlmProvider::new();
    mock.expect_generate_content()
        .returning(move |_, _| Err(LlmError::ApiError(message.to_string())));
    mock
}
