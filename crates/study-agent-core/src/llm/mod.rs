//! LLM providers and HTTP helpers
//!
//! The tutor talks to a single text-generation endpoint through [`LlmProvider`].

pub(crate) mod http_utils;
/// Implementations of specific LLM providers
pub mod providers;

use thiserror::Error;

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    /// Error returned by the provider's API
    #[error("API error: {0}")]
    ApiError(String),
    /// Error during network communication
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Error during JSON serialization or deserialization
    #[error("JSON error: {0}")]
    JsonError(String),
    /// Missing provider configuration or API key
    #[error("Missing client/API key: {0}")]
    MissingConfig(String),
}

/// Interface for text-generation providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion for a single-turn prompt and return the raw model text
    async fn generate_content(&self, prompt: &str, model_id: &str) -> Result<String, LlmError>;
}
