//! Tutor adapter
//!
//! Wraps a user query in the instruction template, calls the provider once and
//! normalizes whatever comes back into an [`AiReply`].

mod prompt;
mod reply;

pub use prompt::{build_prompt, CompletionMode};
pub use reply::{strip_code_fences, AiReply, ParsedReply};

use crate::config::TutorSettings;
use crate::llm::providers::GeminiProvider;
use crate::llm::{LlmError, LlmProvider};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, trace, warn};

/// Completion client bound to one provider and one model
pub struct TutorClient {
    provider: Arc<dyn LlmProvider>,
    model_id: String,
}

impl TutorClient {
    /// Create a client backed by Gemini.
    ///
    /// # Errors
    ///
    /// Returns `LlmError::MissingConfig` when no API key is configured.
    pub fn new(settings: &TutorSettings) -> Result<Self, LlmError> {
        let api_key = settings
            .api_key()
            .ok_or_else(|| LlmError::MissingConfig("GEMINI_API_KEY".to_string()))?;

        let provider =
            GeminiProvider::with_api_base(api_key.to_string(), settings.gemini_api_base.clone());

        Ok(Self::with_provider(
            Arc::new(provider),
            settings.gemini_model.clone(),
        ))
    }

    /// Create a client around an arbitrary provider
    #[must_use]
    pub fn with_provider(provider: Arc<dyn LlmProvider>, model_id: impl Into<String>) -> Self {
        Self {
            provider,
            model_id: model_id.into(),
        }
    }

    /// Model every request is sent to
    #[must_use]
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Ask the model about `query` and decode its reply.
    ///
    /// Malformed output is never an error: it becomes the raw text with the
    /// default options.
    ///
    /// # Errors
    ///
    /// Propagates transport failures from the provider without retrying.
    #[instrument(skip(self, query), fields(model = %self.model_id, query_len = query.len()))]
    pub async fn complete(&self, query: &str, mode: CompletionMode) -> Result<AiReply, LlmError> {
        let prompt = build_prompt(mode, query);
        trace!(prompt = %prompt, "Sending prompt");

        let start = Instant::now();
        let raw = self.provider.generate_content(&prompt, &self.model_id).await;
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        let raw = match raw {
            Ok(raw) => raw,
            Err(e) => {
                warn!(duration_ms, error = %e, "Completion request failed");
                return Err(e);
            }
        };
        trace!(raw = %raw, "Raw completion");

        let parsed = ParsedReply::parse(&raw);
        debug!(
            duration_ms,
            structured = parsed.is_structured(),
            "Completion received"
        );
        Ok(parsed.into_reply())
    }
}
