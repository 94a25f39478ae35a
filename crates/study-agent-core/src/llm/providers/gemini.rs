use crate::config::DEFAULT_GEMINI_API_BASE;
use crate::llm::http_utils::{create_http_client, extract_text_content, send_json_request};
use crate::llm::{LlmError, LlmProvider};
use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde_json::json;

/// LLM provider implementation for Google Gemini
pub struct GeminiProvider {
    http_client: HttpClient,
    api_key: String,
    api_base: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider instance against the public API
    #[must_use]
    pub fn new(api_key: String) -> Self {
        Self::with_api_base(api_key, DEFAULT_GEMINI_API_BASE)
    }

    /// Create a provider against a custom API base (proxies, tests)
    #[must_use]
    pub fn with_api_base(api_key: String, api_base: impl Into<String>) -> Self {
        Self {
            http_client: create_http_client(),
            api_key,
            api_base: api_base.into(),
        }
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!(
            "{}/models/{model_id}:generateContent?key={}",
            self.api_base.trim_end_matches('/'),
            self.api_key
        )
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn generate_content(&self, prompt: &str, model_id: &str) -> Result<String, LlmError> {
        let body = json!({
            "contents": [{
                "parts": [{"text": prompt}]
            }]
        });

        let res_json = send_json_request(&self.http_client, &self.endpoint(model_id), &body).await?;
        extract_text_content(
            &res_json,
            &["candidates", "0", "content", "parts", "0", "text"],
        )
    }
}
