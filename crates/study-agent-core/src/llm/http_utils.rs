//! HTTP utilities for LLM providers
//!
//! Request/response handling shared by provider implementations.

use crate::config::get_llm_http_timeout_secs;
use crate::llm::LlmError;
use crate::utils::truncate_str;
use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;

/// Longest provider error body echoed into an `LlmError`.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Creates an HTTP client configured with the standard LLM timeout.
///
/// Uses `LLM_HTTP_TIMEOUT_SECS` environment variable or the 60s default.
#[must_use]
pub fn create_http_client() -> HttpClient {
    let timeout = Duration::from_secs(get_llm_http_timeout_secs());
    HttpClient::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|_| HttpClient::new())
}

/// Sends an HTTP POST request with JSON body and returns parsed JSON response.
///
/// Request URLs may carry the API key as a query parameter, so it is stripped
/// from transport errors before they are wrapped.
///
/// # Errors
///
/// Returns `LlmError::NetworkError` on connectivity issues, `LlmError::ApiError` on non-success status codes,
/// or `LlmError::JsonError` if parsing fails.
pub async fn send_json_request(
    client: &HttpClient,
    url: &str,
    body: &Value,
) -> Result<Value, LlmError> {
    let response = client
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| LlmError::NetworkError(e.without_url().to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let error_text = response.text().await.unwrap_or_default();

        // Proxies in front of the API answer with HTML pages
        let trimmed = error_text.trim_start();
        let is_html = trimmed.starts_with("<!DOCTYPE")
            || trimmed.starts_with("<html")
            || trimmed.starts_with("<HTML");

        let clean_message = if is_html {
            format!("{status} (Server returned HTML error page)")
        } else if error_text.chars().count() > MAX_ERROR_BODY_CHARS {
            format!(
                "{status} - {}... (truncated)",
                truncate_str(&error_text, MAX_ERROR_BODY_CHARS)
            )
        } else {
            format!("{status} - {error_text}")
        };

        return Err(LlmError::ApiError(clean_message));
    }

    response
        .json()
        .await
        .map_err(|e| LlmError::JsonError(e.without_url().to_string()))
}

/// Extracts text content from a JSON response by navigating a path.
///
/// Numeric segments index into arrays, all others are object keys.
///
/// ```ignore
/// let text = extract_text_content(&response, &["candidates", "0", "content", "parts", "0", "text"])?;
/// ```
///
/// # Errors
///
/// Returns `LlmError::ApiError` if the path is invalid or the target is not a string.
pub fn extract_text_content(response: &Value, path: &[&str]) -> Result<String, LlmError> {
    let mut current = response;

    for segment in path {
        current = match segment.parse::<usize>() {
            Ok(index) => current.get(index).ok_or_else(|| {
                LlmError::ApiError(format!("Invalid path: missing index {index}"))
            })?,
            Err(_) => current.get(*segment).ok_or_else(|| {
                LlmError::ApiError(format!("Invalid path: missing key {segment}"))
            })?,
        };
    }

    current
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| LlmError::ApiError(format!("Expected string at path, got: {current}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const GEMINI_TEXT_PATH: &[&str] = &["candidates", "0", "content", "parts", "0", "text"];

    #[test]
    fn test_extract_text_content_follows_path() {
        let response = json!({
            "candidates": [{"content": {"parts": [{"text": "hello"}]}}]
        });
        let text = extract_text_content(&response, GEMINI_TEXT_PATH);
        assert!(matches!(text, Ok(ref t) if t == "hello"));
    }

    #[test]
    fn test_extract_text_content_reports_missing_candidates() {
        let response = json!({"candidates": []});
        let err = extract_text_content(&response, GEMINI_TEXT_PATH);
        assert!(matches!(err, Err(LlmError::ApiError(ref m)) if m.contains("missing index 0")));
    }

    #[test]
    fn test_extract_text_content_rejects_non_string() {
        let response = json!({"candidates": [{"content": {"parts": [{"text": 42}]}}]});
        assert!(matches!(
            extract_text_content(&response, GEMINI_TEXT_PATH),
            Err(LlmError::ApiError(_))
        ));
    }
}
