//! Webhook registration with the Bot API.

use reqwest::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const REGISTRATION_TIMEOUT_SECS: u64 = 30;

/// Failure to register the webhook
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Telegram could not be reached
    #[error("network error: {0}")]
    Network(String),
    /// Telegram answered with something that is not JSON
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    /// Request carried no usable `Host` header
    #[error("missing Host header")]
    MissingHost,
}

/// Calls `setWebhook` with a callback URL derived from the request host
pub struct WebhookRegistrar {
    http_client: HttpClient,
    api_url: String,
    token: String,
    webhook_path: String,
}

impl WebhookRegistrar {
    /// Create a registrar for `token` against `api_url`, announcing `webhook_path`
    #[must_use]
    pub fn new(token: &str, api_url: &str, webhook_path: &str) -> Self {
        let http_client = HttpClient::builder()
            .timeout(Duration::from_secs(REGISTRATION_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| HttpClient::new());
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            webhook_path: webhook_path.to_string(),
        }
    }

    /// Public HTTPS URL Telegram should post updates to
    #[must_use]
    pub fn callback_url(&self, host: &str) -> String {
        format!("https://{host}{}", self.webhook_path)
    }

    /// Register the webhook and return Telegram's JSON answer unchanged.
    ///
    /// # Errors
    ///
    /// Returns `RegistrationError` if the host is empty, Telegram is
    /// unreachable, or its answer is not JSON.
    pub async fn register(&self, host: &str) -> Result<Value, RegistrationError> {
        let host = host.trim();
        if host.is_empty() {
            return Err(RegistrationError::MissingHost);
        }

        let callback = self.callback_url(host);
        info!(url = %callback, "Registering webhook");

        let response = self
            .http_client
            .get(format!("{}/bot{}/setWebhook", self.api_url, self.token))
            .query(&[("url", callback.as_str())])
            .send()
            .await
            .map_err(|e| RegistrationError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| RegistrationError::InvalidResponse(e.without_url().to_string()))?;
        debug!(%status, response = %body, "setWebhook answered");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    const TOKEN: &str = "123456:test-token";

    #[test]
    fn test_callback_url() {
        let registrar = WebhookRegistrar::new(TOKEN, "https://api.telegram.org", "/api/bot");
        assert_eq!(
            registrar.callback_url("study.example.com"),
            "https://study.example.com/api/bot"
        );
    }

    #[tokio::test]
    async fn register_relays_telegram_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", format!("/bot{TOKEN}/setWebhook").as_str())
            .match_query(Matcher::UrlEncoded(
                "url".to_string(),
                "https://study.example.com/api/bot".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":true,"result":true,"description":"Webhook was set"}"#)
            .expect(1)
            .create_async()
            .await;

        let registrar = WebhookRegistrar::new(TOKEN, &server.url(), "/api/bot");
        let result = registrar.register("study.example.com").await;

        mock.assert_async().await;
        match result {
            Ok(body) => assert_eq!(body["description"], "Webhook was set"),
            Err(e) => panic!("registration failed: {e}"),
        }
    }

    #[tokio::test]
    async fn register_relays_error_json_too() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
            .create_async()
            .await;

        let registrar = WebhookRegistrar::new(TOKEN, &server.url(), "/api/bot");
        let result = registrar.register("study.example.com").await;

        assert!(matches!(result, Ok(ref body) if body["ok"] == false));
    }

    #[tokio::test]
    async fn register_rejects_non_json() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", Matcher::Any)
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let registrar = WebhookRegistrar::new(TOKEN, &server.url(), "/api/bot");
        let result = registrar.register("study.example.com").await;

        assert!(matches!(result, Err(RegistrationError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn register_requires_host() {
        let registrar = WebhookRegistrar::new(TOKEN, "http://127.0.0.1:1", "/api/bot");
        assert!(matches!(
            registrar.register("  ").await,
            Err(RegistrationError::MissingHost)
        ));
    }

    #[tokio::test]
    async fn network_error_hides_token() {
        let registrar = WebhookRegistrar::new(TOKEN, "http://127.0.0.1:1", "/api/bot");
        let err = registrar
            .register("study.example.com")
            .await
            .expect_err("nothing listens on port 1");

        assert!(matches!(err, RegistrationError::Network(_)));
        assert!(!err.to_string().contains(TOKEN));
    }
}
