//! Telegram transport settings.

use config::ConfigError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_agent_core::config::TutorSettings;

/// Public Bot API endpoint.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
/// Path the webhook is served on and registered with.
pub const DEFAULT_WEBHOOK_PATH: &str = "/api/bot";
/// Socket address the HTTP server binds to.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";

/// Telegram transport settings loaded from environment variables.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TelegramSettings {
    /// Telegram Bot API token.
    pub telegram_token: Option<String>,
    /// Bot username used to detect mentions in groups, with or without `@`.
    pub bot_username: Option<String>,
    /// Bot API base URL.
    #[serde(default = "default_telegram_api_url")]
    pub telegram_api_url: String,
    /// HTTP path of the webhook endpoint.
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,
    /// Address the webhook server listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,
}

fn default_telegram_api_url() -> String {
    DEFAULT_TELEGRAM_API_URL.to_string()
}

fn default_webhook_path() -> String {
    DEFAULT_WEBHOOK_PATH.to_string()
}

fn default_listen_addr() -> String {
    DEFAULT_LISTEN_ADDR.to_string()
}

impl Default for TelegramSettings {
    fn default() -> Self {
        Self {
            telegram_token: None,
            bot_username: None,
            telegram_api_url: default_telegram_api_url(),
            webhook_path: default_webhook_path(),
            listen_addr: default_listen_addr(),
        }
    }
}

impl TelegramSettings {
    /// Create new settings by loading from environment and files.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        study_agent_core::config::build_config()?.try_deserialize()
    }

    /// Bot token if present and non-blank.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.telegram_token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
    }

    /// Mention tag as it appears in group messages, e.g. `@studybot`.
    #[must_use]
    pub fn mention_tag(&self) -> Option<String> {
        self.bot_username
            .as_deref()
            .map(|name| name.trim().trim_start_matches('@'))
            .filter(|name| !name.is_empty())
            .map(|name| format!("@{name}"))
    }
}

/// Combined settings used by the Telegram transport layer.
#[derive(Clone)]
pub struct BotSettings {
    /// Tutor settings shared across transport handlers.
    pub tutor: Arc<TutorSettings>,
    /// Telegram-specific settings.
    pub telegram: Arc<TelegramSettings>,
}

impl BotSettings {
    /// Create a new combined settings bundle.
    #[must_use]
    pub fn new(tutor: TutorSettings, telegram: TelegramSettings) -> Self {
        Self {
            tutor: Arc::new(tutor),
            telegram: Arc::new(telegram),
        }
    }

    /// Names of required keys that are absent.
    #[must_use]
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.telegram.token().is_none() {
            missing.push("TELEGRAM_TOKEN");
        }
        if self.tutor.api_key().is_none() {
            missing.push("GEMINI_API_KEY");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mention_tag_normalization() {
        let mut settings = TelegramSettings::default();
        assert_eq!(settings.mention_tag(), None);

        settings.bot_username = Some("studybot".to_string());
        assert_eq!(settings.mention_tag().as_deref(), Some("@studybot"));

        // Leading @ and whitespace
        settings.bot_username = Some(" @studybot ".to_string());
        assert_eq!(settings.mention_tag().as_deref(), Some("@studybot"));

        settings.bot_username = Some("@".to_string());
        assert_eq!(settings.mention_tag(), None);
    }

    #[test]
    fn test_missing_keys() {
        let settings = BotSettings::new(TutorSettings::default(), TelegramSettings::default());
        assert_eq!(settings.missing_keys(), vec!["TELEGRAM_TOKEN", "GEMINI_API_KEY"]);

        let settings = BotSettings::new(
            TutorSettings {
                gemini_api_key: Some("key".to_string()),
                ..TutorSettings::default()
            },
            TelegramSettings {
                telegram_token: Some("123:abc".to_string()),
                ..TelegramSettings::default()
            },
        );
        assert!(settings.missing_keys().is_empty());
    }

    #[test]
    fn test_defaults() {
        let settings = TelegramSettings::default();
        assert_eq!(settings.telegram_api_url, "https://api.telegram.org");
        assert_eq!(settings.webhook_path, "/api/bot");
        assert_eq!(settings.listen_addr, "0.0.0.0:8080");
    }
}
