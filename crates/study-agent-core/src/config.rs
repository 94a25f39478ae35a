//! Configuration and settings management
//!
//! Loads settings from optional config files and environment variables and
//! defines the constants shared by the tutor adapter.

use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Default Gemini model used for every completion.
pub const DEFAULT_GEMINI_MODEL: &str = "gemma-3-27b-it";
/// Base URL of the Generative Language API.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Options attached to a reply when the model output is not valid reply JSON.
pub const FALLBACK_OPTIONS: [&str; 2] = ["Help", "Menu"];

/// Default HTTP timeout for LLM requests.
pub const LLM_HTTP_TIMEOUT_SECS: u64 = 60;

/// Get the LLM HTTP timeout from env or default.
///
/// Environment variable: `LLM_HTTP_TIMEOUT_SECS`.
#[must_use]
pub fn get_llm_http_timeout_secs() -> u64 {
    std::env::var("LLM_HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(LLM_HTTP_TIMEOUT_SECS)
}

/// Build the layered configuration shared by every settings struct.
///
/// Sources, lowest priority first: `config/default`, `config/<RUN_MODE>`,
/// `config/local`, `APP__`-prefixed environment, plain environment.
///
/// # Errors
///
/// Returns a `ConfigError` if a present config file cannot be parsed.
pub fn build_config() -> Result<Config, ConfigError> {
    let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

    Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(File::with_name(&format!("config/{run_mode}")).required(false))
        // Not checked into git
        .add_source(File::with_name("config/local").required(false))
        // Eg.. `APP__GEMINI_MODEL=gemini-2.5-flash` sets the `gemini_model` key
        .add_source(Environment::with_prefix("APP").separator("__"))
        // Environment::default() maps UPPER_SNAKE_CASE to snake_case; empty vars count as unset
        .add_source(Environment::default().ignore_empty(true))
        .build()
}

/// Settings for the tutor adapter and its Gemini provider
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct TutorSettings {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Model used for completions
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Base URL of the Generative Language API
    #[serde(default = "default_gemini_api_base")]
    pub gemini_api_base: String,
}

fn default_gemini_model() -> String {
    DEFAULT_GEMINI_MODEL.to_string()
}

fn default_gemini_api_base() -> String {
    DEFAULT_GEMINI_API_BASE.to_string()
}

impl Default for TutorSettings {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            gemini_api_base: default_gemini_api_base(),
        }
    }
}

impl TutorSettings {
    /// Create new settings by loading from environment and files
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use study_agent_core::config::TutorSettings;
    ///
    /// let settings = TutorSettings::new().expect("Failed to load configuration");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if loading fails.
    pub fn new() -> Result<Self, ConfigError> {
        build_config()?.try_deserialize()
    }

    /// Returns the API key if it is present and non-blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.gemini_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    // Single test so the env mutations below never race each other
    #[test]
    fn test_config_env_loading() -> Result<(), Box<dyn std::error::Error>> {
        // 1. Plain environment variables map onto snake_case keys
        env::set_var("GEMINI_API_KEY", "dummy_key");
        env::set_var("GEMINI_MODEL", "gemini-2.5-flash");

        let settings = TutorSettings::new()?;
        assert_eq!(settings.gemini_api_key, Some("dummy_key".to_string()));
        assert_eq!(settings.gemini_model, "gemini-2.5-flash");
        assert_eq!(settings.gemini_api_base, DEFAULT_GEMINI_API_BASE);

        env::remove_var("GEMINI_API_KEY");
        env::remove_var("GEMINI_MODEL");

        // 2. Empty values are treated as unset
        env::set_var("GEMINI_API_KEY", "");

        let settings = TutorSettings::new()?;
        assert_eq!(settings.gemini_api_key, None);
        assert_eq!(settings.gemini_model, DEFAULT_GEMINI_MODEL);

        env::remove_var("GEMINI_API_KEY");
        Ok(())
    }

    #[test]
    fn test_api_key_rejects_blank_values() {
        let mut settings = TutorSettings::default();
        assert_eq!(settings.api_key(), None);

        settings.gemini_api_key = Some("   ".to_string());
        assert_eq!(settings.api_key(), None);

        settings.gemini_api_key = Some(" abc ".to_string());
        assert_eq!(settings.api_key(), Some("abc"));
    }
}
