//! LLM provider configuration from TOML (`[llm]` section)

use crate::gemini::{DEFAULT_BASE_URL, GeminiSettings};
use quiz_domain::Model;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Gemini API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLlmConfig {
    /// Model name (a leading `models/` is accepted)
    pub model: String,
    /// Environment variable name for the API key (default: "GEMINI_API_KEY").
    pub api_key_env: String,
    /// Direct API key (not recommended, use the env var instead).
    pub api_key: Option<String>,
    /// Base URL for the Gemini REST API.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for FileLlmConfig {
    fn default() -> Self {
        Self {
            model: Model::default().to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 120,
        }
    }
}

impl FileLlmConfig {
    pub fn parse_model(&self) -> Model {
        // FromStr for Model is infallible
        self.model.parse().unwrap_or_default()
    }

    /// API key from `api_key`, else from the variable named by `api_key_env`
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .filter(|k| !k.trim().is_empty())
    }

    /// Gateway settings, or `None` when no API key is available
    pub fn to_gemini_settings(&self) -> Option<GeminiSettings> {
        self.resolve_api_key().map(|key| {
            GeminiSettings::new(key)
                .with_base_url(self.base_url.clone())
                .with_timeout(Duration::from_secs(self.timeout_secs))
        })
    }
}
