//! Provider configuration
//!
//! The provider block is a flat JSON object. Every field has a default
//! except the API token, which may also come from `AZION_API_TOKEN`.

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API token is missing: set `api_token` or the {} environment variable", ProviderConfig::TOKEN_ENV)]
    MissingToken,

    #[error("Invalid URL for {field}: '{value}'")]
    InvalidUrl { field: &'static str, value: String },

    #[error("Invalid provider configuration: {0}")]
    Parse(String),
}

/// Azion provider configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProviderConfig {
    /// Personal token sent as `Authorization: Token <token>`
    pub api_token: String,
    /// Base URL of the v3 control API
    pub base_url: String,
    /// Base URL of the environment variables API
    pub variables_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Retries after an HTTP 429, on top of the first request
    pub max_retries: u32,
    /// Linear retry step: retry n waits n * retry_delay_ms
    pub retry_delay_ms: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_token: String::new(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            variables_url: Self::DEFAULT_VARIABLES_URL.to_string(),
            timeout_secs: 30,
            max_retries: 5,
            retry_delay_ms: 1000,
        }
    }
}

impl ProviderConfig {
    pub const DEFAULT_BASE_URL: &'static str = "https://api.azionapi.net";
    pub const DEFAULT_VARIABLES_URL: &'static str = "https://api.azion.com/v3";

    pub const TOKEN_ENV: &'static str = "AZION_API_TOKEN";
    pub const BASE_URL_ENV: &'static str = "AZION_API_URL";
    pub const VARIABLES_URL_ENV: &'static str = "AZION_VARIABLES_URL";

    /// Build a configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(token) = lookup(Self::TOKEN_ENV) {
            config.api_token = token;
        }
        if let Some(url) = lookup(Self::BASE_URL_ENV) {
            config.base_url = url;
        }
        if let Some(url) = lookup(Self::VARIABLES_URL_ENV) {
            config.variables_url = url;
        }
        config
    }

    /// Parse a provider block. A missing token falls back to the environment.
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let mut config: Self =
            serde_json::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        if config.api_token.is_empty()
            && let Ok(token) = std::env::var(Self::TOKEN_ENV)
        {
            config.api_token = token;
        }
        Ok(config)
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = token.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_variables_url(mut self, url: impl Into<String>) -> Self {
        self.variables_url = url.into();
        self
    }

    pub fn with_retry(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay_ms = retry_delay.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_token.trim().is_empty() {
            return Err(ConfigError::MissingToken);
        }
        for (field, value) in [
            ("base_url", &self.base_url),
            ("variables_url", &self.variables_url),
        ] {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}
