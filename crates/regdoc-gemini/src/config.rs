//! Gemini configuration

use regdoc_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Configuration for the Gemini client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl GeminiConfig {
    /// Create configuration from environment variables
    ///
    /// Fails with [`Error::MissingCredential`] when `GOOGLE_API_KEY` is unset
    /// or blank, and with [`Error::Configuration`] when another setting is
    /// invalid. Unset settings fall back to defaults.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                Error::MissingCredential("GOOGLE_API_KEY environment variable not found".to_string())
            })?;

        let mut config = Self::new(api_key);

        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(api_url) = env::var("GEMINI_API_URL") {
            config.api_url = api_url;
        }
        if let Ok(temperature) = env::var("GEMINI_TEMPERATURE") {
            config.temperature = temperature.parse().map_err(|_| {
                Error::Configuration(format!("GEMINI_TEMPERATURE is not a number: {}", temperature))
            })?;
        }
        if let Ok(timeout) = env::var("GEMINI_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                Error::Configuration(format!("GEMINI_TIMEOUT_SECS is not an integer: {}", timeout))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Create configuration with explicit values
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            temperature: 0.1,
            timeout_secs: 60,
        }
    }

    /// Set the model to use for generation
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different API host
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Check that the settings can produce a working client
    pub fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(Error::MissingCredential("Google API key is empty".to_string()));
        }
        if self.model.trim().is_empty() {
            return Err(Error::Configuration("Gemini model name is empty".to_string()));
        }
        Url::parse(&self.api_url).map_err(|e| {
            Error::Configuration(format!("Invalid Gemini API URL {}: {}", self.api_url, e))
        })?;
        Ok(())
    }

    /// Full URL of the `generateContent` endpoint for the configured model
    pub fn generate_content_url(&self) -> Result<Url> {
        // Without a trailing slash `join` would replace the last path segment
        let mut api_url = self.api_url.clone();
        if !api_url.ends_with('/') {
            api_url.push('/');
        }
        let base = Url::parse(&api_url).map_err(|e| {
            Error::Configuration(format!("Invalid Gemini API URL {}: {}", self.api_url, e))
        })?;
        base.join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| Error::Configuration(format!("Invalid Gemini model name {}: {}", self.model, e)))
    }
}
