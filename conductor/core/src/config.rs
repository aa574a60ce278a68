//! Conductor Configuration
//!
//! Endpoints, model names and the AI credential. Everything except the
//! credential has a fixed default; the credential comes from the `API_KEY`
//! environment variable.

use crate::error::ConfigError;

/// Environment variable holding the generative AI access key
pub const API_KEY_ENV: &str = "API_KEY";

/// Default poem-lookup service
pub const DEFAULT_POETRY_BASE_URL: &str = "https://poetrydb.org";

/// Default generative AI service
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Conductor configuration
#[derive(Clone)]
pub struct ConductorConfig {
    /// Base URL of the poem-lookup service
    pub poetry_base_url: String,
    /// Base URL of the generative AI service
    pub gemini_base_url: String,
    /// Model used for structured analysis
    pub analysis_model: String,
    /// Model used for image generation
    pub image_model: String,
    /// How many opening lines go into the image prompt
    pub image_prompt_lines: usize,
    /// Access key for the AI service
    pub api_key: Option<String>,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            poetry_base_url: DEFAULT_POETRY_BASE_URL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            analysis_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.5-flash-image".to_string(),
            image_prompt_lines: 5,
            api_key: None,
        }
    }
}

// Keeps the key out of debug logs.
impl std::fmt::Debug for ConductorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConductorConfig")
            .field("poetry_base_url", &self.poetry_base_url)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("analysis_model", &self.analysis_model)
            .field("image_model", &self.image_model)
            .field("image_prompt_lines", &self.image_prompt_lines)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl ConductorConfig {
    /// Create configuration from the environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            api_key: normalize_key(std::env::var(API_KEY_ENV).ok()),
            ..Default::default()
        }
    }

    /// Set the API key (empty strings count as absent)
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = normalize_key(Some(key.into()));
        self
    }

    /// Point the poem source somewhere else
    #[must_use]
    pub fn with_poetry_base_url(mut self, url: impl Into<String>) -> Self {
        self.poetry_base_url = url.into();
        self
    }

    /// Point the AI backend somewhere else
    #[must_use]
    pub fn with_gemini_base_url(mut self, url: impl Into<String>) -> Self {
        self.gemini_base_url = url.into();
        self
    }

    /// Whether AI features can work at all
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Check that the values are usable
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_url("poetry_base_url", &self.poetry_base_url)?;
        check_url("gemini_base_url", &self.gemini_base_url)?;

        if self.analysis_model.trim().is_empty() || self.image_model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "model names must not be empty".to_string(),
            ));
        }
        if self.image_prompt_lines == 0 {
            return Err(ConfigError::ValidationError(
                "image_prompt_lines must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn normalize_key(key: Option<String>) -> Option<String> {
    key.map(|k| k.trim().to_string()).filter(|k| !k.is_empty())
}

fn check_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    match reqwest::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(ConfigError::InvalidUrl {
            field,
            value: value.to_string(),
        }),
    }
}
