//! PoetryDB Backend
//!
//! Random poem lookup against PoetryDB.
//!
//! # PoetryDB API
//!
//! - `/random` - a JSON array holding one random poem
//!
//! The array form is used even for a single poem; element zero is taken.

use async_trait::async_trait;

use super::traits::PoemSource;
use crate::config::{ConductorConfig, DEFAULT_POETRY_BASE_URL};
use crate::error::ProviderError;
use crate::poem::Poem;

/// PoetryDB client
#[derive(Clone)]
pub struct PoetryDbSource {
    /// Service base URL (no trailing slash)
    base_url: String,
    /// HTTP client
    http_client: reqwest::Client,
}

impl PoetryDbSource {
    /// Create a new PoetryDB client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from `ConductorConfig`
    #[must_use]
    pub fn from_config(config: &ConductorConfig) -> Self {
        Self::new(config.poetry_base_url.clone())
    }

    /// Get the random endpoint URL
    fn random_url(&self) -> String {
        format!("{}/random", self.base_url)
    }
}

impl Default for PoetryDbSource {
    fn default() -> Self {
        Self::new(DEFAULT_POETRY_BASE_URL)
    }
}

/// Pick element zero of a PoetryDB response body
fn first_poem(body: &str) -> Result<Poem, ProviderError> {
    let poems: Vec<Poem> = serde_json::from_str(body)
        .map_err(|e| ProviderError::Format(format!("Invalid response format from PoetryDB: {e}")))?;

    poems
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Format("PoetryDB returned no poems".to_string()))
}

#[async_trait]
impl PoemSource for PoetryDbSource {
    fn name(&self) -> &'static str {
        "PoetryDB"
    }

    async fn fetch_random_poem(&self) -> Result<Poem, ProviderError> {
        let url = self.random_url();
        tracing::debug!(url = %url, "Fetching random poem");

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(ProviderError::Fetch(format!("PoetryDB returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::Fetch(e.to_string()))?;

        let poem = first_poem(&body)?;
        tracing::debug!(title = %poem.title, author = %poem.author, "Fetched poem");
        Ok(poem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash() {
        let source = PoetryDbSource::new("https://poetrydb.org/");
        assert_eq!(source.random_url(), "https://poetrydb.org/random");
    }

    #[test]
    fn test_first_poem_takes_element_zero() {
        let body = r#"[
            {"title":"A","author":"X","lines":["a"],"linecount":"1"},
            {"title":"B","author":"Y","lines":["b"],"linecount":"1"}
        ]"#;
        assert_eq!(first_poem(body).unwrap().title, "A");
    }

    #[test]
    fn test_first_poem_empty_array() {
        assert!(matches!(first_poem("[]"), Err(ProviderError::Format(_))));
    }

    #[test]
    fn test_first_poem_wrong_shape() {
        // PoetryDB reports lookup failures as an object, not an array
        let body = r#"{"status":404,"reason":"Not found"}"#;
        assert!(matches!(first_poem(body), Err(ProviderError::Format(_))));
        assert!(matches!(first_poem(""), Err(ProviderError::Format(_))));
    }
}
