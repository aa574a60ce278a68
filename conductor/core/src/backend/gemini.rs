//! Gemini Backend Implementation
//!
//! Analysis and image generation through the Generative Language REST API.
//!
//! # Gemini API
//!
//! Both features use one endpoint:
//! - `POST /v1beta/models/{model}:generateContent`
//!
//! The key travels in the `x-goog-api-key` header. Analysis asks for a JSON
//! response constrained by a schema; image generation scans the returned
//! parts for inline image data.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::prompts;
use super::traits::{AnalysisProvider, ImageProvider};
use crate::config::ConductorConfig;
use crate::error::ProviderError;
use crate::poem::{Analysis, GeneratedImage, Poem};

/// Gemini backend client
#[derive(Clone)]
pub struct GeminiBackend {
    /// Service base URL (no trailing slash)
    base_url: String,
    /// Access key; `None` disables every request
    api_key: Option<String>,
    /// Model for structured analysis
    analysis_model: String,
    /// Model for image generation
    image_model: String,
    /// Opening lines used in the image prompt
    image_prompt_lines: usize,
    /// HTTP client
    http_client: reqwest::Client,
}

/// generateContent request body
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

/// generateContent response body (only the fields we read)
#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default)]
    #[allow(dead_code)]
    mime_type: Option<String>,
    data: String,
}

impl GenerateResponse {
    /// Parts of the first candidate
    fn parts(&self) -> &[ResponsePart] {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map_or(&[][..], |c| c.parts.as_slice())
    }

    /// Concatenated text of the first candidate
    fn text(&self) -> String {
        self.parts()
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect()
    }

    /// First inline image payload of the first candidate
    fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts().iter().find_map(|p| p.inline_data.as_ref())
    }
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let defaults = ConductorConfig::default();
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            analysis_model: defaults.analysis_model,
            image_model: defaults.image_model,
            image_prompt_lines: defaults.image_prompt_lines,
            http_client: reqwest::Client::new(),
        }
    }

    /// Create from `ConductorConfig`
    #[must_use]
    pub fn from_config(config: &ConductorConfig) -> Self {
        Self {
            analysis_model: config.analysis_model.clone(),
            image_model: config.image_model.clone(),
            image_prompt_lines: config.image_prompt_lines,
            ..Self::new(config.gemini_base_url.clone(), config.api_key.clone())
        }
    }

    /// Whether a credential is configured
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Get generateContent endpoint URL for a model
    fn generate_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{model}:generateContent", self.base_url)
    }

    /// Send one generateContent call and decode the envelope
    async fn generate(
        &self,
        model: &str,
        request: &GenerateRequest,
    ) -> Result<GenerateResponse, ProviderError> {
        let Some(api_key) = self.api_key.as_deref() else {
            tracing::warn!("API key not found; AI features are disabled");
            return Err(ProviderError::Credential);
        };

        let response = self
            .http_client
            .post(self.generate_url(model))
            .header("x-goog-api-key", api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Provider(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Provider(format!(
                "Gemini returned {status}: {body}"
            )));
        }

        response
            .json::<GenerateResponse>()
            .await
            .map_err(|e| ProviderError::Format(format!("unreadable Gemini response: {e}")))
    }
}

/// Decode the analysis JSON the model returned as text
fn parse_analysis(text: &str) -> Result<Analysis, ProviderError> {
    if text.trim().is_empty() {
        return Err(ProviderError::Format("No analysis generated".to_string()));
    }
    serde_json::from_str(text)
        .map_err(|e| ProviderError::Format(format!("analysis is not the expected shape: {e}")))
}

#[async_trait]
impl AnalysisProvider for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn analyze(&self, poem: &Poem) -> Result<Analysis, ProviderError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompts::analysis_prompt(poem),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: prompts::analysis_schema(),
            }),
        };

        let response = self.generate(&self.analysis_model, &request).await?;
        parse_analysis(&response.text())
    }
}

#[async_trait]
impl ImageProvider for GeminiBackend {
    fn name(&self) -> &'static str {
        "Gemini"
    }

    async fn generate_image(&self, poem: &Poem) -> Result<GeneratedImage, ProviderError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: prompts::image_prompt(poem, self.image_prompt_lines),
                }],
            }],
            generation_config: None,
        };

        let response = self.generate(&self.image_model, &request).await?;
        response
            .first_inline_data()
            .map(|inline| GeneratedImage::png(inline.data.clone()))
            .ok_or(ProviderError::NoImage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_url() {
        let backend = GeminiBackend::new("https://example.com/", Some("k".into()));
        assert_eq!(
            backend.generate_url("gemini-2.5-flash"),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_from_config() {
        let config = ConductorConfig::default().with_api_key("abc");
        let backend = GeminiBackend::from_config(&config);
        assert!(backend.has_credential());
        assert_eq!(backend.image_model, "gemini-2.5-flash-image");
        assert_eq!(backend.image_prompt_lines, 5);

        let backend = GeminiBackend::new("https://example.com", Some(String::new()));
        assert!(!backend.has_credential());
    }

    #[test]
    fn test_request_serializes_camel_case() {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: "hi".into(),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".into(),
                response_schema: prompts::analysis_schema(),
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(
            json["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_response_text_concatenates_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [ { "text": "{\"mood\":" }, { "text": "\"x\"}" } ] }
            }]
        }))
        .unwrap();
        assert_eq!(response.text(), "{\"mood\":\"x\"}");
    }

    #[test]
    fn test_first_inline_data_skips_text_parts() {
        let response: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "Here is your picture" },
                    { "inlineData": { "mimeType": "image/png", "data": "AAAA" } },
                    { "inlineData": { "mimeType": "image/png", "data": "BBBB" } }
                ] }
            }]
        }))
        .unwrap();
        assert_eq!(response.first_inline_data().unwrap().data, "AAAA");
    }

    #[test]
    fn test_empty_response_has_no_parts() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(response.parts().is_empty());
        assert!(response.first_inline_data().is_none());
    }

    #[test]
    fn test_parse_analysis() {
        let analysis = parse_analysis(
            r#"{"mood":"quiet","summary":"Fog arrives.","themes":["nature","silence"]}"#,
        )
        .unwrap();
        assert_eq!(analysis.mood, "quiet");
        assert_eq!(analysis.themes.len(), 2);

        assert!(matches!(parse_analysis("  "), Err(ProviderError::Format(_))));
        assert!(matches!(
            parse_analysis("not json"),
            Err(ProviderError::Format(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        // Unroutable base URL: any network attempt would be a Provider error
        let backend = GeminiBackend::new("http://127.0.0.1:9", None);
        let poem = Poem::new("T", "A", vec!["line".into()]);

        assert_eq!(
            backend.analyze(&poem).await.unwrap_err(),
            ProviderError::Credential
        );
        assert_eq!(
            backend.generate_image(&poem).await.unwrap_err(),
            ProviderError::Credential
        );
    }
}
