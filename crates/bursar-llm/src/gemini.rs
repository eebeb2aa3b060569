//! Gemini Provider Implementation
//!
//! Integration with the hosted Generative Language API. One HTTP call per
//! `generate` - the analysis pipeline's contract is a single model attempt
//! per document with deterministic degradation, so there is no retry loop
//! in this provider.

use crate::LlmError;
use bursar_domain::traits::LlmProvider as LlmProviderTrait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// Default model
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default sampling temperature (low: structured output)
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Socket timeout for generation requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Generative Language API provider
pub struct GeminiProvider {
    endpoint: String,
    model: String,
    api_key: String,
    temperature: f32,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    parts: Vec<TextPart>,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

impl GeminiProvider {
    /// Create a provider against the default endpoint
    ///
    /// # Parameters
    ///
    /// - `api_key`: Generative Language API key
    /// - `model`: model name (e.g. "gemini-1.5-flash")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap();

        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: model.into(),
            api_key: api_key.into(),
            temperature: DEFAULT_TEMPERATURE,
            client,
        }
    }

    /// Override the API endpoint (for proxies and tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Override the sampling temperature
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Model this provider is configured for
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Generate text for a prompt
    ///
    /// # Errors
    ///
    /// Returns an error when the endpoint is unreachable, the model is
    /// unknown, or the response carries no candidate text. Exactly one HTTP
    /// request is made per call.
    pub async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.endpoint, self.model, self.api_key
        );

        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![TextPart {
                    text: prompt.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
        };

        let response = self
            .client
            .post(&url)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Request failed: {}", e)))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotAvailable(self.model.clone()));
        }

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        body.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| LlmError::InvalidResponse("Response carried no candidate text".to_string()))
    }
}

impl LlmProviderTrait for GeminiProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper for async function; callers run this on a
        // blocking-capable thread.
        tokio::runtime::Runtime::new()
            .unwrap()
            .block_on(async { self.generate(prompt).await })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_creation() {
        let provider = GeminiProvider::new("test-key", DEFAULT_MODEL);
        assert_eq!(provider.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(provider.model(), "gemini-1.5-flash");
        assert_eq!(provider.temperature, DEFAULT_TEMPERATURE);
    }

    #[test]
    fn test_provider_builders() {
        let provider = GeminiProvider::new("test-key", "gemini-1.5-pro")
            .with_endpoint("http://localhost:9999")
            .with_temperature(0.7);
        assert_eq!(provider.endpoint, "http://localhost:9999");
        assert_eq!(provider.temperature, 0.7);
    }

    #[test]
    fn test_response_parsing() {
        let json = r#"{
            "candidates": [
                {"content": {"parts": [{"text": "{\"status\": \"approved\"}"}]}}
            ]
        }"#;

        let body: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.candidates.len(), 1);
        assert_eq!(
            body.candidates[0].content.parts[0].text,
            "{\"status\": \"approved\"}"
        );
    }

    #[test]
    fn test_response_parsing_without_candidates() {
        let body: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(body.candidates.is_empty());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let provider = GeminiProvider::new("test-key", DEFAULT_MODEL)
            .with_endpoint("http://127.0.0.1:1");

        let result = provider.generate("test").await;
        assert!(matches!(result, Err(LlmError::Communication(_))));
    }
}
