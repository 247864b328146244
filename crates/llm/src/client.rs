//! REST client for the Gemini `generateContent` endpoint.
//!
//! Wraps `POST {base}/v1beta/models/{model}:generateContent` using
//! [`reqwest`]. The API key travels in the `x-goog-api-key` header so it
//! never appears in logged URLs.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::GenerateError;
use crate::model::TextModel;

/// Public Gemini endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash-002";

/// Default upper bound on a single model call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`GeminiClient`].
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// Base HTTP URL, without a trailing slash.
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// HTTP client for one Gemini model.
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    /// Create a client whose requests time out after `config.timeout`.
    pub fn new(config: GeminiConfig) -> Result<Self, GenerateError> {
        let client = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, config: GeminiConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    // ---- private helpers ----

    /// Map a non-2xx response to an error. A 404 mentioning "not found" or
    /// any 403 means the key cannot use this model.
    fn classify_failure(&self, status: StatusCode, body: String) -> GenerateError {
        let model_rejected = match status {
            StatusCode::NOT_FOUND => body.to_ascii_lowercase().contains("not found"),
            StatusCode::FORBIDDEN => true,
            _ => false,
        };
        if model_rejected {
            GenerateError::ModelUnavailable {
                model: self.model.clone(),
            }
        } else {
            GenerateError::Upstream {
                status: status.as_u16(),
                body,
            }
        }
    }
}

/// Concatenated text parts of the first candidate, if any.
fn extract_text(response: GenerateContentResponse) -> Option<String> {
    let content = response.candidates.into_iter().next()?.content?;
    let text: String = content
        .parts
        .into_iter()
        .filter_map(|part| part.text)
        .collect();
    (!text.trim().is_empty()).then_some(text)
}

#[async_trait]
impl TextModel for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str, api_key: &str) -> Result<String, GenerateError> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(model = %self.model, status = status.as_u16(), "Gemini request rejected");
            return Err(self.classify_failure(status, body));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        extract_text(parsed).ok_or(GenerateError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn client() -> GeminiClient {
        GeminiClient::with_client(
            reqwest::Client::new(),
            GeminiConfig {
                base_url: "http://localhost:9/".into(),
                ..GeminiConfig::default()
            },
        )
    }

    #[test]
    fn endpoint_names_the_model() {
        assert_eq!(
            client().endpoint(),
            "http://localhost:9/v1beta/models/gemini-1.5-flash-002:generateContent"
        );
    }

    #[test]
    fn not_found_model_is_unavailable() {
        let err = client().classify_failure(
            StatusCode::NOT_FOUND,
            r#"{"error":{"message":"models/gemini-x is not found for API version v1beta"}}"#.into(),
        );
        assert_matches!(err, GenerateError::ModelUnavailable { model } if model == DEFAULT_MODEL);
    }

    #[test]
    fn permission_denied_is_unavailable() {
        let err = client().classify_failure(StatusCode::FORBIDDEN, "PERMISSION_DENIED".into());
        assert_matches!(err, GenerateError::ModelUnavailable { .. });
        assert!(err.to_string().contains("Generative Language API"));
    }

    #[test]
    fn other_failures_keep_status_and_body() {
        let err = client().classify_failure(StatusCode::TOO_MANY_REQUESTS, "quota".into());
        assert_matches!(err, GenerateError::Upstream { status: 429, body } if body == "quota");
    }

    #[test]
    fn extracts_joined_parts_of_first_candidate() {
        let response: GenerateContentResponse = serde_json::from_value(serde_json::json!({
            "candidates": [
                {"content": {"parts": [{"text": "{\"a\":"}, {"text": "1}"}]}},
                {"content": {"parts": [{"text": "ignored"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text(response).as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn blocked_prompt_has_no_text() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({ "promptFeedback": {} })).unwrap();
        assert_eq!(extract_text(response), None);
    }
}
