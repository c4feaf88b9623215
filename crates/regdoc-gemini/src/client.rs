//! Gemini client implementation

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::timeout;

use regdoc_core::{Error, GenerationConfig, GenerationResult, LLMProvider, Result};

use crate::config::GeminiConfig;

/// Gemini `generateContent` client
pub struct GeminiClient {
    config: GeminiConfig,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationParams,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    total_token_count: Option<u32>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
    status: Option<String>,
}

impl GeminiClient {
    /// Create a new Gemini client from configuration
    pub fn new(config: GeminiConfig) -> Result<Self> {
        config.validate()?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Create a new Gemini client from environment variables
    pub fn from_env() -> Result<Self> {
        let config = GeminiConfig::from_env()?;
        Self::new(config)
    }

    /// Generation settings derived from the client configuration
    pub fn default_generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            model_id: self.config.model.clone(),
            temperature: Some(self.config.temperature as f32),
            max_output_tokens: None,
            timeout: Duration::from_secs(self.config.timeout_secs),
        }
    }

    /// Perform the actual generation request
    async fn perform_generation(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let request_body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationParams {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
            },
        };

        let url = self
            .config
            .clone()
            .with_model(config.model_id.clone())
            .generate_content_url()?;

        tracing::debug!(model = %config.model_id, prompt_chars = prompt.len(), "Sending generateContent request");

        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(map_request_error)?;

        let status = response.status();
        let response_text = response.text().await.map_err(map_request_error)?;

        if !status.is_success() {
            return Err(status_error(status, &response_text));
        }

        let text = parse_generation_response(&response_text)?;
        let tokens_used = serde_json::from_str::<GenerateContentResponse>(&response_text)
            .ok()
            .and_then(|r| r.usage_metadata)
            .and_then(|u| u.total_token_count);

        Ok(GenerationResult {
            text,
            model_id: config.model_id.clone(),
            tokens_used,
        })
    }
}

/// Pull the answer text out of a `generateContent` response body
fn parse_generation_response(body: &str) -> Result<String> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| Error::Serialization(format!("Malformed Gemini response: {}", e)))?;

    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(Error::LLMProvider(format!("Prompt was blocked by Gemini: {}", reason)));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| Error::LLMProvider("Gemini returned no candidates".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| content.parts)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|part| part.text)
        .collect();

    if text.trim().is_empty() {
        return Err(Error::LLMProvider(format!(
            "Empty response from Gemini (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text.trim().to_string())
}

/// Map a non-success HTTP status to a typed error
fn status_error(status: StatusCode, body: &str) -> Error {
    let detail = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| match envelope.error.status {
            Some(code) => format!("{} ({})", envelope.error.message, code),
            None => envelope.error.message,
        })
        .unwrap_or_else(|_| body.trim().to_string());

    let message = format!("Gemini API request failed with status {}: {}", status, detail);

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(message),
        StatusCode::TOO_MANY_REQUESTS => Error::ServiceUnavailable(message),
        s if s.is_server_error() => Error::ServiceUnavailable(message),
        StatusCode::BAD_REQUEST if detail.contains("API key") => Error::Authentication(message),
        _ => Error::LLMProvider(message),
    }
}

fn map_request_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(err.to_string())
    } else {
        Error::Network(err.to_string())
    }
}

#[async_trait]
impl LLMProvider for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult> {
        let config = self.default_generation_config();
        self.generate_with_config(prompt, &config).await
    }

    async fn generate_with_config(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<GenerationResult> {
        let generation_future = self.perform_generation(prompt, config);

        match timeout(config.timeout, generation_future).await {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "Gemini request timed out after {}s",
                config.timeout.as_secs()
            ))),
        }
    }

    fn model_id(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regdoc_core::ErrorKind;

    #[test]
    fn test_parse_generation_response_joins_parts() {
        let body = r#"{
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "The minimum "}, {"text": "GPA is 2.0."}]},
                "finishReason": "STOP"
            }],
            "usageMetadata": {"promptTokenCount": 120, "totalTokenCount": 131}
        }"#;

        assert_eq!(parse_generation_response(body).unwrap(), "The minimum GPA is 2.0.");
    }

    #[test]
    fn test_parse_generation_response_blocked_prompt() {
        let body = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let err = parse_generation_response(body).unwrap_err();
        assert!(matches!(err, Error::LLMProvider(_)));
        assert!(err.to_string().contains("SAFETY"));
    }

    #[test]
    fn test_parse_generation_response_empty_candidate() {
        let body = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let err = parse_generation_response(body).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_parse_generation_response_malformed() {
        let err = parse_generation_response("<html>oops</html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Data);
    }

    #[test]
    fn test_status_error_classification() {
        let body = r#"{"error": {"code": 403, "message": "Permission denied", "status": "PERMISSION_DENIED"}}"#;
        let err = status_error(StatusCode::FORBIDDEN, body);
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert!(err.to_string().contains("Permission denied (PERMISSION_DENIED)"));

        let err = status_error(StatusCode::BAD_REQUEST, r#"{"error": {"message": "API key not valid. Please pass a valid API key."}}"#);
        assert_eq!(err.kind(), ErrorKind::Configuration);

        let err = status_error(StatusCode::SERVICE_UNAVAILABLE, "overloaded");
        assert_eq!(err.kind(), ErrorKind::Transient);

        let err = status_error(StatusCode::TOO_MANY_REQUESTS, "");
        assert!(err.is_transient());

        let err = status_error(StatusCode::NOT_FOUND, "no such model");
        assert_eq!(err.kind(), ErrorKind::Provider);
    }

    #[test]
    fn test_request_body_shape() {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: "Question: ?" }],
            }],
            generation_config: GenerationParams {
                temperature: Some(0.5),
                max_output_tokens: None,
            },
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["contents"][0]["parts"][0]["text"], "Question: ?");
        assert_eq!(value["generationConfig"]["temperature"], 0.5);
        assert!(value["generationConfig"].get("maxOutputTokens").is_none());
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transient() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = GeminiConfig::new("test_key".to_string())
            .with_api_url(format!("http://{}/", addr));
        let client = GeminiClient::new(config).unwrap();

        let err = client.generate("hello").await.unwrap_err();
        assert!(err.is_transient(), "unexpected error: {err}");
    }
}
