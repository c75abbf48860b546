//! Google Generative Language answer provider.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::providers::{status_error, AnswerProvider, ProviderError};
use crate::utils::HttpClient;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-pro";

/// Answer provider backed by the Gemini `generateContent` endpoint
#[derive(Debug, Clone)]
pub struct GeminiAnswerProvider {
    client: HttpClient,
    api_key: Option<String>,
    model: String,
    endpoint: String,
}

impl GeminiAnswerProvider {
    /// Create a provider using `GEMINI_API_KEY` and the default model
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            api_key: std::env::var("GEMINI_API_KEY").ok(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: GEMINI_API_BASE.to_string(),
        }
    }

    /// Create a provider from application configuration
    pub fn from_config(config: &Config, client: HttpClient) -> Self {
        Self {
            client,
            api_key: config.api_keys.gemini.clone(),
            model: config.answer.model.clone(),
            endpoint: config.answer.endpoint.clone(),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the provider at a different base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }

    /// Extract the answer text from a response body
    fn parse_answer(data: GenerateResponse) -> Result<String, ProviderError> {
        if let Some(candidate) = data.candidates.into_iter().next() {
            let text: String = candidate
                .content
                .map(|content| {
                    content
                        .parts
                        .into_iter()
                        .filter_map(|part| part.text)
                        .collect()
                })
                .unwrap_or_default();

            if text.is_empty() {
                if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                    return Err(ProviderError::Api(format!(
                        "Gemini returned no text (finish reason: {})",
                        reason
                    )));
                }
            }

            return Ok(text);
        }

        match data.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => Err(ProviderError::Api(format!(
                "Gemini blocked the prompt: {}",
                reason
            ))),
            None => Err(ProviderError::Api(
                "Gemini returned no candidates".to_string(),
            )),
        }
    }
}

impl Default for GeminiAnswerProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AnswerProvider for GeminiAnswerProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(&self, query: &str) -> Result<String, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey("Gemini (GEMINI_API_KEY)".to_string()))?;

        let request = GenerateRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: query }],
            }],
        };

        tracing::debug!(model = %self.model, "Requesting answer from Gemini");

        let response = self
            .client
            .client()
            .post(self.build_url())
            .query(&[("key", api_key)])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(status_error("Gemini", status, &detail));
        }

        let body = response.text().await?;
        let data: GenerateResponse = serde_json::from_str(&body)?;

        Self::parse_answer(data)
    }
}

// ===== Gemini API Types =====

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(rename = "blockReason")]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}
