//! Upstream collaborators: the answer provider and the news provider.
//!
//! The orchestrator only sees the two traits defined here. Concrete
//! implementations talk to HTTP APIs:
//!
//! - [`GeminiAnswerProvider`]: Google Generative Language `generateContent`
//! - [`NewsApiProvider`]: NewsAPI `/v2/everything`
//!
//! Both accept a custom endpoint so they can be pointed at a proxy or a
//! local mock server. [`mock`] holds scripted in-memory providers for tests,
//! and [`RetryingAnswerProvider`]/[`RetryingNewsProvider`] add an opt-in retry
//! policy on top of any provider.
//!
//! # Environment
//!
//! - `GEMINI_API_KEY` - API key for the answer provider
//! - `NEWS_API_KEY` - API key for the news provider

mod gemini;
pub mod mock;
mod newsapi;
mod retrying;

pub use gemini::GeminiAnswerProvider;
pub use mock::{MockAnswerProvider, MockNewsProvider};
pub use newsapi::NewsApiProvider;
pub use retrying::{RetryingAnswerProvider, RetryingNewsProvider};

use async_trait::async_trait;

use crate::models::Article;

/// Produces a generated answer for a query.
#[async_trait]
pub trait AnswerProvider: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this provider
    fn name(&self) -> &str;

    /// Generate the full answer text for `query`
    async fn generate(&self, query: &str) -> Result<String, ProviderError>;
}

/// Finds news articles related to a query.
#[async_trait]
pub trait NewsProvider: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this provider
    fn name(&self) -> &str;

    /// Search for articles matching `query`, in the provider's own order
    async fn search(&self, query: &str) -> Result<Vec<Article>, ProviderError>;
}

/// Errors that can occur when calling a provider
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(String),

    /// Request did not finish in time
    #[error("Request timed out")]
    Timeout,

    /// Response body could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Rate limit or quota exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// No API key configured for the provider
    #[error("Missing API key for {0}")]
    MissingApiKey(String),

    /// API error reported by the provider
    #[error("API error: {0}")]
    Api(String),

    /// Other error
    #[error("Error: {0}")]
    Other(String),
}

impl ProviderError {
    /// Whether retrying the same request could succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Network(_) | ProviderError::Timeout | ProviderError::RateLimit
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) {
            ProviderError::RateLimit
        } else if err.is_decode() {
            ProviderError::Parse(err.to_string())
        } else {
            ProviderError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Parse(format!("JSON: {}", err))
    }
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn status_error(provider: &str, status: reqwest::StatusCode, body: &str) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return ProviderError::RateLimit;
    }

    let detail = body.trim();
    if detail.is_empty() {
        ProviderError::Api(format!("{} returned status: {}", provider, status))
    } else {
        let detail: String = detail.chars().take(200).collect();
        ProviderError::Api(format!("{} returned status: {} ({})", provider, status, detail))
    }
}
