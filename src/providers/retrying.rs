//! Retry decorators for providers.
//!
//! The orchestrator never retries on its own; wrapping a provider here is how
//! a caller opts into retrying transient failures.

use async_trait::async_trait;
use std::sync::Arc;

use crate::models::Article;
use crate::providers::{AnswerProvider, NewsProvider, ProviderError};
use crate::utils::{with_retry, RetryConfig};

/// Answer provider that retries transient errors of an inner provider
#[derive(Debug, Clone)]
pub struct RetryingAnswerProvider {
    inner: Arc<dyn AnswerProvider>,
    config: RetryConfig,
}

impl RetryingAnswerProvider {
    /// Wrap `inner` with the given retry policy
    pub fn new(inner: Arc<dyn AnswerProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl AnswerProvider for RetryingAnswerProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn generate(&self, query: &str) -> Result<String, ProviderError> {
        with_retry(self.config, || self.inner.generate(query)).await
    }
}

/// News provider that retries transient errors of an inner provider
#[derive(Debug, Clone)]
pub struct RetryingNewsProvider {
    inner: Arc<dyn NewsProvider>,
    config: RetryConfig,
}

impl RetryingNewsProvider {
    /// Wrap `inner` with the given retry policy
    pub fn new(inner: Arc<dyn NewsProvider>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl NewsProvider for RetryingNewsProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, ProviderError> {
        with_retry(self.config, || self.inner.search(query)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockAnswerProvider, MockNewsProvider};
    use std::time::Duration;

    fn config(attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts: attempts,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            backoff_multiplier: 2.0,
        }
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let mock = MockAnswerProvider::new().with_failure("q", ProviderError::RateLimit);
        let provider = RetryingAnswerProvider::new(Arc::new(mock.clone()), config(3));

        assert_eq!(provider.generate("q").await, Err(ProviderError::RateLimit));
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let mock = MockNewsProvider::new()
            .with_failure("q", ProviderError::MissingApiKey("news".to_string()));
        let provider = RetryingNewsProvider::new(Arc::new(mock.clone()), config(3));

        assert!(provider.search("q").await.is_err());
        assert_eq!(mock.calls(), 1);
    }
}
