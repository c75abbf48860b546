//! Mock providers for testing purposes.

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::models::{Article, ArticleBuilder};
use crate::providers::{AnswerProvider, NewsProvider, ProviderError};

/// Scripted replies keyed by query, with an optional per-query delay
#[derive(Debug, Clone)]
struct Script<T> {
    replies: HashMap<String, Result<T, ProviderError>>,
    fallback: Result<T, ProviderError>,
    delays: HashMap<String, Duration>,
    calls: Arc<AtomicUsize>,
}

impl<T: Clone + Default> Default for Script<T> {
    fn default() -> Self {
        Self {
            replies: HashMap::new(),
            fallback: Ok(T::default()),
            delays: HashMap::new(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl<T: Clone> Script<T> {
    async fn play(&self, query: &str) -> Result<T, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(query) {
            tokio::time::sleep(*delay).await;
        }

        self.replies
            .get(query)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

/// An answer provider that returns predefined answers.
///
/// Unknown queries get an empty answer unless a default is configured.
#[derive(Debug, Clone, Default)]
pub struct MockAnswerProvider {
    script: Script<String>,
}

impl MockAnswerProvider {
    /// Create a new mock answer provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `query` with `text`.
    pub fn with_answer(mut self, query: impl Into<String>, text: impl Into<String>) -> Self {
        self.script.replies.insert(query.into(), Ok(text.into()));
        self
    }

    /// Fail `query` with `error`.
    pub fn with_failure(mut self, query: impl Into<String>, error: ProviderError) -> Self {
        self.script.replies.insert(query.into(), Err(error));
        self
    }

    /// Reply for queries without a scripted answer.
    pub fn with_default(mut self, reply: Result<String, ProviderError>) -> Self {
        self.script.fallback = reply;
        self
    }

    /// Wait `delay` before answering `query`.
    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.script.delays.insert(query.into(), delay);
        self
    }

    /// Number of `generate` calls so far (shared between clones).
    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerProvider for MockAnswerProvider {
    fn name(&self) -> &str {
        "Mock Answers"
    }

    async fn generate(&self, query: &str) -> Result<String, ProviderError> {
        self.script.play(query).await
    }
}

/// A news provider that returns predefined article lists.
///
/// Unknown queries get no articles unless a default is configured.
#[derive(Debug, Clone, Default)]
pub struct MockNewsProvider {
    script: Script<Vec<Article>>,
}

impl MockNewsProvider {
    /// Create a new mock news provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `articles` for `query`.
    pub fn with_articles(mut self, query: impl Into<String>, articles: Vec<Article>) -> Self {
        self.script.replies.insert(query.into(), Ok(articles));
        self
    }

    /// Fail `query` with `error`.
    pub fn with_failure(mut self, query: impl Into<String>, error: ProviderError) -> Self {
        self.script.replies.insert(query.into(), Err(error));
        self
    }

    /// Reply for queries without scripted articles.
    pub fn with_default(mut self, reply: Result<Vec<Article>, ProviderError>) -> Self {
        self.script.fallback = reply;
        self
    }

    /// Wait `delay` before replying to `query`.
    pub fn with_delay(mut self, query: impl Into<String>, delay: Duration) -> Self {
        self.script.delays.insert(query.into(), delay);
        self
    }

    /// Number of `search` calls so far (shared between clones).
    pub fn calls(&self) -> usize {
        self.script.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NewsProvider for MockNewsProvider {
    fn name(&self) -> &str {
        "Mock News"
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, ProviderError> {
        self.script.play(query).await
    }
}

/// Helper function to create a mock article for testing.
pub fn make_article(slug: &str, title: &str, source_name: &str) -> Article {
    let published_at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default();

    ArticleBuilder::new(
        title,
        source_name,
        format!("https://news.example.com/{}", slug),
        published_at,
    )
    .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_answers_and_fallback() {
        let provider = MockAnswerProvider::new()
            .with_answer("known", "text")
            .with_failure("broken", ProviderError::Timeout);

        assert_eq!(provider.generate("known").await.unwrap(), "text");
        assert_eq!(provider.generate("other").await.unwrap(), "");
        assert_eq!(provider.generate("broken").await, Err(ProviderError::Timeout));
        assert_eq!(provider.calls(), 3);
    }

    #[tokio::test]
    async fn test_news_default_reply() {
        let provider = MockNewsProvider::new()
            .with_default(Err(ProviderError::Network("down".to_string())));

        assert!(provider.search("anything").await.is_err());

        let article = make_article("a", "Title", "Wire");
        let provider = MockNewsProvider::new().with_articles("q", vec![article.clone()]);
        assert_eq!(provider.search("q").await.unwrap(), vec![article]);
    }
}
