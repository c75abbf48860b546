//! Article model representing a news item returned by a news provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder image shown on the featured card when an article has no image
pub const FEATURED_PLACEHOLDER_IMAGE: &str = "https://placehold.co/800x400?text=No+Image";

/// Placeholder image shown on compact cards when an article has no image
pub const COMPACT_PLACEHOLDER_IMAGE: &str = "https://placehold.co/400x400?text=No+Image";

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";

/// A news article cited alongside an answer
///
/// Articles are immutable once received from the provider; the provider's
/// ordering is kept everywhere they are stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Headline
    pub title: String,

    /// Publisher name (e.g. "BBC News")
    pub source_name: String,

    /// Byline, when the provider reports one
    pub author: Option<String>,

    /// Lead image URL
    pub image_url: Option<String>,

    /// Article page URL
    pub url: String,

    /// Publication timestamp
    pub published_at: DateTime<Utc>,
}

impl Article {
    /// Create a new article with required fields
    pub fn new(
        title: impl Into<String>,
        source_name: impl Into<String>,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            title: title.into(),
            source_name: source_name.into(),
            author: None,
            image_url: None,
            url: url.into(),
            published_at,
        }
    }

    /// Host name of the article URL, if it parses
    pub fn domain(&self) -> Option<String> {
        url::Url::parse(&self.url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_string()))
    }

    /// Favicon URL for the publisher's domain
    pub fn favicon_url(&self) -> Option<String> {
        self.domain().map(|domain| {
            format!(
                "{}?domain={}&sz=32",
                FAVICON_SERVICE,
                urlencoding::encode(&domain)
            )
        })
    }

    /// Image to display, falling back to a placeholder sized for the card
    pub fn image_or_placeholder(&self, featured: bool) -> &str {
        match self.image_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url,
            _ if featured => FEATURED_PLACEHOLDER_IMAGE,
            _ => COMPACT_PLACEHOLDER_IMAGE,
        }
    }

    /// Check if the article has a non-empty author
    pub fn has_author(&self) -> bool {
        self.author
            .as_deref()
            .map(|a| !a.trim().is_empty())
            .unwrap_or(false)
    }
}

/// Builder for constructing Article objects
#[derive(Debug, Clone)]
pub struct ArticleBuilder {
    article: Article,
}

impl ArticleBuilder {
    /// Create a new builder with required fields
    pub fn new(
        title: impl Into<String>,
        source_name: impl Into<String>,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
    ) -> Self {
        Self {
            article: Article::new(title, source_name, url, published_at),
        }
    }

    /// Set author
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.article.author = Some(author.into());
        self
    }

    /// Set image URL
    pub fn image_url(mut self, url: impl Into<String>) -> Self {
        self.article.image_url = Some(url.into());
        self
    }

    /// Build the Article
    pub fn build(self) -> Article {
        self.article
    }
}
