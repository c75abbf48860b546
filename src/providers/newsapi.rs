//! NewsAPI news provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::{Config, NewsConfig};
use crate::models::{Article, ArticleBuilder};
use crate::providers::{status_error, NewsProvider, ProviderError};
use crate::utils::HttpClient;

/// News provider backed by NewsAPI's `/everything` endpoint
///
/// Requests the most relevant English articles for the query, a handful at
/// a time, and keeps NewsAPI's ordering.
#[derive(Debug, Clone)]
pub struct NewsApiProvider {
    client: HttpClient,
    api_key: Option<String>,
    settings: NewsConfig,
}

impl NewsApiProvider {
    /// Create a provider using `NEWS_API_KEY` and default settings
    pub fn new() -> Self {
        Self {
            client: HttpClient::new(),
            api_key: std::env::var("NEWS_API_KEY").ok(),
            settings: NewsConfig::default(),
        }
    }

    /// Create a provider from application configuration
    pub fn from_config(config: &Config, client: HttpClient) -> Self {
        Self {
            client,
            api_key: config.api_keys.news.clone(),
            settings: config.news.clone(),
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Point the provider at a different base URL
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.settings.endpoint = endpoint.into();
        self
    }

    /// Set how many articles to request
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.settings.page_size = page_size;
        self
    }

    fn build_url(&self) -> String {
        format!("{}/everything", self.settings.endpoint.trim_end_matches('/'))
    }

    /// Convert a NewsAPI article, skipping entries without a URL
    fn parse_article(item: ApiArticle) -> Option<Article> {
        let url = item.url.filter(|u| !u.trim().is_empty())?;

        let published_at = item
            .published_at
            .as_deref()
            .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
            .map(|ts| ts.with_timezone(&Utc))
            .unwrap_or_default();

        let source_name = item.source.and_then(|s| s.name).unwrap_or_default();

        let mut builder =
            ArticleBuilder::new(item.title.unwrap_or_default(), source_name, url, published_at);

        if let Some(author) = item.author.filter(|a| !a.trim().is_empty()) {
            builder = builder.author(author);
        }
        if let Some(image) = item.url_to_image.filter(|i| !i.trim().is_empty()) {
            builder = builder.image_url(image);
        }

        Some(builder.build())
    }
}

impl Default for NewsApiProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NewsProvider for NewsApiProvider {
    fn name(&self) -> &str {
        "NewsAPI"
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, ProviderError> {
        let api_key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ProviderError::MissingApiKey("NewsAPI (NEWS_API_KEY)".to_string()))?;

        let page_size = self.settings.page_size.to_string();

        let response = self
            .client
            .client()
            .get(self.build_url())
            .query(&[
                ("q", query),
                ("sortBy", self.settings.sort_by.as_str()),
                ("language", self.settings.language.as_str()),
                ("pageSize", page_size.as_str()),
                ("apiKey", api_key),
            ])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let detail = serde_json::from_str::<NewsResponse>(&body)
                .ok()
                .and_then(|r| r.message)
                .unwrap_or(body);
            return Err(status_error("NewsAPI", status, &detail));
        }

        let data: NewsResponse = serde_json::from_str(&body)?;

        if data.status.as_deref() == Some("error") {
            return Err(ProviderError::Api(format!(
                "NewsAPI error {}: {}",
                data.code.unwrap_or_default(),
                data.message.unwrap_or_default()
            )));
        }

        let articles: Vec<Article> = data
            .articles
            .unwrap_or_default()
            .into_iter()
            .filter_map(Self::parse_article)
            .collect();

        tracing::debug!(count = articles.len(), "NewsAPI returned articles");

        Ok(articles)
    }
}

// ===== NewsAPI Types =====

#[derive(Debug, Deserialize)]
struct NewsResponse {
    status: Option<String>,
    code: Option<String>,
    message: Option<String>,
    articles: Option<Vec<ApiArticle>>,
}

#[derive(Debug, Deserialize)]
struct ApiArticle {
    source: Option<ApiSource>,
    author: Option<String>,
    title: Option<String>,
    url: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiSource {
    name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use mockito::Matcher;
    use serde_json::json;

    fn provider(endpoint: &str) -> NewsApiProvider {
        NewsApiProvider::new()
            .with_api_key("news-key")
            .with_endpoint(endpoint)
    }

    #[tokio::test]
    async fn test_search_maps_articles_in_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/everything")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "volcanoes".into()),
                Matcher::UrlEncoded("sortBy".into(), "relevancy".into()),
                Matcher::UrlEncoded("language".into(), "en".into()),
                Matcher::UrlEncoded("pageSize".into(), "4".into()),
                Matcher::UrlEncoded("apiKey".into(), "news-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({
                    "status": "ok",
                    "totalResults": 3,
                    "articles": [
                        {
                            "source": {"id": "reuters", "name": "Reuters"},
                            "author": "Jane Smith",
                            "title": "Eruption in Iceland",
                            "url": "https://www.reuters.com/a",
                            "urlToImage": "https://img.example.com/a.jpg",
                            "publishedAt": "2024-05-01T12:00:00Z"
                        },
                        {
                            "source": {"id": null, "name": "BBC News"},
                            "author": null,
                            "title": "Lava flows",
                            "url": "https://www.bbc.co.uk/b",
                            "urlToImage": null,
                            "publishedAt": "2024-05-02T08:30:00Z"
                        },
                        {
                            "source": {"id": null, "name": "Broken"},
                            "title": "No link",
                            "url": null,
                            "publishedAt": "2024-05-03T00:00:00Z"
                        }
                    ]
                })
                .to_string(),
            )
            .create_async()
            .await;

        let articles = provider(&server.url()).search("volcanoes").await.unwrap();

        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "Eruption in Iceland");
        assert_eq!(articles[0].source_name, "Reuters");
        assert_eq!(articles[0].author, Some("Jane Smith".to_string()));
        assert_eq!(
            articles[0].published_at,
            Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(articles[1].title, "Lava flows");
        assert!(articles[1].author.is_none());
        assert!(articles[1].image_url.is_none());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_articles_field_is_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/everything")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(json!({"status": "ok", "totalResults": 0}).to_string())
            .create_async()
            .await;

        let articles = provider(&server.url()).search("nothing").await.unwrap();
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_reports_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/everything")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_body(
                json!({"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid"})
                    .to_string(),
            )
            .create_async()
            .await;

        let err = provider(&server.url()).search("q").await.unwrap_err();
        assert!(matches!(err, ProviderError::Api(ref msg) if msg.contains("invalid")));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let provider = NewsApiProvider {
            client: HttpClient::new(),
            api_key: None,
            settings: NewsConfig::default(),
        };

        let err = provider.search("q").await.unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey(_)));
    }

    #[test]
    fn test_unparsable_timestamp_falls_back_to_epoch() {
        let item = ApiArticle {
            source: None,
            author: Some("  ".to_string()),
            title: None,
            url: Some("https://example.com".to_string()),
            url_to_image: Some(String::new()),
            published_at: Some("yesterday".to_string()),
        };

        let article = NewsApiProvider::parse_article(item).unwrap();
        assert_eq!(article.published_at, DateTime::<Utc>::default());
        assert_eq!(article.title, "");
        assert!(article.author.is_none());
        assert!(article.image_url.is_none());
    }
}
