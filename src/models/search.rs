//! Search result and lifecycle state models.

use serde::{Deserialize, Serialize};

use super::{Article, Document};

/// Message shown to the user when the answer provider fails
pub const FALLBACK_ERROR_MESSAGE: &str = "Sorry, there was an error processing your request.";

/// The merged outcome of one successful search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Query the result was produced for
    pub query: String,

    /// Rendered answer
    pub document: Document,

    /// Related articles, in provider order
    pub articles: Vec<Article>,
}

impl SearchResult {
    /// Create a new search result
    pub fn new(query: impl Into<String>, document: Document, articles: Vec<Article>) -> Self {
        Self {
            query: query.into(),
            document,
            articles,
        }
    }

    /// The article displayed prominently (the first one), if any
    pub fn featured_article(&self) -> Option<&Article> {
        self.articles.first()
    }

    /// Every article after the featured one, in provider order
    pub fn other_articles(&self) -> &[Article] {
        self.articles.get(1..).unwrap_or(&[])
    }

    /// Check if the result has any articles
    pub fn has_articles(&self) -> bool {
        !self.articles.is_empty()
    }
}

/// Lifecycle of the current search as seen by the presentation layer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum OrchestratorState {
    /// Nothing submitted yet
    #[default]
    Idle,

    /// Waiting on the providers for `query`
    Loading { query: String },

    /// Answer rendered; articles attached
    Success { result: SearchResult },

    /// The answer provider failed for `query`
    Failure { query: String, message: String },
}

impl OrchestratorState {
    /// Query the state refers to, if any
    pub fn query(&self) -> Option<&str> {
        match self {
            OrchestratorState::Idle => None,
            OrchestratorState::Loading { query } => Some(query),
            OrchestratorState::Success { result } => Some(&result.query),
            OrchestratorState::Failure { query, .. } => Some(query),
        }
    }

    /// Check if a search is in flight
    pub fn is_loading(&self) -> bool {
        matches!(self, OrchestratorState::Loading { .. })
    }

    /// Check if the state is terminal for a search (success or failure)
    pub fn is_settled(&self) -> bool {
        matches!(
            self,
            OrchestratorState::Success { .. } | OrchestratorState::Failure { .. }
        )
    }

    /// The result, when the state is `Success`
    pub fn result(&self) -> Option<&SearchResult> {
        match self {
            OrchestratorState::Success { result } => Some(result),
            _ => None,
        }
    }
}
