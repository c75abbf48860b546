//! Query orchestration.
//!
//! The [`Orchestrator`] drives one search at a time through
//! `Idle → Loading → Success | Failure`:
//!
//! 1. `submit` validates the query and immediately publishes `Loading`,
//!    dropping whatever result was shown before.
//! 2. The answer and news providers are called concurrently with the same query.
//! 3. Once both settle, the answer is rendered into a document and the merged
//!    result is published as `Success`. A news failure only empties the article
//!    list; an answer failure publishes `Failure` with a fixed message.
//!
//! Each submit is tagged with a generation number. A search whose generation is
//! no longer current when it finishes is dropped without touching the state,
//! so a slow, superseded query can never overwrite a newer one.
//!
//! State lives in a [`tokio::sync::watch`] channel: the orchestrator is the
//! only writer, and readers either take snapshots with [`Orchestrator::state`]
//! or follow changes through [`Orchestrator::subscribe`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::models::{Article, OrchestratorState, SearchResult, FALLBACK_ERROR_MESSAGE};
use crate::providers::{AnswerProvider, NewsProvider, ProviderError};
use crate::render::DocumentBuilder;

/// Reasons a query is rejected before any request is made
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The query is empty or only whitespace
    #[error("Query must not be empty")]
    EmptyQuery,
}

/// What happened to a submitted search once it finished
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The search was current and its state was published
    Applied(OrchestratorState),

    /// A newer submit superseded this one; its result was discarded
    Superseded,
}

impl SubmitOutcome {
    /// Whether the result was published
    pub fn is_applied(&self) -> bool {
        matches!(self, SubmitOutcome::Applied(_))
    }
}

/// A search that has entered `Loading` but not yet called the providers
#[derive(Debug)]
#[must_use = "a pending search does nothing until it is run"]
pub struct PendingSearch {
    query: String,
    generation: u64,
}

impl PendingSearch {
    /// The validated query
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Generation tag of this search
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Sequences the provider calls for a query and publishes the lifecycle state
#[derive(Debug)]
pub struct Orchestrator {
    answers: Arc<dyn AnswerProvider>,
    news: Arc<dyn NewsProvider>,
    builder: DocumentBuilder,
    state: watch::Sender<OrchestratorState>,
    generation: AtomicU64,
}

impl Orchestrator {
    /// Create an orchestrator in the `Idle` state
    pub fn new(answers: Arc<dyn AnswerProvider>, news: Arc<dyn NewsProvider>) -> Self {
        let (state, _) = watch::channel(OrchestratorState::Idle);

        Self {
            answers,
            news,
            builder: DocumentBuilder::new(),
            state,
            generation: AtomicU64::new(0),
        }
    }

    /// Use a custom document builder (e.g. a different default code language)
    pub fn with_builder(mut self, builder: DocumentBuilder) -> Self {
        self.builder = builder;
        self
    }

    /// Snapshot of the current state
    pub fn state(&self) -> OrchestratorState {
        self.state.borrow().clone()
    }

    /// Follow state changes
    pub fn subscribe(&self) -> watch::Receiver<OrchestratorState> {
        self.state.subscribe()
    }

    /// Validate `query` and move to `Loading`.
    ///
    /// Runs synchronously, so the order of `begin` calls is the order in which
    /// searches supersede each other. Empty queries leave the state untouched.
    pub fn begin(&self, query: &str) -> Result<PendingSearch, ValidationError> {
        if query.trim().is_empty() {
            tracing::debug!("Rejected empty query");
            return Err(ValidationError::EmptyQuery);
        }

        let query = query.to_string();
        let mut generation = 0;

        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = OrchestratorState::Loading {
                query: query.clone(),
            };
        });

        tracing::info!(query = %query, generation, "Search started");

        Ok(PendingSearch { query, generation })
    }

    /// Call both providers for a pending search and publish the outcome
    pub async fn run(&self, pending: PendingSearch) -> SubmitOutcome {
        let PendingSearch { query, generation } = pending;

        let (answer, articles) = tokio::join!(
            self.answers.generate(&query),
            self.news.search(&query)
        );

        let articles = self.articles_or_empty(&query, articles);

        let next = match answer {
            Ok(raw) => {
                let document = self.builder.build(&raw);
                tracing::info!(
                    query = %query,
                    generation,
                    blocks = document.len(),
                    articles = articles.len(),
                    "Search succeeded"
                );
                OrchestratorState::Success {
                    result: SearchResult::new(query, document, articles),
                }
            }
            Err(err) => {
                tracing::warn!(
                    query = %query,
                    generation,
                    provider = self.answers.name(),
                    error = %err,
                    "Answer provider failed"
                );
                OrchestratorState::Failure {
                    query,
                    message: FALLBACK_ERROR_MESSAGE.to_string(),
                }
            }
        };

        self.apply(generation, next)
    }

    /// Validate, publish `Loading`, then run the search to completion
    pub async fn submit(&self, query: &str) -> Result<SubmitOutcome, ValidationError> {
        let pending = self.begin(query)?;
        Ok(self.run(pending).await)
    }

    /// Like [`Orchestrator::submit`], but runs the provider calls on a spawned task.
    ///
    /// Validation and the `Loading` transition happen before this returns.
    pub fn spawn_submit(
        self: &Arc<Self>,
        query: &str,
    ) -> Result<JoinHandle<SubmitOutcome>, ValidationError> {
        let pending = self.begin(query)?;
        let orchestrator = Arc::clone(self);

        Ok(tokio::spawn(async move { orchestrator.run(pending).await }))
    }

    fn articles_or_empty(
        &self,
        query: &str,
        articles: Result<Vec<Article>, ProviderError>,
    ) -> Vec<Article> {
        match articles {
            Ok(articles) => articles,
            Err(err) => {
                tracing::warn!(
                    query = %query,
                    provider = self.news.name(),
                    error = %err,
                    "News provider failed; continuing without articles"
                );
                Vec::new()
            }
        }
    }

    /// Publish `next` only if `generation` is still the latest submit
    fn apply(&self, generation: u64, next: OrchestratorState) -> SubmitOutcome {
        let mut published = None;

        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next.clone();
            published = Some(next.clone());
            true
        });

        match published {
            Some(state) => SubmitOutcome::Applied(state),
            None => {
                tracing::debug!(generation, "Discarded result of superseded search");
                SubmitOutcome::Superseded
            }
        }
    }
}
