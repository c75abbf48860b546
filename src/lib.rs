//! # Answer Engine
//!
//! Ask a question, get a generated answer rendered as a structured document
//! alongside related news articles.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Document, Article, OrchestratorState, etc.)
//! - [`render`]: Turns raw answer text into a [`Document`] of headings, code and paragraphs
//! - [`providers`]: Answer and news provider traits with HTTP and mock implementations
//! - [`orchestrator`]: Runs a query against both providers and publishes its state
//! - [`ui`]: Terminal rendering and the loading spinner
//! - [`utils`]: HTTP client and retry helpers
//! - [`config`]: Configuration management

pub mod config;
pub mod models;
pub mod orchestrator;
pub mod providers;
pub mod render;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use models::{Article, Block, Document, OrchestratorState, SearchResult, TextRun};
pub use orchestrator::{Orchestrator, SubmitOutcome, ValidationError};
pub use providers::{AnswerProvider, NewsProvider, ProviderError};
pub use render::{build_document, DocumentBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
