//! Core data models for answers, articles and search state.

mod article;
mod document;
mod search;

pub use article::{Article, ArticleBuilder, COMPACT_PLACEHOLDER_IMAGE, FEATURED_PLACEHOLDER_IMAGE};
pub use document::{Block, CodeBlock, Document, TextRun, DEFAULT_CODE_LANGUAGE};
pub use search::{OrchestratorState, SearchResult, FALLBACK_ERROR_MESSAGE};
