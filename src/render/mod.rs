//! The answer rendering engine.
//!
//! Raw generated answers are loosely formatted: headings are written as bold
//! runs (`**Overview**`), code arrives in triple-backtick fences, and sources
//! are cited inline as `[1]`. This module turns that text into a
//! [`Document`](crate::models::Document) in three stages:
//!
//! - [`segment`]: split the text before every heading marker and complete code fence
//! - [`DocumentBuilder`]: classify each segment, fuse a code block into the heading
//!   right before it, and drop blank segments
//! - [`tokenize_citations`]: split paragraph text into text runs and citation markers
//!
//! Every stage is total: malformed input (unterminated fences, dangling `**`)
//! degrades to paragraph text instead of failing.
//!
//! ```rust
//! use answer_engine::models::Block;
//! use answer_engine::render::build_document;
//!
//! let doc = build_document("**Title**\n```python\nprint(1)\n```");
//! assert!(matches!(&doc.blocks()[0], Block::Heading { trailing_code: Some(_), .. }));
//! ```

mod builder;
mod citation;
mod segment;

pub use builder::{build_document, DocumentBuilder};
pub use citation::tokenize_citations;
pub use segment::{fence_at, heading_at, segment, FenceSpan, HeadingSpan, CODE_FENCE, HEADING_DELIMITER};
