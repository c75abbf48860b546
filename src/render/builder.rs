//! Turning segmented answer text into a [`Document`].

use regex::Regex;
use std::sync::OnceLock;

use super::citation::tokenize_citations;
use super::segment::{fence_at, heading_at, segment, CODE_FENCE, HEADING_DELIMITER};
use crate::models::{Block, CodeBlock, Document, DEFAULT_CODE_LANGUAGE};

static LANGUAGE_TAG: OnceLock<Regex> = OnceLock::new();

fn language_tag() -> &'static Regex {
    LANGUAGE_TAG.get_or_init(|| {
        Regex::new(r"^\s*([A-Za-z0-9_][A-Za-z0-9_+#.\-]*)").expect("valid language tag regex")
    })
}

/// What a single segment turned out to be
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece<'a> {
    Heading { text: String, rest: &'a str },
    Code { block: CodeBlock, rest: &'a str },
    Paragraph(&'a str),
    Blank,
}

/// Builds documents from raw answer text.
///
/// Building is a pure function of the input and the configured default
/// language: it never fails, and the same text always yields an equal
/// document.
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    default_language: String,
}

impl Default for DocumentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBuilder {
    /// Create a builder using [`DEFAULT_CODE_LANGUAGE`] for untagged fences
    pub fn new() -> Self {
        Self {
            default_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }

    /// Use a different language for untagged fences; blank values are ignored
    pub fn with_default_language(mut self, language: impl Into<String>) -> Self {
        let language = language.into();
        if !language.trim().is_empty() {
            self.default_language = language.trim().to_string();
        }
        self
    }

    /// Language applied to untagged fences
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Build a document from raw answer text
    pub fn build(&self, raw: &str) -> Document {
        let mut assembler = Assembler::default();

        for seg in segment(raw) {
            match self.classify(seg) {
                Piece::Heading { text, rest } => {
                    assembler.heading(text);
                    assembler.paragraph(rest);
                }
                Piece::Code { block, rest } => {
                    assembler.code(block);
                    assembler.paragraph(rest);
                }
                Piece::Paragraph(text) => assembler.paragraph(text),
                Piece::Blank => {}
            }
        }

        assembler.finish()
    }

    fn classify<'a>(&self, seg: &'a str) -> Piece<'a> {
        let trimmed = seg.trim_start();

        if trimmed.starts_with(HEADING_DELIMITER) {
            if let Some(span) = heading_at(trimmed, 0) {
                let text = trimmed[span.inner].trim();
                if !text.is_empty() {
                    return Piece::Heading {
                        text: text.to_string(),
                        rest: &trimmed[span.end..],
                    };
                }
            }
        }

        if trimmed.starts_with(CODE_FENCE) {
            if let Some(span) = fence_at(trimmed, 0) {
                let language = language_tag()
                    .captures(&trimmed[span.info])
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str())
                    .unwrap_or(self.default_language.as_str());

                return Piece::Code {
                    block: CodeBlock::new(language, &trimmed[span.body]),
                    rest: &trimmed[span.end..],
                };
            }
        }

        if seg.trim().is_empty() {
            Piece::Blank
        } else {
            Piece::Paragraph(seg)
        }
    }
}

/// Append-only block sequence with one heading of lookback.
///
/// A heading is held back until the next piece arrives: a code block fuses
/// into it, anything else releases it unchanged.
#[derive(Debug, Default)]
struct Assembler {
    blocks: Vec<Block>,
    pending_heading: Option<String>,
}

impl Assembler {
    fn heading(&mut self, text: String) {
        self.flush();
        self.pending_heading = Some(text);
    }

    fn code(&mut self, block: CodeBlock) {
        match self.pending_heading.take() {
            Some(text) => self.blocks.push(Block::Heading {
                text,
                trailing_code: Some(block),
            }),
            None => self.blocks.push(Block::Code(block)),
        }
    }

    fn paragraph(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        self.flush();
        self.blocks.push(Block::paragraph(tokenize_citations(text)));
    }

    fn flush(&mut self) {
        if let Some(text) = self.pending_heading.take() {
            self.blocks.push(Block::heading(text));
        }
    }

    fn finish(mut self) -> Document {
        self.flush();
        Document::new(self.blocks)
    }
}

/// Build a document with the default builder settings
pub fn build_document(raw: &str) -> Document {
    DocumentBuilder::new().build(raw)
}
