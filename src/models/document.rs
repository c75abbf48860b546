//! Structured document model produced from a raw generated answer.

use serde::{Deserialize, Serialize};

/// Language assigned to a fenced code block that carries no language tag.
pub const DEFAULT_CODE_LANGUAGE: &str = "javascript";

/// A fenced code block.
///
/// `code` is always trimmed and `language` is never empty; use [`CodeBlock::new`]
/// to get both guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence, or the default language
    pub language: String,

    /// Code payload with surrounding whitespace removed
    pub code: String,
}

impl CodeBlock {
    /// Create a code block, trimming the payload and falling back to
    /// [`DEFAULT_CODE_LANGUAGE`] when `language` is blank.
    pub fn new(language: impl Into<String>, code: impl AsRef<str>) -> Self {
        let language = language.into();
        let language = if language.trim().is_empty() {
            DEFAULT_CODE_LANGUAGE.to_string()
        } else {
            language.trim().to_string()
        };

        Self {
            language,
            code: code.as_ref().trim().to_string(),
        }
    }
}

/// One inline run of paragraph text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TextRun {
    /// Literal text, whitespace included
    Text { value: String },

    /// Inline citation marker such as `[3]`; holds the digits only
    Citation { number: String },
}

impl TextRun {
    /// Create a plain text run
    pub fn text(value: impl Into<String>) -> Self {
        TextRun::Text {
            value: value.into(),
        }
    }

    /// Create a citation marker run
    pub fn citation(number: impl Into<String>) -> Self {
        TextRun::Citation {
            number: number.into(),
        }
    }

    /// Returns the citation number if this run is a marker
    pub fn citation_number(&self) -> Option<&str> {
        match self {
            TextRun::Citation { number } => Some(number),
            TextRun::Text { .. } => None,
        }
    }
}

/// One structural unit of a rendered answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A heading, optionally fused with the code block that directly follows it
    Heading {
        text: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        trailing_code: Option<CodeBlock>,
    },

    /// A code block that is not attached to a heading
    Code(CodeBlock),

    /// A body paragraph; never empty
    Paragraph { runs: Vec<TextRun> },
}

impl Block {
    /// Create a heading block without trailing code
    pub fn heading(text: impl Into<String>) -> Self {
        Block::Heading {
            text: text.into(),
            trailing_code: None,
        }
    }

    /// Create a paragraph block from runs
    pub fn paragraph(runs: Vec<TextRun>) -> Self {
        Block::Paragraph { runs }
    }

    /// Concatenated plain text of the block, with citation markers written back as `[n]`
    pub fn plain_text(&self) -> String {
        match self {
            Block::Heading { text, .. } => text.clone(),
            Block::Code(code) => code.code.clone(),
            Block::Paragraph { runs } => runs
                .iter()
                .map(|run| match run {
                    TextRun::Text { value } => value.clone(),
                    TextRun::Citation { number } => format!("[{}]", number),
                })
                .collect(),
        }
    }
}

/// An answer transformed into ordered blocks, in reading order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    blocks: Vec<Block>,
}

impl Document {
    /// Create a document from an already ordered block list
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Blocks in reading order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Number of blocks
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over blocks in reading order
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// All citation numbers in reading order, duplicates included
    pub fn citations(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph { runs } => Some(runs),
                _ => None,
            })
            .flatten()
            .filter_map(TextRun::citation_number)
            .collect()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
