//! Inline citation marker tokenizing.

use regex::Regex;
use std::sync::OnceLock;

use crate::models::TextRun;

static CITATION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn citation_pattern() -> &'static Regex {
    CITATION_PATTERN.get_or_init(|| Regex::new(r"\[[0-9]+\]").expect("valid citation regex"))
}

/// Split paragraph text into plain text runs and citation markers.
///
/// Every `[n]` (ASCII digits only) becomes a [`TextRun::Citation`] holding the
/// digits verbatim; everything between markers, whitespace included, becomes a
/// [`TextRun::Text`]. Runs appear in source order and never contain empty text.
pub fn tokenize_citations(text: &str) -> Vec<TextRun> {
    let mut runs = Vec::new();
    let mut last = 0;

    for marker in citation_pattern().find_iter(text) {
        if marker.start() > last {
            runs.push(TextRun::text(&text[last..marker.start()]));
        }
        runs.push(TextRun::citation(&text[marker.start() + 1..marker.end() - 1]));
        last = marker.end();
    }

    if last < text.len() {
        runs.push(TextRun::text(&text[last..]));
    }

    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_markers_and_text_in_order() {
        let runs = tokenize_citations("Water boils at 100C[1] and freezes at 0C[2].");

        assert_eq!(
            runs,
            vec![
                TextRun::text("Water boils at 100C"),
                TextRun::citation("1"),
                TextRun::text(" and freezes at 0C"),
                TextRun::citation("2"),
                TextRun::text("."),
            ]
        );
    }

    #[test]
    fn test_adjacent_markers_and_numbers_kept_verbatim() {
        let runs = tokenize_citations("[3][3][007] end");
        assert_eq!(
            runs,
            vec![
                TextRun::citation("3"),
                TextRun::citation("3"),
                TextRun::citation("007"),
                TextRun::text(" end"),
            ]
        );
    }

    #[test]
    fn test_non_numeric_brackets_stay_text() {
        let text = "see [a], [] and [1a] or [ 2 ]";
        assert_eq!(tokenize_citations(text), vec![TextRun::text(text)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize_citations("").is_empty());
    }

    #[test]
    fn test_whitespace_runs_preserved() {
        let runs = tokenize_citations("  [1]  ");
        assert_eq!(
            runs,
            vec![TextRun::text("  "), TextRun::citation("1"), TextRun::text("  ")]
        );
    }
}
