//! Splitting raw answer text at heading and code fence boundaries.
//!
//! The scan walks the text once, left to right. A split point is placed
//! immediately before every heading marker (`**Title**`) and every complete
//! fenced code block. Once a boundary is recognised the scan resumes after
//! its closing delimiter, so `**` inside a code block never splits it and a
//! fence inside a heading line is left alone.
//!
//! Only complete constructs split: an opening fence with no closing fence,
//! or a `**` with no partner anywhere after it, stays plain text. A heading
//! marker may span line breaks.

use std::ops::Range;

/// Opening/closing delimiter of a heading marker
pub const HEADING_DELIMITER: &str = "**";

/// Opening/closing delimiter of a fenced code block
pub const CODE_FENCE: &str = "```";

/// Location of a heading marker inside a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingSpan {
    /// Text between the delimiters
    pub inner: Range<usize>,
    /// Byte offset just past the closing delimiter run
    pub end: usize,
}

/// Location of a complete fenced code block inside a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenceSpan {
    /// Info string: the rest of the opening line, or the leading tag of a single-line fence
    pub info: Range<usize>,
    /// Code payload, untrimmed
    pub body: Range<usize>,
    /// Byte offset just past the closing fence run
    pub end: usize,
}

/// Length of the run of `ch` starting at `pos`
fn run_len(text: &str, pos: usize, ch: u8) -> usize {
    text.as_bytes()[pos..].iter().take_while(|&&b| b == ch).count()
}

/// Match a heading marker starting exactly at `pos`.
///
/// The closing delimiter is the next `**` after the opening run, across line
/// breaks; the enclosed text must not be blank. Returns `None` when `pos` is
/// out of range or not on a char boundary.
pub fn heading_at(text: &str, pos: usize) -> Option<HeadingSpan> {
    if !text.get(pos..)?.starts_with(HEADING_DELIMITER) {
        return None;
    }

    let inner_start = pos + run_len(text, pos, b'*');
    let close = inner_start + text[inner_start..].find(HEADING_DELIMITER)?;
    if text[inner_start..close].trim().is_empty() {
        return None;
    }

    Some(HeadingSpan {
        inner: inner_start..close,
        end: close + run_len(text, close, b'*'),
    })
}

/// Match a complete fenced code block starting exactly at `pos`.
///
/// Without a line break inside the fence (```` ```python print(1)``` ````), a
/// leading tag followed by whitespace is the info string and the rest is the
/// body. Returns `None` when `pos` is out of range or not on a char boundary.
pub fn fence_at(text: &str, pos: usize) -> Option<FenceSpan> {
    if !text.get(pos..)?.starts_with(CODE_FENCE) {
        return None;
    }

    let after_open = pos + run_len(text, pos, b'`');
    let close = after_open + text[after_open..].find(CODE_FENCE)?;
    let end = close + run_len(text, close, b'`');

    let (info, body) = match text[after_open..close].find('\n') {
        Some(nl) => (after_open..after_open + nl, after_open + nl + 1..close),
        None => {
            let tag = inline_tag_len(&text[after_open..close]);
            (after_open..after_open + tag, after_open + tag..close)
        }
    };

    Some(FenceSpan { info, body, end })
}

/// Length of a language tag at the start of a single-line fence body.
///
/// The tag must be followed by whitespace; otherwise there is no tag.
fn inline_tag_len(body: &str) -> usize {
    let len = body
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || b"_+#.-".contains(b))
        .count();

    match body.as_bytes().get(len) {
        Some(b) if len > 0 && b.is_ascii_whitespace() => len,
        _ => 0,
    }
}

/// Split raw answer text into ordered segments.
///
/// Every segment after the first starts at a heading marker or a code fence.
/// Concatenating the segments yields the input unchanged. Empty input gives
/// an empty list.
pub fn segment(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut pos = 0;

    while pos < text.len() {
        let boundary_end = match text.as_bytes()[pos] {
            b'`' => fence_at(text, pos).map(|span| span.end),
            b'*' => heading_at(text, pos).map(|span| span.end),
            _ => None,
        };

        match boundary_end {
            Some(end) => {
                if pos > start {
                    segments.push(&text[start..pos]);
                }
                start = pos;
                pos = end;
            }
            None => {
                pos += text[pos..].chars().next().map(char::len_utf8).unwrap_or(1);
            }
        }
    }

    if start < text.len() {
        segments.push(&text[start..]);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_markers_single_segment() {
        let text = "Just a plain answer.\nWith two lines.";
        assert_eq!(segment(text), vec![text]);
    }

    #[test]
    fn test_empty_input() {
        assert!(segment("").is_empty());
        assert_eq!(segment("   \n "), vec!["   \n "]);
    }

    #[test]
    fn test_splits_before_headings_and_fences() {
        let text = "Intro text\n**First**\nbody\n```rust\nfn main() {}\n```\ntail";
        let segments = segment(text);

        assert_eq!(
            segments,
            vec![
                "Intro text\n",
                "**First**\nbody\n",
                "```rust\nfn main() {}\n```\ntail",
            ]
        );
        assert_eq!(segments.concat(), text);
    }

    #[test]
    fn test_unterminated_fence_is_not_a_boundary() {
        let text = "Before\n```python\nprint(1)\n**Later**";
        let segments = segment(text);
        assert_eq!(segments, vec!["Before\n```python\nprint(1)\n", "**Later**"]);
    }

    #[test]
    fn test_delimiters_inside_code_do_not_split() {
        let text = "```py\nx = 2**3\ny = f(**kw)\n```";
        assert_eq!(segment(text), vec![text]);
    }

    #[test]
    fn test_unmatched_heading_delimiter() {
        let text = "Compute 2**3 quickly\nthen stop";
        assert_eq!(segment(text), vec![text]);
        assert!(heading_at("****", 0).is_none());
        assert!(heading_at("** **", 0).is_none());
    }

    #[test]
    fn test_fence_spans() {
        let text = "```python\nprint(1)\n```";
        let span = fence_at(text, 0).unwrap();
        assert_eq!(&text[span.info.clone()], "python");
        assert_eq!(&text[span.body.clone()], "print(1)\n");
        assert_eq!(span.end, text.len());

        let inline = "```x=1```";
        let span = fence_at(inline, 0).unwrap();
        assert_eq!(&inline[span.info.clone()], "");
        assert_eq!(&inline[span.body.clone()], "x=1");

        let tagged = "```python print(1)```";
        let span = fence_at(tagged, 0).unwrap();
        assert_eq!(&tagged[span.info.clone()], "python");
        assert_eq!(&tagged[span.body.clone()], " print(1)");
    }

    #[test]
    fn test_heading_spans_line_breaks() {
        let text = "**Multi\nline**\nbody";
        let span = heading_at(text, 0).unwrap();
        assert_eq!(&text[span.inner.clone()], "Multi\nline");
        assert_eq!(segment("intro **Multi\nline**\nbody"), vec!["intro ", text]);
    }

    #[test]
    fn test_out_of_range_positions_do_not_match() {
        let text = "é**Title**";
        assert!(heading_at(text, 1).is_none());
        assert!(heading_at(text, 100).is_none());
        assert!(fence_at("```x```", 42).is_none());
        assert!(fence_at("é```x```", 1).is_none());
        assert_eq!(heading_at(text, 2).map(|s| s.end), Some(text.len()));
    }

    #[test]
    fn test_multibyte_text_is_walked_safely() {
        let text = "Température élevée — **Résumé** fin";
        let segments = segment(text);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[1], "**Résumé** fin");
    }
}
