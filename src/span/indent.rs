//! Indented code blocks.
//!
//! A non-blank line starting with four spaces or a tab opens a block unless
//! its first byte is already covered. The block runs through following
//! indented or blank lines and ends after its last indented line.

use super::{CodeSpans, LineIndex, SpanKind, lines};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Outside,
    InBlock { start: usize, end: usize },
}

pub(super) fn detect(text: &str, index: &LineIndex, spans: &mut CodeSpans) {
    let mut found = Vec::new();
    let mut state = State::Outside;

    for line in lines(text) {
        let blank = line.text.trim().is_empty();
        let indented = !blank && is_indented(line.text);

        state = match state {
            State::Outside if indented && !spans.covers(line.start) => State::InBlock {
                start: line.start,
                end: line.end,
            },
            State::Outside => State::Outside,
            State::InBlock { start, .. } if indented => State::InBlock {
                start,
                end: line.end,
            },
            block @ State::InBlock { .. } if blank => block,
            State::InBlock { start, end } => {
                found.push((start, end));
                State::Outside
            }
        };
    }
    if let State::InBlock { start, end } = state {
        found.push((start, end));
    }

    for (start, end) in found {
        spans.push(index, SpanKind::Indented, start, end);
    }
}

#[inline]
fn is_indented(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indented(text: &str) -> Vec<&str> {
        let index = LineIndex::new(text);
        let mut spans = CodeSpans::default();
        detect(text, &index, &mut spans);
        spans.iter().map(|s| &text[s.start..s.end]).collect()
    }

    #[test]
    fn test_block_through_blank_lines() {
        let text = "para\n\n    a\n\n    b\n\nafter";
        assert_eq!(indented(text), vec!["    a\n\n    b"]);
    }

    #[test]
    fn test_tab_indent() {
        assert_eq!(indented("x\n\tcode\ny"), vec!["\tcode"]);
    }

    #[test]
    fn test_three_spaces_not_code() {
        assert!(indented("   not code").is_empty());
    }

    #[test]
    fn test_block_at_end_of_input() {
        assert_eq!(indented("x\n    last"), vec!["    last"]);
    }

    #[test]
    fn test_whitespace_only_line_does_not_open() {
        assert!(indented("      \nx").is_empty());
    }
}
