//! Fenced code blocks.
//!
//! A line whose trimmed form starts with three or more identical fence
//! characters opens a block; the rest of the line is the info string. The
//! block ends at the next line made only of the same character (three or
//! more). A fence that is never closed produces no span: end of input is not
//! an implicit close, and scanning resumes on the line after the opener.

use super::{CodeSpans, Line, LineIndex, SpanKind, lines};

const MIN_FENCE: usize = 3;

pub(super) fn detect(text: &str, index: &LineIndex, spans: &mut CodeSpans) {
    let lines: Vec<Line<'_>> = lines(text).collect();
    let mut i = 0;

    while i < lines.len() {
        let Some((marker, language)) = open_fence(lines[i].text.trim()) else {
            i += 1;
            continue;
        };
        let close = lines[i + 1..]
            .iter()
            .position(|line| is_closing(line.text.trim(), marker));
        match close {
            Some(offset) => {
                let close = i + 1 + offset;
                spans.push_with_language(
                    index,
                    SpanKind::Fenced,
                    lines[i].start,
                    lines[close].end,
                    language.map(str::to_string),
                );
                i = close + 1;
            }
            // unclosed: not a block, the opener is plain text
            None => i += 1,
        }
    }
}

/// Opening fence: marker char and optional info string.
fn open_fence(trimmed: &str) -> Option<(u8, Option<&str>)> {
    let marker = *trimmed.as_bytes().first()?;
    if marker != b'`' && marker != b'~' {
        return None;
    }
    let run = trimmed.bytes().take_while(|&b| b == marker).count();
    if run < MIN_FENCE {
        return None;
    }
    let info = trimmed[run..].trim();
    Some((marker, (!info.is_empty()).then_some(info)))
}

/// Closing fence: only `marker`, at least three of them.
fn is_closing(trimmed: &str, marker: u8) -> bool {
    trimmed.len() >= MIN_FENCE && trimmed.bytes().all(|b| b == marker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::CodeSpans;

    fn fenced(text: &str) -> Vec<(usize, usize, Option<String>)> {
        let index = LineIndex::new(text);
        let mut spans = CodeSpans::default();
        detect(text, &index, &mut spans);
        spans
            .iter()
            .map(|s| (s.start, s.end, s.language.clone()))
            .collect()
    }

    #[test]
    fn test_open_fence() {
        assert_eq!(open_fence("```"), Some((b'`', None)));
        assert_eq!(open_fence("```rust"), Some((b'`', Some("rust"))));
        assert_eq!(open_fence("~~~~ python "), Some((b'~', Some("python"))));
        assert_eq!(open_fence("``"), None);
        assert_eq!(open_fence("text"), None);
        assert_eq!(open_fence(""), None);
    }

    #[test]
    fn test_is_closing() {
        assert!(is_closing("```", b'`'));
        assert!(is_closing("`````", b'`'));
        assert!(!is_closing("~~~", b'`'));
        assert!(!is_closing("``", b'`'));
        assert!(!is_closing("``` x", b'`'));
    }

    #[test]
    fn test_block_with_language() {
        let text = "a\n```rust\nfn main() {}\n```\nb";
        let found = fenced(text);
        assert_eq!(found.len(), 1);
        let (start, end, lang) = &found[0];
        assert_eq!(&text[*start..*end], "```rust\nfn main() {}\n```");
        assert_eq!(lang.as_deref(), Some("rust"));
    }

    #[test]
    fn test_tilde_block_ignores_backtick_close() {
        let text = "~~~\n```\nstill code\n~~~\n";
        let found = fenced(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].0..found[0].1], "~~~\n```\nstill code\n~~~");
    }

    #[test]
    fn test_unterminated_fence_produces_nothing() {
        assert!(fenced("```\nnever closed\n").is_empty());
        assert!(fenced("ok\n```js\nlet a = 1;").is_empty());
    }

    #[test]
    fn test_unclosed_fence_does_not_swallow_later_block() {
        let text = "~~~\nunclosed\n\n```\nline1\nline2\n[x](b.md)\n```\nafter\n";
        let found = fenced(text);
        assert_eq!(found.len(), 1);
        assert_eq!(
            &text[found[0].0..found[0].1],
            "```\nline1\nline2\n[x](b.md)\n```"
        );

        let spans = CodeSpans::detect(text);
        assert!(spans.in_span(text.find("[x]").unwrap()));
        assert!(!spans.in_span(text.find("after").unwrap()));
    }

    #[test]
    fn test_closed_fence_after_unclosed_opener() {
        let text = "```\ntext\n~~~\ncode\n~~~\n";
        let found = fenced(text);
        assert_eq!(found.len(), 1);
        assert_eq!(&text[found[0].0..found[0].1], "~~~\ncode\n~~~");
    }

    #[test]
    fn test_indented_fence_markers() {
        let text = "  ```\n  code\n  ```\n";
        assert_eq!(fenced(text).len(), 1);
    }

    #[test]
    fn test_consecutive_blocks() {
        let text = "```\na\n```\ntext\n```\nb\n```";
        assert_eq!(fenced(text).len(), 2);
    }
}
