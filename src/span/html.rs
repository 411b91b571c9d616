//! `<code>` and `<pre>` elements.
//!
//! Pairing is non-nesting: an open tag ends at the first following close tag
//! of the same name. An open tag without a close tag is skipped.

use super::{CodeSpans, LineIndex, SpanKind};
use regex::Regex;
use std::sync::LazyLock;

static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>.*?</code\s*>").unwrap());

static PRE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<pre\b[^>]*>.*?</pre\s*>").unwrap());

pub(super) fn detect(text: &str, index: &LineIndex, spans: &mut CodeSpans) {
    // <code> first: inside <pre> it is still reported on its own
    for pattern in [&*CODE, &*PRE] {
        let mut pos = 0;
        while let Some(m) = pattern.find_at(text, pos) {
            if spans.covers(m.start()) {
                // '<' is ASCII, so +1 stays on a char boundary
                pos = m.start() + 1;
                continue;
            }
            spans.push(index, SpanKind::Html, m.start(), m.end());
            pos = m.end();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn html(text: &str) -> Vec<&str> {
        let index = LineIndex::new(text);
        let mut spans = CodeSpans::default();
        detect(text, &index, &mut spans);
        spans.iter().map(|s| &text[s.start..s.end]).collect()
    }

    #[test]
    fn test_code_and_pre() {
        let text = "a <code>x</code> b <pre class=\"p\">\ny\n</pre> c";
        assert_eq!(html(text), vec!["<code>x</code>", "<pre class=\"p\">\ny\n</pre>"]);
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(html("<CODE>x</Code>"), vec!["<CODE>x</Code>"]);
    }

    #[test]
    fn test_non_nesting_first_close_wins() {
        let text = "<code>a<code>b</code>c</code>";
        assert_eq!(html(text), vec!["<code>a<code>b</code>"]);
    }

    #[test]
    fn test_unclosed_open_tag_skipped() {
        assert!(html("<code>never closed").is_empty());
    }

    #[test]
    fn test_codeblock_tag_not_code() {
        // `\b` keeps <codeblock> from matching
        assert!(html("<codeblock>x</code>").is_empty());
    }

    #[test]
    fn test_skips_matches_starting_in_fence() {
        let text = "```\n<code>\n```\n<code>y</code>";
        let index = LineIndex::new(text);
        let mut spans = CodeSpans::default();
        super::super::fence::detect(text, &index, &mut spans);
        detect(text, &index, &mut spans);
        let html: Vec<_> = spans
            .iter()
            .filter(|s| s.kind == SpanKind::Html)
            .map(|s| &text[s.start..s.end])
            .collect();
        assert_eq!(html, vec!["<code>y</code>"]);
    }
}
