//! Code span detection.
//!
//! Finds byte ranges of a markdown document that hold code, so link
//! extraction, rewriting and link-word injection can leave them alone.
//!
//! # Passes
//!
//! | Pass       | Module     | Recognizes                                   |
//! |------------|------------|----------------------------------------------|
//! | fenced     | `fence`    | ```` ``` ```` / `~~~` blocks with a closing fence |
//! | html       | `html`     | `<code>…</code>`, `<pre>…</pre>`             |
//! | inline     | `inline`   | `` `…` `` pairs                              |
//! | indented   | `indent`   | 4-space / tab indented blocks                |
//!
//! Passes run in that order. A later pass does not *start* a span at a
//! position an earlier pass already covers, but spans are never merged or
//! trimmed: overlapping spans from different passes are all kept.

mod fence;
mod html;
mod indent;
mod inline;

/// Block kind of a code span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Fenced,
    Html,
    Inline,
    Indented,
}

/// A byte range of code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSpan {
    pub kind: SpanKind,
    /// First byte of the span.
    pub start: usize,
    /// One past the last byte (for fenced blocks: end of the closing fence line).
    pub end: usize,
    /// 1-based line of `start`.
    pub start_line: usize,
    /// 1-based line of the last byte.
    pub end_line: usize,
    /// Info string of a fenced block (`rust` in ```` ```rust ````).
    pub language: Option<String>,
}

impl CodeSpan {
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Ordered (by start) set of code spans of one text.
#[derive(Debug, Clone, Default)]
pub struct CodeSpans {
    spans: Vec<CodeSpan>,
}

impl CodeSpans {
    /// Run all passes over `text`.
    pub fn detect(text: &str) -> Self {
        let lines = LineIndex::new(text);
        let mut spans = Self::default();

        fence::detect(text, &lines, &mut spans);
        html::detect(text, &lines, &mut spans);
        inline::detect(text, &lines, &mut spans);
        indent::detect(text, &lines, &mut spans);

        spans.spans.sort_by_key(|s| s.start);
        spans
    }

    /// Whether `pos` falls inside any span.
    pub fn in_span(&self, pos: usize) -> bool {
        let candidates = self.spans.partition_point(|s| s.start <= pos);
        self.spans[..candidates].iter().any(|s| pos < s.end)
    }

    /// Whether one single span fully contains `[start, end)`.
    pub fn range_in_single_span(&self, start: usize, end: usize) -> bool {
        let candidates = self.spans.partition_point(|s| s.start <= start);
        self.spans[..candidates].iter().any(|s| end <= s.end)
    }

    /// Whether `[start, end)` touches any span.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        let candidates = self.spans.partition_point(|s| s.start < end);
        self.spans[..candidates].iter().any(|s| start < s.end)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CodeSpan> {
        self.spans.iter()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Record a span found by a pass (kept unsorted until `detect` finishes).
    fn push(&mut self, lines: &LineIndex, kind: SpanKind, start: usize, end: usize) {
        self.push_with_language(lines, kind, start, end, None);
    }

    fn push_with_language(
        &mut self,
        lines: &LineIndex,
        kind: SpanKind,
        start: usize,
        end: usize,
        language: Option<String>,
    ) {
        debug_assert!(start < end);
        self.spans.push(CodeSpan {
            kind,
            start,
            end,
            start_line: lines.line_of(start),
            end_line: lines.line_of(end - 1),
            language,
        });
    }

    /// Unsorted membership test used while passes are still running.
    fn covers(&self, pos: usize) -> bool {
        self.spans.iter().any(|s| s.contains(pos))
    }
}

/// Shorthand for `CodeSpans::detect`.
#[inline]
pub fn detect(text: &str) -> CodeSpans {
    CodeSpans::detect(text)
}

// ============================================================================
// Line helpers
// ============================================================================

/// Byte offsets of line starts, for 1-based line lookups.
struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    fn new(text: &str) -> Self {
        let mut starts = vec![0];
        starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self { starts }
    }

    fn line_of(&self, pos: usize) -> usize {
        self.starts.partition_point(|&s| s <= pos)
    }
}

/// One line of text without its terminator.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    /// Offset of the first byte.
    start: usize,
    /// Offset after the last content byte (before `\r\n` / `\n`).
    end: usize,
    text: &'a str,
}

fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let mut offset = 0;
    text.split_inclusive('\n').map(move |raw| {
        let start = offset;
        offset += raw.len();
        let content = raw.trim_end_matches('\n').trim_end_matches('\r');
        Line {
            start,
            end: start + content.len(),
            text: content,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = "# Title\n\
        \n\
        Some `inline` text and [[link]].\n\
        \n\
        ```rust\n\
        let x = `y`;\n\
        ```\n\
        \n\
        <pre>raw [[a]]</pre> then <CODE class=\"x\">c</CODE>\n\
        \n\
        \x20   indented\n\
        \x20   block\n\
        \n\
        after\n";

    #[test]
    fn test_span_bounds() {
        let spans = detect(DOC);
        assert!(!spans.is_empty());
        for span in spans.iter() {
            assert!(span.start < span.end, "{span:?}");
            assert!(span.start_line <= span.end_line, "{span:?}");
        }
        let starts: Vec<_> = spans.iter().map(|s| s.start).collect();
        assert!(starts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_all_kinds_detected() {
        let spans = detect(DOC);
        let kinds: Vec<_> = spans.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&SpanKind::Fenced));
        assert!(kinds.contains(&SpanKind::Html));
        assert!(kinds.contains(&SpanKind::Inline));
        assert!(kinds.contains(&SpanKind::Indented));
    }

    #[test]
    fn test_in_span_fenced_boundaries() {
        let text = "intro\n```\ncode here\n```\nafter";
        let spans = detect(text);
        let inside = text.find("code here").unwrap();
        assert!(spans.in_span(inside));

        let close_end = text.rfind("```").unwrap() + 3;
        assert!(spans.in_span(close_end - 1));
        assert!(!spans.in_span(close_end));
        assert!(!spans.in_span(text.find("after").unwrap()));
        assert!(!spans.in_span(0));
    }

    #[test]
    fn test_backticks_inside_fence_not_inline() {
        let spans = detect("```\nlet x = `y`;\n```\n");
        assert_eq!(spans.len(), 1);
        assert_eq!(spans.iter().next().unwrap().kind, SpanKind::Fenced);
    }

    #[test]
    fn test_range_in_single_span() {
        let text = "a `one` b `two` c";
        let spans = detect(text);
        let one = text.find("one").unwrap();
        let two = text.find("two").unwrap();
        assert!(spans.range_in_single_span(one, one + 3));
        // Crosses the gap between the two spans
        assert!(!spans.range_in_single_span(one, two + 3));
        assert!(!spans.range_in_single_span(0, 1));
    }

    #[test]
    fn test_overlaps() {
        let text = "a `one` b";
        let spans = detect(text);
        assert!(spans.overlaps(0, 3));
        assert!(!spans.overlaps(0, 2));
        assert!(!spans.overlaps(7, 9));
    }

    #[test]
    fn test_line_numbers() {
        let text = "x\n```\na\nb\n```\n";
        let span = detect(text).iter().next().cloned().unwrap();
        assert_eq!(span.start_line, 2);
        assert_eq!(span.end_line, 5);
    }

    #[test]
    fn test_overlapping_spans_kept() {
        // <code> inside <pre> is found by both html patterns
        let text = "<pre><code>x</code></pre>";
        let spans = detect(text);
        assert_eq!(spans.len(), 2);
    }

    #[test]
    fn test_lines_crlf() {
        let collected: Vec<_> = lines("ab\r\ncd").collect();
        assert_eq!(collected.len(), 2);
        assert_eq!(collected[0].text, "ab");
        assert_eq!(collected[0].end, 2);
        assert_eq!(collected[1].start, 4);
    }
}
