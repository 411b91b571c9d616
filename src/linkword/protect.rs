//! Text regions link words must not touch.

use crate::link::scan::markdown_sites;
use crate::span::CodeSpans;
use regex::Regex;
use std::sync::LazyLock;

/// `<a ...>...</a>`, across lines.
static ANCHOR_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<a\b[^>]*>.*?</a\s*>").unwrap());

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>\n]+>").unwrap());

static BARE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:https?|ftp)://[^\s<>()\[\]]+").unwrap());

/// Code spans plus every link, tag and URL of a text.
#[derive(Debug)]
pub struct Protected {
    spans: CodeSpans,
    ranges: Vec<(usize, usize)>,
}

impl Protected {
    pub fn scan(text: &str) -> Self {
        let mut ranges: Vec<(usize, usize)> = markdown_sites(text)
            .iter()
            .map(|site| site.construct())
            .collect();
        for re in [&*ANCHOR_ELEMENT, &*HTML_TAG, &*BARE_URL] {
            ranges.extend(re.find_iter(text).map(|m| (m.start(), m.end())));
        }
        ranges.sort_unstable();
        Self {
            spans: CodeSpans::detect(text),
            ranges,
        }
    }

    /// Whether `[start, end)` touches a protected region.
    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        if self.spans.overlaps(start, end) {
            return true;
        }
        let candidates = self.ranges.partition_point(|&(s, _)| s < end);
        self.ranges[..candidates].iter().any(|&(_, e)| start < e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn protected_at(text: &str, needle: &str) -> bool {
        let start = text.find(needle).unwrap();
        Protected::scan(text).overlaps(start, start + needle.len())
    }

    #[test]
    fn test_links_and_images() {
        assert!(protected_at("see [Rust book](b.md) now", "Rust"));
        assert!(protected_at("![Rust logo](r.png)", "Rust"));
        assert!(!protected_at("[x](b.md) Rust", "Rust"));
    }

    #[test]
    fn test_html() {
        assert!(protected_at("<a href=\"x\">the Rust site</a>", "Rust"));
        assert!(protected_at("<img alt=\"Rust\">", "Rust"));
        assert!(!protected_at("<b>Rust</b>", "Rust"));
    }

    #[test]
    fn test_code_and_urls() {
        assert!(protected_at("use `Rust` here", "Rust"));
        assert!(protected_at("go to https://rust-lang.org/Rust today", "Rust"));
    }
}
