//! Link target positions.
//!
//! Extraction and rewriting walk the same sites so a catalog key found
//! during discovery is found again, at the same place, during rewriting.
//!
//! - markdown: `[text](target)`, `![alt](target)`, `<target>` form, optional
//!   `"title"` suffix, balanced parentheses inside the target
//! - html: `href`, `src`, `data-src`, `poster`, `action` attribute values
//! - bare: a whole metadata value that looks like a file path

use crate::utils::path::route::{is_external_link, split_path_fragment};
use regex::Regex;
use std::sync::LazyLock;

static URL_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:href|src|data-src|poster|action)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .unwrap()
});

/// Extensions that make a metadata value a file reference.
const PATH_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "gif", "webp", "svg", "bmp", "tiff", "ico", "avif", // images
    "pdf", "md", "markdown", "txt", "doc", "docx", // documents
    "mp4", "webm", "ogg", "mov", "mp3", "wav", "flac", // media
    "css", "js", "json", "xml", "yaml", "yml", "toml", // other assets
];

/// Longest metadata value treated as a path.
const MAX_PATH_LEN: usize = 200;

/// Where a target was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SiteOrigin {
    /// Markdown inline link; `construct` spans from `[` (or `!`) to `)`.
    Markdown {
        construct_start: usize,
        construct_end: usize,
        image: bool,
    },
    /// URL-bearing HTML attribute value.
    HtmlAttr,
    /// Whole metadata value.
    Bare,
}

/// Byte range of one link target inside a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSite {
    pub start: usize,
    pub end: usize,
    pub origin: SiteOrigin,
}

impl TargetSite {
    #[inline]
    pub fn target<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Range replaced when the whole construct is swapped (video embeds).
    pub fn construct(&self) -> (usize, usize) {
        match self.origin {
            SiteOrigin::Markdown {
                construct_start,
                construct_end,
                ..
            } => (construct_start, construct_end),
            SiteOrigin::HtmlAttr | SiteOrigin::Bare => (self.start, self.end),
        }
    }

    #[inline]
    pub fn is_markdown_image(&self) -> bool {
        matches!(self.origin, SiteOrigin::Markdown { image: true, .. })
    }
}

/// Markdown and HTML targets of a note body, ordered by start.
pub fn body_sites(text: &str) -> Vec<TargetSite> {
    let mut sites = markdown_sites(text);
    let markdown_count = sites.len();
    for site in html_sites(text) {
        // `[x](<a href="...">)` style nesting: the markdown site wins
        let nested = sites[..markdown_count]
            .iter()
            .any(|m| m.start <= site.start && site.end <= m.end);
        if !nested {
            sites.push(site);
        }
    }
    sites.sort_by_key(|s| s.start);
    sites
}

/// Targets of one metadata string.
///
/// Markdown and HTML targets inside the value; when there are none, the
/// whole (trimmed) value if it looks like a file path.
pub fn metadata_sites(value: &str) -> Vec<TargetSite> {
    let sites = body_sites(value);
    if !sites.is_empty() {
        return sites;
    }

    let trimmed = value.trim();
    if !is_potential_path(trimmed) {
        return sites;
    }
    let start = value.len() - value.trim_start().len();
    vec![TargetSite {
        start,
        end: start + trimmed.len(),
        origin: SiteOrigin::Bare,
    }]
}

// ============================================================================
// Markdown
// ============================================================================

/// Markdown inline link targets in order of appearance.
pub fn markdown_sites(text: &str) -> Vec<TargetSite> {
    let bytes = text.as_bytes();
    let mut sites = Vec::new();

    for (close_bracket, _) in text.match_indices("](") {
        let Some(label_start) = find_label_start(bytes, close_bracket) else {
            continue;
        };
        let Some((start, end, close_paren)) = parse_destination(text, close_bracket + 2) else {
            continue;
        };
        let image = label_start > 0 && bytes[label_start - 1] == b'!';
        sites.push(TargetSite {
            start,
            end,
            origin: SiteOrigin::Markdown {
                construct_start: if image { label_start - 1 } else { label_start },
                construct_end: close_paren + 1,
                image,
            },
        });
    }
    sites
}

/// The `[` opening the label that ends at `close`, honoring nested brackets
/// and never crossing a blank line.
fn find_label_start(bytes: &[u8], close: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = close;
    while i > 0 {
        i -= 1;
        match bytes[i] {
            b']' => depth += 1,
            b'[' if depth == 0 => return Some(i),
            b'[' => depth -= 1,
            b'\n' if i > 0 && bytes[i - 1] == b'\n' => return None,
            _ => {}
        }
    }
    None
}

/// Parse a link destination starting right after `](`.
///
/// Returns the target range (title and surrounding blanks excluded) and the
/// index of the closing `)`.
fn parse_destination(text: &str, from: usize) -> Option<(usize, usize, usize)> {
    let bytes = text.as_bytes();
    let mut i = from;
    while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
        i += 1;
    }

    if bytes.get(i) == Some(&b'<') {
        let start = i + 1;
        let end = start + text[start..].find(['>', '\n'])?;
        if bytes[end] != b'>' {
            return None;
        }
        let close = skip_title(bytes, end + 1)?;
        return Some((start, end, close));
    }

    let start = i;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'\n' => return None,
            b'(' => depth += 1,
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            _ => {}
        }
        i += 1;
    }
    if i >= bytes.len() {
        return None;
    }

    let end = start + target_len(&text[start..i]);
    Some((start, end, i))
}

/// Length of `raw` once trailing blanks and a `"title"` / `'title'` suffix
/// are dropped.
fn target_len(raw: &str) -> usize {
    let trimmed = raw.trim_end();
    for quote in ['"', '\''] {
        if trimmed.len() < 2 || !trimmed.ends_with(quote) {
            continue;
        }
        let inner = &trimmed[..trimmed.len() - 1];
        if let Some(open) = inner.rfind(quote)
            && inner[..open].ends_with([' ', '\t'])
        {
            return inner[..open].trim_end().len();
        }
    }
    trimmed.len()
}

/// Skip an optional title after `<target>` and return the `)` index.
fn skip_title(bytes: &[u8], mut i: usize) -> Option<usize> {
    let skip_blank = |mut i: usize| {
        while i < bytes.len() && matches!(bytes[i], b' ' | b'\t') {
            i += 1;
        }
        i
    };
    i = skip_blank(i);
    if let Some(&quote @ (b'"' | b'\'')) = bytes.get(i) {
        let rel = bytes[i + 1..].iter().position(|&b| b == quote)?;
        i = skip_blank(i + 1 + rel + 1);
    }
    (bytes.get(i) == Some(&b')')).then_some(i)
}

// ============================================================================
// HTML
// ============================================================================

/// URL-bearing HTML attribute values in order of appearance.
pub fn html_sites(text: &str) -> Vec<TargetSite> {
    URL_ATTR
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|value| TargetSite {
            start: value.start(),
            end: value.end(),
            origin: SiteOrigin::HtmlAttr,
        })
        .collect()
}

// ============================================================================
// Bare paths
// ============================================================================

/// Whether a metadata value looks like a file reference.
///
/// True for `./` and `../` prefixes, values ending in a known extension
/// without blanks, and `a/b` shapes without empty segments.
pub fn is_potential_path(text: &str) -> bool {
    let text = text.trim();
    if text.is_empty()
        || text.len() >= MAX_PATH_LEN
        || text.contains('\n')
        || text.starts_with('#')
        || is_external_link(text)
    {
        return false;
    }

    if text.starts_with("./") || text.starts_with("../") {
        return true;
    }

    let (path, _) = split_path_fragment(text);
    let has_extension = path
        .rsplit_once('.')
        .is_some_and(|(_, ext)| PATH_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)));
    if has_extension && !text.contains(char::is_whitespace) {
        return true;
    }

    let parts: Vec<&str> = text.split('/').collect();
    parts.len() >= 2 && parts.iter().all(|p| !p.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn targets(text: &str) -> Vec<&str> {
        body_sites(text).iter().map(|s| s.target(text)).collect()
    }

    #[test]
    fn test_inline_and_image() {
        let text = "a [b](notes/b.md) and ![](img.PNG)";
        let sites = body_sites(text);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].target(text), "notes/b.md");
        assert!(!sites[0].is_markdown_image());
        assert_eq!(sites[1].target(text), "img.PNG");
        assert!(sites[1].is_markdown_image());
        let (s, e) = sites[1].construct();
        assert_eq!(&text[s..e], "![](img.PNG)");
    }

    #[test]
    fn test_spaces_in_target() {
        assert_eq!(targets("[My Note](My Note)"), vec!["My Note"]);
        assert_eq!(targets("[x]( padded.md )"), vec!["padded.md"]);
    }

    #[test]
    fn test_title_stripped() {
        assert_eq!(targets(r#"[a](b.md "The B")"#), vec!["b.md"]);
        assert_eq!(targets("[a](b.md 'T')"), vec!["b.md"]);
        assert_eq!(targets(r#"[a](<my file.md> "T")"#), vec!["my file.md"]);
    }

    #[test]
    fn test_balanced_parens() {
        assert_eq!(targets("[w](wiki/Rust_(language).md)"), vec!["wiki/Rust_(language).md"]);
    }

    #[test]
    fn test_nested_image_in_link() {
        let text = "[![logo](logo.png)](home.md)";
        let sites = body_sites(text);
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].target(text), "logo.png");
        assert_eq!(sites[1].target(text), "home.md");
        assert_eq!(sites[1].construct(), (0, text.len()));
    }

    #[test]
    fn test_empty_target() {
        let text = "[x]()";
        let sites = body_sites(text);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].target(text), "");
    }

    #[test]
    fn test_not_links() {
        assert!(targets("just ](text) without label").is_empty());
        assert!(targets("[a](unclosed").is_empty());
        assert!(targets("[a](line\nbreak)").is_empty());
        assert!(targets("[a]\n\n](b.md)").is_empty());
    }

    #[test]
    fn test_html_attributes() {
        let text = r#"<img src="a.png"> <a HREF='b.md#x'>b</a> <img data-src="c.png"> <video poster="p.jpg">"#;
        assert_eq!(targets(text), vec!["a.png", "b.md#x", "c.png", "p.jpg"]);
    }

    #[test]
    fn test_metadata_sites() {
        let value = "  ./cover.png ";
        let sites = metadata_sites(value);
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].target(value), "./cover.png");
        assert_eq!(sites[0].origin, SiteOrigin::Bare);

        let value = "see [b](b.md)";
        assert_eq!(metadata_sites(value)[0].target(value), "b.md");

        assert!(metadata_sites("Just a sentence.").is_empty());
    }

    #[test]
    fn test_is_potential_path() {
        assert!(is_potential_path("./x"));
        assert!(is_potential_path("../up/x"));
        assert!(is_potential_path("img.PNG"));
        assert!(is_potential_path("a/b"));
        assert!(is_potential_path("notes/b.md#part"));
        assert!(!is_potential_path("https://x.com/a.png"));
        assert!(!is_potential_path("#anchor"));
        assert!(!is_potential_path("my cover.png"));
        assert!(!is_potential_path("a//b"));
        assert!(!is_potential_path("v1.0"));
        assert!(!is_potential_path(&"a/".repeat(120)));
    }
}
