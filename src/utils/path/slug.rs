//! Slugification for note file names and attachment names.
//!
//! Notes are usually titled in mixed scripts ("Rust 学习笔记"), so slugging
//! runs in two steps: [`add_spaces`] separates CJK runs from Latin words and
//! digits, then [`slugify`] transliterates (or keeps) and joins the words.

use crate::config::{SlugConfig, SlugMode};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// Markdown inline link, keeping only the link text.
static MARKDOWN_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!?\[([^\]]*)\]\([^)]*\)").unwrap());

/// Check if a character belongs to a CJK script (Han, kana, hangul).
#[inline]
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{3040}'..='\u{30FF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{4E00}'..='\u{9FFF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2A6DF}')
}

/// Insert a space wherever CJK text touches ASCII letters, digits or brackets.
///
/// # Examples
/// ```ignore
/// add_spaces("Rust学习笔记2024") -> "Rust 学习笔记 2024"
/// add_spaces("hello world")      -> "hello world"
/// ```
pub fn add_spaces(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 8);
    let mut prev: Option<char> = None;
    for c in text.chars() {
        if let Some(p) = prev
            && needs_space(p, c)
        {
            out.push(' ');
        }
        out.push(c);
        prev = Some(c);
    }
    out
}

fn needs_space(left: char, right: char) -> bool {
    let latin = |c: char| c.is_ascii_alphanumeric();
    let open = |c: char| matches!(c, '(' | '[');
    let close = |c: char| matches!(c, ')' | ']');
    (is_cjk(left) && (latin(right) || open(right)))
        || ((latin(left) || close(left)) && is_cjk(right))
}

/// Replace markdown links with their text: `[Foo](foo.md) bar` -> `Foo bar`.
pub fn strip_markdown_links(text: &str) -> Cow<'_, str> {
    MARKDOWN_LINK.replace_all(text, "$1")
}

/// Turn arbitrary text into a URL-safe slug.
///
/// - `ascii`: transliterate to ASCII first (`你好` -> `ni-hao`)
/// - `safe`: keep Unicode letters, drop everything else
///
/// Runs of non-alphanumeric characters collapse into one separator; the
/// result is lower-cased and never starts or ends with a separator.
pub fn slugify(text: &str, config: &SlugConfig) -> String {
    let text: Cow<'_, str> = match config.mode {
        SlugMode::Ascii => Cow::Owned(deunicode::deunicode(text)),
        SlugMode::Safe => Cow::Borrowed(text),
    };
    let sep = config.separator.as_char();

    let mut out = String::with_capacity(text.len());
    let mut pending_sep = false;
    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push(sep);
            }
            pending_sep = false;
            out.extend(c.to_lowercase());
        } else {
            pending_sep = true;
        }
    }
    out
}
