//! Destination file names of converted notes.

use crate::config::SlugConfig;
use crate::utils::path::slug::{add_spaces, slugify, strip_markdown_links};
use std::path::{Path, PathBuf};

/// Slug of a note: the `slug` metadata when present, else the file stem.
///
/// Markdown link syntax is reduced to its text and CJK runs are spaced off
/// Latin words before slugifying (`Rust学习` -> `rust-xue-xi`).
pub fn note_slug(meta_slug: Option<&str>, stem: &str, config: &SlugConfig) -> String {
    let source = meta_slug
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(stem);
    let text = strip_markdown_links(source);
    let text: String = text
        .chars()
        .filter(|c| !matches!(c, '[' | ']' | '(' | ')' | '#'))
        .collect();
    let slug = slugify(&add_spaces(&text), config);
    if slug.is_empty() {
        slugify(&add_spaces(stem), config)
    } else {
        slug
    }
}

/// `<dest_dir>/<slug>[.<lang>].md`
pub fn destination(dest_dir: &Path, slug: &str, lang: Option<&str>) -> PathBuf {
    let name = match lang.map(str::trim).filter(|l| !l.is_empty()) {
        Some(lang) => format!("{slug}.{lang}.md"),
        None => format!("{slug}.md"),
    };
    dest_dir.join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_from_stem() {
        let config = SlugConfig::default();
        assert_eq!(note_slug(None, "Hello World", &config), "hello-world");
        assert_eq!(note_slug(Some("  "), "Hello", &config), "hello");
    }

    #[test]
    fn test_slug_from_meta_strips_links() {
        let config = SlugConfig::default();
        assert_eq!(
            note_slug(Some("[Intro](intro.md) to #Rust"), "x", &config),
            "intro-to-rust"
        );
    }

    #[test]
    fn test_destination_with_lang() {
        let dir = Path::new("posts");
        assert_eq!(destination(dir, "hello", None), PathBuf::from("posts/hello.md"));
        assert_eq!(destination(dir, "hello", Some("en")), PathBuf::from("posts/hello.en.md"));
        assert_eq!(destination(Path::new(""), "a", None), PathBuf::from("a.md"));
    }
}
