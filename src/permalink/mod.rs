//! Page URLs as the target site generator will publish them.
//!
//! Link rewriting and link-word registration both need the final URL of a
//! converted note. Generators differ in how they derive it:
//!
//! | Generator | Provider           | URL source                                  |
//! |-----------|--------------------|---------------------------------------------|
//! | Hugo      | [`HugoPermalinks`] | `[permalinks]` pattern per section          |
//! | Zola      | [`ZolaPermalinks`] | content-relative directory + slug           |
//!
//! Both share the finishing steps in [`finish`]: language prefix, trailing
//! slash, percent-encoding.

pub mod detect;
mod hugo;
mod site_config;
mod zola;

pub use detect::detect_ssg;
pub use hugo::HugoPermalinks;
pub use zola::ZolaPermalinks;

use crate::core::SsgKind;
use crate::utils::date::DateTimeUtc;
use crate::utils::path::route::encode_path;
use std::path::{Component, Path};

/// Section used when a page sits directly in `content/`.
pub const DEFAULT_SECTION: &str = "posts";

/// What a provider knows about a converted page.
#[derive(Debug, Clone, Copy)]
pub struct PageInfo<'a> {
    /// Destination relative to `content/` (`posts/hello.en.md`).
    pub rel_path: &'a Path,
    pub slug: &'a str,
    pub title: &'a str,
    pub date: DateTimeUtc,
    pub lang: Option<&'a str>,
}

impl PageInfo<'_> {
    /// First directory of the destination, or [`DEFAULT_SECTION`].
    pub fn section(&self) -> &str {
        self.dirs().next().unwrap_or(DEFAULT_SECTION)
    }

    /// Directories between `content/` and the file.
    pub fn dirs(&self) -> impl Iterator<Item = &str> {
        self.rel_path
            .parent()
            .into_iter()
            .flat_map(Path::components)
            .filter_map(|c| match c {
                Component::Normal(s) => s.to_str(),
                _ => None,
            })
    }

    /// File name without extension and language suffix.
    pub fn filename(&self) -> &str {
        let stem = self
            .rel_path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(self.slug);
        match self.lang {
            Some(lang) => stem
                .strip_suffix(lang)
                .and_then(|s| s.strip_suffix('.'))
                .unwrap_or(stem),
            None => stem,
        }
    }
}

/// Produces the URL path of a page.
pub trait PermalinkProvider: Send + Sync {
    /// Generator-specific path, starting with `/`, before [`finish`].
    fn path(&self, page: &PageInfo<'_>) -> String;

    /// Final, encoded permalink.
    fn permalink(&self, page: &PageInfo<'_>) -> String {
        finish(&self.path(page), page.lang)
    }
}

/// Provider for `ssg`, reading the project's config where needed.
pub fn provider_for(ssg: SsgKind, project: &Path) -> Box<dyn PermalinkProvider> {
    match ssg {
        SsgKind::Hugo => Box::new(HugoPermalinks::load(project)),
        SsgKind::Zola => Box::new(ZolaPermalinks),
    }
}

/// Prefix the language, ensure a trailing slash and percent-encode.
///
/// `/posts/hello` + `en` -> `/en/posts/hello/`
pub fn finish(path: &str, lang: Option<&str>) -> String {
    let path = path.trim_end_matches('/');
    let mut url = String::with_capacity(path.len() + 8);
    if let Some(lang) = lang.map(str::trim).filter(|l| !l.is_empty()) {
        url.push('/');
        url.push_str(lang);
    }
    if !path.starts_with('/') {
        url.push('/');
    }
    url.push_str(path);
    if !url.ends_with('/') {
        url.push('/');
    }
    encode_path(&url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page<'a>(rel: &'a Path, lang: Option<&'a str>) -> PageInfo<'a> {
        PageInfo {
            rel_path: rel,
            slug: "hello",
            title: "Hello",
            date: DateTimeUtc::from_ymd(2024, 6, 15),
            lang,
        }
    }

    #[test]
    fn test_section() {
        assert_eq!(page(Path::new("blog/hello.md"), None).section(), "blog");
        assert_eq!(page(Path::new("blog/2024/hello.md"), None).section(), "blog");
        assert_eq!(page(Path::new("hello.md"), None).section(), DEFAULT_SECTION);
    }

    #[test]
    fn test_filename_strips_lang() {
        assert_eq!(page(Path::new("posts/hello.en.md"), Some("en")).filename(), "hello");
        assert_eq!(page(Path::new("posts/hello.md"), None).filename(), "hello");
    }

    #[test]
    fn test_finish() {
        assert_eq!(finish("/posts/hello", None), "/posts/hello/");
        assert_eq!(finish("/posts/hello/", Some("en")), "/en/posts/hello/");
        assert_eq!(finish("posts/a b", None), "/posts/a%20b/");
        assert_eq!(finish("/posts/v1.0", None), "/posts/v1.0/");
        assert_eq!(finish("/", None), "/");
    }
}
