//! Hugo `[permalinks]` patterns.

use super::site_config::read_first;
use super::{PageInfo, PermalinkProvider};
use crate::debug;
use rustc_hash::FxHashMap;
use serde_json::{Map, Value};
use std::path::Path;

/// Pattern for sections without an entry.
const DEFAULT_PATTERN: &str = "/posts/:slug";

/// Recognized tokens. Longer tokens sharing a prefix come first so `:year`
/// never matches the front of `:yearday`.
const TOKENS: &[&str] = &[
    ":yearday",
    ":year",
    ":month",
    ":day",
    ":title",
    ":section",
    ":slugorfilename",
    ":slug",
    ":filename",
];

/// Section-to-pattern table from the Hugo site config.
#[derive(Debug, Clone, Default)]
pub struct HugoPermalinks {
    patterns: FxHashMap<String, String>,
}

impl HugoPermalinks {
    /// Read `permalinks` from the first parseable config in `project`.
    pub fn load(project: &Path) -> Self {
        let Some(config) = read_first(project) else {
            debug!("permalink"; "no hugo config in {}, using defaults", project.display());
            return Self::default();
        };
        let permalinks = config.get("permalinks").and_then(Value::as_object);
        let patterns = permalinks.map(collect_patterns).unwrap_or_default();
        debug!("permalink"; "{} pattern(s) from {}", patterns.len(), config.path.display());
        Self { patterns }
    }

    pub fn from_patterns<I, K, V>(patterns: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            patterns: patterns
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    fn pattern(&self, section: &str) -> &str {
        self.patterns
            .get(section)
            .map(String::as_str)
            .unwrap_or(DEFAULT_PATTERN)
    }
}

/// Flat section patterns. Newer Hugo nests them under `page`; a top-level
/// entry for the same section wins.
fn collect_patterns(table: &Map<String, Value>) -> FxHashMap<String, String> {
    let mut patterns = FxHashMap::default();
    for (section, value) in table {
        if let Some(pattern) = value.as_str() {
            patterns.insert(section.clone(), pattern.to_string());
        }
    }
    if let Some(page) = table.get("page").and_then(Value::as_object) {
        for (section, value) in page {
            if let Some(pattern) = value.as_str() {
                patterns
                    .entry(section.clone())
                    .or_insert_with(|| pattern.to_string());
            }
        }
    }
    patterns
}

impl PermalinkProvider for HugoPermalinks {
    fn path(&self, page: &PageInfo<'_>) -> String {
        let section = page.section();
        let expanded = expand(self.pattern(section), page, section);
        tidy(&expanded)
    }
}

/// Expand tokens in one left-to-right pass; substituted values are never
/// scanned again.
fn expand(pattern: &str, page: &PageInfo<'_>, section: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 16);
    let mut rest = pattern;
    while let Some(pos) = rest.find(':') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match TOKENS.iter().find(|t| tail.starts_with(**t)) {
            Some(token) => {
                out.push_str(&token_value(token, page, section));
                rest = &tail[token.len()..];
            }
            None => {
                out.push(':');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn token_value(token: &str, page: &PageInfo<'_>, section: &str) -> String {
    match token {
        ":yearday" => page.date.day_of_year().to_string(),
        ":year" => page.date.year.to_string(),
        ":month" => format!("{:02}", page.date.month),
        ":day" => format!("{:02}", page.date.day),
        ":title" => urlize(page.title),
        ":section" => section.to_string(),
        ":slugorfilename" | ":slug" => page.slug.to_string(),
        ":filename" => page.filename().to_string(),
        other => other.to_string(),
    }
}

/// Hugo's `urlize` for titles: lowercase, whitespace runs to `-`.
fn urlize(title: &str) -> String {
    title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Collapse doubled slashes, drop the trailing one, ensure the leading one.
fn tidy(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 1);
    out.push('/');
    for part in path.split('/').filter(|p| !p.is_empty()) {
        if !out.ends_with('/') {
            out.push('/');
        }
        out.push_str(part);
    }
    out
}
