//! Metadata defaults and per-generator key layout.
//!
//! [`normalize`] fills the keys every converted note needs and returns the
//! facts later phases use (permalink date parts, language). [`layout`]
//! reshapes the mapping for the target generator just before writing.

use super::{MetaMap, MetaValue};
use crate::core::SsgKind;
use crate::utils::date::DateTimeUtc;
use std::time::SystemTime;

const DATE_KEYS: &[&str] = &["date", "created"];
const LASTMOD_KEYS: &[&str] = &["lastmod", "updated", "modified"];
const LANG_KEYS: &[&str] = &["lang", "languageCode"];

/// Front matter keys Zola accepts at the top level. Anything else moves
/// under `[extra]`.
const ZOLA_KEYS: &[&str] = &[
    "title",
    "description",
    "date",
    "updated",
    "weight",
    "draft",
    "render",
    "slug",
    "path",
    "aliases",
    "authors",
    "in_search_index",
    "template",
    "taxonomies",
    "extra",
];

/// Keys Zola expects under `[taxonomies]` rather than at the top level.
const ZOLA_TAXONOMY_KEYS: &[&str] = &["tags", "categories"];

/// Normalized facts about a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteFacts {
    pub title: String,
    pub date: DateTimeUtc,
    pub lastmod: DateTimeUtc,
    pub lang: Option<String>,
}

/// Fill `title`, `date` and `lastmod` when missing and collect the facts.
///
/// Existing values are never overwritten. A `date` that does not parse is
/// kept verbatim, while the facts fall back to `mtime`.
pub fn normalize(meta: &mut MetaMap, stem: &str, mtime: SystemTime) -> NoteFacts {
    let modified = DateTimeUtc::from_system_time(mtime);

    let title = match meta.get_str("title").map(str::trim) {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => {
            meta.insert("title", stem.into());
            stem.to_string()
        }
    };

    let date = first_date(meta, DATE_KEYS).unwrap_or(modified);
    if !meta.contains_key("date") {
        meta.insert("date", date.to_date_string().into());
    }

    let lastmod = first_date(meta, LASTMOD_KEYS).unwrap_or(modified);
    if !LASTMOD_KEYS.iter().any(|k| meta.contains_key(k)) {
        meta.insert("lastmod", lastmod.to_date_string().into());
    }

    let lang = LANG_KEYS
        .iter()
        .filter_map(|k| meta.get_str(k))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string);

    NoteFacts {
        title,
        date,
        lastmod,
        lang,
    }
}

/// First key among `keys` holding a parseable date.
fn first_date(meta: &MetaMap, keys: &[&str]) -> Option<DateTimeUtc> {
    keys.iter()
        .filter_map(|k| meta.get_str(k))
        .find_map(DateTimeUtc::parse)
}

/// Reshape keys for the target generator.
pub fn layout(meta: &mut MetaMap, facts: &NoteFacts, ssg: SsgKind) {
    match ssg {
        SsgKind::Hugo => layout_hugo(meta, facts),
        SsgKind::Zola => layout_zola(meta),
    }
}

/// Hugo reads the page language as `languageCode`.
fn layout_hugo(meta: &mut MetaMap, facts: &NoteFacts) {
    if let Some(lang) = &facts.lang {
        meta.remove("lang");
        meta.insert("languageCode", lang.as_str().into());
    }
}

/// Zola rejects unknown top-level keys; its language comes from the
/// `<slug>.<lang>.md` filename.
fn layout_zola(meta: &mut MetaMap) {
    for key in LANG_KEYS {
        meta.remove(key);
    }

    if !meta.contains_key("updated") {
        let lastmod = ["lastmod", "modified"].iter().find_map(|k| meta.remove(k));
        if let Some(value) = lastmod {
            meta.insert("updated", value);
        }
    }

    let mut extra = take_table(meta, "extra");
    let mut taxonomies = take_table(meta, "taxonomies");

    for key in ZOLA_TAXONOMY_KEYS {
        if let Some(value) = meta.remove(key)
            && !taxonomies.contains_key(key)
        {
            taxonomies.insert(*key, value);
        }
    }

    let unknown: Vec<String> = meta
        .keys()
        .filter(|k| !ZOLA_KEYS.contains(k))
        .map(str::to_string)
        .collect();
    for key in unknown {
        if let Some(value) = meta.remove(&key)
            && !extra.contains_key(&key)
        {
            extra.insert(key, value);
        }
    }

    if !taxonomies.is_empty() {
        meta.insert("taxonomies", MetaValue::Mapping(taxonomies));
    }
    if !extra.is_empty() {
        meta.insert("extra", MetaValue::Mapping(extra));
    }
}

/// Remove `key` as a table. A non-table value is kept under `value`.
fn take_table(meta: &mut MetaMap, key: &str) -> MetaMap {
    match meta.remove(key) {
        Some(MetaValue::Mapping(map)) => map,
        Some(other) => MetaMap::from_iter([("value".to_string(), other)]),
        None => MetaMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::frontmatter::parse;
    use std::time::{Duration, UNIX_EPOCH};

    // 2024-06-15T14:30:45Z
    fn mtime() -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(1_718_461_845)
    }

    fn meta(src: &str) -> MetaMap {
        parse(&format!("---\n{src}\n---\n")).unwrap().meta
    }

    #[test]
    fn test_defaults_from_stem_and_mtime() {
        let mut m = MetaMap::new();
        let facts = normalize(&mut m, "My Note", mtime());
        assert_eq!(facts.title, "My Note");
        assert_eq!(facts.date, DateTimeUtc::new(2024, 6, 15, 14, 30, 45));
        assert_eq!(m.get_str("title"), Some("My Note"));
        assert_eq!(m.get_str("date"), Some("2024-06-15"));
        assert_eq!(m.get_str("lastmod"), Some("2024-06-15"));
        assert_eq!(facts.lang, None);
    }

    #[test]
    fn test_blank_title_replaced() {
        let mut m = meta("title: '  '");
        assert_eq!(normalize(&mut m, "stem", mtime()).title, "stem");
        assert_eq!(m.get_str("title"), Some("stem"));
    }

    #[test]
    fn test_created_used_for_date() {
        let mut m = meta("created: 2023-01-05 10:00");
        let facts = normalize(&mut m, "x", mtime());
        assert_eq!(facts.date, DateTimeUtc::new(2023, 1, 5, 10, 0, 0));
        assert_eq!(m.get_str("date"), Some("2023-01-05"));
    }

    #[test]
    fn test_unparseable_date_kept() {
        let mut m = meta("date: someday");
        let facts = normalize(&mut m, "x", mtime());
        assert_eq!(m.get_str("date"), Some("someday"));
        assert_eq!(facts.date.year, 2024);
    }

    #[test]
    fn test_existing_updated_suppresses_lastmod() {
        let mut m = meta("updated: 2022-02-02");
        let facts = normalize(&mut m, "x", mtime());
        assert_eq!(facts.lastmod, DateTimeUtc::from_ymd(2022, 2, 2));
        assert!(!m.contains_key("lastmod"));
    }

    #[test]
    fn test_lang_from_language_code() {
        let mut m = meta("languageCode: fr");
        assert_eq!(normalize(&mut m, "x", mtime()).lang.as_deref(), Some("fr"));
    }

    #[test]
    fn test_layout_hugo_language_code() {
        let mut m = meta("title: T\nlang: en");
        let facts = normalize(&mut m, "x", mtime());
        layout(&mut m, &facts, SsgKind::Hugo);
        assert!(!m.contains_key("lang"));
        assert_eq!(m.get_str("languageCode"), Some("en"));
    }

    #[test]
    fn test_layout_zola() {
        let mut m = meta(
            "title: T\nlang: en\ntags: [a]\nlink_words: [w]\nextra:\n  cover: c.png\nlastmod: 2024-01-01",
        );
        let facts = normalize(&mut m, "x", mtime());
        layout(&mut m, &facts, SsgKind::Zola);

        assert!(!m.contains_key("lang"));
        assert!(!m.contains_key("lastmod"));
        assert_eq!(m.get_str("updated"), Some("2024-01-01"));

        let taxonomies = m.get("taxonomies").and_then(MetaValue::as_mapping).unwrap();
        assert_eq!(taxonomies.get("tags").map(MetaValue::string_list), Some(vec!["a"]));

        let extra = m.get("extra").and_then(MetaValue::as_mapping).unwrap();
        assert_eq!(extra.get_str("cover"), Some("c.png"));
        assert_eq!(extra.get("link_words").map(MetaValue::string_list), Some(vec!["w"]));
        assert!(m.keys().all(|k| ZOLA_KEYS.contains(&k)));
    }

    #[test]
    fn test_layout_zola_keeps_existing_updated() {
        let mut m = meta("updated: 2024-02-02\nlastmod: 2024-01-01");
        let facts = normalize(&mut m, "x", mtime());
        layout(&mut m, &facts, SsgKind::Zola);
        assert_eq!(m.get_str("updated"), Some("2024-02-02"));
        let extra = m.get("extra").and_then(MetaValue::as_mapping).unwrap();
        assert_eq!(extra.get_str("lastmod"), Some("2024-01-01"));
    }
}
