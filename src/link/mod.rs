//! Link catalog: every internal link target of a run.
//!
//! Discovery feeds each note through [`LinkCatalog::extract`], which
//! normalizes wiki links, scans the body and metadata for targets and
//! records each distinct target once, keyed by its text as written. Targets
//! are resolved against the vault while scanning; their destinations are
//! only known later, once every note has been discovered.
//!
//! Notes are discovered in parallel, each into its own catalog fragment.
//! [`LinkCatalog::merge`] folds fragments together in note order so the
//! first-seen entry for a key is the same on every run.

pub mod anchor;
mod resolve;
pub mod scan;
pub mod wiki;

pub use anchor::normalize_anchor;
pub use resolve::resolve_target;
pub use wiki::normalize_wiki_links;

use crate::core::{FileCategory, RawTarget};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::meta::{MetaMap, MetaValue};
use crate::span::CodeSpans;
use rustc_hash::{FxHashMap, FxHashSet};
use scan::TargetSite;
use std::path::{Path, PathBuf};

/// Top-level metadata keys never scanned or rewritten (case-insensitive).
pub const IGNORED_META_KEYS: &[&str] = &["title", "description", "slug", "date", "taxonomies", "tags"];

/// Whether a top-level metadata key is skipped by link processing.
pub fn is_ignored_meta_key(key: &str) -> bool {
    IGNORED_META_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

/// Resolved kind of a catalog entry.
///
/// Scheme-qualified targets never enter the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// `#fragment` within the same note.
    AnchorOnly,
    /// Non-markdown file, copied to the attachment folder.
    Attachment,
    /// Another markdown note.
    Note,
}

/// One distinct link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Target text as written (after wiki normalization); the catalog key.
    pub uri: String,
    pub kind: LinkKind,
    /// Resolved file. `None` only for anchor-only links.
    pub source: Option<PathBuf>,
    /// Normalized fragment, empty when absent.
    pub anchor: String,
    /// First note that referenced this target.
    pub referrer: PathBuf,
}

/// Per-note inputs of [`LinkCatalog::extract`].
#[derive(Debug, Clone, Copy)]
pub struct ExtractContext<'a> {
    pub vault: &'a Path,
    /// Absolute path of the note being scanned.
    pub note: &'a Path,
    pub diag: &'a Diagnostics,
}

impl ExtractContext<'_> {
    fn folder(&self) -> &Path {
        self.note.parent().unwrap_or(self.vault)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LinkCatalog {
    links: Vec<Link>,
    index: FxHashMap<String, usize>,
    /// Targets already reported as unresolved, so each warns once.
    unresolved: FxHashSet<String>,
}

impl LinkCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scan a note and record its link targets.
    ///
    /// Returns the body with wiki links normalized; rewriting works on that
    /// text. Calling this again for a known target is a no-op.
    pub fn extract(&mut self, body: &str, meta: &MetaMap, ctx: &ExtractContext<'_>) -> String {
        let body = normalize_wiki_links(body, &CodeSpans::detect(body)).into_owned();
        self.scan_text(&body, scan::body_sites(&body), ctx);

        for (key, value) in meta.iter() {
            if is_ignored_meta_key(key) {
                continue;
            }
            value.walk_strings(&mut |s| self.scan_metadata_string(s, ctx));
        }
        body
    }

    fn scan_metadata_string(&mut self, value: &str, ctx: &ExtractContext<'_>) {
        let value = normalize_wiki_links(value, &CodeSpans::detect(value));
        let sites = scan::metadata_sites(&value);
        self.scan_text(&value, sites, ctx);
    }

    fn scan_text(&mut self, text: &str, sites: Vec<TargetSite>, ctx: &ExtractContext<'_>) {
        if sites.is_empty() {
            return;
        }
        let spans = CodeSpans::detect(text);
        for site in sites {
            if spans.in_span(site.start) {
                continue;
            }
            self.add(site.target(text), ctx);
        }
    }

    /// Classify and record one target.
    fn add(&mut self, uri: &str, ctx: &ExtractContext<'_>) {
        if self.index.contains_key(uri) {
            return;
        }

        let (kind, source, fragment) = match RawTarget::parse(uri) {
            RawTarget::Empty => {
                ctx.diag
                    .warn(DiagnosticKind::EmptyLink, Some(ctx.note), "empty link target");
                return;
            }
            RawTarget::External(_) => return,
            RawTarget::Anchor(fragment) => (LinkKind::AnchorOnly, None, fragment),
            RawTarget::Path { path, fragment } => {
                match resolve_target(ctx.vault, ctx.folder(), path) {
                    Some(source) => {
                        let kind = match FileCategory::from_path(&source) {
                            FileCategory::Note => LinkKind::Note,
                            FileCategory::Attachment => LinkKind::Attachment,
                        };
                        (kind, Some(source), fragment)
                    }
                    None => {
                        if self.unresolved.insert(uri.to_string()) {
                            ctx.diag.warn(
                                DiagnosticKind::UnresolvedLink,
                                Some(ctx.note),
                                format!("cannot resolve link `{uri}`"),
                            );
                        }
                        return;
                    }
                }
            }
        };

        self.insert(Link {
            uri: uri.to_string(),
            kind,
            source,
            anchor: normalize_anchor(fragment),
            referrer: ctx.note.to_path_buf(),
        });
    }

    /// Insert unless the key exists (first seen wins).
    fn insert(&mut self, link: Link) -> bool {
        if self.index.contains_key(&link.uri) {
            return false;
        }
        self.index.insert(link.uri.clone(), self.links.len());
        self.links.push(link);
        true
    }

    /// Fold a fragment in; entries already present win.
    pub fn merge(&mut self, fragment: Self) {
        for link in fragment.links {
            self.insert(link);
        }
        self.unresolved.extend(fragment.unresolved);
    }

    pub fn get(&self, uri: &str) -> Option<&Link> {
        self.index.get(uri).map(|&i| &self.links[i])
    }

    pub fn contains(&self, uri: &str) -> bool {
        self.index.contains_key(uri)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Link> {
        self.links.iter()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Attachment entries, in insertion order.
    pub fn attachments(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.kind == LinkKind::Attachment)
    }

    /// Note entries, in insertion order.
    pub fn notes(&self) -> impl Iterator<Item = &Link> {
        self.links.iter().filter(|l| l.kind == LinkKind::Note)
    }

    /// Distinct unresolved targets seen so far.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved.len()
    }
}

/// Link words and priority declared by a note.
///
/// Read from `link_words` / `link_priority`, or the same keys under
/// `extra`. `link_words` may be a string or a list of strings.
pub fn declared_link_words(meta: &MetaMap) -> (Vec<String>, i64) {
    let words = meta
        .get_or_extra("link_words")
        .map(MetaValue::string_list)
        .unwrap_or_default()
        .into_iter()
        .map(str::trim)
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect();
    let priority = meta
        .get_or_extra("link_priority")
        .and_then(MetaValue::as_i64)
        .unwrap_or(0);
    (words, priority)
}
