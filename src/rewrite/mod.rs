//! Destination rewriting.
//!
//! Once every note has a URL and every attachment a file name, the
//! [`Rewriter`] maps each catalog key to its final text and swaps it in at
//! the same target sites discovery found it at. Text inside code spans is
//! never touched.
//!
//! Rewriting is idempotent: the replacement text of a site is never itself
//! a catalog key at a site, so a second pass changes nothing.

mod video;

pub use video::video_embed;

use crate::link::scan::{TargetSite, body_sites, is_potential_path, metadata_sites};
use crate::link::{LinkCatalog, LinkKind, is_ignored_meta_key, normalize_wiki_links};
use crate::meta::MetaMap;
use crate::span::CodeSpans;
use crate::utils::mime::video_type;
use rustc_hash::FxHashMap;
use std::borrow::Cow;
use std::path::PathBuf;

/// Final location of everything a run produces.
#[derive(Debug, Clone, Default)]
pub struct Destinations {
    /// Source note -> permalink (`/posts/hello/`).
    pub notes: FxHashMap<PathBuf, String>,
    /// Source attachment -> assigned file name (`img.png`).
    pub attachments: FxHashMap<PathBuf, String>,
    /// URL prefix of the attachment folder, ending in `/`.
    pub attachment_prefix: String,
}

/// Replacement for one catalog key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Url(String),
    /// Video attachment; markdown links to it become a player.
    Video { url: String, mime: &'static str },
}

impl Destination {
    pub fn url(&self) -> &str {
        match self {
            Self::Url(url) | Self::Video { url, .. } => url,
        }
    }
}

/// A pending replacement: byte range and new text.
type Edit = (usize, usize, String);

#[derive(Debug, Default)]
pub struct Rewriter {
    map: FxHashMap<String, Destination>,
    /// Path-like keys for direct matches in metadata, longest first.
    direct: Vec<String>,
}

impl Rewriter {
    pub fn new(catalog: &LinkCatalog, destinations: &Destinations) -> Self {
        let mut map = FxHashMap::default();
        for link in catalog.iter() {
            let with_anchor = |url: String| {
                if link.anchor.is_empty() {
                    url
                } else {
                    format!("{url}#{}", link.anchor)
                }
            };
            let destination = match (link.kind, &link.source) {
                (LinkKind::AnchorOnly, _) => Destination::Url(format!("#{}", link.anchor)),
                (LinkKind::Note, Some(source)) => match destinations.notes.get(source) {
                    Some(url) => Destination::Url(with_anchor(url.clone())),
                    None => Destination::Url("#".to_string()),
                },
                (LinkKind::Attachment, Some(source)) => {
                    let Some(name) = destinations.attachments.get(source) else {
                        continue;
                    };
                    let url = format!("{}{}", destinations.attachment_prefix, name);
                    match video_type(source) {
                        Some(mime) => Destination::Video { url, mime },
                        None => Destination::Url(with_anchor(url)),
                    }
                }
                (_, None) => continue,
            };
            map.insert(link.uri.clone(), destination);
        }

        let mut direct: Vec<String> = map
            .keys()
            .filter(|k| is_potential_path(k))
            .cloned()
            .collect();
        direct.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));

        Self { map, direct }
    }

    pub fn destination(&self, uri: &str) -> Option<&Destination> {
        self.map.get(uri)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Rewrite a note body (wiki links already normalized).
    pub fn rewrite_body<'t>(&self, body: &'t str) -> Cow<'t, str> {
        let spans = CodeSpans::detect(body);
        let edits = self.site_edits(body, &body_sites(body), &spans);
        apply_edits(body, edits).map_or(Cow::Borrowed(body), Cow::Owned)
    }

    /// Rewrite every scanned metadata string in place.
    pub fn rewrite_meta(&self, meta: &mut MetaMap) {
        for (key, value) in meta.iter_mut() {
            if is_ignored_meta_key(key) {
                continue;
            }
            value.walk_strings_mut(&mut |s| {
                let rewritten = match self.rewrite_meta_string(s) {
                    Cow::Owned(new) => Some(new),
                    Cow::Borrowed(_) => None,
                };
                if let Some(new) = rewritten {
                    *s = new;
                }
            });
        }
    }

    /// Rewrite one metadata string.
    ///
    /// Besides link sites, a catalog key standing on its own inside the
    /// value (`cover: ./img/a.png`, `hero = "img/a.png"`) is replaced.
    pub fn rewrite_meta_string<'t>(&self, value: &'t str) -> Cow<'t, str> {
        let value = normalize_wiki_links(value, &CodeSpans::detect(value));
        let spans = CodeSpans::detect(&value);
        let mut edits = self.site_edits(&value, &metadata_sites(&value), &spans);
        self.direct_edits(&value, &spans, &mut edits);

        match apply_edits(&value, edits) {
            Some(rewritten) => Cow::Owned(rewritten),
            None => value,
        }
    }

    fn site_edits(&self, text: &str, sites: &[TargetSite], spans: &CodeSpans) -> Vec<Edit> {
        let mut edits = Vec::new();
        for site in sites {
            if spans.in_span(site.start) {
                continue;
            }
            let Some(destination) = self.map.get(site.target(text)) else {
                continue;
            };
            match destination {
                Destination::Video { url, mime } if site.construct() != (site.start, site.end) => {
                    let (start, end) = site.construct();
                    edits.push((start, end, video_embed(url, mime)));
                }
                other => edits.push((site.start, site.end, other.url().to_string())),
            }
        }
        edits
    }

    fn direct_edits(&self, text: &str, spans: &CodeSpans, edits: &mut Vec<Edit>) {
        for key in &self.direct {
            let Some(destination) = self.map.get(key) else {
                continue;
            };
            for (start, _) in text.match_indices(key.as_str()) {
                let end = start + key.len();
                if !is_bounded(text, start, end)
                    || spans.overlaps(start, end)
                    || edits.iter().any(|&(s, e, _)| start < e && s < end)
                {
                    continue;
                }
                edits.push((start, end, destination.url().to_string()));
            }
        }
    }
}

/// A direct match must stand alone: preceded by start, whitespace, `:`,
/// `=` or a quote and followed by end, whitespace or a quote.
fn is_bounded(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    let before_ok = before.is_none_or(|c| c.is_whitespace() || matches!(c, ':' | '=' | '"' | '\''));
    let after_ok = after.is_none_or(|c| c.is_whitespace() || matches!(c, '"' | '\''));
    before_ok && after_ok
}

/// Apply non-overlapping edits in one pass; `None` when nothing changed.
fn apply_edits(text: &str, mut edits: Vec<Edit>) -> Option<String> {
    if edits.is_empty() {
        return None;
    }
    edits.sort_unstable_by_key(|&(start, _, _)| start);

    let mut out = String::with_capacity(text.len() + 64);
    let mut last = 0;
    for (start, end, replacement) in edits {
        if start < last {
            continue;
        }
        out.push_str(&text[last..start]);
        out.push_str(&replacement);
        last = end;
    }
    out.push_str(&text[last..]);
    (out != text).then_some(out)
}
