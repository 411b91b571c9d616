//! Link words: automatic links between notes.
//!
//! A note declares words it wants to be linked from (`link_words`, with an
//! optional `link_priority`). The registry maps each word, case-folded, to
//! the declaring note's URL. While rewriting, every other note gets its
//! first occurrences of those words turned into links.
//!
//! # Collisions
//!
//! Two notes claiming the same word with different URLs is a conflict. The
//! higher `link_priority` keeps the word; on a tie the note registered
//! first keeps it. Each distinct claimant is reported once.

mod matcher;
mod protect;

use crate::debug;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use protect::Protected;
use regex::Regex;
use rustc_hash::FxHashSet;
use serde::Serialize;
use std::borrow::Cow;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Registry key: trimmed, lower-cased word.
pub fn word_key(word: &str) -> String {
    word.trim().to_lowercase()
}

/// A registered word and where it points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkWord {
    /// Word as declared.
    pub word: String,
    pub url: String,
    /// Declaring note.
    pub owner: PathBuf,
    pub priority: i64,
}

/// Notes competing for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub key: String,
    /// Every distinct claimant, in registration order.
    pub claimants: Vec<LinkWord>,
    /// URL that kept the word.
    pub winner: String,
}

#[derive(Debug)]
struct Entry {
    word: LinkWord,
    matcher: Regex,
}

/// Longest words first, then alphabetical, so shorter words never split a
/// longer one and the order is the same on every run.
type OrderKey = (Reverse<usize>, String);

fn order_key(key: &str) -> OrderKey {
    (Reverse(key.chars().count()), key.to_string())
}

/// Run-wide word -> URL map.
#[derive(Debug, Default)]
pub struct LinkWordRegistry {
    entries: BTreeMap<OrderKey, Entry>,
    conflicts: Vec<Conflict>,
    /// (key, owner, url) triples already recorded as conflicting.
    reported: FxHashSet<(String, PathBuf, String)>,
    /// Links per word per note; 0 disables application.
    quota: usize,
}

impl LinkWordRegistry {
    pub fn new(quota: usize) -> Self {
        Self {
            quota,
            ..Self::default()
        }
    }

    /// Register `word` for the note at `owner`.
    ///
    /// Returns whether the word now points at `url`.
    pub fn register(&mut self, word: LinkWord, diag: &Diagnostics) -> bool {
        let key = word_key(&word.word);
        if key.is_empty() {
            return false;
        }
        let slot = order_key(&key);

        let Some(existing) = self.entries.get(&slot) else {
            return self.insert(slot, word);
        };
        if existing.word.url == word.url {
            return true;
        }

        let replace = word.priority > existing.word.priority;
        let previous = existing.word.clone();
        let winner = if replace { &word } else { &previous };
        self.record_conflict(&key, &previous, &word, winner.url.clone(), diag);

        if replace {
            debug!("linkword"; "`{}` now points at {} (priority {} > {})",
                key, word.url, word.priority, previous.priority);
            self.insert(slot, word)
        } else {
            false
        }
    }

    fn insert(&mut self, slot: OrderKey, word: LinkWord) -> bool {
        match matcher::compile(word.word.trim()) {
            Ok(matcher) => {
                self.entries.insert(slot, Entry { word, matcher });
                true
            }
            Err(e) => {
                debug!("linkword"; "skipping `{}`: {}", word.word, e);
                false
            }
        }
    }

    fn record_conflict(
        &mut self,
        key: &str,
        existing: &LinkWord,
        incoming: &LinkWord,
        winner: String,
        diag: &Diagnostics,
    ) {
        let index = match self.conflicts.iter().position(|c| c.key == key) {
            Some(i) => i,
            None => {
                self.conflicts.push(Conflict {
                    key: key.to_string(),
                    claimants: Vec::new(),
                    winner: String::new(),
                });
                self.conflicts.len() - 1
            }
        };

        let mut added = false;
        for claimant in [existing, incoming] {
            let id = (key.to_string(), claimant.owner.clone(), claimant.url.clone());
            if self.reported.insert(id) {
                self.conflicts[index].claimants.push(claimant.clone());
                added = true;
            }
        }
        self.conflicts[index].winner = winner;

        if added {
            diag.warn(
                DiagnosticKind::LinkWordConflict,
                Some(incoming.owner.as_path()),
                format!(
                    "link word `{}` also declared by {} ({} vs {}), keeping {}",
                    key,
                    existing.owner.display(),
                    incoming.url,
                    existing.url,
                    self.conflicts[index].winner,
                ),
            );
        }
    }

    pub fn get(&self, word: &str) -> Option<&LinkWord> {
        let key = word_key(word);
        self.entries.get(&order_key(&key)).map(|e| &e.word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }

    pub fn quota(&self) -> usize {
        self.quota
    }

    /// Link words in `text` for the note at `note`.
    ///
    /// Words declared by the note itself (`own_words`) or owned by it are
    /// skipped. Each remaining word is linked at most `quota` times, at its
    /// first unprotected occurrences. Returns the new text and the number of
    /// links added.
    pub fn apply<'t>(&self, text: &'t str, note: &Path, own_words: &[String]) -> (Cow<'t, str>, usize) {
        if self.quota == 0 || self.entries.is_empty() || text.is_empty() {
            return (Cow::Borrowed(text), 0);
        }

        let own: FxHashSet<String> = own_words.iter().map(|w| word_key(w)).collect();
        let protected = Protected::scan(text);
        let mut claimed: Vec<(usize, usize, &str)> = Vec::new();

        for ((_, key), entry) in &self.entries {
            if own.contains(key) || entry.word.owner == note {
                continue;
            }
            let mut used = 0;
            for m in entry.matcher.find_iter(text) {
                if used == self.quota {
                    break;
                }
                let (start, end) = (m.start(), m.end());
                if protected.overlaps(start, end)
                    || claimed.iter().any(|&(s, e, _)| start < e && s < end)
                {
                    continue;
                }
                claimed.push((start, end, entry.word.url.as_str()));
                used += 1;
            }
        }

        if claimed.is_empty() {
            return (Cow::Borrowed(text), 0);
        }
        claimed.sort_unstable_by_key(|&(start, _, _)| start);

        let mut out = String::with_capacity(text.len() + claimed.len() * 32);
        let mut last = 0;
        for &(start, end, url) in &claimed {
            out.push_str(&text[last..start]);
            out.push('[');
            out.push_str(&text[start..end]);
            out.push_str("](");
            out.push_str(url);
            out.push(')');
            last = end;
        }
        out.push_str(&text[last..]);
        (Cow::Owned(out), claimed.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(word: &str, url: &str, owner: &str, priority: i64) -> LinkWord {
        LinkWord {
            word: word.into(),
            url: url.into(),
            owner: owner.into(),
            priority,
        }
    }

    fn registry(quota: usize, words: &[LinkWord]) -> (LinkWordRegistry, Diagnostics) {
        let diag = Diagnostics::new();
        let mut reg = LinkWordRegistry::new(quota);
        for w in words {
            reg.register(w.clone(), &diag);
        }
        (reg, diag)
    }

    #[test]
    fn test_priority_conflict() {
        let (reg, diag) = registry(
            1,
            &[
                word("Widget", "/posts/a/", "a.md", 1),
                word("widget ", "/posts/b/", "b.md", 5),
            ],
        );
        assert_eq!(reg.get("WIDGET").unwrap().url, "/posts/b/");
        assert_eq!(reg.conflicts().len(), 1);
        assert_eq!(reg.conflicts()[0].claimants.len(), 2);
        assert_eq!(reg.conflicts()[0].winner, "/posts/b/");
        assert_eq!(diag.count(DiagnosticKind::LinkWordConflict), 1);
    }

    #[test]
    fn test_tie_keeps_existing() {
        let (reg, _) = registry(
            1,
            &[
                word("widget", "/a/", "a.md", 0),
                word("widget", "/b/", "b.md", 0),
            ],
        );
        assert_eq!(reg.get("widget").unwrap().url, "/a/");
    }

    #[test]
    fn test_conflicts_deduplicated() {
        let (reg, diag) = registry(
            1,
            &[
                word("w", "/a/", "a.md", 0),
                word("w", "/b/", "b.md", 0),
                word("w", "/b/", "b.md", 0),
                word("w", "/c/", "c.md", 3),
            ],
        );
        assert_eq!(reg.conflicts().len(), 1);
        assert_eq!(reg.conflicts()[0].claimants.len(), 3);
        assert_eq!(reg.conflicts()[0].winner, "/c/");
        assert_eq!(diag.count(DiagnosticKind::LinkWordConflict), 2);
    }

    #[test]
    fn test_same_url_is_not_conflict() {
        let (reg, diag) = registry(
            1,
            &[word("w", "/a/", "a.md", 0), word("W", "/a/", "a.md", 0)],
        );
        assert!(reg.conflicts().is_empty());
        assert!(diag.is_empty());
    }

    #[test]
    fn test_apply_first_occurrence() {
        let (reg, _) = registry(1, &[word("Rust", "/posts/rust/", "rust.md", 0)]);
        let (out, n) = reg.apply("I like rust. Rust is fast.", Path::new("x.md"), &[]);
        assert_eq!(out, "I like [rust](/posts/rust/). Rust is fast.");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_apply_quota() {
        let (reg, _) = registry(2, &[word("a", "/a/", "a.md", 0)]);
        let (out, n) = reg.apply("a a a", Path::new("x.md"), &[]);
        assert_eq!(out, "[a](/a/) [a](/a/) a");
        assert_eq!(n, 2);

        let (reg, _) = registry(0, &[word("a", "/a/", "a.md", 0)]);
        assert_eq!(reg.apply("a", Path::new("x.md"), &[]).1, 0);
    }

    #[test]
    fn test_apply_skips_existing_links_and_code() {
        let (reg, _) = registry(1, &[word("Rust", "/r/", "r.md", 0)]);
        let text = "[Rust](r.md) and `Rust` and <a href=\"/\">Rust</a>";
        let (out, n) = reg.apply(text, Path::new("x.md"), &[]);
        assert_eq!(out, text);
        assert_eq!(n, 0);
    }

    #[test]
    fn test_apply_no_self_link() {
        let (reg, _) = registry(1, &[word("Rust", "/r/", "r.md", 0)]);
        assert_eq!(reg.apply("Rust", Path::new("r.md"), &[]).1, 0);
        assert_eq!(reg.apply("Rust", Path::new("x.md"), &["rust".into()]).1, 0);
    }

    #[test]
    fn test_longest_first() {
        let (reg, _) = registry(
            1,
            &[
                word("Rust", "/r/", "r.md", 0),
                word("Rust book", "/rb/", "rb.md", 0),
            ],
        );
        let (out, n) = reg.apply("read the Rust book", Path::new("x.md"), &[]);
        assert_eq!(out, "read the [Rust book](/rb/)");
        assert_eq!(n, 1);
    }

    #[test]
    fn test_cjk_word() {
        let (reg, _) = registry(1, &[word("学习", "/xx/", "l.md", 0)]);
        let (out, _) = reg.apply("我在学习", Path::new("x.md"), &[]);
        assert_eq!(out, "我在[学习](/xx/)");
    }
}
