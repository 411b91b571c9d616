//! Note metadata (frontmatter) as a tagged value tree.
//!
//! Frontmatter arrives as YAML or TOML with arbitrary nesting. Both are
//! converted into [`MetaValue`] so link extraction and rewriting can walk
//! strings with one recursive visitor, independent of the source format.
//!
//! - [`frontmatter`]: split/parse/render `---` YAML and `+++` TOML blocks
//! - [`normalize`]: title/date/lastmod/lang defaults and per-SSG key layout

pub mod frontmatter;
pub mod normalize;

/// A metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<MetaValue>),
    Mapping(MetaMap),
}

impl MetaValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            Self::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&MetaMap> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// A string or a sequence of strings, as a list.
    ///
    /// `"a"` -> `["a"]`, `["a", 1, "b"]` -> `["a", "b"]`, anything else -> `[]`.
    pub fn string_list(&self) -> Vec<&str> {
        match self {
            Self::String(s) => vec![s.as_str()],
            Self::Sequence(items) => items.iter().filter_map(Self::as_str).collect(),
            _ => Vec::new(),
        }
    }

    /// Visit every string in this value, depth first.
    pub fn walk_strings<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            Self::String(s) => f(s),
            Self::Sequence(items) => items.iter().for_each(|v| v.walk_strings(f)),
            Self::Mapping(map) => map.values().for_each(|v| v.walk_strings(f)),
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) => {}
        }
    }

    /// Visit every string in this value mutably, depth first.
    pub fn walk_strings_mut<F: FnMut(&mut String)>(&mut self, f: &mut F) {
        match self {
            Self::String(s) => f(s),
            Self::Sequence(items) => items.iter_mut().for_each(|v| v.walk_strings_mut(f)),
            Self::Mapping(map) => map.values_mut().for_each(|v| v.walk_strings_mut(f)),
            Self::Null | Self::Bool(_) | Self::Integer(_) | Self::Float(_) => {}
        }
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

// ============================================================================
// MetaMap
// ============================================================================

/// Insertion-ordered string-keyed mapping.
///
/// Frontmatter blocks are small, so a vector keeps key order (and thus the
/// author's layout) without a hashing dependency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetaMap {
    entries: Vec<(String, MetaValue)>,
}

impl MetaMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut MetaValue> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// String value of `key`, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(MetaValue::as_str)
    }

    /// Value at `key`, or at `extra.<key>` when the top level lacks it.
    ///
    /// Zola only allows custom fields under `[extra]`, so notes written for
    /// it nest their settings there.
    pub fn get_or_extra(&self, key: &str) -> Option<&MetaValue> {
        self.get(key).or_else(|| {
            self.get("extra")
                .and_then(MetaValue::as_mapping)
                .and_then(|extra| extra.get(key))
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) -> Option<MetaValue> {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<MetaValue> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MetaValue)> {
        self.entries.iter_mut().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &MetaValue> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut MetaValue> {
        self.entries.iter_mut().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit strings of every top-level entry whose key is not in `skip`.
    pub fn walk_strings_except<F: FnMut(&str)>(&self, skip: &[&str], f: &mut F) {
        for (key, value) in self.iter() {
            if !skip.contains(&key) {
                value.walk_strings(f);
            }
        }
    }

    /// Mutable counterpart of [`walk_strings_except`](Self::walk_strings_except).
    pub fn walk_strings_except_mut<F: FnMut(&mut String)>(&mut self, skip: &[&str], f: &mut F) {
        for (key, value) in self.iter_mut() {
            if !skip.contains(&key) {
                value.walk_strings_mut(f);
            }
        }
    }
}

impl FromIterator<(String, MetaValue)> for MetaMap {
    fn from_iter<I: IntoIterator<Item = (String, MetaValue)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
