//! Syntactic classification of link targets.

use crate::utils::path::route::{is_external_link, split_path_fragment};

/// A link target as written, before any resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawTarget<'a> {
    /// Blank target (`[x]()`, `href=""`).
    Empty,
    /// Scheme-qualified target (`https://`, `mailto:`, `obsidian://`).
    External(&'a str),
    /// Pure fragment (`#section`). Value is the anchor without `#`.
    Anchor(&'a str),
    /// Vault path with an optional fragment (empty when absent).
    Path { path: &'a str, fragment: &'a str },
}

impl<'a> RawTarget<'a> {
    /// Parse a target string into its syntactic kind.
    #[inline]
    pub fn parse(target: &'a str) -> Self {
        let target = target.trim();
        if target.is_empty() {
            Self::Empty
        } else if is_external_link(target) {
            Self::External(target)
        } else if let Some(anchor) = target.strip_prefix('#') {
            Self::Anchor(anchor)
        } else if let Some(anchor) = target.strip_prefix("./#") {
            // ./#fragment points at the current note, same as #fragment
            Self::Anchor(anchor)
        } else {
            let (path, fragment) = split_path_fragment(target);
            Self::Path { path, fragment }
        }
    }
}
