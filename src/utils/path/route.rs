//! URL processing utilities.
//!
//! Provides consistent URL handling across the codebase:
//! - Link type detection (external vs internal)
//! - Fragment splitting
//! - Per-segment percent-encoding

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Characters escaped inside a URL path segment or fragment.
///
/// Unreserved characters (`-`, `_`, `.`, `~`) stay readable.
pub const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Check if a link target is external.
///
/// Anything containing `:` that is not a pure fragment counts as external:
/// `https://`, `mailto:`, `obsidian://`, and also Windows drive paths, which
/// cannot resolve inside a vault anyway.
///
/// # Examples
/// ```ignore
/// assert!(is_external_link("https://example.com"));
/// assert!(is_external_link("mailto:user@example.com"));
/// assert!(!is_external_link("#note:section"));
/// assert!(!is_external_link("./file.txt"));
/// ```
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.contains(':') && !link.starts_with('#')
}

/// Split a URL into path and fragment parts
///
/// # Returns
/// A tuple of (path, fragment) where fragment is empty string if no `#` found
///
/// # Examples
/// ```ignore
/// assert_eq!(split_path_fragment("/about#team"), ("/about", "team"));
/// assert_eq!(split_path_fragment("/about"), ("/about", ""));
/// ```
#[inline]
pub fn split_path_fragment(url: &str) -> (&str, &str) {
    url.split_once('#').unwrap_or((url, ""))
}

/// Percent-encode every `/`-separated segment of a URL path.
///
/// Already-encoded input is left alone, so encoding is idempotent.
pub fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let decoded = percent_encoding::percent_decode_str(segment).decode_utf8_lossy();
            utf8_percent_encode(&decoded, SEGMENT).to_string()
        })
        .collect::<Vec<_>>()
        .join("/")
}
