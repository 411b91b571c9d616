//! Heading anchor normalization.
//!
//! Hugo and Zola generate heading ids lower-cased with `-` for spaces, so
//! `#My Heading` and `#my%20heading` both become `#my-heading`.

use crate::utils::path::route::SEGMENT;
use percent_encoding::{AsciiSet, percent_decode_str, utf8_percent_encode};

/// Escape set for anchors: segment set with `/` kept.
const ANCHOR: &AsciiSet = &SEGMENT.remove(b'/');

/// Normalize a fragment: trim, lower-case, decode, spaces to `-`, encode.
///
/// Idempotent: an already normalized anchor maps to itself.
pub fn normalize_anchor(fragment: &str) -> String {
    let lowered = fragment.trim().to_lowercase();
    if lowered.is_empty() {
        return String::new();
    }
    let decoded = percent_decode_str(&lowered).decode_utf8_lossy();
    let hyphenated = decoded.replace(' ', "-");
    utf8_percent_encode(&hyphenated, ANCHOR).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spaces_and_case() {
        assert_eq!(normalize_anchor(" My Heading "), "my-heading");
        assert_eq!(normalize_anchor("my%20heading"), "my-heading");
    }

    #[test]
    fn test_unicode_encoded() {
        assert_eq!(normalize_anchor("标题"), "%E6%A0%87%E9%A2%98");
    }

    #[test]
    fn test_idempotent() {
        for raw in ["A b", "标题 一", "x/y", "a%2Fb"] {
            let once = normalize_anchor(raw);
            assert_eq!(normalize_anchor(&once), once);
        }
    }

    #[test]
    fn test_empty() {
        assert_eq!(normalize_anchor("   "), "");
    }
}
