//! `[slug]` section: how note and attachment file names become URL slugs.

use serde::{Deserialize, Serialize};

/// Slug generation mode.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugMode {
    /// Transliterate Unicode to ASCII (`你好` -> `ni-hao`) (default).
    #[default]
    Ascii,
    /// Keep Unicode letters, drop punctuation.
    Safe,
}

/// Separator character for slugs.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SlugSeparator {
    /// Dash separator (`-`) (default).
    #[default]
    Dash,
    /// Underscore separator (`_`).
    Underscore,
}

impl SlugSeparator {
    /// Get the character representation.
    pub const fn as_char(&self) -> char {
        match self {
            Self::Dash => '-',
            Self::Underscore => '_',
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SlugConfig {
    pub mode: SlugMode,
    pub separator: SlugSeparator,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.slug.mode, SlugMode::Ascii);
        assert_eq!(config.slug.separator, SlugSeparator::Dash);
    }

    #[test]
    fn test_parsing() {
        let config = test_parse_config("[slug]\nmode = \"safe\"\nseparator = \"underscore\"");
        assert_eq!(config.slug.mode, SlugMode::Safe);
        assert_eq!(config.slug.separator.as_char(), '_');
    }
}
