//! `[linking]` section: automatic links from declared link words.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LinkingConfig {
    /// Inject links for other notes' `link_words`.
    pub enable: bool,
    /// Replacements per word per note (0 disables injection).
    pub max_per_article: usize,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_per_article: 1,
        }
    }
}

impl LinkingConfig {
    /// Effective quota: 0 when disabled.
    pub fn quota(&self) -> usize {
        if self.enable { self.max_per_article } else { 0 }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.linking.enable);
        assert_eq!(config.linking.quota(), 1);
    }

    #[test]
    fn test_disabled_quota() {
        let config = test_parse_config("[linking]\nenable = false\nmax_per_article = 3");
        assert_eq!(config.linking.quota(), 0);

        let config = test_parse_config("[linking]\nmax_per_article = 3");
        assert_eq!(config.linking.quota(), 3);
    }
}
