//! `[vault]` section: where notes come from and which folders take part.

use crate::config::{ConfigDiagnostics, FieldPath};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Vault root directory.
    pub path: Option<PathBuf>,

    /// Folder mapping (`"source>dest"` or `"source"`), relative to the vault
    /// root on the left and to `content/` on the right. Empty means every
    /// folder of the vault.
    pub folders: Vec<String>,

    /// Regex patterns matched against directory names to skip.
    pub excluded: Vec<String>,

    /// Skip the templates folder named in `.obsidian/templates.json`.
    pub skip_templates: bool,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            folders: Vec::new(),
            excluded: vec![r"^\.".to_string()],
            skip_templates: true,
        }
    }
}

impl VaultConfig {
    pub const PATH: FieldPath = FieldPath::new("vault.path");
    pub const FOLDERS: FieldPath = FieldPath::new("vault.folders");
    pub const EXCLUDED: FieldPath = FieldPath::new("vault.excluded");

    /// Parsed folder mapping. Invalid entries are dropped (reported by `validate`).
    pub fn folder_specs(&self) -> Vec<FolderSpec> {
        self.folders
            .iter()
            .filter_map(|s| FolderSpec::parse(s))
            .collect()
    }

    /// Compiled exclusion patterns. Invalid patterns are dropped (reported by `validate`).
    pub fn excluded_patterns(&self) -> Vec<Regex> {
        self.excluded
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect()
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.is_none() {
            diag.error_with_hint(
                Self::PATH,
                "vault path is not set",
                "pass it as the first argument or set `path` under [vault]",
            );
        }

        for entry in &self.folders {
            if FolderSpec::parse(entry).is_none() {
                diag.error_with_hint(
                    Self::FOLDERS,
                    format!("invalid folder mapping `{entry}`"),
                    "use `source>dest` or `source` with relative paths, e.g. `Blog>posts`",
                );
            }
        }

        for pattern in &self.excluded {
            if let Err(e) = Regex::new(pattern) {
                diag.error(Self::EXCLUDED, format!("invalid pattern `{pattern}`: {e}"));
            }
        }
    }
}

// ============================================================================
// FolderSpec
// ============================================================================

/// One `source>dest` folder mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderSpec {
    /// Vault-relative source folder.
    pub source: PathBuf,
    /// `content/`-relative destination (empty = `content/` itself).
    pub dest: PathBuf,
}

impl FolderSpec {
    /// Parse `source>dest`, `source>` or `source`.
    ///
    /// # Examples
    /// ```ignore
    /// FolderSpec::parse("Blog>posts") -> Blog -> content/posts
    /// FolderSpec::parse("notes")      -> notes -> content/notes
    /// FolderSpec::parse("Home>")      -> Home -> content/
    /// ```
    pub fn parse(spec: &str) -> Option<Self> {
        let (source, dest) = match spec.split_once('>') {
            Some((source, dest)) => (source.trim(), dest.trim()),
            None => (spec.trim(), spec.trim()),
        };
        let source = source.trim_matches('/');
        let dest = dest.trim_matches('/');
        if source.is_empty() || !is_plain_relative(source) || !is_plain_relative(dest) {
            return None;
        }
        Some(Self {
            source: PathBuf::from(source),
            dest: PathBuf::from(dest),
        })
    }

    /// Split a comma-separated CLI list (`"a>posts,b"`) into entries.
    pub fn split_list(list: &str) -> Vec<String> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }
}

/// Relative path with no `..`/root components.
fn is_plain_relative(path: &str) -> bool {
    Path::new(path)
        .components()
        .all(|c| matches!(c, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert!(config.vault.path.is_none());
        assert!(config.vault.folders.is_empty());
        assert_eq!(config.vault.excluded, vec![r"^\.".to_string()]);
        assert!(config.vault.skip_templates);
    }

    #[test]
    fn test_folder_spec_parse() {
        assert_eq!(
            FolderSpec::parse("Blog>posts"),
            Some(FolderSpec {
                source: "Blog".into(),
                dest: "posts".into()
            })
        );
        assert_eq!(
            FolderSpec::parse(" notes "),
            Some(FolderSpec {
                source: "notes".into(),
                dest: "notes".into()
            })
        );
        assert_eq!(
            FolderSpec::parse("Home>"),
            Some(FolderSpec {
                source: "Home".into(),
                dest: PathBuf::new()
            })
        );
        assert_eq!(FolderSpec::parse(">posts"), None);
        assert_eq!(FolderSpec::parse("../outside>posts"), None);
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            FolderSpec::split_list("a>posts, b ,,"),
            vec!["a>posts".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn test_validate_reports_all_errors() {
        let config = test_parse_config("[vault]\nfolders = [\"../x\"]\nexcluded = [\"(\"]");
        let mut diag = ConfigDiagnostics::new();
        config.vault.validate(&mut diag);
        // path missing + bad folder + bad regex
        assert_eq!(diag.len(), 3);
    }
}
