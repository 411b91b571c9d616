//! `[project]` section: the Hugo/Zola site receiving converted content.

use crate::config::{ConfigDiagnostics, FieldPath};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Target static site generator.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SsgChoice {
    /// Detect from the project's config files (default).
    #[default]
    Auto,
    Hugo,
    Zola,
}

/// Frontmatter flavour written to converted notes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FrontmatterChoice {
    /// YAML for Hugo, TOML for Zola (default).
    #[default]
    Auto,
    Yaml,
    Toml,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Site project root (contains `content/` and `static/`).
    pub path: Option<PathBuf>,
    pub ssg: SsgChoice,
    pub frontmatter: FrontmatterChoice,
    /// Remove previously converted notes from destination folders first.
    /// `_index.*` section files are kept.
    pub clean: bool,
}

impl ProjectConfig {
    pub const PATH: FieldPath = FieldPath::new("project.path");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.path.is_none() {
            diag.error_with_hint(
                Self::PATH,
                "project path is not set",
                "pass it as the second argument or set `path` under [project]",
            );
        }
    }
}
