//! Folders that never take part in a run.

use crate::debug;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// `.obsidian/templates.json`; only `folder` matters here.
#[derive(Debug, Deserialize)]
struct TemplatesJson {
    folder: Option<String>,
}

/// Vault-relative templates folder declared by the templates core plugin.
pub fn templates_folder(vault: &Path) -> Option<PathBuf> {
    let path = vault.join(".obsidian").join("templates.json");
    let text = fs::read_to_string(&path).ok()?;
    match serde_json::from_str::<TemplatesJson>(&text) {
        Ok(json) => {
            let folder = json.folder?;
            let folder = folder.trim().trim_matches('/');
            (!folder.is_empty()).then(|| PathBuf::from(folder))
        }
        Err(e) => {
            debug!("vault"; "ignoring {}: {}", path.display(), e);
            None
        }
    }
}

/// Directory-name patterns plus the templates folder.
#[derive(Debug, Clone, Default)]
pub struct Exclusions {
    patterns: Vec<Regex>,
    templates: Option<PathBuf>,
}

impl Exclusions {
    pub fn new(patterns: Vec<Regex>, templates: Option<PathBuf>) -> Self {
        Self { patterns, templates }
    }

    pub fn templates(&self) -> Option<&Path> {
        self.templates.as_deref()
    }

    /// Whether a single directory name matches a pattern.
    pub fn matches_name(&self, name: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(name))
    }

    /// First excluded component of a vault-relative directory, if any.
    ///
    /// Every ancestor is checked, so anything below an excluded folder is
    /// excluded too.
    pub fn excluded_by(&self, rel_dir: &Path) -> Option<String> {
        if let Some(templates) = &self.templates
            && rel_dir.starts_with(templates)
        {
            return Some(templates.display().to_string());
        }
        rel_dir.components().find_map(|c| match c {
            Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.matches_name(&name).then(|| name.into_owned())
            }
            _ => None,
        })
    }
}
