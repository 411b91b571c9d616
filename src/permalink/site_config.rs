//! Reading the site generator's own config file.

use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file names, in lookup order. `hugo.*` is Hugo's current name,
/// `config.*` the legacy one shared with Zola.
pub const CONFIG_FILES: &[&str] = &[
    "hugo.toml",
    "hugo.yaml",
    "hugo.yml",
    "hugo.json",
    "config.toml",
    "config.yaml",
    "config.yml",
    "config.json",
];

/// A parsed site config.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    pub path: PathBuf,
    /// Raw file text, for name sniffing.
    pub text: String,
    /// Parsed document; `None` when the file does not parse.
    pub value: Option<Value>,
}

impl SiteConfig {
    /// Read `path`; the format follows the extension.
    pub fn read(path: &Path) -> Option<Self> {
        let text = fs::read_to_string(path).ok()?;
        let value = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str::<Value>(&text).ok(),
            Some("yaml" | "yml") => serde_yaml::from_str::<Value>(&text).ok(),
            Some("json") => serde_json::from_str::<Value>(&text).ok(),
            _ => None,
        };
        Some(Self {
            path: path.to_path_buf(),
            text,
            value,
        })
    }

    /// Whether the file is one of Hugo's `hugo.*` names.
    pub fn is_hugo_named(&self) -> bool {
        self.path
            .file_stem()
            .is_some_and(|stem| stem.eq_ignore_ascii_case("hugo"))
    }

    /// Top-level key present in the parsed document.
    pub fn has_key(&self, key: &str) -> bool {
        self.value
            .as_ref()
            .and_then(Value::as_object)
            .is_some_and(|map| map.contains_key(key))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.value.as_ref()?.get(key)
    }
}

/// All existing config files of `project`, in lookup order.
pub fn read_all(project: &Path) -> Vec<SiteConfig> {
    CONFIG_FILES
        .iter()
        .map(|name| project.join(name))
        .filter(|path| path.is_file())
        .filter_map(|path| SiteConfig::read(&path))
        .collect()
}

/// First config file that parses.
pub fn read_first(project: &Path) -> Option<SiteConfig> {
    read_all(project).into_iter().find(|c| c.value.is_some())
}
