//! Guess the site generator of a project directory.

use super::site_config::{SiteConfig, read_all};
use crate::core::SsgKind;
use crate::debug;
use crate::meta::frontmatter::{FrontmatterFormat, split};
use crate::core::FileCategory;
use jwalk::WalkDir;
use std::fs;
use std::path::Path;

const ZOLA_KEYS: &[&str] = &["base_url", "default_language", "taxonomies"];
const HUGO_KEYS: &[&str] = &["baseURL", "languageCode", "paginate", "enableRobotsTXT"];

/// Content directories whose first note hints the front matter style.
const SAMPLE_DIRS: &[&str] = &["content", "posts", "blog"];

/// Detect the generator from config files, then sample content, then fall
/// back to Hugo.
///
/// 1. any `hugo.*` config
/// 2. the generator's name in a `config.*` file
/// 3. generator-specific config keys
/// 4. front matter delimiter of the first note (`---` Hugo, `+++` Zola)
pub fn detect_ssg(project: &Path) -> SsgKind {
    let configs = read_all(project);

    let detected = configs
        .iter()
        .any(SiteConfig::is_hugo_named)
        .then_some(SsgKind::Hugo)
        .or_else(|| configs.iter().find_map(by_name))
        .or_else(|| configs.iter().find_map(by_keys))
        .or_else(|| by_content(project));

    match detected {
        Some(ssg) => {
            debug!("detect"; "{} detected in {}", ssg.name(), project.display());
            ssg
        }
        None => {
            debug!("detect"; "nothing conclusive in {}, assuming hugo", project.display());
            SsgKind::Hugo
        }
    }
}

fn by_name(config: &SiteConfig) -> Option<SsgKind> {
    let text = config.text.to_lowercase();
    if text.contains("zola") {
        Some(SsgKind::Zola)
    } else if text.contains("hugo") {
        Some(SsgKind::Hugo)
    } else {
        None
    }
}

/// TOML configs check Zola keys first (Zola is TOML-only); YAML ones Hugo.
fn by_keys(config: &SiteConfig) -> Option<SsgKind> {
    let has_any = |keys: &[&str]| keys.iter().any(|k| config.has_key(k));
    let is_toml = config.path.extension().is_some_and(|e| e == "toml");
    let order = if is_toml {
        [(ZOLA_KEYS, SsgKind::Zola), (HUGO_KEYS, SsgKind::Hugo)]
    } else {
        [(HUGO_KEYS, SsgKind::Hugo), (ZOLA_KEYS, SsgKind::Zola)]
    };
    order
        .into_iter()
        .find(|(keys, _)| has_any(keys))
        .map(|(_, ssg)| ssg)
}

fn by_content(project: &Path) -> Option<SsgKind> {
    SAMPLE_DIRS
        .iter()
        .map(|dir| project.join(dir))
        .filter(|dir| dir.is_dir())
        .find_map(|dir| first_note_style(&dir))
}

fn first_note_style(dir: &Path) -> Option<SsgKind> {
    let mut notes: Vec<_> = WalkDir::new(dir)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && FileCategory::is_note(&e.path()))
        .map(|e| e.path())
        .collect();
    notes.sort();

    let content = fs::read_to_string(notes.first()?).ok()?;
    match split(&content).format? {
        FrontmatterFormat::Yaml => Some(SsgKind::Hugo),
        FrontmatterFormat::Toml => Some(SsgKind::Zola),
    }
}
