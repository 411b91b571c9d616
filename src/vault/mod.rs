//! Vault traversal and folder mapping.
//!
//! Decides which notes a run converts and where their pages land:
//!
//! - with `folders`, each listed source folder maps to its destination
//!   under `content/`, non-recursively
//! - without, every non-excluded folder maps to the same relative path
//!   under `content/`, and the vault root itself to `content/posts`
//!
//! Notes are the markdown files directly inside a mapped folder.

pub mod exclude;
pub mod naming;

pub use exclude::{Exclusions, templates_folder};
pub use naming::{destination, note_slug};

use crate::config::NotepressConfig;
use crate::core::FileCategory;
use crate::permalink::DEFAULT_SECTION;
use crate::{debug, log};
use anyhow::{Context, Result};
use jwalk::WalkDir;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// One source folder and its destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedFolder {
    /// Absolute source folder.
    pub source: PathBuf,
    /// Destination relative to `content/` (empty = `content/` itself).
    pub dest: PathBuf,
}

/// A note scheduled for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteSource {
    pub path: PathBuf,
    /// Destination folder relative to `content/`.
    pub dest_dir: PathBuf,
}

/// Why a linked note is not part of the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// A parent directory matches an exclusion (or is the templates folder).
    ExcludedDir(String),
    /// Its folder is not listed in `folders`.
    OutOfScope(PathBuf),
    /// Its folder is below a listed one; `folders` is not recursive.
    SubfolderOfScope(PathBuf),
    Unknown,
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludedDir(name) => {
                write!(f, "its parent directory `{name}` is excluded")
            }
            Self::OutOfScope(dir) => write!(
                f,
                "its directory `{}` is not in the `folders` scope",
                dir.display()
            ),
            Self::SubfolderOfScope(dir) => write!(
                f,
                "its directory `{}` is below a folder in `folders`, which are not recursive; list it explicitly to convert it",
                dir.display()
            ),
            Self::Unknown => f.write_str("it is not among the notes of this run"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vault {
    root: PathBuf,
    content: PathBuf,
    folders: Vec<MappedFolder>,
    exclusions: Exclusions,
    /// Folders came from an explicit `folders` list.
    scoped: bool,
}

impl Vault {
    /// Build the folder map for `config`.
    pub fn open(config: &NotepressConfig) -> Self {
        let root = config.vault_root().to_path_buf();
        let templates = config
            .vault
            .skip_templates
            .then(|| templates_folder(&root))
            .flatten();
        if let Some(templates) = &templates {
            debug!("vault"; "skipping templates folder {}", templates.display());
        }
        let exclusions = Exclusions::new(config.vault.excluded_patterns(), templates);

        let specs = config.vault.folder_specs();
        let scoped = !specs.is_empty();
        let folders = if scoped {
            specs
                .into_iter()
                .map(|spec| MappedFolder {
                    source: root.join(&spec.source),
                    dest: spec.dest,
                })
                .collect()
        } else {
            walk_folders(&root, &exclusions)
        };

        for folder in &folders {
            debug!("vault"; "{} -> content/{}", folder.source.display(), folder.dest.display());
        }

        Self {
            root,
            content: config.content_dir(),
            folders,
            exclusions,
            scoped,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn folders(&self) -> &[MappedFolder] {
        &self.folders
    }

    /// Notes of every mapped folder, sorted by path.
    pub fn notes(&self) -> Vec<NoteSource> {
        let mut notes = Vec::new();
        for folder in &self.folders {
            if let Some(name) = self.excluded_by(&folder.source) {
                debug!("vault"; "skipping {} (excluded `{}`)", folder.source.display(), name);
                continue;
            }
            let Ok(entries) = fs::read_dir(&folder.source) else {
                log!("warn"; "cannot read folder {}", folder.source.display());
                continue;
            };
            notes.extend(
                entries
                    .filter_map(Result::ok)
                    .map(|e| e.path())
                    .filter(|p| p.is_file() && FileCategory::is_note(p))
                    .map(|path| NoteSource {
                        path,
                        dest_dir: folder.dest.clone(),
                    }),
            );
        }
        notes.sort_by(|a, b| a.path.cmp(&b.path));
        notes.dedup_by(|a, b| a.path == b.path);
        notes
    }

    fn excluded_by(&self, dir: &Path) -> Option<String> {
        let rel = dir.strip_prefix(&self.root).unwrap_or(dir);
        self.exclusions.excluded_by(rel)
    }

    /// Why `note` (a resolved note outside the run) is not converted.
    pub fn exclusion_reason(&self, note: &Path) -> ExclusionReason {
        let parent = note.parent().unwrap_or(&self.root);
        if let Some(name) = self.excluded_by(parent) {
            return ExclusionReason::ExcludedDir(name);
        }
        if !self.scoped {
            return ExclusionReason::Unknown;
        }

        let rel = parent.strip_prefix(&self.root).unwrap_or(parent).to_path_buf();
        let below_scope = self
            .folders
            .iter()
            .any(|f| parent != f.source && parent.starts_with(&f.source));
        if below_scope {
            ExclusionReason::SubfolderOfScope(rel)
        } else if self.folders.iter().any(|f| f.source == parent) {
            ExclusionReason::Unknown
        } else {
            ExclusionReason::OutOfScope(rel)
        }
    }

    /// Destination folders, absolute.
    pub fn dest_dirs(&self) -> Vec<PathBuf> {
        let mut dirs: Vec<PathBuf> = self
            .folders
            .iter()
            .map(|f| self.content.join(&f.dest))
            .collect();
        dirs.sort();
        dirs.dedup();
        dirs
    }

    /// Remove previously generated files from the destination folders and
    /// `extra` directories. Section index files (`_index.*`) survive.
    pub fn clean(&self, project: &Path, extra: &[PathBuf]) -> Result<usize> {
        let mut dirs = self.dest_dirs();
        dirs.extend(extra.iter().cloned());

        let mut removed = 0;
        for dir in dirs {
            if !dir.is_dir() || dir == project {
                continue;
            }
            removed += clean_dir(&dir)?;
        }
        Ok(removed)
    }
}

/// Every non-excluded folder below `root`, plus the root as `posts`.
fn walk_folders(root: &Path, exclusions: &Exclusions) -> Vec<MappedFolder> {
    let mut folders: Vec<MappedFolder> = WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.depth > 0 && e.file_type().is_dir())
        .filter_map(|e| {
            let source = e.path();
            let rel = source.strip_prefix(root).ok()?.to_path_buf();
            exclusions.excluded_by(&rel).is_none().then_some(MappedFolder { source, dest: rel })
        })
        .collect();
    folders.push(MappedFolder {
        source: root.to_path_buf(),
        dest: PathBuf::from(DEFAULT_SECTION),
    });
    folders
}

fn clean_dir(dir: &Path) -> Result<usize> {
    let mut removed = 0;
    for entry in WalkDir::new(dir).skip_hidden(false).into_iter().filter_map(Result::ok) {
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        let is_index = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.starts_with("_index."));
        if is_index {
            continue;
        }
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
        removed += 1;
    }
    debug!("clean"; "{} file(s) removed from {}", removed, dir.display());
    Ok(removed)
}
