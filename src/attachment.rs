//! Attachment naming and copying.
//!
//! Every resolved non-note link target is copied once into the attachment
//! folder of the project. Names are assigned up front, so rewriting can
//! point at them whether or not the copy succeeds.

use crate::config::{AttachmentConfig, AttachmentNaming, SlugConfig};
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::logger::ProgressLine;
use crate::utils::path::slug::{add_spaces, slugify};
use crate::{debug, log};
use anyhow::{Context, Result};
use rayon::prelude::*;
use rustc_hash::{FxHashMap, FxHashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// Fallback base name when a slug comes out empty.
const FALLBACK_NAME: &str = "attachment";

/// An attachment and its assigned file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub source: PathBuf,
    pub name: String,
}

/// Assign a destination file name to each distinct source, in order.
///
/// Sources whose name cannot be computed (unreadable under md5 naming) are
/// reported and left out. Under md5 naming, sources with the same name
/// share one file. Under slug naming the first source keeps a name and later
/// ones get a numbered one (`a-b-2.png`), with a warning.
pub fn assign_names<'a>(
    sources: impl IntoIterator<Item = &'a Path>,
    vault: &Path,
    naming: AttachmentNaming,
    slug: &SlugConfig,
    diag: &Diagnostics,
) -> Vec<Attachment> {
    let mut seen: FxHashMap<String, PathBuf> = FxHashMap::default();
    let mut done: FxHashSet<&Path> = FxHashSet::default();
    let mut assigned = Vec::new();

    for source in sources {
        if !done.insert(source) {
            continue;
        }
        let name = match naming {
            AttachmentNaming::Slug => Ok(slug_name(source, vault, slug)),
            AttachmentNaming::Md5 => md5_name(source),
        };
        let name = match name {
            Ok(name) => name,
            Err(e) => {
                diag.error(DiagnosticKind::AttachmentFailed, Some(source), format!("{e:#}"));
                continue;
            }
        };

        let name = match seen.get(&name) {
            Some(first) if naming == AttachmentNaming::Md5 => {
                // identical content, one copy serves both
                debug!("attachment"; "{} has the same content as {}", source.display(), first.display());
                name
            }
            Some(first) => {
                let unique = numbered_name(&name, |candidate| seen.contains_key(candidate));
                diag.warn(
                    DiagnosticKind::DuplicateDestination,
                    Some(source),
                    format!(
                        "attachment name `{name}` already used by {}, renamed to `{unique}`",
                        first.display()
                    ),
                );
                seen.insert(unique.clone(), source.to_path_buf());
                unique
            }
            None => {
                seen.insert(name.clone(), source.to_path_buf());
                name
            }
        };
        assigned.push(Attachment {
            source: source.to_path_buf(),
            name,
        });
    }
    assigned
}

/// First free `<stem>-<n>.<ext>` for `name`, counting from 2.
fn numbered_name(name: &str, taken: impl Fn(&str) -> bool) -> String {
    let (stem, ext) = match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    };
    (2..)
        .map(|n| match ext {
            Some(ext) => format!("{stem}-{n}.{ext}"),
            None => format!("{stem}-{n}"),
        })
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| name.to_string())
}

/// `<rel dir>-<stem>` slugified, plus the lower-cased extension.
///
/// `Assets/Img/Photo One.PNG` -> `assets-img-photo-one.png`
pub fn slug_name(source: &Path, vault: &Path, slug: &SlugConfig) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_default();
    let rel_dir = source
        .strip_prefix(vault)
        .ok()
        .and_then(Path::parent)
        .map(|p| p.to_string_lossy().replace(['/', '\\'], "-"))
        .unwrap_or_default();
    let base = if rel_dir.is_empty() {
        stem.into_owned()
    } else {
        format!("{rel_dir}-{stem}")
    };

    let mut name = slugify(&add_spaces(&base), slug);
    if name.is_empty() {
        name.push_str(FALLBACK_NAME);
    }
    push_extension(&mut name, source);
    name
}

/// Hex MD5 of the content, plus the lower-cased extension.
pub fn md5_name(source: &Path) -> Result<String> {
    let bytes = fs::read(source).with_context(|| format!("cannot read {}", source.display()))?;
    let mut name = format!("{:x}", md5::compute(bytes));
    push_extension(&mut name, source);
    Ok(name)
}

fn push_extension(name: &mut String, source: &Path) {
    if let Some(ext) = source.extension().and_then(|e| e.to_str()) {
        name.push('.');
        name.push_str(&ext.to_lowercase());
    }
}

/// Copy assigned attachments into `config`'s target directory.
///
/// Each destination name is copied once (md5 twins share a file). Failures
/// are recorded per attachment; returns how many files were copied.
pub fn copy_all(
    attachments: &[Attachment],
    config: &AttachmentConfig,
    project: &Path,
    diag: &Diagnostics,
    progress: bool,
) -> Result<usize> {
    if attachments.is_empty() {
        return Ok(0);
    }
    let target = config.target_dir(project);
    fs::create_dir_all(&target)
        .with_context(|| format!("failed to create {}", target.display()))?;

    let mut names = FxHashSet::default();
    let unique: Vec<&Attachment> = attachments
        .iter()
        .filter(|a| names.insert(a.name.as_str()))
        .collect();

    let bar = progress.then(|| ProgressLine::new("attachments", &[("copied", unique.len())]));
    let copied = unique
        .par_iter()
        .filter(|a| {
            let dest = target.join(&a.name);
            let ok = match fs::copy(&a.source, &dest) {
                Ok(_) => true,
                Err(e) => {
                    diag.error(
                        DiagnosticKind::AttachmentFailed,
                        Some(a.source.as_path()),
                        format!("cannot copy to {}: {e}", dest.display()),
                    );
                    false
                }
            };
            if let Some(bar) = &bar {
                bar.inc("copied");
            }
            ok
        })
        .count();
    if let Some(bar) = bar {
        bar.finish();
    }

    log!("attachments"; "{} copied to {}", copied, target.display());
    Ok(copied)
}
