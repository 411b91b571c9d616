//! Filesystem path normalization.
//!
//! - `normalize_path` - absolute form for user-supplied roots (canonicalize + fallback)
//! - `clean_path` - lexical `.`/`..` folding for link targets, no filesystem access
//! - `expand_tilde` - `~/notes` style paths from config files

use std::path::{Component, Path, PathBuf};

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first (resolves symlinks, `.`, `..`).
/// Falls back to:
/// - Return as-is if already absolute
/// - Join with current directory if relative
#[inline]
pub fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            clean_path(path)
        } else {
            std::env::current_dir()
                .map_or_else(|_| path.to_path_buf(), |cwd| clean_path(&cwd.join(path)))
        }
    })
}

/// Fold `.` and `..` components without touching the filesystem.
///
/// `..` at the root (or at the start of a relative path) is kept, so the
/// result never silently climbs above where it started.
///
/// # Examples
/// ```ignore
/// clean_path(Path::new("/vault/notes/../img/./a.png")) -> "/vault/img/a.png"
/// clean_path(Path::new("../a"))                        -> "../a"
/// ```
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Expand a leading `~` to the home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_path_absolute() {
        let path = Path::new("/absolute/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_normalize_path_relative() {
        let path = Path::new("relative/path/file.txt");
        let normalized = normalize_path(path);
        assert!(normalized.is_absolute());
    }

    #[test]
    fn test_clean_path() {
        assert_eq!(
            clean_path(Path::new("/vault/notes/../img/./a.png")),
            PathBuf::from("/vault/img/a.png")
        );
        assert_eq!(clean_path(Path::new("a/b/../../c")), PathBuf::from("c"));
        assert_eq!(clean_path(Path::new("../a")), PathBuf::from("../a"));
        assert_eq!(clean_path(Path::new("/../a")), PathBuf::from("/a"));
    }

    #[test]
    fn test_expand_tilde_plain() {
        assert_eq!(
            expand_tilde(Path::new("/srv/notes")),
            PathBuf::from("/srv/notes")
        );
        assert!(!expand_tilde(Path::new("~/notes")).starts_with("~"));
    }
}
