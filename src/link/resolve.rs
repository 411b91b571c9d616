//! Vault path resolution for link targets.

use crate::utils::path::clean_path;
use percent_encoding::percent_decode_str;
use std::path::{Path, PathBuf};

/// Find the file a vault link path points at.
///
/// `path` is the target without its fragment, possibly percent-encoded.
/// Candidates, first existing file wins:
///
/// 1. `<vault>/<path>`
/// 2. `<vault>/<path>.md`
/// 3. `<folder>/<path>`
/// 4. `<folder>/<path>.md`
///
/// A leading `/` means vault-root relative. Paths are folded lexically, so
/// `../` may climb out of `folder`.
pub fn resolve_target(vault: &Path, folder: &Path, path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(path).decode_utf8_lossy();
    let relative = decoded.trim().trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    [vault, folder]
        .into_iter()
        .flat_map(|base| candidates(base, relative))
        .find(|candidate| candidate.is_file())
}

fn candidates(base: &Path, relative: &str) -> [PathBuf; 2] {
    [
        clean_path(&base.join(relative)),
        clean_path(&base.join(format!("{relative}.md"))),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn vault() -> TempDir {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("notes/sub")).unwrap();
        fs::write(root.join("notes/a.md"), "").unwrap();
        fs::write(root.join("notes/b.md"), "").unwrap();
        fs::write(root.join("notes/sub/c.md"), "").unwrap();
        fs::write(root.join("img.PNG"), "").unwrap();
        fs::write(root.join("My Note.md"), "").unwrap();
        dir
    }

    #[test]
    fn test_vault_relative_first() {
        let dir = vault();
        let root = dir.path();
        let folder = root.join("notes");
        assert_eq!(
            resolve_target(root, &folder, "notes/b.md"),
            Some(root.join("notes/b.md"))
        );
        assert_eq!(
            resolve_target(root, &folder, "/img.PNG"),
            Some(root.join("img.PNG"))
        );
    }

    #[test]
    fn test_folder_relative_and_md_suffix() {
        let dir = vault();
        let root = dir.path();
        let folder = root.join("notes");
        assert_eq!(resolve_target(root, &folder, "b"), Some(root.join("notes/b.md")));
        assert_eq!(
            resolve_target(root, &folder, "sub/c"),
            Some(root.join("notes/sub/c.md"))
        );
        assert_eq!(
            resolve_target(root, &folder.join("sub"), "../a.md"),
            Some(root.join("notes/a.md"))
        );
    }

    #[test]
    fn test_percent_decoded() {
        let dir = vault();
        let root = dir.path();
        assert_eq!(
            resolve_target(root, root, "My%20Note"),
            Some(root.join("My Note.md"))
        );
        assert_eq!(
            resolve_target(root, root, "My Note.md"),
            Some(root.join("My Note.md"))
        );
    }

    #[test]
    fn test_unresolved() {
        let dir = vault();
        let root = dir.path();
        assert_eq!(resolve_target(root, root, "missing.png"), None);
        assert_eq!(resolve_target(root, root, "notes"), None);
        assert_eq!(resolve_target(root, root, ""), None);
    }
}
