//! Per-note discovery.
//!
//! Runs on rayon workers, one note at a time, with no shared state besides
//! the diagnostic sink. Each note yields its own catalog fragment.

use super::ConvertError;
use crate::config::SlugConfig;
use crate::diagnostics::Diagnostics;
use crate::link::{ExtractContext, LinkCatalog, declared_link_words};
use crate::meta::MetaMap;
use crate::meta::frontmatter::parse;
use crate::meta::normalize::{NoteFacts, normalize};
use crate::vault::{NoteSource, destination, note_slug};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Everything discovery learns about a note.
#[derive(Debug)]
pub struct Discovered {
    pub source: PathBuf,
    /// Destination relative to `content/`.
    pub dest: PathBuf,
    pub slug: String,
    pub meta: MetaMap,
    /// Body with wiki links normalized.
    pub body: String,
    pub facts: NoteFacts,
    pub link_words: Vec<String>,
    pub link_priority: i64,
    pub catalog: LinkCatalog,
}

pub fn discover(
    note: &NoteSource,
    vault: &Path,
    slug: &SlugConfig,
    diag: &Diagnostics,
) -> Result<Discovered, ConvertError> {
    let content = fs::read_to_string(&note.path).map_err(|source| ConvertError::Read {
        path: note.path.clone(),
        source,
    })?;
    let doc = parse(&content).map_err(|source| ConvertError::Frontmatter {
        path: note.path.clone(),
        source,
    })?;

    let stem = note
        .path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mtime = fs::metadata(&note.path)
        .and_then(|m| m.modified())
        .unwrap_or_else(|_| SystemTime::now());

    let mut meta = doc.meta;
    let facts = normalize(&mut meta, &stem, mtime);

    let mut catalog = LinkCatalog::new();
    let ctx = ExtractContext {
        vault,
        note: &note.path,
        diag,
    };
    let body = catalog.extract(doc.body, &meta, &ctx);

    let slug = note_slug(meta.get_str("slug"), &stem, slug);
    let dest = destination(&note.dest_dir, &slug, facts.lang.as_deref());
    let (link_words, link_priority) = declared_link_words(&meta);

    Ok(Discovered {
        source: note.path.clone(),
        dest,
        slug,
        meta,
        body,
        facts,
        link_words,
        link_priority,
        catalog,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_discover_note() {
        let dir = TempDir::new().unwrap();
        let vault = dir.path();
        fs::write(vault.join("b.md"), "").unwrap();
        let path = vault.join("My Note.md");
        fs::write(
            &path,
            "---\nlang: en\nlink_words: [Widget]\nlink_priority: 2\n---\nsee [[b]]\n",
        )
        .unwrap();

        let note = NoteSource {
            path,
            dest_dir: "posts".into(),
        };
        let diag = Diagnostics::new();
        let found = discover(&note, vault, &SlugConfig::default(), &diag).unwrap();

        assert_eq!(found.slug, "my-note");
        assert_eq!(found.dest, PathBuf::from("posts/my-note.en.md"));
        assert_eq!(found.body, "see [b](b)\n");
        assert_eq!(found.facts.title, "My Note");
        assert_eq!(found.link_words, vec!["Widget".to_string()]);
        assert_eq!(found.link_priority, 2);
        assert!(found.catalog.contains("b"));
        assert!(diag.is_empty());
    }

    #[test]
    fn test_discover_bad_frontmatter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("x.md");
        fs::write(&path, "---\n: [\n---\nbody").unwrap();
        let note = NoteSource {
            path,
            dest_dir: "posts".into(),
        };
        let err = discover(&note, dir.path(), &SlugConfig::default(), &Diagnostics::new());
        assert!(matches!(err, Err(ConvertError::Frontmatter { .. })));
    }
}
