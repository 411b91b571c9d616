//! File category of a resolved link source.

use std::path::Path;

/// What a resolved path points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCategory {
    /// Markdown note (`.md` / `.markdown`), converted to a page.
    Note,
    /// Any other file, copied as an attachment.
    Attachment,
}

impl FileCategory {
    const NOTE_EXTENSIONS: &[&str] = &["md", "markdown"];

    /// Detect category from file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Self {
        if Self::is_note(path) {
            Self::Note
        } else {
            Self::Attachment
        }
    }

    /// Check if a path is a markdown note.
    #[inline]
    pub fn is_note(path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                Self::NOTE_EXTENSIONS
                    .iter()
                    .any(|n| ext.eq_ignore_ascii_case(n))
            })
    }
}
