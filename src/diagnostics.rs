//! Run diagnostics.
//!
//! Phases running on rayon workers push warnings and errors here; the
//! session drains them into the final report. The sink is append-only and
//! the only state shared across workers.

use crate::debug;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Warning,
    Error,
}

/// What went wrong, for filtering and `check --json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// `[x]()` and friends.
    EmptyLink,
    /// Link target not found in the vault.
    UnresolvedLink,
    /// Link to a note that is not converted in this run.
    ExcludedNote,
    /// Two notes declare the same link word with different targets.
    LinkWordConflict,
    /// Two notes or attachments map to the same destination file.
    DuplicateDestination,
    /// A note could not be read, parsed or written.
    NoteFailed,
    /// An attachment could not be copied.
    AttachmentFailed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    pub kind: DiagnosticKind,
    /// Note (or attachment) the diagnostic is about.
    pub note: Option<PathBuf>,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.note {
            Some(note) => write!(f, "{}: {}", note.display(), self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Shared diagnostic collector.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Mutex<Vec<Diagnostic>>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&self, kind: DiagnosticKind, note: Option<&Path>, message: impl Into<String>) {
        self.push(Level::Warning, kind, note, message.into());
    }

    pub fn error(&self, kind: DiagnosticKind, note: Option<&Path>, message: impl Into<String>) {
        self.push(Level::Error, kind, note, message.into());
    }

    fn push(&self, level: Level, kind: DiagnosticKind, note: Option<&Path>, message: String) {
        let diagnostic = Diagnostic {
            level,
            kind,
            note: note.map(Path::to_path_buf),
            message,
        };
        debug!("diag"; "{:?} {}", level, diagnostic);
        self.entries.lock().push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.entries.lock().iter().any(|d| d.level == Level::Error)
    }

    /// Count of entries of `kind`.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// Take everything collected so far, in push order.
    pub fn drain(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.entries.lock())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_and_drain() {
        let diag = Diagnostics::new();
        diag.warn(DiagnosticKind::EmptyLink, Some(Path::new("a.md")), "empty link");
        diag.error(DiagnosticKind::NoteFailed, None, "boom");

        assert_eq!(diag.len(), 2);
        assert!(diag.has_errors());
        assert_eq!(diag.count(DiagnosticKind::EmptyLink), 1);

        let all = diag.drain();
        assert_eq!(all[0].to_string(), "a.md: empty link");
        assert_eq!(all[1].to_string(), "boom");
        assert!(diag.is_empty());
    }

    #[test]
    fn test_parallel_pushes() {
        use rayon::prelude::*;
        let diag = Diagnostics::new();
        (0..100).into_par_iter().for_each(|i| {
            diag.warn(DiagnosticKind::UnresolvedLink, None, format!("{i}"));
        });
        assert_eq!(diag.len(), 100);
        assert!(!diag.has_errors());
    }

    #[test]
    fn test_serialize() {
        let d = Diagnostic {
            level: Level::Warning,
            kind: DiagnosticKind::LinkWordConflict,
            note: None,
            message: "m".into(),
        };
        let json = serde_json::to_string(&d).unwrap();
        assert_eq!(
            json,
            r#"{"level":"warning","kind":"link_word_conflict","note":null,"message":"m"}"#
        );
    }
}
