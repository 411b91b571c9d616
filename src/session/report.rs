//! Run summary.

use crate::core::{RunMode, SsgKind};
use crate::diagnostics::{Diagnostic, Level};
use crate::linkword::Conflict;
use crate::log;
use crate::utils::plural::plural_count;
use serde::Serialize;

/// What a run did and what went wrong.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub ssg: SsgKind,
    /// Notes discovered.
    pub notes: usize,
    /// Notes rewritten (and written, in convert mode).
    pub converted: usize,
    /// Attachments copied (referenced, in check mode).
    pub attachments: usize,
    /// Link-word links injected across all notes.
    pub links_added: usize,
    pub conflicts: Vec<Conflict>,
    pub warnings: Vec<Diagnostic>,
    pub errors: Vec<Diagnostic>,
}

impl Report {
    pub fn new(ssg: SsgKind) -> Self {
        Self {
            ssg,
            notes: 0,
            converted: 0,
            attachments: 0,
            links_added: 0,
            conflicts: Vec::new(),
            warnings: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Sort drained diagnostics into warnings and errors.
    pub fn absorb(&mut self, diagnostics: Vec<Diagnostic>) {
        for d in diagnostics {
            match d.level {
                Level::Warning => self.warnings.push(d),
                Level::Error => self.errors.push(d),
            }
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Log every diagnostic, then the totals.
    pub fn print(&self, mode: RunMode) {
        for warning in &self.warnings {
            log!("warn"; "{}", warning);
        }
        for error in &self.errors {
            log!("error"; "{}", error);
        }

        let verb = match mode {
            RunMode::Convert => "converted",
            RunMode::Check => "checked",
        };
        log!(mode.name(); "{} of {} {} for {}, {}, {}",
            self.converted,
            plural_count(self.notes, "note"),
            verb,
            self.ssg.name(),
            plural_count(self.attachments, "attachment"),
            plural_count(self.links_added, "auto-link"));

        if !self.warnings.is_empty() || !self.errors.is_empty() {
            log!(mode.name(); "{}, {}",
                plural_count(self.warnings.len(), "warning"),
                plural_count(self.errors.len(), "error"));
        }
    }
}
