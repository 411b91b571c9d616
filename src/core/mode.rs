//! Run mode of a session.

/// What a session does once discovery and rewriting are done.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Write converted notes and copy attachments.
    Convert,
    /// Report problems only; nothing is written.
    Check,
}

impl RunMode {
    /// Whether the project tree is modified.
    #[inline]
    pub const fn writes(self) -> bool {
        matches!(self, Self::Convert)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Convert => "convert",
            Self::Check => "check",
        }
    }
}
