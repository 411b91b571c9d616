//! Config field path used to label diagnostics.

use owo_colors::OwoColorize;
use std::fmt;

/// Dotted path of a config field (`"attachment.host"`).
///
/// Sections expose their fields as associated constants:
///
/// ```ignore
/// impl AttachmentConfig {
///     pub const HOST: FieldPath = FieldPath::new("attachment.host");
/// }
///
/// diag.error(AttachmentConfig::HOST, "invalid URL");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(pub &'static str);

impl FieldPath {
    #[inline]
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_args!("`{}`", self.0).bright_blue())
    }
}

impl AsRef<str> for FieldPath {
    fn as_ref(&self) -> &str {
        self.0
    }
}
