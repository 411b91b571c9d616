//! `[attachment]` section: where referenced files are copied and how they are named.

use crate::config::{ConfigDiagnostics, FieldPath, util::normalize_host};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// Destination file naming policy.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentNaming {
    /// Slug of the vault-relative directory plus file stem (default).
    #[default]
    Slug,
    /// MD5 digest of the file content.
    Md5,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AttachmentConfig {
    /// Folder name under `static/`, also the URL path segment.
    pub folder: String,
    /// Copy target overriding `<project>/static/<folder>`.
    pub target: Option<PathBuf>,
    /// Host serving attachments (e.g. a CDN); URLs stay root-relative when unset.
    pub host: Option<String>,
    pub naming: AttachmentNaming,
}

impl Default for AttachmentConfig {
    fn default() -> Self {
        Self {
            folder: "attachments".to_string(),
            target: None,
            host: None,
            naming: AttachmentNaming::Slug,
        }
    }
}

impl AttachmentConfig {
    pub const FOLDER: FieldPath = FieldPath::new("attachment.folder");
    pub const HOST: FieldPath = FieldPath::new("attachment.host");

    /// URL prefix for attachment links, without trailing slash.
    ///
    /// # Examples
    /// ```ignore
    /// folder = "attachments"                    -> "/attachments"
    /// host = "https://cdn.example.com/", same   -> "https://cdn.example.com/attachments"
    /// ```
    pub fn url_prefix(&self) -> String {
        let folder = self.folder.trim_matches('/');
        match self.host.as_deref().and_then(normalize_host) {
            Some(host) => format!("{host}/{folder}"),
            None => format!("/{folder}"),
        }
    }

    /// Directory attachments are copied into.
    pub fn target_dir(&self, project: &Path) -> PathBuf {
        match &self.target {
            Some(target) if target.is_absolute() => target.clone(),
            Some(target) => project.join(target),
            None => project.join("static").join(self.folder.trim_matches('/')),
        }
    }

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let folder = self.folder.trim_matches('/');
        let plain = Path::new(folder)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if folder.is_empty() || !plain {
            diag.error_with_hint(
                Self::FOLDER,
                format!("invalid attachment folder `{}`", self.folder),
                "use a relative folder name such as `attachments` or `img/notes`",
            );
        }

        if let Some(host) = &self.host
            && normalize_host(host).is_none()
        {
            diag.error_with_hint(
                Self::HOST,
                format!("invalid attachment host `{host}`"),
                "use an absolute URL such as `https://cdn.example.com`",
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.attachment.folder, "attachments");
        assert_eq!(config.attachment.naming, AttachmentNaming::Slug);
        assert_eq!(config.attachment.url_prefix(), "/attachments");
        assert_eq!(
            config.attachment.target_dir(Path::new("/site")),
            PathBuf::from("/site/static/attachments")
        );
    }

    #[test]
    fn test_host_prefix() {
        let config = test_parse_config(
            "[attachment]\nfolder = \"files\"\nhost = \"https://cdn.example.com/\"\nnaming = \"md5\"",
        );
        assert_eq!(
            config.attachment.url_prefix(),
            "https://cdn.example.com/files"
        );
        assert_eq!(config.attachment.naming, AttachmentNaming::Md5);
    }

    #[test]
    fn test_custom_target() {
        let config = test_parse_config("[attachment]\ntarget = \"assets/notes\"");
        assert_eq!(
            config.attachment.target_dir(Path::new("/site")),
            PathBuf::from("/site/assets/notes")
        );
    }

    #[test]
    fn test_validate() {
        let config = test_parse_config("[attachment]\nfolder = \"../up\"\nhost = \"not a url\"");
        let mut diag = ConfigDiagnostics::new();
        config.attachment.validate(&mut diag);
        assert_eq!(diag.len(), 2);
    }
}
