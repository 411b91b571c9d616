//! Configuration management for `notepress.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── vault      # [vault]
//! │   ├── project    # [project]
//! │   ├── attachment # [attachment]
//! │   ├── linking    # [linking]
//! │   └── slug       # [slug]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util.rs        # find_config_file, normalize_host
//! └── mod.rs         # NotepressConfig (this file)
//! ```
//!
//! The config file is optional: every setting has a default, and the two
//! required paths (vault and project) can come from the command line.
//! Paths written in the file are relative to the file's directory; paths
//! given on the command line are relative to the working directory.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    AttachmentConfig, AttachmentNaming, FolderSpec, FrontmatterChoice, LinkingConfig,
    ProjectConfig, SlugConfig, SlugMode, SlugSeparator, SsgChoice, VaultConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::{
    cli::{Cli, Commands, ConvertArgs, SourceArgs},
    log,
    utils::path::{expand_tilde, normalize_path},
};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name searched upward from the working directory.
pub const DEFAULT_CONFIG_NAME: &str = "notepress.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing notepress.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotepressConfig {
    /// Absolute path to the config file, if one was found (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default)]
    pub attachment: AttachmentConfig,

    #[serde(default)]
    pub linking: LinkingConfig,

    #[serde(default)]
    pub slug: SlugConfig,
}

impl NotepressConfig {
    /// Load configuration: config file (optional) + CLI overrides + validation.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let path = normalize_path(&path);
                let mut config = Self::from_path(&path)?;
                if let Some(base) = path.parent() {
                    config.resolve_file_paths(base);
                }
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG_NAME) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => Self::default(),
        };

        config.apply_command_options(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse {}", path.display()))?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warn"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Make paths written in the config file absolute, relative to `base`.
    fn resolve_file_paths(&mut self, base: &Path) {
        let resolve = |path: &Path| {
            let path = expand_tilde(path);
            if path.is_absolute() {
                normalize_path(&path)
            } else {
                normalize_path(&base.join(path))
            }
        };

        self.vault.path = self.vault.path.as_deref().map(resolve);
        self.project.path = self.project.path.as_deref().map(resolve);
        self.attachment.target = self.attachment.target.as_deref().map(resolve);
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Convert { source, args } => {
                self.apply_source_args(source);
                self.apply_convert_args(args);
            }
            Commands::Check { source, .. } => {
                self.apply_source_args(source);
            }
        }
    }

    fn apply_source_args(&mut self, args: &SourceArgs) {
        // Set verbose mode globally
        crate::logger::set_verbose(args.verbose);

        Self::update_path(&mut self.vault.path, args.vault.as_deref());
        Self::update_path(&mut self.project.path, args.project.as_deref());
        if let Some(folders) = &args.folders {
            self.vault.folders = FolderSpec::split_list(folders);
        }
        Self::update_option(&mut self.project.ssg, args.ssg.as_ref());
    }

    fn apply_convert_args(&mut self, args: &ConvertArgs) {
        if let Some(md5) = args.md5 {
            self.attachment.naming = if md5 {
                AttachmentNaming::Md5
            } else {
                AttachmentNaming::Slug
            };
        }
        Self::update_option(&mut self.attachment.folder, args.attachment_folder.as_ref());
        if args.attachment_host.is_some() {
            self.attachment.host = args.attachment_host.clone();
        }
        Self::update_path(&mut self.attachment.target, args.attachment_target.as_deref());
        Self::update_option(&mut self.linking.enable, args.link_words.as_ref());
        Self::update_option(&mut self.linking.max_per_article, args.max_links.as_ref());
        Self::update_option(&mut self.project.frontmatter, args.frontmatter.as_ref());
        self.project.clean |= args.clean;
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// CLI paths are relative to the working directory.
    fn update_path(config_path: &mut Option<PathBuf>, cli_path: Option<&Path>) {
        if let Some(path) = cli_path {
            *config_path = Some(normalize_path(path));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.vault.validate(&mut diag);
        self.project.validate(&mut diag);
        self.attachment.validate(&mut diag);

        if self.linking.enable && self.linking.max_per_article == 0 {
            diag.warn(
                "linking.max_per_article",
                "0 disables link words, set `enable = false` instead",
            );
        }

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    // ========================================================================
    // accessors
    // ========================================================================

    /// Vault root (set after successful `load`).
    pub fn vault_root(&self) -> &Path {
        self.vault.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// Project root (set after successful `load`).
    pub fn project_root(&self) -> &Path {
        self.project.path.as_deref().unwrap_or_else(|| Path::new(""))
    }

    /// `content/` directory of the project.
    pub fn content_dir(&self) -> PathBuf {
        self.project_root().join("content")
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> NotepressConfig {
    let (parsed, ignored) = NotepressConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

/// Config with both roots set, for pipeline tests.
#[cfg(test)]
pub fn test_config(vault: &Path, project: &Path) -> NotepressConfig {
    let mut config = NotepressConfig::default();
    config.vault.path = Some(vault.to_path_buf());
    config.project.path = Some(project.to_path_buf());
    config
}

// ============================================================================
// tests
// ============================================================================
