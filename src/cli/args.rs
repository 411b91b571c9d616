//! Command-line interface definitions.

use crate::config::{FrontmatterChoice, SsgChoice};
use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Convert a linked markdown vault into Hugo or Zola content
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: notepress.toml, searched upward from cwd)
    #[arg(short = 'C', long, global = true, default_value = crate::config::DEFAULT_CONFIG_NAME, value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Convert notes, copy attachments and write SSG content
    #[command(visible_alias = "c")]
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        args: ConvertArgs,
    },

    /// Resolve links without writing anything and report problems
    #[command(visible_alias = "k")]
    Check {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Where notes come from and where they go (shared by all commands)
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Vault root directory
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub vault: Option<PathBuf>,

    /// Hugo or Zola project root
    #[arg(value_hint = clap::ValueHint::DirPath)]
    pub project: Option<PathBuf>,

    /// Folder mapping, e.g. "Blog>posts,notes" (default: every vault folder)
    #[arg(short, long)]
    pub folders: Option<String>,

    /// Target SSG (default: detect from project config)
    #[arg(short, long, value_enum)]
    pub ssg: Option<SsgChoice>,

    /// Enable verbose output for debugging
    #[arg(short = 'V', long)]
    pub verbose: bool,
}

/// Convert command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Name attachments by MD5 digest of their content
    #[arg(long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub md5: Option<bool>,

    /// Attachment folder under static/ (also the URL path segment)
    #[arg(short = 'a', long)]
    pub attachment_folder: Option<String>,

    /// Host prefixed to attachment URLs, e.g. https://cdn.example.com
    #[arg(long, value_hint = clap::ValueHint::Url)]
    pub attachment_host: Option<String>,

    /// Copy attachments here instead of static/<folder>
    #[arg(long, value_hint = clap::ValueHint::DirPath)]
    pub attachment_target: Option<PathBuf>,

    /// Remove previously converted notes from destination folders first
    #[arg(short, long)]
    pub clean: bool,

    /// Inject links for other notes' link words
    #[arg(short = 'L', long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
    pub link_words: Option<bool>,

    /// Link each word at most N times per note
    #[arg(short = 'm', long, value_name = "N")]
    pub max_links: Option<usize>,

    /// Frontmatter flavour to write (default: YAML for Hugo, TOML for Zola)
    #[arg(long, value_enum)]
    pub frontmatter: Option<FrontmatterChoice>,
}

impl Cli {
    pub const fn is_check(&self) -> bool {
        matches!(self.command, Commands::Check { .. })
    }
}
