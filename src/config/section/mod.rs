//! Configuration section definitions.
//!
//! Each module corresponds to a section in `notepress.toml`:
//!
//! | Module       | TOML Section     | Purpose                               |
//! |--------------|------------------|---------------------------------------|
//! | `vault`      | `[vault]`        | Vault root, folder mapping, excludes  |
//! | `project`    | `[project]`      | Site root, SSG, frontmatter flavour   |
//! | `attachment` | `[attachment]`   | Copy target, URL prefix, naming       |
//! | `linking`    | `[linking]`      | Link-word injection                   |
//! | `slug`       | `[slug]`         | Slug generation                       |

mod attachment;
mod linking;
mod project;
mod slug;
mod vault;

pub use attachment::{AttachmentConfig, AttachmentNaming};
pub use linking::LinkingConfig;
pub use project::{FrontmatterChoice, ProjectConfig, SsgChoice};
pub use slug::{SlugConfig, SlugMode, SlugSeparator};
pub use vault::{FolderSpec, VaultConfig};
