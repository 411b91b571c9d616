//! Static site generator flavours.

use crate::config::SsgChoice;
use crate::meta::frontmatter::FrontmatterFormat;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SsgKind {
    #[default]
    Hugo,
    Zola,
}

impl SsgKind {
    /// Explicit choice from config, `None` for `auto`.
    pub const fn from_choice(choice: SsgChoice) -> Option<Self> {
        match choice {
            SsgChoice::Auto => None,
            SsgChoice::Hugo => Some(Self::Hugo),
            SsgChoice::Zola => Some(Self::Zola),
        }
    }

    /// Frontmatter the generator reads natively.
    pub const fn frontmatter(self) -> FrontmatterFormat {
        match self {
            Self::Hugo => FrontmatterFormat::Yaml,
            Self::Zola => FrontmatterFormat::Toml,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Hugo => "hugo",
            Self::Zola => "zola",
        }
    }
}
