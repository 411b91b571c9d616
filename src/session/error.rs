//! Session errors.

use crate::meta::frontmatter::FrontmatterError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors of a conversion run.
///
/// `MissingRoot` aborts the run; the others are per note and end up in the
/// report while the batch continues.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("{kind} root `{}` does not exist or is not a directory", path.display())]
    MissingRoot { kind: &'static str, path: PathBuf },

    #[error("cannot read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid frontmatter in `{}`", path.display())]
    Frontmatter {
        path: PathBuf,
        #[source]
        source: FrontmatterError,
    },

    #[error("cannot write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = ConvertError::MissingRoot {
            kind: "vault",
            path: "/nope".into(),
        };
        assert_eq!(err.to_string(), "vault root `/nope` does not exist or is not a directory");

        let err = ConvertError::Read {
            path: "a.md".into(),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        // anyhow's alternate format prints the source chain
        assert_eq!(format!("{:#}", anyhow::Error::from(err)), "cannot read `a.md`: gone");
    }
}
