//! Path and URL utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`, `clean_path`, `expand_tilde`)
//! - [`route`]: URL utilities (`is_external_link`, `split_path_fragment`, `encode_path`)
//! - [`slug`]: Slugification (`slugify`, `add_spaces`)

pub mod fs;
pub mod route;
pub mod slug;

pub use fs::{clean_path, expand_tilde, normalize_path};
