//! Core types shared across the codebase.

mod category;
mod link;
mod mode;
mod ssg;

pub use category::FileCategory;
pub use link::RawTarget;
pub use mode::RunMode;
pub use ssg::SsgKind;
