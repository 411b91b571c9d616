//! Utility modules shared by the conversion pipeline.

pub mod date;
pub mod mime;
pub mod path;
pub mod plural;
