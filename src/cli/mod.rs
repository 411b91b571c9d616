//! Command-line interface module.

mod args;
pub mod check;
pub mod convert;

pub use args::{Cli, Commands, ConvertArgs, SourceArgs};
