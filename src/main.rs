//! Notepress - convert a linked markdown vault into Hugo or Zola content.

#![allow(dead_code)]

mod attachment;
mod cli;
mod config;
mod core;
mod diagnostics;
mod link;
mod linkword;
mod logger;
mod meta;
mod permalink;
mod rewrite;
mod session;
mod span;
mod utils;
mod vault;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::NotepressConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    // stdout carries the JSON report
    if let Commands::Check { json: true, .. } = cli.command {
        owo_colors::set_override(false);
        logger::set_quiet(true);
    }

    let config = NotepressConfig::load(&cli)?;

    match &cli.command {
        Commands::Convert { .. } => cli::convert::convert_vault(&config),
        Commands::Check { json, .. } => cli::check::check_vault(&config, *json),
    }
}
