//! `check` command: a full dry run.

use crate::config::NotepressConfig;
use crate::core::RunMode;
use crate::session;
use crate::utils::plural::plural_count;
use anyhow::{Context, Result};

/// Resolve every link and report, writing nothing.
///
/// With `json`, the report goes to stdout as JSON and log output is
/// suppressed by the caller.
pub fn check_vault(config: &NotepressConfig, json: bool) -> Result<()> {
    let report = session::run(config, RunMode::Check, !json)?;

    if json {
        let out = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
        println!("{out}");
    } else {
        report.print(RunMode::Check);
    }

    if report.has_errors() {
        anyhow::bail!("found {}", plural_count(report.errors.len(), "error"));
    }
    Ok(())
}
