//! `convert` command.

use crate::config::NotepressConfig;
use crate::core::RunMode;
use crate::session;
use crate::utils::plural::plural_count;
use anyhow::Result;

/// Convert the vault and write the project's content.
///
/// Per-note failures do not stop the batch; they fail the command once
/// everything else has been written.
pub fn convert_vault(config: &NotepressConfig) -> Result<()> {
    let report = session::run(config, RunMode::Convert, true)?;
    report.print(RunMode::Convert);

    if report.has_errors() {
        anyhow::bail!("{} could not be converted", plural_count(report.errors.len(), "item"));
    }
    Ok(())
}
