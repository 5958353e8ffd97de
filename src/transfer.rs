use tracing::{info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::io::{excel_read, excel_write};
use crate::model::SessionTable;
use crate::transform::{self, RowWarning};

/// Outcome of one transfer run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReport {
    /// Rows written to the destination section.
    pub rows: usize,
    /// Per-row problems that left fields empty.
    pub warnings: Vec<RowWarning>,
}

/// Reads the source workbook, transforms its rows and replaces the
/// configured section of the destination workbook.
///
/// Only one run may target a given destination at a time; concurrent runs
/// against the same file are not coordinated.
#[instrument(
    level = "info",
    skip_all,
    fields(
        source = %config.source.display(),
        destination = %config.destination.display(),
        section = %config.section
    )
)]
pub fn run(config: &Config) -> Result<TransferReport> {
    let rows = excel_read::read_source(&config.source, config.source_sheet.as_deref())?;
    info!(rows = rows.len(), "read source rows");

    let output = transform::transform(rows, &config.transform_options());
    if !output.warnings.is_empty() {
        warn!(
            warnings = output.warnings.len(),
            "some rows have empty derived fields"
        );
    }

    excel_write::write_section(&config.destination, &config.section, &output.table)?;
    info!(rows = output.table.len(), "transfer complete");

    Ok(TransferReport {
        rows: output.table.len(),
        warnings: output.warnings,
    })
}

/// Loads the configured destination section for the dashboard.
#[instrument(
    level = "info",
    skip_all,
    fields(destination = %config.destination.display(), section = %config.section)
)]
pub fn load_destination(config: &Config) -> Result<SessionTable> {
    let table = excel_read::read_section(&config.destination, &config.section)?;
    info!(records = table.len(), "loaded destination section");
    Ok(table)
}
