use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, ToolError>;

/// Error type covering the failures that abort a transfer or a dashboard
/// run. Problems confined to a single row are not errors; they surface as
/// [`RowWarning`](crate::transform::RowWarning) values instead.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when JSON serialization fails.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Raised when the CSV export cannot be written.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a workbook has no sheet to read from.
    #[error("workbook {} contains no sheets", path.display())]
    EmptyWorkbook { path: PathBuf },

    /// Raised when required columns are absent from a sheet's header row.
    #[error("{} is missing required column(s): {}", path.display(), columns.join(", "))]
    MissingColumns { path: PathBuf, columns: Vec<String> },

    /// Raised when the requested section does not exist in the workbook.
    #[error("section '{section}' not found in {}", path.display())]
    MissingSection { path: PathBuf, section: String },

    /// Raised when the destination workbook cannot be created or replaced.
    #[error("failed to write destination {}: {reason}", path.display())]
    DestinationWrite { path: PathBuf, reason: String },

    /// Raised when the configuration file is unreadable or invalid.
    #[error("invalid configuration {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// Raised when the environment variable meant to hold the dashboard
    /// password is not set.
    #[error("dashboard password variable {name} is not set")]
    MissingPasswordEnv { name: String },

    /// Raised when the dashboard credential check fails.
    #[error("access denied for user '{user}'")]
    AccessDenied { user: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
