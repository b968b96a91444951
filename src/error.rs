use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Error type covering the different failure cases that can occur when the
/// pipeline loads, transforms, or exports the material tables.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON configuration file cannot be parsed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from the Excel writer implementation.
    #[error("Excel write error: {0}")]
    ExcelWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a required source workbook does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when a workbook does not contain the expected sheet.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when a table lacks a column one of the stages depends on.
    #[error("table '{table}' has no column '{column}'")]
    MissingColumn { table: String, column: String },

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}

impl PipelineError {
    /// Shorthand used by the stages when a column lookup fails.
    pub fn missing_column(table: &str, column: &str) -> Self {
        PipelineError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}
