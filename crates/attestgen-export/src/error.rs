//! Error types for the export module.

use thiserror::Error;

/// Errors that can occur while persisting rows.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Writing the delimited output failed.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;
