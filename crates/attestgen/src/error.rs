//! Error types for batch generation.

use attestgen_core::AttestError;
use attestgen_export::ExportError;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that abort a generation run.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// Building or signing an attestation failed.
    #[error("attestation error: {0}")]
    Attest(#[from] AttestError),

    /// Writing the output failed.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// Attestations were requested but a pool they draw from is empty.
    #[error("cannot draw from empty {0} pool")]
    EmptyPool(&'static str),

    /// Configuration was invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A signing task panicked or was cancelled.
    #[error("signing task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

/// Result type for generator operations.
pub type Result<T> = std::result::Result<T, GeneratorError>;
