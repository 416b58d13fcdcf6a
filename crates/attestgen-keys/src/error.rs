//! Error types for key handling.

use thiserror::Error;

/// Errors from wallet creation, signing, and signature recovery.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("seed is not a valid secp256k1 secret key")]
    InvalidSeed,

    #[error("ecdsa error: {0}")]
    Ecdsa(#[from] k256::ecdsa::Error),

    #[error("malformed signature: {0}")]
    MalformedSignature(String),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;
