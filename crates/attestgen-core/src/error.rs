//! Error types for attestation building and signing.

use thiserror::Error;

use crate::kind::{AttestationKind, Family};

/// Boxed error carried across the [`KeyProvider`](crate::KeyProvider) boundary.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that abort attestation construction.
#[derive(Debug, Error)]
pub enum AttestError {
    #[error("unsupported attestation kind: {0}")]
    UnsupportedKind(String),

    #[error("invalid subject for {kind}: expected {expected}")]
    InvalidSubject {
        kind: AttestationKind,
        expected: &'static str,
    },

    #[error("{kind} requires parameter `{parameter}`")]
    MissingParameter {
        kind: AttestationKind,
        parameter: &'static str,
    },

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("signing failed: {0}")]
    SigningFailed(#[source] BoxError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl AttestError {
    pub(crate) fn invalid_subject(kind: AttestationKind) -> Self {
        let expected = match kind.family() {
            Family::Endorsement => "an identity",
            Family::AuditReport => "a content identifier",
        };
        AttestError::InvalidSubject { kind, expected }
    }
}

/// Data-integrity problems that degrade output instead of failing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// A status reason had no entry in the reason vocabulary, so its
    /// canonical encoding collapsed to zero bytes.
    ReasonLookupFailed { reason: String },
}

impl std::fmt::Display for IntegrityWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrityWarning::ReasonLookupFailed { reason } => {
                write!(f, "status reason {reason:?} has no canonical encoding")
            }
        }
    }
}

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, AttestError>;
