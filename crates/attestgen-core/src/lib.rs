//! # attestgen core
//!
//! Pure primitives for building synthetic attestations: identifiers, credential
//! schemas, canonical byte pre-images, and the signing pipeline.
//!
//! This crate performs no I/O. Key material lives behind the [`KeyProvider`]
//! trait; file output lives in `attestgen-export`.
//!
//! ## Key Types
//!
//! - [`AttestationKind`] - Closed set of credential variants, grouped into families
//! - [`SchemaBuilder`] - Turns an [`AttestationRequest`] into a payload plus canonical bytes
//! - [`AttestationSigner`] - Hashes the pre-image and attaches a proof
//! - [`SignedAttestation`] - The write-once record that gets exported
//!
//! ## Canonicalization
//!
//! Two pre-image schemes exist and are not interchangeable. See [`canonical`].

pub mod canonical;
pub mod crypto;
pub mod did;
pub mod error;
pub mod kind;
pub mod schema;
pub mod signer;
pub mod types;

pub use canonical::{audit_report_bytes, endorsement_bytes, Canonicalization, IDENTITY_SCHEME_TAG};
pub use crypto::Keccak256Hash;
pub use did::{format_content_did, format_identity_did, Did};
pub use error::{AttestError, BoxError, IntegrityWarning, Result};
pub use kind::{AttestationKind, CurrentStatus, Family, ReasonRef, StatusReason};
pub use schema::{
    AttestationRequest, ClaimParams, CredentialPayload, CredentialSubject, DisputeReasonForm,
    Draft, ReasonDetail, SchemaBuilder, SchemaConfig, Subject, SubjectClaims, TrustArc,
};
pub use signer::{AttestationSigner, KeyProvider, Proof, SignedAttestation};
pub use types::{Address, ContentId};
