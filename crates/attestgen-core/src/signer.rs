//! Attestation signing.
//!
//! The signer never touches key material. It computes the digest selected by
//! its [`Canonicalization`] and hands it to a [`KeyProvider`], which may be a
//! local wallet, a remote signer, or a test stub.

use async_trait::async_trait;
use serde::Serialize;

use crate::canonical::Canonicalization;
use crate::crypto::Keccak256Hash;
use crate::error::{AttestError, BoxError, IntegrityWarning, Result};
use crate::kind::AttestationKind;
use crate::schema::{CredentialPayload, Draft};
use crate::types::Address;

/// Source of an identity and of signatures made with it.
///
/// Implementations must be thread-safe: a batch issues many `sign` calls
/// concurrently against shared providers.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    /// The identity this provider signs for.
    fn address(&self) -> Address;

    /// Sign `message`, returning the encoded signature.
    async fn sign(&self, message: &[u8]) -> std::result::Result<String, BoxError>;
}

/// The `proof` object attached to a signed credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Proof {
    pub signature: String,
}

/// A credential payload plus its proof. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedAttestation {
    #[serde(flatten)]
    pub payload: CredentialPayload,
    pub proof: Proof,
    #[serde(skip)]
    pub warnings: Vec<IntegrityWarning>,
}

impl SignedAttestation {
    pub fn kind(&self) -> AttestationKind {
        self.payload.kind
    }

    pub fn signature(&self) -> &str {
        &self.proof.signature
    }
}

/// Hashes drafts and obtains signatures for them.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttestationSigner {
    canonicalization: Canonicalization,
}

impl AttestationSigner {
    pub fn new(canonicalization: Canonicalization) -> Self {
        Self { canonicalization }
    }

    pub fn canonicalization(&self) -> Canonicalization {
        self.canonicalization
    }

    /// Sign raw canonical bytes: `provider.sign(hex(keccak256(canonical)))`.
    pub async fn sign_bytes(&self, canonical: &[u8], provider: &dyn KeyProvider) -> Result<String> {
        self.sign_digest(Keccak256Hash::hash(canonical), provider).await
    }

    /// Obtain a signature over an already computed digest. Never retries.
    ///
    /// The provider is handed the digest's `0x`-prefixed hex text, so a
    /// personal-message verifier recovers the issuer from `verify(hex, sig)`.
    pub async fn sign_digest(
        &self,
        digest: Keccak256Hash,
        provider: &dyn KeyProvider,
    ) -> Result<String> {
        provider
            .sign(digest.to_hex().as_bytes())
            .await
            .map_err(AttestError::SigningFailed)
    }

    /// Sign a draft with the configured canonicalization and attach the proof.
    pub async fn sign(&self, draft: Draft, provider: &dyn KeyProvider) -> Result<SignedAttestation> {
        let signer = provider.address();
        if signer != draft.issuer {
            return Err(AttestError::SigningFailed(
                format!(
                    "provider signs for {signer} but the draft was issued by {}",
                    draft.issuer
                )
                .into(),
            ));
        }

        let digest = self.canonicalization.digest(&draft)?;
        let signature = self.sign_digest(digest, provider).await?;

        tracing::debug!(
            kind = %draft.kind(),
            issuer = %draft.issuer,
            digest = %digest.to_hex(),
            "signed attestation"
        );

        Ok(SignedAttestation {
            payload: draft.payload,
            proof: Proof { signature },
            warnings: draft.warnings,
        })
    }
}
