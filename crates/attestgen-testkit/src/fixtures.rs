//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use attestgen_core::{
    Address, AttestationKind, AttestationRequest, AttestationSigner, BoxError, Canonicalization,
    ContentId, Keccak256Hash, KeyProvider, SchemaBuilder, SchemaConfig, SignedAttestation,
};
use attestgen_export::FixedClock;
use attestgen_keys::Wallet;

/// Private key with a published address, used across the ecosystem as a test vector.
pub const KNOWN_SECRET: &str = "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

/// Checksummed address of [`KNOWN_SECRET`].
pub const KNOWN_ADDRESS: &str = "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23";

/// Timestamp pinned by [`fixed_clock`]: 2025-01-14T16:00:00Z.
pub const FIXED_TIME_MILLIS: i64 = 1_736_870_400_000;

/// The wallet for [`KNOWN_SECRET`].
pub fn known_wallet() -> Wallet {
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&hex::decode(KNOWN_SECRET).expect("valid hex"));
    Wallet::from_seed(&seed).expect("valid secret")
}

/// `count` distinct deterministic wallets.
pub fn seeded_wallets(count: usize) -> Vec<Wallet> {
    (0..count)
        .map(|i| {
            let mut seed = [0u8; 32];
            seed[24..].copy_from_slice(&(i as u64 + 1).to_be_bytes());
            Wallet::from_seed(&seed).expect("small nonzero scalar")
        })
        .collect()
}

/// A clock frozen at [`FIXED_TIME_MILLIS`].
pub fn fixed_clock() -> FixedClock {
    FixedClock::from_millis(FIXED_TIME_MILLIS)
}

/// Deterministic signer: `signature = keccak256(address || message)`.
///
/// Counts calls so tests can assert how often signing happened.
#[derive(Debug)]
pub struct StubKeyProvider {
    address: Address,
    calls: AtomicUsize,
}

impl StubKeyProvider {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            calls: AtomicUsize::new(0),
        }
    }

    /// A stub whose address is `byte` repeated.
    pub fn from_byte(byte: u8) -> Self {
        Self::new(Address::from_bytes([byte; 20]))
    }

    /// The signature this stub returns for `message`.
    pub fn expected_signature(&self, message: &[u8]) -> String {
        let mut input = self.address.as_bytes().to_vec();
        input.extend_from_slice(message);
        Keccak256Hash::hash(&input).to_hex()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyProvider for StubKeyProvider {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, message: &[u8]) -> Result<String, BoxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.expected_signature(message))
    }
}

/// A provider whose every signature attempt fails.
#[derive(Debug)]
pub struct FailingKeyProvider {
    address: Address,
}

impl FailingKeyProvider {
    pub fn new(address: Address) -> Self {
        Self { address }
    }
}

#[async_trait]
impl KeyProvider for FailingKeyProvider {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, _message: &[u8]) -> Result<String, BoxError> {
        Err("signing backend unavailable".into())
    }
}

/// A builder and signer pair plus a stub identity.
pub struct TestFixture {
    pub builder: SchemaBuilder,
    pub signer: AttestationSigner,
    pub provider: Arc<StubKeyProvider>,
}

impl TestFixture {
    /// Default schema config, byte-concat signing, stub issuer `0xbb..bb`.
    pub fn new() -> Self {
        Self::with_config(SchemaConfig::default(), Canonicalization::default())
    }

    pub fn with_config(schema: SchemaConfig, canonicalization: Canonicalization) -> Self {
        Self {
            builder: SchemaBuilder::new(schema),
            signer: AttestationSigner::new(canonicalization),
            provider: Arc::new(StubKeyProvider::from_byte(0xbb)),
        }
    }

    pub fn issuer(&self) -> Address {
        self.provider.address()
    }

    /// An identity request from the fixture issuer about `subject`.
    pub fn endorsement(&self, kind: AttestationKind, subject: Address) -> AttestationRequest {
        AttestationRequest::endorsement(kind, self.issuer(), subject)
    }

    /// A content request from the fixture issuer about `content`.
    pub fn audit_report(&self, kind: AttestationKind, content: &str) -> AttestationRequest {
        AttestationRequest::audit_report(kind, self.issuer(), ContentId::new(content))
    }

    /// Build and sign with the stub provider.
    pub async fn sign(
        &self,
        request: &AttestationRequest,
    ) -> attestgen_core::Result<SignedAttestation> {
        let draft = self.builder.build(request)?;
        self.signer.sign(draft, self.provider.as_ref()).await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attestgen_keys::recover_signer;

    #[test]
    fn test_known_wallet_address() {
        assert_eq!(known_wallet().address().to_string(), KNOWN_ADDRESS);
    }

    #[test]
    fn test_seeded_wallets_distinct_and_stable() {
        let a = seeded_wallets(4);
        let b = seeded_wallets(4);
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.address(), y.address());
        }
        for i in 0..a.len() {
            for j in (i + 1)..a.len() {
                assert_ne!(a[i].address(), a[j].address());
            }
        }
    }

    #[tokio::test]
    async fn test_fixture_signs_deterministically() {
        let fixture = TestFixture::new();
        let request =
            fixture.audit_report(AttestationKind::AuditReportApproveCredential, "abc123");

        let a = fixture.sign(&request).await.unwrap();
        let b = fixture.sign(&request).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(fixture.provider.calls(), 2);

        let digest = Keccak256Hash::hash(b"abc123");
        assert_eq!(
            a.signature(),
            fixture.provider.expected_signature(digest.to_hex().as_bytes())
        );
    }

    #[tokio::test]
    async fn test_real_wallet_round_trip() {
        let wallet = known_wallet();
        let builder = SchemaBuilder::default();
        let request = AttestationRequest::audit_report(
            AttestationKind::AuditReportApproveCredential,
            wallet.address(),
            ContentId::new("abc123"),
        );
        let draft = builder.build(&request).unwrap();
        let digest = Keccak256Hash::hash(&draft.canonical);

        let signed = AttestationSigner::default().sign(draft, &wallet).await.unwrap();
        let recovered = recover_signer(digest.to_hex().as_bytes(), signed.signature()).unwrap();
        assert_eq!(recovered, wallet.address());
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let provider = FailingKeyProvider::new(Address::from_bytes([1; 20]));
        assert!(provider.sign(b"x").await.is_err());
    }
}
