//! Ethereum-style wallets over secp256k1.

use async_trait::async_trait;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::{CryptoRng, RngCore};
use std::fmt;

use attestgen_core::{Address, BoxError, Keccak256Hash, KeyProvider};

use crate::error::{KeyError, Result};

/// Offset added to the recovery id in the trailing `v` byte.
const V_OFFSET: u8 = 27;

/// A signing key plus the address derived from it.
#[derive(Clone)]
pub struct Wallet {
    signing_key: SigningKey,
    address: Address,
}

impl Wallet {
    /// Generate a new random wallet.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::thread_rng())
    }

    /// Generate from a caller-supplied RNG.
    pub fn generate_with<R: CryptoRng + RngCore>(rng: &mut R) -> Self {
        Self::from_signing_key(SigningKey::random(rng))
    }

    /// Create from a 32-byte secret key.
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self> {
        let signing_key = SigningKey::from_slice(seed).map_err(|_| KeyError::InvalidSeed)?;
        Ok(Self::from_signing_key(signing_key))
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let address = address_from_verifying_key(signing_key.verifying_key());
        Self {
            signing_key,
            address,
        }
    }

    /// The wallet's address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign `message` with `personal_sign` semantics.
    pub fn sign_message(&self, message: &[u8]) -> Result<String> {
        let digest = Keccak256Hash::hash_message(message);
        let (signature, recovery_id) = self
            .signing_key
            .sign_prehash_recoverable(digest.as_bytes())?;

        let mut bytes = Vec::with_capacity(65);
        bytes.extend_from_slice(&signature.to_bytes());
        bytes.push(recovery_id.to_byte() + V_OFFSET);
        Ok(format!("0x{}", hex::encode(bytes)))
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Wallet({})", self.address)
    }
}

#[async_trait]
impl KeyProvider for Wallet {
    fn address(&self) -> Address {
        self.address
    }

    async fn sign(&self, message: &[u8]) -> std::result::Result<String, BoxError> {
        Ok(self.sign_message(message)?)
    }
}

/// Last 20 bytes of `keccak256(x || y)` of the uncompressed public key.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Address {
    let point = key.as_affine().to_encoded_point(false);
    let hash = Keccak256Hash::hash(&point.as_bytes()[1..]);

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash.0[12..]);
    Address::from_bytes(address)
}

/// Recover the address that produced `signature` over `message`.
///
/// Accepts `v` either as a raw recovery id (0/1) or offset by 27.
pub fn recover_signer(message: &[u8], signature: &str) -> Result<Address> {
    let digits = signature.strip_prefix("0x").unwrap_or(signature);
    let bytes =
        hex::decode(digits).map_err(|e| KeyError::MalformedSignature(e.to_string()))?;
    if bytes.len() != 65 {
        return Err(KeyError::MalformedSignature(format!(
            "expected 65 bytes, got {}",
            bytes.len()
        )));
    }

    let v = bytes[64];
    let recovery_id = RecoveryId::from_byte(v.checked_sub(V_OFFSET).unwrap_or(v))
        .ok_or_else(|| KeyError::MalformedSignature(format!("invalid v byte {v}")))?;
    let signature = Signature::from_slice(&bytes[..64])?;

    let digest = Keccak256Hash::hash_message(message);
    let key = VerifyingKey::recover_from_prehash(digest.as_bytes(), &signature, recovery_id)?;
    Ok(address_from_verifying_key(&key))
}
