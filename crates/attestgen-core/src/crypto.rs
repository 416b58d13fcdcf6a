//! Hashing primitives: Keccak-256 and the Ethereum personal-message hash.

use sha3::{Digest, Keccak256};
use std::fmt;

/// Prefix applied by `personal_sign` style message hashing (EIP-191, version 0x45).
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// A 32-byte Keccak-256 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Keccak256Hash(pub [u8; 32]);

impl Keccak256Hash {
    /// Compute the Keccak-256 hash of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(Keccak256::digest(data).into())
    }

    /// Hash `message` the way an Ethereum wallet does before `personal_sign`:
    /// `keccak256(prefix || decimal(len) || message)`.
    pub fn hash_message(message: &[u8]) -> Self {
        let mut hasher = Keccak256::new();
        hasher.update(PERSONAL_MESSAGE_PREFIX);
        hasher.update(message.len().to_string().as_bytes());
        hasher.update(message);
        Self(hasher.finalize().into())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to `0x`-prefixed hex string.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Keccak256Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Keccak256({})", &self.to_hex()[..18])
    }
}

impl AsRef<[u8]> for Keccak256Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 32]> for Keccak256Hash {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}
