//! Strong type definitions for attestation subjects.
//!
//! Identities and content identifiers are newtypes so a wallet address can
//! never be handed to a slot that expects a snap id, or the reverse.

use std::fmt;
use std::str::FromStr;

use crate::crypto::Keccak256Hash;
use crate::error::AttestError;

/// A 20-byte Ethereum-style account address.
///
/// Displays with the mixed-case checksum of EIP-55, the form wallets hand out.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Parse from hex, with or without `0x`. Letter case is not checked.
    pub fn from_hex(s: &str) -> Result<Self, AttestError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|_| AttestError::InvalidAddress(s.to_string()))?;
        let arr: [u8; 20] = bytes
            .try_into()
            .map_err(|_| AttestError::InvalidAddress(s.to_string()))?;
        Ok(Self(arr))
    }

    /// Lowercase `0x`-prefixed hex.
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// EIP-55 checksummed `0x`-prefixed hex.
    pub fn to_checksum(&self) -> String {
        let lower = hex::encode(self.0);
        let hash = Keccak256Hash::hash(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash.0[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_checksum())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AttestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; 20]> for Address {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

/// An opaque content identifier ("snap" id).
///
/// Hashed as its UTF-8 bytes, exactly as written.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(String);

impl ContentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ContentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ContentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_checksum_vector() {
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(addr.to_checksum(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    }

    #[test]
    fn test_address_parse_accepts_mixed_case_and_bare_hex() {
        let a = Address::from_hex("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").unwrap();
        let b = Address::from_hex("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_address_rejects_wrong_length() {
        assert!(matches!(
            Address::from_hex("0xabcd"),
            Err(AttestError::InvalidAddress(_))
        ));
        assert!(Address::from_hex("0xzz").is_err());
    }

    #[test]
    fn test_address_hex_roundtrip() {
        let addr = Address::from_bytes([0xbb; 20]);
        let parsed: Address = addr.to_string().parse().unwrap();
        assert_eq!(addr, parsed);
        assert_eq!(addr.to_lower_hex(), format!("0x{}", "bb".repeat(20)));
    }

    #[test]
    fn test_content_id_display() {
        let id = ContentId::new("abc123");
        assert_eq!(id.to_string(), "abc123");
        assert_eq!(id.as_str().as_bytes(), b"abc123");
    }
}
