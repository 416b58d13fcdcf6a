//! Canonical pre-images for attestation signatures.
//!
//! Two schemes exist:
//!
//! - [`Canonicalization::ByteConcat`]: fixed-width tag bytes concatenated with
//!   raw identifier bytes in a fixed order, then Keccak-256. Structural, so
//!   JSON formatting never affects it.
//! - [`Canonicalization::MessageHash`]: the personal-message hash of the
//!   payload's JSON serialization. Sensitive to key order and whitespace.
//!
//! They produce different digests for the same payload and a verifier must
//! know which one was used.
//!
//! **CRITICAL**: The byte layouts below are a wire contract. Changing them
//! invalidates every signature already issued.
//!
//! Endorsement family:
//! ```text
//! 0x00 || issuer_address[20] || status_byte
//! ```
//! Audit report family:
//! ```text
//! utf8(content_id) || reason_code?     (reason_code is 0 or 1 byte)
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use std::fmt;
use std::str::FromStr;

use crate::crypto::Keccak256Hash;
use crate::error::Result;
use crate::schema::Draft;
use crate::types::{Address, ContentId};

/// Leading tag marking a `pkh:eth` identity scheme.
pub const IDENTITY_SCHEME_TAG: u8 = 0x00;

/// Endorsement pre-image: scheme tag, raw issuer address, status byte.
pub fn endorsement_bytes(issuer: &Address, status_byte: u8) -> Bytes {
    let mut buf = BytesMut::with_capacity(1 + 20 + 1);
    buf.put_u8(IDENTITY_SCHEME_TAG);
    buf.put_slice(issuer.as_bytes());
    buf.put_u8(status_byte);
    buf.freeze()
}

/// Audit report pre-image: content id bytes followed by the optional reason code.
pub fn audit_report_bytes(content_id: &ContentId, reason_code: Option<u8>) -> Bytes {
    let id = content_id.as_str().as_bytes();
    let mut buf = BytesMut::with_capacity(id.len() + 1);
    buf.put_slice(id);
    if let Some(code) = reason_code {
        buf.put_u8(code);
    }
    buf.freeze()
}

/// Which pre-image the signature commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Canonicalization {
    /// `keccak256(canonical_bytes)`
    #[default]
    ByteConcat,
    /// `keccak256("\x19Ethereum Signed Message:\n" || len || json(payload))`
    MessageHash,
}

impl Canonicalization {
    /// Compute the digest to be signed for a built draft.
    pub fn digest(self, draft: &Draft) -> Result<Keccak256Hash> {
        match self {
            Self::ByteConcat => Ok(Keccak256Hash::hash(&draft.canonical)),
            Self::MessageHash => {
                let json = serde_json::to_vec(&draft.payload)?;
                Ok(Keccak256Hash::hash_message(&json))
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ByteConcat => "byte-concat",
            Self::MessageHash => "message-hash",
        }
    }
}

impl fmt::Display for Canonicalization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Canonicalization {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "byte-concat" => Ok(Self::ByteConcat),
            "message-hash" => Ok(Self::MessageHash),
            other => Err(format!(
                "unknown canonicalization {other:?} (expected byte-concat or message-hash)"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endorsement_layout() {
        let issuer = Address::from_bytes([0xbb; 20]);
        let bytes = endorsement_bytes(&issuer, 0x01);

        assert_eq!(bytes.len(), 22);
        assert_eq!(bytes[0], IDENTITY_SCHEME_TAG);
        assert_eq!(&bytes[1..21], &[0xbb; 20]);
        assert_eq!(bytes[21], 0x01);
    }

    #[test]
    fn test_audit_layout_without_reason() {
        let bytes = audit_report_bytes(&ContentId::new("abc123"), None);
        assert_eq!(&bytes[..], b"abc123");
    }

    #[test]
    fn test_audit_layout_with_reason() {
        let bytes = audit_report_bytes(&ContentId::new("abc123"), Some(0x02));
        assert_eq!(&bytes[..], b"abc123\x02");
    }

    #[test]
    fn test_canonicalization_names() {
        for mode in [Canonicalization::ByteConcat, Canonicalization::MessageHash] {
            assert_eq!(mode.as_str().parse::<Canonicalization>().unwrap(), mode);
        }
        assert!("json".parse::<Canonicalization>().is_err());
        assert_eq!(Canonicalization::default(), Canonicalization::ByteConcat);
    }
}
