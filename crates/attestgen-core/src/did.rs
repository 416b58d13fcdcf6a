//! Decentralized identifier formatting.
//!
//! Both formatters are total: they prepend a fixed scheme and never validate
//! the input. Callers own the shape of what they pass in.

use serde::Serialize;
use std::fmt;

use crate::types::{Address, ContentId};

/// Scheme prefix for wallet identities.
pub const IDENTITY_DID_PREFIX: &str = "did:pkh:eth:";

/// Scheme prefix for content identifiers.
pub const CONTENT_DID_PREFIX: &str = "snap://";

/// A formatted decentralized identifier string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Did(String);

impl Did {
    /// The DID of a typed wallet address (checksummed form).
    pub fn identity(address: &Address) -> Self {
        format_identity_did(&address.to_string())
    }

    /// The DID of a typed content identifier.
    pub fn content(id: &ContentId) -> Self {
        format_content_did(id.as_str())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Did({})", self.0)
    }
}

impl fmt::Display for Did {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `did:pkh:eth:<address>`
pub fn format_identity_did(address: &str) -> Did {
    Did(format!("{IDENTITY_DID_PREFIX}{address}"))
}

/// `snap://<content id>`
pub fn format_content_did(content_id: &str) -> Did {
    Did(format!("{CONTENT_DID_PREFIX}{content_id}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_did() {
        assert_eq!(format_identity_did("0xAA").as_str(), "did:pkh:eth:0xAA");
    }

    #[test]
    fn test_content_did() {
        assert_eq!(format_content_did("abc123").as_str(), "snap://abc123");
    }

    #[test]
    fn test_formatters_do_not_validate() {
        assert_eq!(format_identity_did("").as_str(), "did:pkh:eth:");
        assert_eq!(format_content_did("not a hash").as_str(), "snap://not a hash");
    }

    #[test]
    fn test_typed_identity_uses_checksum() {
        let addr = Address::from_hex("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(
            Did::identity(&addr).as_str(),
            "did:pkh:eth:0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed"
        );
    }

    #[test]
    fn test_did_serializes_as_plain_string() {
        let did = format_content_did("x");
        assert_eq!(serde_json::to_string(&did).unwrap(), "\"snap://x\"");
    }
}
