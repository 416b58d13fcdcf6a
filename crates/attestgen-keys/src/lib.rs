//! # attestgen keys
//!
//! secp256k1 wallets that implement [`KeyProvider`](attestgen_core::KeyProvider).
//!
//! A [`Wallet`] owns a signing key and derives its Ethereum address from the
//! public key. Signatures follow `personal_sign`: the handed-in bytes are
//! wrapped with the EIP-191 prefix, hashed with Keccak-256, and signed with
//! a recoverable ECDSA signature encoded as `0x || r || s || v`.
//!
//! ```rust
//! use attestgen_keys::{recover_signer, Wallet};
//!
//! let wallet = Wallet::generate();
//! let signature = wallet.sign_message(b"hello").unwrap();
//! assert_eq!(recover_signer(b"hello", &signature).unwrap(), wallet.address());
//! ```

pub mod error;
pub mod wallet;

pub use error::{KeyError, Result};
pub use wallet::{address_from_verifying_key, recover_signer, Wallet};
