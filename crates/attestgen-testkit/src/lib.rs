//! # attestgen testkit
//!
//! Testing utilities for attestgen.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Golden vectors**: Known requests with expected canonical bytes and digests
//! - **Generators**: Proptest strategies for property-based testing
//! - **Fixtures**: Seeded wallets, stub signers and a pinned clock
//!
//! ## Golden Vectors
//!
//! ```rust
//! use attestgen_testkit::vectors::verify_all_vectors;
//!
//! for (name, matches, canonical, _digest) in verify_all_vectors() {
//!     assert!(matches, "{name}: {canonical}");
//! }
//! ```
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use attestgen_core::SchemaBuilder;
//! use attestgen_testkit::generators::attestation_request;
//!
//! proptest! {
//!     #[test]
//!     fn canonical_bytes_are_deterministic(request in attestation_request()) {
//!         let builder = SchemaBuilder::default();
//!         let a = builder.build(&request).unwrap();
//!         let b = builder.build(&request).unwrap();
//!         prop_assert_eq!(a.canonical, b.canonical);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use attestgen_testkit::fixtures::{known_wallet, KNOWN_ADDRESS};
//!
//! assert_eq!(known_wallet().address().to_string(), KNOWN_ADDRESS);
//! ```

pub mod fixtures;
pub mod generators;
pub mod vectors;

pub use fixtures::{
    fixed_clock, known_wallet, seeded_wallets, FailingKeyProvider, StubKeyProvider, TestFixture,
    FIXED_TIME_MILLIS, KNOWN_ADDRESS, KNOWN_SECRET,
};
pub use generators::{attestation_request, mismatched_request};
pub use vectors::{all_vectors, draft_from_vector, verify_all_vectors, GoldenVector};
