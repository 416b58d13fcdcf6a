//! # attestgen
//!
//! Generates batches of synthetic signed attestations for seeding the
//! indexer with test data.
//!
//! ## Overview
//!
//! A run creates a pool of random wallets and a pool of random snap ids,
//! then issues:
//!
//! - **Peer-to-peer attestations**: endorsements or disputes between wallets
//! - **Snap attestations**: audit report approvals or disapprovals of snaps
//!
//! Every attestation is built by [`SchemaBuilder`](attestgen_core::SchemaBuilder),
//! signed by its issuing wallet and exported as one `;`-delimited row.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use attestgen::{GenerateCounts, Generator, GeneratorConfig};
//!
//! async fn example() -> attestgen::Result<()> {
//!     let config = GeneratorConfig::from_env()?;
//!     let generator = Generator::new(&config);
//!
//!     let path = generator
//!         .run(GenerateCounts {
//!             wallets: 4,
//!             snaps: 4,
//!             p2p_attestations: 10,
//!             snap_attestations: 10,
//!         })
//!         .await?;
//!     println!("wrote {}", path.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Re-exports
//!
//! - `attestgen::core` - Payloads, canonical bytes, signing
//! - `attestgen::keys` - secp256k1 wallets
//! - `attestgen::export` - Row encoding and file output

pub mod config;
pub mod error;
pub mod generator;
pub mod logging;
pub mod pool;

pub use attestgen_core as core;
pub use attestgen_export as export;
pub use attestgen_keys as keys;

pub use config::{ConfigError, EndorsementMode, GeneratorConfig};
pub use error::{GeneratorError, Result};
pub use generator::{Batch, GenerateCounts, Generator, PlannedAttestation, TRUST_LEVELS};
pub use pool::{random_snap_id, IdentityPool, SnapPool};
