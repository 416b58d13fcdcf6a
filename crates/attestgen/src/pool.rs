//! Identity and snap pools.
//!
//! Both pools are built once per run and only read afterwards, so signing
//! tasks share them through `Arc` without locking.

use std::sync::Arc;

use attestgen_core::{Address, ContentId, Keccak256Hash, KeyProvider};
use attestgen_keys::Wallet;
use rand::{CryptoRng, Rng, RngCore};

/// Hex characters kept from the hash when minting a snap id.
const SNAP_ID_HEX_LEN: usize = 40;

/// Signing identities attestations are issued from and about.
#[derive(Clone, Default)]
pub struct IdentityPool {
    providers: Vec<Arc<dyn KeyProvider>>,
}

impl IdentityPool {
    /// `count` fresh random wallets.
    pub fn random<R: CryptoRng + RngCore>(count: usize, rng: &mut R) -> Self {
        let providers = (0..count)
            .map(|_| Arc::new(Wallet::generate_with(&mut *rng)) as Arc<dyn KeyProvider>)
            .collect();
        Self { providers }
    }

    pub fn from_providers(providers: Vec<Arc<dyn KeyProvider>>) -> Self {
        Self { providers }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<dyn KeyProvider>> {
        self.providers.get(index)
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.providers.iter().map(|p| p.address()).collect()
    }

    /// Index of a uniformly chosen member. `None` when empty.
    pub(crate) fn pick<R: Rng>(&self, rng: &mut R) -> Option<usize> {
        (!self.is_empty()).then(|| rng.gen_range(0..self.len()))
    }
}

impl std::fmt::Debug for IdentityPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.addresses()).finish()
    }
}

/// Content identifiers audit reports are issued about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SnapPool {
    ids: Vec<ContentId>,
}

impl SnapPool {
    /// `count` fresh random snap ids.
    pub fn random<R: RngCore>(count: usize, rng: &mut R) -> Self {
        Self {
            ids: (0..count).map(|_| random_snap_id(&mut *rng)).collect(),
        }
    }

    pub fn from_ids(ids: Vec<ContentId>) -> Self {
        Self { ids }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[ContentId] {
        &self.ids
    }

    pub(crate) fn pick<R: Rng>(&self, rng: &mut R) -> Option<&ContentId> {
        (!self.is_empty()).then(|| &self.ids[rng.gen_range(0..self.len())])
    }
}

/// `0x` followed by the first 40 hex characters of keccak256 of 32 random bytes.
pub fn random_snap_id<R: RngCore>(rng: &mut R) -> ContentId {
    let mut entropy = [0u8; 32];
    rng.fill_bytes(&mut entropy);
    let hex = Keccak256Hash::hash(&entropy).to_hex();
    ContentId::new(&hex[..2 + SNAP_ID_HEX_LEN])
}
