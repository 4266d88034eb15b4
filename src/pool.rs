//! Shielded pools and their diversified receiver derivation.
//!
//! Each pool carries its own prepared key material. Orchard maps every
//! diversifier index to a valid diversifier; Sapling rejects roughly half of
//! all candidates, so its derivation goes through a bounded search.

use std::cmp::Ordering;
use std::fmt;

use orchard::keys::{
    FullViewingKey as OrchardFullViewingKey, IncomingViewingKey as OrchardIncomingViewingKey,
    Scope,
};
use sapling_crypto::zip32::{
    DiversifiableFullViewingKey, IncomingViewingKey as SaplingIncomingViewingKey,
};
use serde::Serialize;
use zcash_address::unified::{Receiver, Typecode};
use zip32::DiversifierIndex;

use crate::error::{AddrgenError, Result};

/// Upper bound on diversifier candidates tried per index and pool.
///
/// A Sapling candidate is valid with probability about 1/2, so 64 consecutive
/// failures happen with probability about 2^-64.
pub const MAX_DIVERSIFIER_ATTEMPTS: u32 = 64;

pub const DIVERSIFIER_LEN: usize = 11;
pub const TRANSMISSION_KEY_LEN: usize = 32;
pub const RAW_RECEIVER_LEN: usize = DIVERSIFIER_LEN + TRANSMISSION_KEY_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Pool {
    Sapling,
    Orchard,
}

impl Pool {
    pub fn typecode(&self) -> Typecode {
        match self {
            Pool::Sapling => Typecode::Sapling,
            Pool::Orchard => Typecode::Orchard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pool::Sapling => "sapling",
            Pool::Orchard => "orchard",
        }
    }

    /// Wallet preference: most modern pool first.
    pub fn preference_order(a: &Self, b: &Self) -> Ordering {
        Typecode::preference_order(&a.typecode(), &b.typecode())
    }

    /// Wire order inside a unified container: ascending typecode.
    pub fn encoding_order(a: &Self, b: &Self) -> Ordering {
        Typecode::encoding_order(&a.typecode(), &b.typecode())
    }
}

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The receiver for one pool at one diversifier index: `(d, pk_d)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiversifiedAddress {
    pub pool: Pool,
    pub diversifier: [u8; DIVERSIFIER_LEN],
    pub transmission_key: [u8; TRANSMISSION_KEY_LEN],
    /// The ZIP 32 diversifier index the diversifier was generated from. Differs
    /// from the caller's index only when a Sapling search needed more than one attempt.
    pub diversifier_index: DiversifierIndex,
}

impl DiversifiedAddress {
    fn from_raw(pool: Pool, raw: [u8; RAW_RECEIVER_LEN], diversifier_index: DiversifierIndex) -> Self {
        let mut diversifier = [0u8; DIVERSIFIER_LEN];
        diversifier.copy_from_slice(&raw[..DIVERSIFIER_LEN]);
        let mut transmission_key = [0u8; TRANSMISSION_KEY_LEN];
        transmission_key.copy_from_slice(&raw[DIVERSIFIER_LEN..]);
        Self {
            pool,
            diversifier,
            transmission_key,
            diversifier_index,
        }
    }

    pub fn to_raw_bytes(&self) -> [u8; RAW_RECEIVER_LEN] {
        let mut raw = [0u8; RAW_RECEIVER_LEN];
        raw[..DIVERSIFIER_LEN].copy_from_slice(&self.diversifier);
        raw[DIVERSIFIER_LEN..].copy_from_slice(&self.transmission_key);
        raw
    }

    pub fn to_receiver(&self) -> Receiver {
        match self.pool {
            Pool::Sapling => Receiver::Sapling(self.to_raw_bytes()),
            Pool::Orchard => Receiver::Orchard(self.to_raw_bytes()),
        }
    }

    pub fn receiver_hex(&self) -> String {
        hex::encode(self.to_raw_bytes())
    }
}

/// Maps a caller index and a retry counter onto the 88-bit ZIP 32 diversifier
/// index space: caller index in the low 32 bits, attempt number above it.
/// Attempt 0 is the plain ZIP 32 derivation at `index`.
pub fn candidate_index(index: u32, attempt: u32) -> DiversifierIndex {
    DiversifierIndex::from(u64::from(index) | (u64::from(attempt) << 32))
}

/// Tries candidates for `index` in attempt order and returns the first one
/// `try_candidate` accepts, or `DiversifierExhausted` after
/// [`MAX_DIVERSIFIER_ATTEMPTS`] rejections.
pub fn search_diversifier<T>(
    pool: Pool,
    index: u32,
    mut try_candidate: impl FnMut(DiversifierIndex) -> Option<T>,
) -> Result<(DiversifierIndex, T)> {
    for attempt in 0..MAX_DIVERSIFIER_ATTEMPTS {
        let candidate = candidate_index(index, attempt);
        if let Some(found) = try_candidate(candidate) {
            if attempt > 0 {
                tracing::debug!(pool = %pool, index, attempt, "Diversifier found after retries");
            }
            return Ok((candidate, found));
        }
    }

    tracing::warn!(pool = %pool, index, "Diversifier search exhausted");
    Err(AddrgenError::DiversifierExhausted {
        pool: pool.name(),
        index,
        attempts: MAX_DIVERSIFIER_ATTEMPTS,
    })
}

/// Orchard viewing key with its external incoming viewing key prepared.
#[derive(Debug, Clone)]
pub struct OrchardKey {
    fvk: OrchardFullViewingKey,
    ivk: OrchardIncomingViewingKey,
}

impl OrchardKey {
    /// Parses the 96-byte `(ak, nk, rivk)` encoding. `None` if any component is
    /// not a valid field/curve element or the derived ivk is degenerate.
    pub fn from_bytes(bytes: &[u8; 96]) -> Option<Self> {
        let fvk = OrchardFullViewingKey::from_bytes(bytes)?;
        let ivk = fvk.to_ivk(Scope::External);
        Some(Self { fvk, ivk })
    }

    pub fn fvk(&self) -> &OrchardFullViewingKey {
        &self.fvk
    }

    pub fn receiver_at(&self, index: u32) -> DiversifiedAddress {
        let j = DiversifierIndex::from(index);
        let raw = self.ivk.address_at(j).to_raw_address_bytes();
        DiversifiedAddress::from_raw(Pool::Orchard, raw, j)
    }
}

/// Sapling viewing key with its external incoming viewing key prepared.
#[derive(Debug, Clone)]
pub struct SaplingKey {
    dfvk: DiversifiableFullViewingKey,
    ivk: SaplingIncomingViewingKey,
}

impl SaplingKey {
    /// Parses the 128-byte `(ak, nk, ovk, dk)` encoding.
    pub fn from_bytes(bytes: &[u8; 128]) -> Option<Self> {
        let dfvk = DiversifiableFullViewingKey::from_bytes(bytes)?;
        let ivk = dfvk.to_external_ivk();
        Some(Self { dfvk, ivk })
    }

    pub fn dfvk(&self) -> &DiversifiableFullViewingKey {
        &self.dfvk
    }

    pub fn receiver_at(&self, index: u32) -> Result<DiversifiedAddress> {
        self.receiver_with(index, |j| self.ivk.address_at(j).map(|addr| addr.to_bytes()))
    }

    fn receiver_with(
        &self,
        index: u32,
        try_candidate: impl FnMut(DiversifierIndex) -> Option<[u8; RAW_RECEIVER_LEN]>,
    ) -> Result<DiversifiedAddress> {
        let (j, raw) = search_diversifier(Pool::Sapling, index, try_candidate)?;
        Ok(DiversifiedAddress::from_raw(Pool::Sapling, raw, j))
    }
}

/// Key material for one shielded pool of a UFVK.
#[derive(Debug, Clone)]
pub enum PoolKey {
    Sapling(SaplingKey),
    Orchard(OrchardKey),
}

impl PoolKey {
    pub fn pool(&self) -> Pool {
        match self {
            PoolKey::Sapling(_) => Pool::Sapling,
            PoolKey::Orchard(_) => Pool::Orchard,
        }
    }

    /// Derives this pool's receiver at `index`. Depends only on this key and
    /// the index.
    pub fn receiver_at(&self, index: u32) -> Result<DiversifiedAddress> {
        match self {
            PoolKey::Sapling(key) => key.receiver_at(index),
            PoolKey::Orchard(key) => Ok(key.receiver_at(index)),
        }
    }
}
