//! Offline derivation of Juno Cash unified addresses from a unified full
//! viewing key and a 32-bit diversifier index.

pub mod addresses;
pub mod batch;
pub mod cli;
pub mod config;
pub mod error;
pub mod network;
pub mod pool;
pub mod ufvk;
pub mod validation;
pub mod zip316;

#[cfg(test)]
mod test_vectors;

/// Unified container typecode of an Orchard item.
pub const TYPECODE_ORCHARD: u64 = 0x03;

pub use addresses::{decode_unified_address, derive_address, DerivedAddress};
pub use batch::{derive, derive_batch, derive_batch_with, BatchOptions};
pub use error::{AddrgenError, ErrorCode, Result};
pub use network::{
    Network, HRP_JUNO_UA, HRP_JUNO_UA_REGTEST, HRP_JUNO_UA_TEST, HRP_JUNO_UFVK,
    HRP_JUNO_UFVK_REGTEST, HRP_JUNO_UFVK_TEST,
};
pub use pool::{Pool, MAX_DIVERSIFIER_ATTEMPTS};
pub use ufvk::UnifiedFullViewingKey;
pub use validation::MAX_BATCH_COUNT;
