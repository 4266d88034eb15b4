//! Unified full viewing key decoding.

use zcash_address::unified::Fvk;

use crate::error::{AddrgenError, Result};
use crate::network::Network;
use crate::pool::{OrchardKey, Pool, PoolKey, SaplingKey};
use crate::zip316::{self, Zip316Error};

/// A decoded UFVK, ready for derivation.
///
/// Holds the prepared key material of every shielded pool it carries, in
/// ascending typecode order. Never mutated after [`UnifiedFullViewingKey::decode`].
#[derive(Debug, Clone)]
pub struct UnifiedFullViewingKey {
    network: Network,
    pools: Vec<PoolKey>,
    transparent: bool,
}

impl UnifiedFullViewingKey {
    /// Decodes UFVK text.
    ///
    /// Framing, checksum, prefix and key validity problems yield `InvalidUfvk`.
    /// A well-formed key carrying an item this engine cannot derive from, or no
    /// shielded item at all, yields `UnsupportedPool`.
    pub fn decode(text: &str) -> Result<Self> {
        let (hrp, items) = zip316::decode_items(text).map_err(invalid_ufvk)?;
        let network = Network::from_ufvk_hrp(&hrp).ok_or_else(|| {
            AddrgenError::InvalidUfvk(format!("unrecognized prefix {:?}", hrp))
        })?;

        let mut pools = Vec::new();
        let mut transparent = false;
        let mut unsupported = Vec::new();

        for item in items {
            let fvk = Fvk::try_from((item.typecode, item.data.as_slice()))
                .map_err(|e| AddrgenError::InvalidUfvk(e.to_string()))?;
            match fvk {
                Fvk::Orchard(bytes) => {
                    let key = OrchardKey::from_bytes(&bytes).ok_or_else(|| {
                        AddrgenError::InvalidUfvk("invalid Orchard full viewing key".into())
                    })?;
                    pools.push(PoolKey::Orchard(key));
                }
                Fvk::Sapling(bytes) => {
                    let key = SaplingKey::from_bytes(&bytes).ok_or_else(|| {
                        AddrgenError::InvalidUfvk("invalid Sapling full viewing key".into())
                    })?;
                    pools.push(PoolKey::Sapling(key));
                }
                Fvk::P2pkh(_) => transparent = true,
                Fvk::Unknown { typecode, .. } => unsupported.push(typecode),
            }
        }

        // Every item is parsed first so a malformed key is reported as such
        // even when the same UFVK also carries an unknown item.
        if let Some(typecode) = unsupported.first() {
            return Err(AddrgenError::UnsupportedPool(format!(
                "typecode {:#x}",
                typecode
            )));
        }
        if pools.is_empty() {
            return Err(AddrgenError::UnsupportedPool(
                "no shielded pool in viewing key".into(),
            ));
        }

        pools.sort_by(|a, b| Pool::encoding_order(&a.pool(), &b.pool()));

        tracing::debug!(
            network = %network,
            pools = ?pools.iter().map(PoolKey::pool).collect::<Vec<_>>(),
            transparent,
            "Decoded UFVK"
        );

        Ok(Self {
            network,
            pools,
            transparent,
        })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// Shielded pool keys in ascending typecode order.
    pub fn pools(&self) -> &[PoolKey] {
        &self.pools
    }

    pub fn has_pool(&self, pool: Pool) -> bool {
        self.pools.iter().any(|k| k.pool() == pool)
    }

    /// Whether the key carries a transparent P2PKH component. It is accepted
    /// but never contributes a receiver.
    pub fn has_transparent(&self) -> bool {
        self.transparent
    }
}

impl std::str::FromStr for UnifiedFullViewingKey {
    type Err = AddrgenError;

    fn from_str(s: &str) -> Result<Self> {
        Self::decode(s)
    }
}

fn invalid_ufvk(e: Zip316Error) -> AddrgenError {
    AddrgenError::InvalidUfvk(e.to_string())
}
