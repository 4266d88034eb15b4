use zcash_address::unified::Receiver;

use crate::error::{AddrgenError, Result};
use crate::network::Network;
use crate::pool::{DiversifiedAddress, Pool};
use crate::ufvk::UnifiedFullViewingKey;
use crate::zip316::{self, UnifiedItem};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedAddress {
    pub index: u32,
    pub ua_string: String,
    /// One receiver per shielded pool of the UFVK, in encoding order.
    pub receivers: Vec<DiversifiedAddress>,
}

impl DerivedAddress {
    /// Raw receiver hex for `pool`, if the address has one.
    pub fn receiver_hex(&self, pool: Pool) -> Option<String> {
        self.receivers
            .iter()
            .find(|r| r.pool == pool)
            .map(DiversifiedAddress::receiver_hex)
    }
}

/// Derive the unified address at `index` from an already decoded UFVK.
/// Every shielded pool of the key contributes one receiver.
pub fn derive_address(ufvk: &UnifiedFullViewingKey, index: u32) -> Result<DerivedAddress> {
    let receivers = ufvk
        .pools()
        .iter()
        .map(|key| key.receiver_at(index))
        .collect::<Result<Vec<_>>>()?;

    let ua_string = encode_unified_address(ufvk.network(), &receivers)?;

    tracing::trace!(index, receivers = receivers.len(), "Derived address");

    Ok(DerivedAddress {
        index,
        ua_string,
        receivers,
    })
}

/// Serialize receivers into a unified address for `network`. Receivers are
/// written in ascending typecode order whatever order they are passed in.
pub fn encode_unified_address(
    network: Network,
    receivers: &[DiversifiedAddress],
) -> Result<String> {
    if receivers.is_empty() {
        return Err(AddrgenError::Encoding("empty receiver set".into()));
    }

    let items: Vec<UnifiedItem> = receivers
        .iter()
        .map(|r| UnifiedItem::new(u32::from(r.pool.typecode()), r.to_raw_bytes()))
        .collect();

    zip316::encode_items(network.ua_hrp(), &items)
        .map_err(|e| AddrgenError::Encoding(e.to_string()))
}

/// Parse a Juno unified address into its network and typed receivers, in the
/// order they were encoded.
pub fn decode_unified_address(text: &str) -> Result<(Network, Vec<Receiver>)> {
    let (hrp, items) =
        zip316::decode_items(text).map_err(|e| AddrgenError::Encoding(e.to_string()))?;
    let network = Network::from_ua_hrp(&hrp).ok_or_else(|| {
        AddrgenError::Encoding(format!("not a unified address prefix: {:?}", hrp))
    })?;

    let receivers = items
        .into_iter()
        .map(|item| {
            Receiver::try_from((item.typecode, item.data.as_slice()))
                .map_err(|e| AddrgenError::Encoding(e.to_string()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok((network, receivers))
}
