//! ZIP 316 unified container codec.
//!
//! A unified container (address or viewing key) is encoded as
//! `Bech32m(hrp, F4Jumble(items || padding))`, where each item is
//! `CompactSize(typecode) || CompactSize(len) || data` and `padding` is the
//! HRP right-padded with zeros to 16 bytes. The Bech32m length limit is lifted
//! to the ZIP 316 maximum, so only `Bech32mZip316` may be used for checksums.

use bech32::{primitives::decode::CheckedHrpstring, Hrp};
use thiserror::Error;
use zcash_address::unified::Bech32mZip316;
use zcash_encoding::CompactSize;

pub const PADDING_LEN: usize = 16;

/// Largest typecode a CompactSize may carry in a unified container.
pub const MAX_TYPECODE: u32 = 0x0200_0000;

/// One `(typecode, data)` entry of a unified container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnifiedItem {
    pub typecode: u32,
    pub data: Vec<u8>,
}

impl UnifiedItem {
    pub fn new(typecode: u32, data: impl Into<Vec<u8>>) -> Self {
        Self {
            typecode,
            data: data.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Zip316Error {
    #[error("not a Bech32m string: {0}")]
    NotBech32m(String),
    #[error("human-readable part {0:?} is longer than 16 bytes")]
    HrpTooLong(String),
    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),
    #[error("container length {0} is outside F4Jumble bounds")]
    InvalidLength(usize),
    #[error("invalid padding bytes")]
    InvalidPadding,
    #[error("malformed item: {0}")]
    MalformedItem(String),
    #[error("typecode {0:#x} is out of range")]
    TypecodeOutOfRange(u64),
    #[error("duplicate typecode {0:#x}")]
    DuplicateTypecode(u32),
    #[error("items are not in ascending typecode order")]
    OutOfOrder,
    #[error("container has no items")]
    Empty,
    #[error("bech32 encoding failed: {0}")]
    Bech32(String),
}

fn padding_for(hrp: &str) -> Result<[u8; PADDING_LEN], Zip316Error> {
    if hrp.len() > PADDING_LEN {
        return Err(Zip316Error::HrpTooLong(hrp.to_string()));
    }
    let mut padding = [0u8; PADDING_LEN];
    padding[..hrp.len()].copy_from_slice(hrp.as_bytes());
    Ok(padding)
}

/// Rejects descending and repeated typecodes. `items` must already be in
/// the order they appear (or will appear) on the wire.
fn check_canonical_order(items: &[UnifiedItem]) -> Result<(), Zip316Error> {
    let mut prev: Option<u32> = None;
    for item in items {
        if item.typecode > MAX_TYPECODE {
            return Err(Zip316Error::TypecodeOutOfRange(item.typecode as u64));
        }
        match prev {
            Some(p) if item.typecode == p => {
                return Err(Zip316Error::DuplicateTypecode(item.typecode))
            }
            Some(p) if item.typecode < p => return Err(Zip316Error::OutOfOrder),
            _ => prev = Some(item.typecode),
        }
    }
    Ok(())
}

/// Encodes `items` under `hrp`. Items are written in ascending typecode order
/// regardless of the order they are passed in.
pub fn encode_items(hrp: &str, items: &[UnifiedItem]) -> Result<String, Zip316Error> {
    if items.is_empty() {
        return Err(Zip316Error::Empty);
    }
    let padding = padding_for(hrp)?;

    let mut sorted = items.to_vec();
    sorted.sort_by_key(|item| item.typecode);
    check_canonical_order(&sorted)?;

    let mut raw = Vec::new();
    for item in &sorted {
        CompactSize::write(&mut raw, item.typecode as usize)
            .and_then(|()| CompactSize::write(&mut raw, item.data.len()))
            .map_err(|e| Zip316Error::MalformedItem(e.to_string()))?;
        raw.extend_from_slice(&item.data);
    }
    raw.extend_from_slice(&padding);

    let jumbled = f4jumble::f4jumble(&raw).map_err(|_| Zip316Error::InvalidLength(raw.len()))?;
    let hrp = Hrp::parse(hrp).map_err(|e| Zip316Error::InvalidHrp(e.to_string()))?;

    bech32::encode::<Bech32mZip316>(hrp, &jumbled).map_err(|e| Zip316Error::Bech32(e.to_string()))
}

/// Decodes a unified container, returning its lowercase HRP and items in
/// wire order. Enforces checksum, padding, item framing and canonical order.
pub fn decode_items(encoded: &str) -> Result<(String, Vec<UnifiedItem>), Zip316Error> {
    let parsed = CheckedHrpstring::new::<Bech32mZip316>(encoded)
        .map_err(|e| Zip316Error::NotBech32m(e.to_string()))?;
    let hrp = parsed.hrp().to_lowercase();
    let padding = padding_for(&hrp)?;

    let mut data: Vec<u8> = parsed.byte_iter().collect();
    let len = data.len();
    f4jumble::f4jumble_inv_mut(&mut data).map_err(|_| Zip316Error::InvalidLength(len))?;

    let (body, tail) = data.split_at(len - PADDING_LEN);
    if tail != padding {
        return Err(Zip316Error::InvalidPadding);
    }

    let items = parse_items(body)?;
    if items.is_empty() {
        return Err(Zip316Error::Empty);
    }
    check_canonical_order(&items)?;

    Ok((hrp, items))
}

fn parse_items(body: &[u8]) -> Result<Vec<UnifiedItem>, Zip316Error> {
    let mut rest = body;
    let mut items = Vec::new();
    while !rest.is_empty() {
        let typecode = CompactSize::read(&mut rest)
            .map_err(|e| Zip316Error::MalformedItem(format!("typecode: {}", e)))?;
        let typecode =
            u32::try_from(typecode).map_err(|_| Zip316Error::TypecodeOutOfRange(typecode))?;

        let length = CompactSize::read(&mut rest)
            .map_err(|e| Zip316Error::MalformedItem(format!("length: {}", e)))?;
        let length = usize::try_from(length)
            .ok()
            .filter(|l| *l <= rest.len())
            .ok_or_else(|| {
                Zip316Error::MalformedItem(format!(
                    "truncated: item {:#x} declares {} bytes, {} remain",
                    typecode,
                    length,
                    rest.len()
                ))
            })?;

        let (data, tail) = rest.split_at(length);
        items.push(UnifiedItem::new(typecode, data));
        rest = tail;
    }
    Ok(items)
}

/// Encodes a container holding a single `(typecode, value)` item.
pub fn encode_unified_container(
    hrp: &str,
    typecode: u64,
    value: &[u8],
) -> Result<String, Zip316Error> {
    let typecode = u32::try_from(typecode)
        .ok()
        .filter(|t| *t <= MAX_TYPECODE)
        .ok_or(Zip316Error::TypecodeOutOfRange(typecode))?;
    encode_items(hrp, &[UnifiedItem::new(typecode, value)])
}
