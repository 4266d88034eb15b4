use crate::error::{AddrgenError, Result};

/// Largest number of addresses a single batch may produce.
pub const MAX_BATCH_COUNT: u32 = 100_000;

/// Longest UFVK text accepted, the ZIP 316 Bech32m code-length limit.
pub const MAX_UFVK_LEN: usize = 4_194_368;

pub fn validate_count(count: u32) -> Result<()> {
    if count == 0 || count > MAX_BATCH_COUNT {
        return Err(AddrgenError::InvalidCount {
            count: u64::from(count),
            max: MAX_BATCH_COUNT,
        });
    }
    Ok(())
}

/// Checks that `start..start + count` stays within the index domain.
pub fn validate_range(start: u32, count: u32) -> Result<()> {
    validate_count(count)?;
    match start.checked_add(count - 1) {
        Some(_) => Ok(()),
        None => Err(AddrgenError::IndexRangeOverflow { start, count }),
    }
}

/// Bounds a caller-supplied 64-bit index (or batch start) into `u32`.
pub fn index_from_u64(field: &str, value: u64) -> Result<u32> {
    u32::try_from(value).map_err(|_| {
        AddrgenError::InvalidIndex(format!("{} must be at most {}", field, u32::MAX))
    })
}

/// Bounds a caller-supplied 64-bit batch count into `u32`. Zero is rejected
/// here as well so the error names the value the caller typed.
pub fn count_from_u64(value: u64) -> Result<u32> {
    match u32::try_from(value) {
        Ok(count) if count > 0 => Ok(count),
        _ => Err(AddrgenError::InvalidCount {
            count: value,
            max: MAX_BATCH_COUNT,
        }),
    }
}

/// Trims surrounding whitespace from UFVK text and rejects empty or
/// oversized input before it reaches the decoder.
pub fn validate_ufvk_text(value: &str) -> Result<&str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AddrgenError::InvalidUfvk("empty".into()));
    }
    if trimmed.len() > MAX_UFVK_LEN {
        return Err(AddrgenError::InvalidUfvk(format!(
            "must be at most {} characters",
            MAX_UFVK_LEN
        )));
    }
    Ok(trimmed)
}
