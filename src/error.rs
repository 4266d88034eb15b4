//! Error taxonomy for address derivation.
//!
//! Every failure carries a stable machine-readable [`ErrorCode`] so callers can
//! branch on the code instead of the human-readable message.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Stable error codes surfaced to callers (CLI text and JSON output).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    UfvkInvalid,
    UnsupportedPool,
    DiversifierExhausted,
    IndexInvalid,
    CountInvalid,
    IndexRangeOverflow,
    EncodingError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UfvkInvalid => "ufvk_invalid",
            ErrorCode::UnsupportedPool => "unsupported_pool",
            ErrorCode::DiversifierExhausted => "diversifier_exhausted",
            ErrorCode::IndexInvalid => "index_invalid",
            ErrorCode::CountInvalid => "count_invalid",
            ErrorCode::IndexRangeOverflow => "index_range_overflow",
            ErrorCode::EncodingError => "encoding_error",
            ErrorCode::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddrgenError {
    /// Malformed prefix, checksum, padding, length or item layout in the UFVK text.
    #[error("invalid UFVK: {0}")]
    InvalidUfvk(String),

    /// The UFVK carries an item this engine cannot derive receivers for.
    #[error("unsupported pool: {0}")]
    UnsupportedPool(String),

    #[error("no valid {pool} diversifier for index {index} within {attempts} attempts")]
    DiversifierExhausted {
        pool: &'static str,
        index: u32,
        attempts: u32,
    },

    #[error("invalid index: {0}")]
    InvalidIndex(String),

    #[error("invalid count {count}: must be in 1..={max}")]
    InvalidCount { count: u64, max: u32 },

    #[error("index range overflow: start {start} + count {count} exceeds u32::MAX")]
    IndexRangeOverflow { start: u32, count: u32 },

    /// Internal invariant violation while building an address; never caused by caller input.
    #[error("encoding error: {0}")]
    Encoding(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AddrgenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AddrgenError::InvalidUfvk(_) => ErrorCode::UfvkInvalid,
            AddrgenError::UnsupportedPool(_) => ErrorCode::UnsupportedPool,
            AddrgenError::DiversifierExhausted { .. } => ErrorCode::DiversifierExhausted,
            AddrgenError::InvalidIndex(_) => ErrorCode::IndexInvalid,
            AddrgenError::InvalidCount { .. } => ErrorCode::CountInvalid,
            AddrgenError::IndexRangeOverflow { .. } => ErrorCode::IndexRangeOverflow,
            AddrgenError::Encoding(_) => ErrorCode::EncodingError,
            AddrgenError::Internal(_) => ErrorCode::Internal,
        }
    }

    /// Human detail without the code prefix, if the variant carries one.
    pub fn detail(&self) -> Option<String> {
        match self {
            AddrgenError::InvalidUfvk(d)
            | AddrgenError::UnsupportedPool(d)
            | AddrgenError::InvalidIndex(d)
            | AddrgenError::Encoding(d)
            | AddrgenError::Internal(d) => {
                if d.is_empty() {
                    None
                } else {
                    Some(d.clone())
                }
            }
            other => Some(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, AddrgenError>;
