//! Single and batch derivation entry points.
//!
//! A batch decodes the UFVK once and derives `count` consecutive indices.
//! The first failure by index aborts the batch; no partial output is returned.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;

use crate::addresses::{derive_address, DerivedAddress};
use crate::error::{AddrgenError, Result};
use crate::ufvk::UnifiedFullViewingKey;
use crate::validation::validate_range;

/// Indices handed to each worker per chunk when running in parallel.
const INDICES_PER_WORKER: u32 = 256;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Worker threads. `0` and `1` both run sequentially on the caller's thread.
    pub parallelism: usize,
    /// Checked between indices; once set the batch stops with an `Internal` error.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            parallelism: 1,
            cancel: None,
        }
    }
}

impl BatchOptions {
    pub fn with_parallelism(parallelism: usize) -> Self {
        Self {
            parallelism,
            ..Self::default()
        }
    }

    fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => {
                Err(AddrgenError::Internal("batch cancelled".into()))
            }
            _ => Ok(()),
        }
    }
}

/// Derive the unified address at `index`.
pub fn derive(ufvk: &str, index: u32) -> Result<String> {
    let ufvk = UnifiedFullViewingKey::decode(ufvk)?;
    Ok(derive_address(&ufvk, index)?.ua_string)
}

/// Derive `count` consecutive addresses starting at `start`, sequentially.
pub fn derive_batch(ufvk: &str, start: u32, count: u32) -> Result<Vec<String>> {
    derive_batch_with(ufvk, start, count, &BatchOptions::default())
}

/// Like [`derive_batch`], with parallelism and cancellation control. The
/// output is identical for every parallelism setting.
pub fn derive_batch_with(
    ufvk: &str,
    start: u32,
    count: u32,
    options: &BatchOptions,
) -> Result<Vec<String>> {
    validate_range(start, count)?;
    let ufvk = UnifiedFullViewingKey::decode(ufvk)?;
    let derived = derive_range(&ufvk, start, count, options)?;
    Ok(derived.into_iter().map(|d| d.ua_string).collect())
}

/// Derive a validated range from an already decoded UFVK.
pub fn derive_range(
    ufvk: &UnifiedFullViewingKey,
    start: u32,
    count: u32,
    options: &BatchOptions,
) -> Result<Vec<DerivedAddress>> {
    validate_range(start, count)?;

    tracing::debug!(
        network = %ufvk.network(),
        start,
        count,
        parallelism = options.parallelism,
        "Deriving batch"
    );

    let result = derive_indices(start, count, options, |index| derive_address(ufvk, index));

    if let Err(e) = &result {
        tracing::debug!(start, count, code = %e.code(), "Batch failed");
    }
    result
}

/// Runs `step` over `start..start + count` and collects the results in index
/// order. The error of the lowest failing index is returned.
fn derive_indices<T, F>(
    start: u32,
    count: u32,
    options: &BatchOptions,
    step: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(u32) -> Result<T> + Sync,
{
    if options.parallelism > 1 {
        derive_parallel(start, count, options, step)
    } else {
        derive_sequential(start, count, options, step)
    }
}

fn derive_sequential<T, F>(
    start: u32,
    count: u32,
    options: &BatchOptions,
    step: F,
) -> Result<Vec<T>>
where
    F: Fn(u32) -> Result<T>,
{
    let mut out = Vec::with_capacity(count as usize);
    for offset in 0..count {
        options.check_cancelled()?;
        out.push(step(start + offset)?);
    }
    Ok(out)
}

fn chunk_len(parallelism: usize) -> u32 {
    let workers = u32::try_from(parallelism).unwrap_or(u32::MAX);
    INDICES_PER_WORKER.saturating_mul(workers.max(1))
}

/// Fans chunks of the range out over a dedicated pool. Each slot of a chunk
/// is owned by exactly one index; chunks are committed in order, and the
/// lowest failing index in a chunk decides the batch error.
fn derive_parallel<T, F>(
    start: u32,
    count: u32,
    options: &BatchOptions,
    step: F,
) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(u32) -> Result<T> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.parallelism)
        .thread_name(|i| format!("juno-addrgen-{}", i))
        .build()
        .map_err(|e| AddrgenError::Internal(format!("thread pool: {}", e)))?;

    let chunk = chunk_len(options.parallelism);
    let mut out = Vec::with_capacity(count as usize);
    let mut offset = 0u32;

    while offset < count {
        options.check_cancelled()?;
        let len = chunk.min(count - offset);
        let chunk_start = start + offset;

        let slots: Vec<Result<T>> = pool.install(|| {
            (0..len)
                .into_par_iter()
                .map(|i| {
                    options.check_cancelled()?;
                    step(chunk_start + i)
                })
                .collect()
        });

        for slot in slots {
            out.push(slot?);
        }
        offset += len;
    }

    Ok(out)
}
