use std::env;

pub const DEFAULT_LOG_FILTER: &str = "juno_addrgen=warn";

#[derive(Clone, Debug)]
pub struct Config {
    /// Worker threads for batch derivation. `0` means one per available core.
    pub threads: usize,
    pub log_filter: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let threads: usize = lookup("JUNO_ADDRGEN_THREADS")
            .unwrap_or_else(|| "1".into())
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("JUNO_ADDRGEN_THREADS: {}", e))?;

        Ok(Self {
            threads,
            log_filter: lookup("JUNO_ADDRGEN_LOG")
                .or_else(|| lookup("RUST_LOG"))
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.into()),
        })
    }

    /// Batch parallelism with `0` resolved to the core count.
    pub fn parallelism(&self) -> usize {
        match self.threads {
            0 => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            n => n,
        }
    }
}
