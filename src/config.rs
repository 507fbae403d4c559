//! Knobs for the state search.

use serde::{Deserialize, Serialize};

use crate::{Error, Result, Word};

/// How ties between matching candidates are broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SearchOrder {
    /// Lowest matching candidate wins. Reproducible across runs and thread
    /// counts.
    #[default]
    Lowest,
    /// Whichever shard reports first wins. Faster to stop, but the returned
    /// state may differ between runs when several candidates match.
    FirstFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// First candidate to try.
    pub start: Word,
    /// Last candidate to try (inclusive).
    pub end: Word,
    /// Candidates per shard.
    pub shard_size: u32,
    /// Worker threads; `0` uses the global rayon pool.
    pub threads: usize,
    pub order: SearchOrder,
    /// Emit a progress event every this many scanned candidates.
    pub progress_interval: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            start: 0,
            end: Word::MAX,
            shard_size: 1 << 20,
            threads: 0,
            order: SearchOrder::Lowest,
            progress_interval: 1 << 28,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::InvalidConfig(format!(
                "start {:#010x} is past end {:#010x}",
                self.start, self.end
            )));
        }
        if self.shard_size == 0 {
            return Err(Error::InvalidConfig("shard size must be non-zero".into()));
        }
        if self.progress_interval == 0 {
            return Err(Error::InvalidConfig(
                "progress interval must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Number of candidates covered by `start..=end`.
    pub fn space(&self) -> u64 {
        u64::from(self.end) - u64::from(self.start) + 1
    }

    /// Number of shards the range splits into.
    pub fn shard_count(&self) -> u64 {
        self.space().div_ceil(u64::from(self.shard_size))
    }

    /// Inclusive bounds of shard `index`.
    pub fn shard(&self, index: u64) -> (Word, Word) {
        let lo = u64::from(self.start) + index * u64::from(self.shard_size);
        let hi = (lo + u64::from(self.shard_size) - 1).min(u64::from(self.end));
        // both bounds lie inside start..=end, which is u32
        (lo as Word, hi as Word)
    }
}
