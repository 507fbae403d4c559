//! Exhaustive search for the accumulator that produced an observed MIC.
//!
//! The candidate range is cut into contiguous shards. Shards share nothing
//! but a scanned-candidate counter and two stop flags, so they can run on any
//! number of workers. With [`SearchOrder::Lowest`] the lowest matching shard
//! wins no matter which worker finishes first.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::compress::compress;
use crate::config::{SearchConfig, SearchOrder};
use crate::{Block, Error, Mic, Result, Word};

/// What the MIC would be if the accumulator had been `state` right before
/// `block` (the final, already padded block) was folded in.
///
/// Equivalent to `hash_raw(&block, state)` for a 4-byte block, minus the
/// buffering.
#[inline(always)]
pub fn candidate_mic(block: Word, state: Word) -> Word {
    compress(compress(state ^ block))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub state: Word,
    /// Candidates evaluated across all workers, including shards that were
    /// already running when the match was found.
    pub scanned: u64,
    pub elapsed: Duration,
}

/// Search `config`'s range for a state that folds `block` into `mic`.
pub fn search_state(block: Block, mic: Mic, config: &SearchConfig) -> Result<SearchReport> {
    let cancel = AtomicBool::new(false);
    search_state_with_cancel(block, mic, config, &cancel)
}

/// Like [`search_state`], but stops early once `cancel` is set.
pub fn search_state_with_cancel(
    block: Block,
    mic: Mic,
    config: &SearchConfig,
    cancel: &AtomicBool,
) -> Result<SearchReport> {
    config.validate()?;
    let scan = Scan {
        block: Word::from_be_bytes(block),
        target: Word::from_be_bytes(mic),
        config,
        cancel,
        found: AtomicBool::new(false),
        scanned: AtomicU64::new(0),
        started: Instant::now(),
    };
    tracing::info!(
        block = %hex::encode(block),
        mic = %hex::encode(mic),
        start = format_args!("{:#010x}", config.start),
        end = format_args!("{:#010x}", config.end),
        shards = config.shard_count(),
        order = ?config.order,
        "searching internal state"
    );

    let hit = scan.run()?;
    let scanned = scan.scanned.load(Ordering::Relaxed);
    let elapsed = scan.started.elapsed();
    match hit {
        Some(state) => {
            tracing::info!(
                state = format_args!("{state:08x}"),
                scanned,
                elapsed_ms = elapsed.as_millis() as u64,
                "internal state found"
            );
            Ok(SearchReport {
                state,
                scanned,
                elapsed,
            })
        }
        None if cancel.load(Ordering::Relaxed) => Err(Error::Cancelled { scanned }),
        None => Err(Error::ExhaustedSearchSpace {
            scanned,
            start: config.start,
            end: config.end,
            mic: hex::encode(mic),
        }),
    }
}

struct Scan<'a> {
    block: Word,
    target: Word,
    config: &'a SearchConfig,
    cancel: &'a AtomicBool,
    found: AtomicBool,
    scanned: AtomicU64,
    started: Instant,
}

impl Scan<'_> {
    fn stopped(&self) -> bool {
        self.cancel.load(Ordering::Relaxed) || self.found.load(Ordering::Relaxed)
    }

    fn shard(&self, index: u64) -> Option<Word> {
        if self.stopped() {
            return None;
        }
        let (lo, hi) = self.config.shard(index);
        let hit = (lo..=hi).find(|&s| candidate_mic(self.block, s) == self.target);
        let last = hit.unwrap_or(hi);
        self.record(u64::from(last - lo) + 1);
        if hit.is_some() && self.config.order == SearchOrder::FirstFound {
            self.found.store(true, Ordering::Relaxed);
        }
        hit
    }

    fn record(&self, done: u64) {
        let before = self.scanned.fetch_add(done, Ordering::Relaxed);
        let after = before + done;
        let every = self.config.progress_interval;
        if before / every != after / every {
            tracing::info!(
                scanned = after,
                percent = format_args!("{:.2}", after as f64 * 100.0 / self.config.space() as f64),
                elapsed_ms = self.started.elapsed().as_millis() as u64,
                "state search progress"
            );
        }
    }

    #[cfg(feature = "parallel")]
    fn run(&self) -> Result<Option<Word>> {
        let go = || {
            let shards = 0..self.config.shard_count();
            match self.config.order {
                SearchOrder::Lowest => shards.into_par_iter().find_map_first(|i| self.shard(i)),
                SearchOrder::FirstFound => shards.into_par_iter().find_map_any(|i| self.shard(i)),
            }
        };
        if self.config.threads == 0 {
            return Ok(go());
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads)
            .build()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        Ok(pool.install(go))
    }

    #[cfg(not(feature = "parallel"))]
    fn run(&self) -> Result<Option<Word>> {
        Ok((0..self.config.shard_count()).find_map(|i| self.shard(i)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::hash_raw;

    const BLOCK: Block = *b"aa\xff\xff";

    fn mic_for(state: Word) -> Mic {
        hash_raw(&BLOCK, state).to_be_bytes()
    }

    fn small(start: Word, end: Word) -> SearchConfig {
        SearchConfig {
            start,
            end,
            shard_size: 256,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn candidate_mic_matches_resumed_chain() {
        let block = Word::from_be_bytes(BLOCK);
        for s in [0u32, 0xC475, 0x8000_0000, 0xFFFF_FFFF, 0x1234_5678] {
            assert_eq!(candidate_mic(block, s), hash_raw(&BLOCK, s), "s={s:08x}");
        }
    }

    #[test]
    fn finds_the_lowest_preimage() {
        // s ^ {0, 0x55555555, 0xAAAAAAAA, !0} all collide, the lowest is reported
        let mic = mic_for(0xFFFF_3B8A);
        let report = search_state(BLOCK, mic, &small(0, 0xFFFF)).unwrap();
        assert_eq!(report.state, 0xC475);
        assert_eq!(mic_for(report.state), mic);
    }

    #[test]
    fn lowest_order_is_deterministic_across_thread_counts() {
        let mic = mic_for(0x3000);
        for threads in [1, 2, 4] {
            let config = SearchConfig {
                threads,
                ..small(0, 0xFFFF)
            };
            assert_eq!(search_state(BLOCK, mic, &config).unwrap().state, 0x3000);
        }
    }

    #[test]
    fn first_found_returns_a_valid_state() {
        let mic = mic_for(0x0ABC);
        let config = SearchConfig {
            order: SearchOrder::FirstFound,
            ..small(0, 0xFFFF)
        };
        let report = search_state(BLOCK, mic, &config).unwrap();
        assert_eq!(mic_for(report.state), mic);
    }

    #[test]
    fn honours_range_offsets() {
        let mic = mic_for(0x1234_5678);
        let report = search_state(BLOCK, mic, &small(0x1234_5600, 0x1234_56FF)).unwrap();
        assert_eq!(report.state, 0x1234_5678);
        assert!(report.scanned <= 0x100);
    }

    #[test]
    fn exhausting_the_range_is_an_error() {
        let mic = mic_for(0x0001_0000);
        match search_state(BLOCK, mic, &small(0, 0xFFFF)) {
            Err(Error::ExhaustedSearchSpace { scanned, .. }) => assert_eq!(scanned, 0x10000),
            other => panic!("expected ExhaustedSearchSpace, got {other:?}"),
        }
    }

    #[test]
    fn cancelled_search_reports_cancellation() {
        let cancel = AtomicBool::new(true);
        let mic = mic_for(0x10);
        assert!(matches!(
            search_state_with_cancel(BLOCK, mic, &small(0, 0xFFFF), &cancel),
            Err(Error::Cancelled { scanned: 0 })
        ));
    }

    #[test]
    fn invalid_config_fails_before_scanning() {
        let config = SearchConfig {
            shard_size: 0,
            ..SearchConfig::default()
        };
        assert!(matches!(
            search_state(BLOCK, [0; 4], &config),
            Err(Error::InvalidConfig(_))
        ));
    }
}
