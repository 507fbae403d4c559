//! The chaining driver `H`.
//!
//! Input is consumed in 4‑byte big‑endian blocks. Each block is folded into
//! the accumulator as `acc = Q(acc ^ block)`. A block is only folded once the
//! *next* byte arrives, so after the last input byte the buffer holds 1–4
//! real bytes (or none for empty input). That tail is right‑padded with
//! `0xFF` and folded once more. Non‑empty input then gets one extra `Q` as
//! finalization.

use crate::compress::compress;
use crate::{Block, Digest, Word, BLOCK_LEN, INITIAL_STATE, PADDING};

/// Where a [`Hasher`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Still accepting bytes.
    Loading,
    /// The padding block has been folded, no further input is accepted.
    Finalized,
}

/// Streaming authur1 state.
#[derive(Debug, Clone)]
pub struct Hasher {
    acc: Word,
    buf: Block,
    filled: usize,
    consumed: u64,
    phase: Phase,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Start from the fixed initial accumulator `0x524F464C`.
    pub fn new() -> Self {
        Self::with_state(INITIAL_STATE)
    }

    /// Start from an arbitrary accumulator, e.g. a recovered one.
    pub fn with_state(state: Word) -> Self {
        Self {
            acc: state,
            buf: [0; BLOCK_LEN],
            filled: 0,
            consumed: 0,
            phase: Phase::Loading,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current accumulator. Blocks still sitting in the buffer are not
    /// reflected here yet.
    pub fn state(&self) -> Word {
        self.acc
    }

    /// Number of input bytes absorbed so far.
    pub fn consumed(&self) -> u64 {
        self.consumed
    }

    /// Absorb `data`.
    ///
    /// # Panics
    /// If the hasher has already been finalized.
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        assert_eq!(
            self.phase,
            Phase::Loading,
            "authur1 hasher updated after finalization"
        );
        for &byte in data {
            if self.filled == BLOCK_LEN {
                self.fold();
            }
            assert!(
                self.filled < BLOCK_LEN,
                "authur1 block buffer overflow: {} bytes",
                self.filled
            );
            self.buf[self.filled] = byte;
            self.filled += 1;
        }
        self.consumed += data.len() as u64;
        self
    }

    /// Pad and fold the tail, returning the accumulator *before* the
    /// finalization round.
    pub fn finalize_raw(&mut self) -> Word {
        if self.phase == Phase::Loading {
            self.buf[self.filled..].fill(PADDING);
            self.filled = BLOCK_LEN;
            self.fold();
            self.phase = Phase::Finalized;
        }
        self.acc
    }

    /// Finalized digest as a word. The extra round is skipped for empty
    /// input.
    pub fn finalize_word(&mut self) -> Word {
        let acc = self.finalize_raw();
        if self.consumed == 0 {
            acc
        } else {
            compress(acc)
        }
    }

    /// Finalized digest, big‑endian.
    pub fn finalize(&mut self) -> Digest {
        self.finalize_word().to_be_bytes()
    }

    #[inline(always)]
    fn fold(&mut self) {
        debug_assert_eq!(self.filled, BLOCK_LEN);
        let block = Word::from_be_bytes(self.buf);
        let next = compress(self.acc ^ block);
        tracing::trace!(
            acc = format_args!("{:08x}", self.acc),
            block = format_args!("{block:08x}"),
            next = format_args!("{next:08x}"),
            "fold"
        );
        self.acc = next;
        self.filled = 0;
    }
}

// ---------------------------------------------------------------------------
// One-shot helpers
// ---------------------------------------------------------------------------

/// Compute the authur1 digest of `input`.
pub fn hash(input: &[u8]) -> Digest {
    Hasher::new().update(input).finalize()
}

/// Run the block chain from `initial_state` over `input` and return the
/// finalized word. This is how a chain is resumed from a recovered state.
pub fn hash_raw(input: &[u8], initial_state: Word) -> Word {
    Hasher::with_state(initial_state)
        .update(input)
        .finalize_word()
}

/// The accumulator of `hash(input)` right before the finalization round.
pub fn hash_prefinal(input: &[u8]) -> Word {
    Hasher::new().update(input).finalize_raw()
}
