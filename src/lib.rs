//! authur1 — Toy Keyed Hash & Forgery
//! ==================================
//! A **32‑bit Merkle–Damgård style hash** (`H`), the secret‑prefix MAC built
//! on it, and the attack that breaks that MAC by recovering the hash's
//! internal state from a single published tag.
//!
//! **Do not use this hash for anything.** It is broken on purpose.
//!
//! ## Construction
//! * 32‑bit accumulator, initialised to `0x524F464C` (`"ROFL"`)
//! * 4‑byte big‑endian blocks, each folded as `acc = Q(acc ^ block)`
//! * `Q(x) = x ^ rotl(x, 17)`
//! * Tail padded with `0xFF` to a full block, folded once more
//! * One extra `Q` as finalization for non‑empty input
//! * `MIC = H(key ++ message)` with a 16‑byte key
//!
//! ## The attack
//! When `key ++ message` ends on a block boundary, the MIC is
//! `Q(Q(s ^ last_block))` where `s` is the accumulator before the last
//! block. Scanning all 2³² candidates for `s` (sharded over Rayon with the
//! `parallel` feature) recovers it, and resuming the chain from `s` yields a
//! valid MIC for `prefix ++ anything` without ever touching the key.
//!
//! ```
//! use authur1::{mac, recover_state_and_forge, ObservedPair, SearchConfig};
//!
//! let key = [0x42u8; 16];
//! let observed = ObservedPair::new(*b"AAAAaaaa", mac(b"AAAAaaaa", &key)?);
//! let state = authur1::mac::mac_prefinal(b"AAAA", &key)?;
//!
//! let forgery = recover_state_and_forge(&[observed], b"!", Some(state), &SearchConfig::default())?;
//! assert_eq!(mac(&forgery.message, &key)?, forgery.mic);
//! # Ok::<(), authur1::Error>(())
//! ```

pub mod attack;
pub mod compress;
pub mod config;
pub mod engine;
mod error;
pub mod mac;
pub mod rotate;
pub mod search;
pub mod selftest;

pub use attack::{parse_mic, recover_state_and_forge, select_target, Forgery, ObservedPair, Target};
pub use compress::{compress, word_from_wide};
pub use config::{SearchConfig, SearchOrder};
pub use engine::{hash, hash_prefinal, hash_raw, Hasher, Phase};
pub use error::{Error, Result};
pub use mac::{mac, verify, Key};
pub use search::{search_state, search_state_with_cancel, SearchReport};
pub use selftest::{self_test, SelfTestReport};

// ---------------------------------------------------------------------------
// Constants & parameters
// ---------------------------------------------------------------------------

/// The only numeric type inside the hash.
pub type Word = u32;
/// One 4‑byte input block.
pub type Block = [u8; BLOCK_LEN];
/// Big‑endian hash output.
pub type Digest = [u8; 4];
/// Message integrity code, the keyed digest.
pub type Mic = Digest;

pub const BLOCK_LEN: usize = 4;
pub const KEY_LEN: usize = 16;
/// Fill byte for the final block.
pub const PADDING: u8 = 0xFF;
/// Accumulator at the start of every hash (`b"ROFL"`).
pub const INITIAL_STATE: Word = 0x524F_464C;
