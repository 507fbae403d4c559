use thiserror::Error;

use crate::Word;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("key must be 16 bytes, got {got}")]
    InvalidKeyLength { got: usize },

    #[error("no observed pair can serve as a block-aligned target ({pairs} pairs given)")]
    NoUsableEvidence { pairs: usize },

    #[error(
        "scanned {scanned} candidates in {start:#010x}..={end:#010x} without reproducing mic {mic}"
    )]
    ExhaustedSearchSpace {
        scanned: u64,
        start: Word,
        end: Word,
        mic: String,
    },

    #[error("{what} exceeds its 32-bit width: {value:#x}")]
    OverflowViolation { what: &'static str, value: u64 },

    #[error("forging needs a non-empty extension")]
    EmptyExtension,

    #[error("key is not valid hex: {0}")]
    InvalidKeyHex(#[from] hex::FromHexError),

    #[error("mic must be 8 hex digits, got {0:?}")]
    InvalidMic(String),

    #[error("observed pair must look like `message:mic`, got {0:?}")]
    InvalidPair(String),

    #[error("state search cancelled after {scanned} candidates")]
    Cancelled { scanned: u64 },

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
