//! Circular shifts over a fixed 32‑bit width.
//!
//! The count is reduced modulo [`WIDTH`] first, so any `u32` count is valid.
//! Counts are unsigned, there is no negative rotation to reject.

use crate::Word;

/// Bit width of a [`Word`].
pub const WIDTH: u32 = Word::BITS;

/// Rotate `value` left by `count` bits.
#[inline(always)]
pub fn rotl32(value: Word, count: u32) -> Word {
    value.rotate_left(count % WIDTH)
}

/// Rotate `value` right by `count` bits.
#[inline(always)]
pub fn rotr32(value: Word, count: u32) -> Word {
    value.rotate_right(count % WIDTH)
}
