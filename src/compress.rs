//! The single mixing round `Q(x) = x ^ rotl(x, 17)`.
//!
//! `Q` is linear over GF(2): `Q(a ^ b) == Q(a) ^ Q(b)`. Its kernel is
//! `{0, 0xFFFFFFFF}`, so every image has exactly two preimages and the
//! round is *not* a bijection. Two rounds in a row have the kernel
//! `{0, 0x55555555, 0xAAAAAAAA, 0xFFFFFFFF}`, which is why a MIC always has
//! four candidate states.

use crate::rotate::rotl32;
use crate::{Error, Result, Word};

/// Rotation distance of the mixing round.
pub const SHIFT_LENGTH: u32 = 17;

/// One compression round.
#[inline(always)]
pub fn compress(x: Word) -> Word {
    x ^ rotl32(x, SHIFT_LENGTH)
}

/// Re-validate a wide integer as a [`Word`] at an API boundary.
///
/// Anything above `u32::MAX` would mean an accumulator grew past its fixed
/// width, which is reported instead of being truncated.
pub fn word_from_wide(value: u64) -> Result<Word> {
    Word::try_from(value).map_err(|_| Error::OverflowViolation {
        what: "word",
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::INITIAL_STATE;

    #[test]
    fn reference_chain_from_initial_state() {
        let a = compress(INITIAL_STATE);
        let b = compress(a);
        let c = compress(b);
        assert_eq!(a, 0xDED7_E2D2, "Q(S0) = {a:08x}");
        assert_eq!(b, 0x1B72_5F7D, "Q(Q(S0)) = {b:08x}");
        assert_eq!(c, 0xA588_6999, "Q(Q(Q(S0))) = {c:08x}");
    }

    #[test]
    fn kernel_is_zero_and_all_ones() {
        assert_eq!(compress(0), 0);
        assert_eq!(compress(Word::MAX), 0);
        assert_ne!(compress(1), 0);
        assert_eq!(compress(0xAAAA_AAAA), Word::MAX);
        assert_eq!(compress(compress(0x5555_5555)), 0);
    }

    #[test]
    fn is_linear() {
        let pairs = [(0x1234_5678, 0x9ABC_DEF0), (0xFFFF_0000, 0x00FF_FF00), (7, 0x8000_0000)];
        for (a, b) in pairs {
            assert_eq!(compress(a ^ b), compress(a) ^ compress(b));
        }
    }

    #[test]
    fn moves_non_fixed_points() {
        for x in [1u32, 0x524F_464C, 0xDEAD_BEEF, 0x8000_0000] {
            assert_ne!(compress(x), x, "x={x:08x}");
        }
    }

    #[test]
    fn wide_values_are_rejected() {
        assert_eq!(word_from_wide(0xFFFF_FFFF).unwrap(), Word::MAX);
        assert!(matches!(
            word_from_wide(0x1_0000_0000),
            Err(Error::OverflowViolation { value: 0x1_0000_0000, .. })
        ));
    }
}
