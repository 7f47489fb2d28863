//! Machine words usable as the backing store of a [`FixedBlock`](super::FixedBlock).

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Not};

mod sealed {
    pub trait Sealed {}
}

/// An unsigned machine word of `BITS` bits.
///
/// Implemented for `u8`, `u32` and `u64` only. Every shift helper here is
/// total: shifting by `BITS` or more yields zero instead of overflowing.
pub trait Word:
    sealed::Sealed
    + Copy
    + Eq
    + Hash
    + Debug
    + Default
    + Send
    + Sync
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + BitXor<Output = Self>
    + Not<Output = Self>
    + 'static
{
    /// Width of the word in bits.
    const BITS: u32;
    const ZERO: Self;
    const ONES: Self;

    /// The word with only bit `index` set. `index` must be `< BITS`.
    fn bit(index: u32) -> Self;

    /// The word with the lowest `n` bits set (`n` may equal `BITS`).
    fn low_mask(n: u32) -> Self;

    /// Logical left shift; zero when `n >= BITS`.
    fn shl(self, n: u32) -> Self;

    /// Logical right shift; zero when `n >= BITS`.
    fn shr(self, n: u32) -> Self;

    fn count_ones(self) -> u32;

    fn trailing_zeros(self) -> u32;

    /// `self & (self - 1)`: clears the lowest set bit.
    fn clear_lowest(self) -> Self;
}

macro_rules! impl_word {
    ($($t:ty),*) => {
        $(
            impl sealed::Sealed for $t {}

            impl Word for $t {
                const BITS: u32 = <$t>::BITS;
                const ZERO: Self = 0;
                const ONES: Self = <$t>::MAX;

                #[inline]
                fn bit(index: u32) -> Self {
                    1 << index
                }

                #[inline]
                fn low_mask(n: u32) -> Self {
                    if n >= <$t>::BITS {
                        <$t>::MAX
                    } else {
                        (1 << n) - 1
                    }
                }

                #[inline]
                fn shl(self, n: u32) -> Self {
                    self.checked_shl(n).unwrap_or(0)
                }

                #[inline]
                fn shr(self, n: u32) -> Self {
                    self.checked_shr(n).unwrap_or(0)
                }

                #[inline]
                fn count_ones(self) -> u32 {
                    <$t>::count_ones(self)
                }

                #[inline]
                fn trailing_zeros(self) -> u32 {
                    <$t>::trailing_zeros(self)
                }

                #[inline]
                fn clear_lowest(self) -> Self {
                    self & self.wrapping_sub(1)
                }
            }
        )*
    };
}

impl_word!(u8, u32, u64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifts_saturate_to_zero() {
        assert_eq!(Word::shl(0xFFu8, 8), 0);
        assert_eq!(Word::shr(0xFFu8, 9), 0);
        assert_eq!(Word::shl(1u64, 63), 1 << 63);
        assert_eq!(Word::shr(u32::MAX, 31), 1);
    }

    #[test]
    fn test_low_mask() {
        assert_eq!(<u8 as Word>::low_mask(0), 0);
        assert_eq!(<u8 as Word>::low_mask(3), 0b111);
        assert_eq!(<u8 as Word>::low_mask(8), 0xFF);
        assert_eq!(<u64 as Word>::low_mask(64), u64::MAX);
    }

    #[test]
    fn test_clear_lowest() {
        assert_eq!(Word::clear_lowest(0b1011_0000u8), 0b1010_0000);
        assert_eq!(Word::clear_lowest(0u32), 0);
    }
}
