//! Immutable fixed-width bitset blocks.
//!
//! A [`FixedBlock`] is a set of small integers `[0, W)` packed into a single
//! machine word. Blocks have pure value semantics: every operation returns a
//! new block and the receiver is never mutated. They are the packed unit that
//! [`RangedSet`](super::RangedSet) and [`GrowableSet`](super::GrowableSet)
//! are built from.

use crate::error::{Error, Result};
use crate::sets::word::Word;
use std::ops::{BitAnd, BitOr, BitXor, Not};

/// An immutable set of integers in `[0, W::BITS)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct FixedBlock<W: Word>(W);

/// A block over `[0, 8)`.
pub type Block8 = FixedBlock<u8>;
/// A block over `[0, 32)`.
pub type Block32 = FixedBlock<u32>;
/// A block over `[0, 64)`.
pub type Block64 = FixedBlock<u64>;

impl<W: Word> FixedBlock<W> {
    /// Number of representable indices.
    pub const WIDTH: usize = W::BITS as usize;

    /// The empty block.
    #[inline]
    pub fn new() -> Self {
        Self(W::ZERO)
    }

    /// The block containing every index in `[0, WIDTH)`.
    #[inline]
    pub fn full() -> Self {
        Self(W::ONES)
    }

    /// The block containing exactly `[0, n)`. `n` is clamped to `WIDTH`.
    #[inline]
    pub fn low(n: usize) -> Self {
        Self(W::low_mask(n.min(Self::WIDTH) as u32))
    }

    #[inline]
    pub fn from_bits(bits: W) -> Self {
        Self(bits)
    }

    /// Get the raw word
    #[inline]
    pub fn bits(&self) -> W {
        self.0
    }

    #[inline]
    fn guard(index: usize) -> Result<u32> {
        if index >= Self::WIDTH {
            return Err(Error::out_of_range(index as i64, 0, Self::WIDTH as i64));
        }
        Ok(index as u32)
    }

    pub fn contains(&self, index: usize) -> Result<bool> {
        let i = Self::guard(index)?;
        Ok(self.has(i))
    }

    pub fn add(&self, index: usize) -> Result<Self> {
        let i = Self::guard(index)?;
        Ok(self.with(i))
    }

    /// Add every index yielded by `indices`. Fails on the first index out of
    /// range without producing a partial block.
    pub fn add_all<I: IntoIterator<Item = usize>>(&self, indices: I) -> Result<Self> {
        let mut block = *self;
        for index in indices {
            block = block.add(index)?;
        }
        Ok(block)
    }

    pub fn remove(&self, index: usize) -> Result<Self> {
        let i = Self::guard(index)?;
        Ok(self.without(i))
    }

    #[inline]
    pub(crate) fn has(&self, i: u32) -> bool {
        self.0 & W::bit(i) != W::ZERO
    }

    #[inline]
    pub(crate) fn with(&self, i: u32) -> Self {
        Self(self.0 | W::bit(i))
    }

    #[inline]
    pub(crate) fn without(&self, i: u32) -> Self {
        Self(self.0 & !W::bit(i))
    }

    #[inline]
    pub fn clear(&self) -> Self {
        Self::new()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0 == W::ZERO
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.0 == W::ONES
    }

    /// Population count.
    #[inline]
    pub fn count(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn union(&self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub fn intersect(&self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Members of `self` that are not in `other`.
    #[inline]
    pub fn except(&self, other: Self) -> Self {
        Self(self.0 & !other.0)
    }

    /// Members of exactly one of the two blocks.
    #[inline]
    pub fn symmetric_except(&self, other: Self) -> Self {
        Self(self.0 ^ other.0)
    }

    #[inline]
    pub fn complement(&self) -> Self {
        Self(!self.0)
    }

    #[inline]
    pub fn is_subset_of(&self, other: Self) -> bool {
        self.0 & (self.0 ^ other.0) == W::ZERO
    }

    #[inline]
    pub fn is_superset_of(&self, other: Self) -> bool {
        other.0 & (self.0 ^ other.0) == W::ZERO
    }

    #[inline]
    pub fn is_proper_subset_of(&self, other: Self) -> bool {
        let dif = self.0 ^ other.0;
        self.0 & dif == W::ZERO && other.0 & dif != W::ZERO
    }

    #[inline]
    pub fn is_proper_superset_of(&self, other: Self) -> bool {
        let dif = self.0 ^ other.0;
        self.0 & dif != W::ZERO && other.0 & dif == W::ZERO
    }

    #[inline]
    pub fn overlaps(&self, other: Self) -> bool {
        self.0 & other.0 != W::ZERO
    }

    #[inline]
    pub fn set_equals(&self, other: Self) -> bool {
        self.0 == other.0
    }

    /// Shift every member by `k`: positive `k` moves members up, negative `k`
    /// moves them down. Members leaving `[0, WIDTH)` are dropped and vacated
    /// positions are empty.
    #[inline]
    pub fn shift(&self, k: i32) -> Self {
        let n = k.unsigned_abs();
        if k >= 0 {
            Self(self.0.shl(n))
        } else {
            Self(self.0.shr(n))
        }
    }

    /// Shift by `k` as if this block were directly preceded (`k > 0`) or
    /// followed (`k < 0`) by `adjacent`, so that the positions vacated by the
    /// shift are filled from `adjacent` instead of left empty.
    ///
    /// For `k >= 0` the result satisfies
    /// `result[i] == if i >= k { self[i - k] } else { adjacent[WIDTH - k + i] }`
    /// and symmetrically for `k < 0`. Once `|k| >= WIDTH` nothing of `self`
    /// survives and the result is `adjacent` shifted by the remainder.
    pub fn shift_with(&self, k: i32, adjacent: Self) -> Self {
        let width = Self::WIDTH as i32;
        if k == 0 {
            return *self;
        }
        if k >= width {
            return adjacent.shift(k - width);
        }
        if k <= -width {
            return adjacent.shift(k + width);
        }
        let carried = if k > 0 {
            adjacent.shift(k - width)
        } else {
            adjacent.shift(k + width)
        };
        self.shift(k).union(carried)
    }

    /// Ascending iterator over the members.
    #[inline]
    pub fn iter(&self) -> BlockIter<W> {
        BlockIter { word: self.0 }
    }
}

/// Ascending bit-scan over the members of a block.
#[derive(Clone, Copy, Debug)]
pub struct BlockIter<W: Word> {
    word: W,
}

impl<W: Word> Iterator for BlockIter<W> {
    type Item = usize;

    #[inline]
    fn next(&mut self) -> Option<usize> {
        if self.word == W::ZERO {
            return None;
        }
        let bit_pos = self.word.trailing_zeros() as usize;
        self.word = self.word.clear_lowest(); // clear lowest set bit
        Some(bit_pos)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.word.count_ones() as usize;
        (n, Some(n))
    }
}

impl<W: Word> ExactSizeIterator for BlockIter<W> {}

impl<W: Word> IntoIterator for FixedBlock<W> {
    type Item = usize;
    type IntoIter = BlockIter<W>;

    fn into_iter(self) -> BlockIter<W> {
        self.iter()
    }
}

impl<W: Word> IntoIterator for &FixedBlock<W> {
    type Item = usize;
    type IntoIter = BlockIter<W>;

    fn into_iter(self) -> BlockIter<W> {
        self.iter()
    }
}

impl<W: Word> BitAnd for FixedBlock<W> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersect(rhs)
    }
}

impl<W: Word> BitOr for FixedBlock<W> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl<W: Word> BitXor for FixedBlock<W> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.symmetric_except(rhs)
    }
}

impl<W: Word> Not for FixedBlock<W> {
    type Output = Self;

    fn not(self) -> Self {
        self.complement()
    }
}

impl<W: Word> From<W> for FixedBlock<W> {
    fn from(bits: W) -> Self {
        Self(bits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block8(indices: &[usize]) -> Block8 {
        Block8::new().add_all(indices.iter().copied()).unwrap()
    }

    #[test]
    fn test_add_contains_remove() {
        let b = Block64::new().add(3).unwrap().add(63).unwrap();
        assert!(b.contains(3).unwrap());
        assert!(b.contains(63).unwrap());
        assert!(!b.contains(4).unwrap());
        assert_eq!(b.count(), 2);

        let b = b.remove(3).unwrap();
        assert!(!b.contains(3).unwrap());
        assert_eq!(b.count(), 1);
    }

    #[test]
    fn test_guard_rejects_out_of_range() {
        assert!(matches!(
            Block8::new().add(8),
            Err(Error::IndexOutOfRange { value: 8, start: 0, end: 8 })
        ));
        assert!(Block32::new().contains(32).is_err());
        assert!(Block64::full().remove(64).is_err());
        // add_all stops at the first bad index
        assert!(Block8::new().add_all([1, 2, 9]).is_err());
    }

    #[test]
    fn test_algebra() {
        let a = block8(&[0, 1, 2, 5]);
        let b = block8(&[1, 5, 7]);
        assert_eq!(a.union(b), block8(&[0, 1, 2, 5, 7]));
        assert_eq!(a.intersect(b), block8(&[1, 5]));
        assert_eq!(a.except(b), block8(&[0, 2]));
        assert_eq!(a.symmetric_except(b), block8(&[0, 2, 7]));
        assert_eq!(a.complement(), block8(&[3, 4, 6, 7]));
        assert_eq!(!a, a.complement());
        assert_eq!(a & b, a.intersect(b));
        assert_eq!(a | b, a.union(b));
        assert_eq!(a ^ b, a.symmetric_except(b));
    }

    #[test]
    fn test_relations() {
        let small = block8(&[1, 5]);
        let big = block8(&[1, 2, 5]);
        let other = block8(&[6]);

        assert!(small.is_subset_of(big));
        assert!(small.is_subset_of(small));
        assert!(small.is_proper_subset_of(big));
        assert!(!small.is_proper_subset_of(small));
        assert!(!big.is_subset_of(small));

        assert!(big.is_superset_of(small));
        assert!(big.is_superset_of(big));
        assert!(big.is_proper_superset_of(small));
        assert!(!big.is_proper_superset_of(big));
        assert!(!small.is_superset_of(big));

        assert!(small.overlaps(big));
        assert!(!small.overlaps(other));
        assert!(small.set_equals(block8(&[5, 1])));
        assert!(Block8::new().is_subset_of(other));
    }

    #[test]
    fn test_enumeration_ascending_and_restartable() {
        let b = Block64::new().add_all([60, 2, 33, 0]).unwrap();
        let first: Vec<usize> = b.iter().collect();
        let second: Vec<usize> = b.into_iter().collect();
        assert_eq!(first, vec![0, 2, 33, 60]);
        assert_eq!(first, second);
        assert_eq!(b.iter().len(), 4);
    }

    #[test]
    fn test_plain_shift() {
        let b = block8(&[0, 3, 7]);
        assert_eq!(b.shift(1), block8(&[1, 4]));
        assert_eq!(b.shift(-3), block8(&[0, 4]));
        assert_eq!(b.shift(8), Block8::new());
        assert_eq!(b.shift(-8), Block8::new());
        assert_eq!(b.shift(0), b);
    }

    #[test]
    fn test_shift_with_adjacent() {
        // Preceding block supplies the low positions on an upward shift.
        let b = block8(&[0]);
        let prev = block8(&[6, 7]);
        assert_eq!(b.shift_with(2, prev), block8(&[0, 1, 2]));

        // Following block supplies the high positions on a downward shift.
        let next = block8(&[0, 1]);
        assert_eq!(block8(&[7]).shift_with(-2, next), block8(&[5, 6, 7]));

        // A full-width shift hands over the adjacent block unchanged.
        assert_eq!(b.shift_with(8, prev), prev);
        assert_eq!(b.shift_with(-8, next), next);
        assert_eq!(b.shift_with(10, prev), prev.shift(2));
    }

    fn check_shift_law<W: Word>(blocks: &[FixedBlock<W>]) {
        let width = FixedBlock::<W>::WIDTH as i32;
        for &block in blocks {
            for &adjacent in blocks {
                for k in -width..=width {
                    let shifted = block.shift_with(k, adjacent);
                    for i in 0..width {
                        let src = i - k;
                        let expected = if (0..width).contains(&src) {
                            block.has(src as u32)
                        } else if k >= 0 {
                            adjacent.has((width - k + i) as u32)
                        } else {
                            adjacent.has((src - width) as u32)
                        };
                        assert_eq!(
                            shifted.has(i as u32),
                            expected,
                            "k={} i={} block={:?} adjacent={:?}",
                            k,
                            i,
                            block,
                            adjacent
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_shift_law_exhaustive_8() {
        let samples: Vec<Block8> = [0x00u8, 0xFF, 0x81, 0x5A, 0x01, 0x80, 0x3C]
            .into_iter()
            .map(Block8::from_bits)
            .collect();
        check_shift_law(&samples);
    }

    #[test]
    fn test_shift_law_exhaustive_64() {
        let samples: Vec<Block64> = [
            0u64,
            u64::MAX,
            1,
            1 << 63,
            0xDEAD_BEEF_0123_4567,
            0x8000_0000_0000_0001,
        ]
        .into_iter()
        .map(Block64::from_bits)
        .collect();
        check_shift_law(&samples);
    }

    #[test]
    fn test_low_and_full() {
        assert_eq!(Block8::low(3), block8(&[0, 1, 2]));
        assert_eq!(Block8::low(20), Block8::full());
        assert!(Block32::full().is_full());
        assert_eq!(Block32::full().count(), 32);
    }
}
