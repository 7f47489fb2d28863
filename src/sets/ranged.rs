//! Sets of integers over an arbitrary interval `[offset, offset + length)`.
//!
//! A [`RangedSet`] stores its members as an ordered array of
//! [`FixedBlock`]s. Block `i` holds the values
//! `[offset + i * W, offset + (i + 1) * W)`, so two sets with the same offset
//! and length ("range-compatible" sets) can be combined block by block.
//! Sets over different ranges are first brought onto a common range with
//! [`RangedSet::align_to`], which shifts bits across block boundaries.

use crate::error::{Error, Result};
use crate::sets::block::{BlockIter, FixedBlock};
use crate::sets::view::ShiftedView;
use crate::sets::word::Word;
use std::fmt;

/// A mutable set of integers over `[offset, offset + length)`.
///
/// Invariants:
/// - `blocks.len() == ceil(length / W)`
/// - no bit at or beyond `length` is ever set in the final block
/// - `count` equals the population count of all blocks
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RangedSet<W: Word = u64> {
    offset: i64,
    length: usize,
    blocks: Vec<FixedBlock<W>>,
    count: usize,
}

impl<W: Word> fmt::Debug for RangedSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangedSet")
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("count", &self.count)
            .finish()
    }
}

impl<W: Word> RangedSet<W> {
    const WIDTH: usize = FixedBlock::<W>::WIDTH;

    /// Create an empty set over `[offset, offset + length)`.
    ///
    /// The domain is clamped so that it ends at or before `i64::MAX`.
    pub fn new(offset: i64, length: usize) -> Self {
        let room = usize::try_from(i64::MAX.abs_diff(offset)).unwrap_or(usize::MAX);
        let length = length.min(room);
        Self {
            offset,
            length,
            blocks: vec![FixedBlock::new(); length.div_ceil(Self::WIDTH)],
            count: 0,
        }
    }

    /// Create a set over `[offset, offset + length)` holding `values`.
    pub fn from_values<I: IntoIterator<Item = i64>>(
        offset: i64,
        length: usize,
        values: I,
    ) -> Result<Self> {
        let mut set = Self::new(offset, length);
        set.insert_all(values)?;
        Ok(set)
    }

    /// First representable value.
    #[inline]
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Size of the domain (not the number of members).
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// One past the last representable value.
    #[inline]
    pub fn end(&self) -> i64 {
        // `new` keeps the sum within i64
        self.offset.wrapping_add_unsigned(self.length as u64)
    }

    /// Number of members.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline]
    pub fn blocks(&self) -> &[FixedBlock<W>] {
        &self.blocks
    }

    /// True when `value` lies inside the domain.
    #[inline]
    pub fn in_range(&self, value: i64) -> bool {
        value >= self.offset && value < self.end()
    }

    /// Map a domain value to `(block index, bit index)`.
    #[inline]
    fn locate(&self, value: i64) -> Result<(usize, u32)> {
        if !self.in_range(value) {
            return Err(Error::out_of_range(value, self.offset, self.end()));
        }
        let i = value.abs_diff(self.offset) as usize;
        Ok((i / Self::WIDTH, (i % Self::WIDTH) as u32))
    }

    pub fn contains(&self, value: i64) -> Result<bool> {
        let (block, bit) = self.locate(value)?;
        Ok(self.blocks[block].has(bit))
    }

    /// Insert `value`, returning true if it was not already a member.
    pub fn insert(&mut self, value: i64) -> Result<bool> {
        let (block, bit) = self.locate(value)?;
        if self.blocks[block].has(bit) {
            return Ok(false);
        }
        self.blocks[block] = self.blocks[block].with(bit);
        self.count += 1;
        Ok(true)
    }

    /// Insert every value, returning true if any of them was new.
    ///
    /// All values are checked against the domain first; if any is out of
    /// range nothing is inserted.
    pub fn insert_all<I: IntoIterator<Item = i64>>(&mut self, values: I) -> Result<bool> {
        let values: Vec<i64> = values.into_iter().collect();
        if let Some(&bad) = values.iter().find(|&&v| !self.in_range(v)) {
            return Err(Error::out_of_range(bad, self.offset, self.end()));
        }
        let mut added = false;
        for value in values {
            added |= self.insert(value)?;
        }
        Ok(added)
    }

    /// Remove `value`, returning true if it was a member.
    pub fn remove(&mut self, value: i64) -> Result<bool> {
        let (block, bit) = self.locate(value)?;
        if !self.blocks[block].has(bit) {
            return Ok(false);
        }
        self.blocks[block] = self.blocks[block].without(bit);
        self.count -= 1;
        Ok(true)
    }

    pub fn clear(&mut self) {
        self.blocks.fill(FixedBlock::new());
        self.count = 0;
    }

    /// Same offset and same length.
    #[inline]
    pub fn is_compatible(&self, other: &Self) -> bool {
        self.offset == other.offset && self.length == other.length
    }

    fn guard(&self, other: &Self) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(Error::RangeMismatch {
                left: (self.offset, self.length),
                right: (other.offset, other.length),
            })
        }
    }

    /// Clear any bits past `length` in the final block and recompute `count`.
    fn normalize(&mut self) {
        let rem = self.length % Self::WIDTH;
        if rem != 0 {
            if let Some(last) = self.blocks.last_mut() {
                *last = last.intersect(FixedBlock::low(rem));
            }
        }
        self.count = self.blocks.iter().map(FixedBlock::count).sum();
    }

    /// Block-wise combine; callers have already checked compatibility.
    fn zip_blocks<F>(&mut self, other: &Self, op: F)
    where
        F: Fn(FixedBlock<W>, FixedBlock<W>) -> FixedBlock<W>,
    {
        let mut count = 0;
        for (a, &b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a = op(*a, b);
            count += a.count();
        }
        self.count = count;
    }

    fn combine_with<F>(&mut self, other: &Self, op: F) -> Result<()>
    where
        F: Fn(FixedBlock<W>, FixedBlock<W>) -> FixedBlock<W>,
    {
        self.guard(other)?;
        self.zip_blocks(other, op);
        Ok(())
    }

    /// Keep only members also present in `view`, realigned onto this range.
    pub(crate) fn retain_in(&mut self, view: &ShiftedView<'_, W>) {
        let aligned = view.align_to(self.offset, self.length);
        self.zip_blocks(&aligned, |a, b| a.intersect(b));
    }

    /// Set the bit for `offset + index`. `index` must be below `length`.
    pub(crate) fn insert_index(&mut self, index: usize) {
        let (block, bit) = (index / Self::WIDTH, (index % Self::WIDTH) as u32);
        if !self.blocks[block].has(bit) {
            self.blocks[block] = self.blocks[block].with(bit);
            self.count += 1;
        }
    }

    /// In-place union with a range-compatible set.
    pub fn union_with(&mut self, other: &Self) -> Result<()> {
        self.combine_with(other, |a, b| a.union(b))
    }

    /// In-place intersection with a range-compatible set.
    pub fn intersect_with(&mut self, other: &Self) -> Result<()> {
        self.combine_with(other, |a, b| a.intersect(b))
    }

    /// In-place symmetric difference with a range-compatible set.
    pub fn symmetric_except_with(&mut self, other: &Self) -> Result<()> {
        self.combine_with(other, |a, b| a.symmetric_except(b))
    }

    /// Remove every member of `other` from `self`.
    ///
    /// Unlike the other in-place operations this accepts a set over any
    /// range: `other` is realigned onto this set's range first, so values of
    /// `self` outside `other`'s domain are left untouched.
    pub fn except_with(&mut self, other: &Self) -> Result<()> {
        if self.is_compatible(other) {
            return self.combine_with(other, |a, b| a.except(b));
        }
        let aligned = other.align_to(self.offset, self.length);
        self.combine_with(&aligned, |a, b| a.except(b))
    }

    pub fn union(&self, other: &Self) -> Result<Self> {
        let mut result = self.clone();
        result.union_with(other)?;
        Ok(result)
    }

    pub fn intersect(&self, other: &Self) -> Result<Self> {
        let mut result = self.clone();
        result.intersect_with(other)?;
        Ok(result)
    }

    pub fn except(&self, other: &Self) -> Result<Self> {
        let mut result = self.clone();
        result.except_with(other)?;
        Ok(result)
    }

    pub fn symmetric_except(&self, other: &Self) -> Result<Self> {
        let mut result = self.clone();
        result.symmetric_except_with(other)?;
        Ok(result)
    }

    /// Complement every block in place, restricted to the domain.
    pub fn flip(&mut self) {
        for block in &mut self.blocks {
            *block = block.complement();
        }
        self.normalize();
    }

    /// The domain minus this set.
    pub fn complement(&self) -> Self {
        let mut result = self.clone();
        result.flip();
        result
    }

    fn all_blocks<F>(&self, other: &Self, pred: F) -> Result<bool>
    where
        F: Fn(FixedBlock<W>, FixedBlock<W>) -> bool,
    {
        self.guard(other)?;
        Ok(self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .all(|(&a, &b)| pred(a, b)))
    }

    pub fn is_subset_of(&self, other: &Self) -> Result<bool> {
        self.all_blocks(other, |a, b| a.is_subset_of(b))
    }

    pub fn is_superset_of(&self, other: &Self) -> Result<bool> {
        self.all_blocks(other, |a, b| a.is_superset_of(b))
    }

    pub fn is_proper_subset_of(&self, other: &Self) -> Result<bool> {
        Ok(self.is_subset_of(other)? && self.count < other.count)
    }

    pub fn is_proper_superset_of(&self, other: &Self) -> Result<bool> {
        Ok(self.is_superset_of(other)? && self.count > other.count)
    }

    pub fn overlaps(&self, other: &Self) -> Result<bool> {
        self.guard(other)?;
        Ok(self
            .blocks
            .iter()
            .zip(other.blocks.iter())
            .any(|(a, &b)| a.overlaps(b)))
    }

    pub fn set_equals(&self, other: &Self) -> Result<bool> {
        self.all_blocks(other, |a, b| a.set_equals(b))
    }

    /// Copy this set onto the range `[new_offset, new_offset + new_length)`.
    ///
    /// Every value in the overlap of the two domains keeps its membership;
    /// members outside the new domain are dropped and positions the old
    /// domain did not cover start out absent. When the ranges do not overlap
    /// at all the result is an empty set over the new range.
    pub fn align_to(&self, new_offset: i64, new_length: usize) -> Self {
        let mut result = Self::new(new_offset, new_length);
        if self.count == 0 || result.end() <= self.offset || new_offset >= self.end() {
            return result;
        }

        let width = Self::WIDTH as i64;
        // Source-relative position of bit 0 of destination block 0.
        let start = new_offset - self.offset;
        let source = |index: i64| -> FixedBlock<W> {
            if index < 0 {
                return FixedBlock::new();
            }
            self.blocks
                .get(index as usize)
                .copied()
                .unwrap_or_default()
        };

        for (i, block) in result.blocks.iter_mut().enumerate() {
            let base = start + i as i64 * width;
            let src = base.div_euclid(width);
            let displacement = base.rem_euclid(width) as i32;
            *block = if displacement == 0 {
                source(src)
            } else {
                // Low bits come from `src`, high bits carry in from `src + 1`.
                source(src).shift_with(-displacement, source(src + 1))
            };
        }

        result.normalize();
        result
    }

    /// A read-only view of this set with every member moved by `delta`.
    pub fn shifted(&self, delta: i64) -> ShiftedView<'_, W> {
        ShiftedView::new(self, delta)
    }

    /// Rebase the domain without touching the blocks.
    pub(crate) fn rebased(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Ascending iterator over the members.
    pub fn iter(&self) -> Iter<'_, W> {
        Iter {
            blocks: &self.blocks,
            next_block: 0,
            base: self.offset,
            current: None,
        }
    }
}

/// Ascending iterator over a [`RangedSet`].
#[derive(Clone)]
pub struct Iter<'a, W: Word> {
    blocks: &'a [FixedBlock<W>],
    next_block: usize,
    base: i64,
    current: Option<(i64, BlockIter<W>)>,
}

impl<W: Word> Iterator for Iter<'_, W> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            if let Some((start, bits)) = &mut self.current {
                if let Some(bit) = bits.next() {
                    return Some(*start + bit as i64);
                }
            }
            let block = self.blocks.get(self.next_block)?;
            let start = self.base + (self.next_block * FixedBlock::<W>::WIDTH) as i64;
            self.next_block += 1;
            if !block.is_empty() {
                self.current = Some((start, block.iter()));
            }
        }
    }
}

impl<'a, W: Word> IntoIterator for &'a RangedSet<W> {
    type Item = i64;
    type IntoIter = Iter<'a, W>;

    fn into_iter(self) -> Iter<'a, W> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(offset: i64, length: usize, values: &[i64]) -> RangedSet {
        RangedSet::from_values(offset, length, values.iter().copied()).unwrap()
    }

    #[test]
    fn test_contains_items() {
        let s = set(0, 256, &[3, 112, 160, 193, 204]);
        for i in 0..256 {
            let expected = matches!(i, 3 | 112 | 160 | 193 | 204);
            assert_eq!(s.contains(i).unwrap(), expected, "value {}", i);
        }
        assert_eq!(s.count(), 5);
    }

    #[test]
    fn test_enumerate_items() {
        let s = set(0, 256, &[250, 3, 4]);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![3, 4, 250]);
        // restartable
        assert_eq!(s.iter().count(), 3);
    }

    #[test]
    fn test_negative_offset() {
        let s = set(-112, 5, &[-112, -110]);
        for i in -112..-107 {
            assert_eq!(s.contains(i).unwrap(), i == -112 || i == -110);
        }
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![-112, -110]);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut s = set(10, 20, &[10]);
        assert!(matches!(
            s.insert(30),
            Err(Error::IndexOutOfRange { value: 30, start: 10, end: 30 })
        ));
        assert!(s.contains(9).is_err());
        assert!(s.remove(-1).is_err());
        // nothing inserted when one value is bad
        assert!(s.insert_all([11, 12, 99]).is_err());
        assert_eq!(s.count(), 1);
    }

    #[test]
    fn test_insert_remove_count() {
        let mut s = RangedSet::<u8>::new(0, 20);
        assert!(s.insert(5).unwrap());
        assert!(!s.insert(5).unwrap());
        assert!(s.insert(19).unwrap());
        assert_eq!(s.count(), 2);
        assert!(s.remove(5).unwrap());
        assert!(!s.remove(5).unwrap());
        assert_eq!(s.count(), 1);
        s.clear();
        assert!(s.is_empty());
    }

    #[test]
    fn test_block_count_matches_length() {
        assert_eq!(RangedSet::<u64>::new(0, 0).blocks().len(), 0);
        assert_eq!(RangedSet::<u64>::new(0, 64).blocks().len(), 1);
        assert_eq!(RangedSet::<u64>::new(0, 65).blocks().len(), 2);
        assert_eq!(RangedSet::<u8>::new(7, 17).blocks().len(), 3);
    }

    #[test]
    fn test_flip_stays_inside_domain() {
        let mut s = set(3, 70, &[3, 50]);
        s.flip();
        assert_eq!(s.count(), 68);
        assert!(!s.contains(3).unwrap());
        assert!(s.contains(72).unwrap());
        assert_eq!(s.iter().last(), Some(72));
    }

    #[test]
    fn test_block_wise_algebra() {
        let a = set(5, 100, &[12, 40, 90]);
        let b = set(5, 100, &[40, 101]);
        assert_eq!(a.union(&b).unwrap().iter().collect::<Vec<_>>(), vec![12, 40, 90, 101]);
        assert_eq!(a.intersect(&b).unwrap().iter().collect::<Vec<_>>(), vec![40]);
        assert_eq!(a.except(&b).unwrap().iter().collect::<Vec<_>>(), vec![12, 90]);
        assert_eq!(
            a.symmetric_except(&b).unwrap().iter().collect::<Vec<_>>(),
            vec![12, 90, 101]
        );
        assert!(a.overlaps(&b).unwrap());
        assert!(set(5, 100, &[40]).is_proper_subset_of(&a).unwrap());
        assert!(a.is_superset_of(&a).unwrap());
        assert!(!a.is_proper_superset_of(&a).unwrap());
        assert!(a.set_equals(&a.clone()).unwrap());
    }

    #[test]
    fn test_range_mismatch() {
        let mut a = set(0, 64, &[1]);
        let b = set(1, 64, &[1]);
        assert!(matches!(a.union_with(&b), Err(Error::RangeMismatch { .. })));
        assert!(a.intersect(&b).is_err());
        assert!(a.is_subset_of(&b).is_err());
        assert!(a.overlaps(&set(0, 65, &[])).is_err());
        // failed operation left the receiver untouched
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_except_same_range() {
        let mut a = set(5, 100, &[12, 90, 101]);
        a.except_with(&set(5, 100, &[90])).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![12, 101]);
    }

    #[test]
    fn test_except_different_range() {
        let mut a = set(5, 100, &[12, 90, 101]);
        a.except_with(&set(80, 20, &[90])).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![12, 101]);
        assert_eq!(a.count(), 2);

        let mut a = set(5, 100, &[12, 90, 101]);
        a.except_with(&set(30, 200, &[90, 101, 153, 229])).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![12]);

        let mut a = set(5, 100, &[12, 90, 101]);
        a.except_with(&set(-64, 200, &[12])).unwrap();
        assert_eq!(a.iter().collect::<Vec<_>>(), vec![90, 101]);
    }

    #[test]
    fn test_align_full_range_into_window() {
        for offset in -100..=100i64 {
            let mut s = RangedSet::<u64>::new(offset, 128);
            s.flip();
            let aligned = s.align_to(0, 64);

            let lo = offset.max(0);
            let hi = (offset + 128).min(64);
            let expected: Vec<i64> = (lo..hi.max(lo)).collect();
            assert_eq!(aligned.iter().collect::<Vec<_>>(), expected, "offset {}", offset);
            assert_eq!(aligned.count(), expected.len());
        }
    }

    #[test]
    fn test_align_preserves_members_in_overlap() {
        let s = RangedSet::<u8>::from_values(-13, 40, [-13, -6, 0, 7, 8, 9, 26]).unwrap();
        for new_offset in -30..30 {
            for new_length in [0usize, 1, 7, 8, 9, 31, 64] {
                let aligned = s.align_to(new_offset, new_length);
                assert_eq!(aligned.offset(), new_offset);
                assert_eq!(aligned.length(), new_length);
                let expected: Vec<i64> = s.iter().filter(|&v| aligned.in_range(v)).collect();
                assert_eq!(aligned.iter().collect::<Vec<_>>(), expected);
                assert_eq!(aligned.count(), expected.len());
            }
        }
    }

    #[test]
    fn test_align_without_overlap_is_empty() {
        let s = set(0, 10, &[1, 2, 3]);
        let aligned = s.align_to(100, 50);
        assert!(aligned.is_empty());
        assert_eq!(aligned.offset(), 100);
        assert_eq!(aligned.length(), 50);
    }

    #[test]
    fn test_domain_near_i64_max_is_clamped() {
        let mut s = RangedSet::<u64>::new(i64::MAX - 10, 100);
        assert_eq!(s.length(), 10);
        assert_eq!(s.end(), i64::MAX);
        assert!(!s.contains(i64::MAX - 5).unwrap());
        assert!(s.insert(i64::MAX - 1).unwrap());
        assert!(matches!(
            s.insert(i64::MAX),
            Err(Error::IndexOutOfRange { value: i64::MAX, .. })
        ));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![i64::MAX - 1]);
    }

    #[test]
    fn test_domain_at_i64_min() {
        let mut s = RangedSet::<u64>::new(i64::MIN, 70);
        assert!(s.insert(i64::MIN + 65).unwrap());
        assert_eq!(s.end(), i64::MIN + 70);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![i64::MIN + 65]);
    }
}
