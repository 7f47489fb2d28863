//! Unbounded non-negative integer sets.

use crate::sets::block::{BlockIter, FixedBlock};
use crate::sets::word::Word;
use std::fmt;

/// A set over `[0, ∞)` whose block array grows on demand.
///
/// Blocks past the end of the array are implicitly empty, so two sets with
/// the same members compare equal regardless of how far either has grown.
#[derive(Clone, Default)]
pub struct GrowableSet<W: Word = u64> {
    blocks: Vec<FixedBlock<W>>,
    count: usize,
}

impl<W: Word> GrowableSet<W> {
    const WIDTH: usize = FixedBlock::<W>::WIDTH;

    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            count: 0,
        }
    }

    /// Preallocate enough blocks to hold values below `capacity`.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            blocks: vec![FixedBlock::new(); capacity.div_ceil(Self::WIDTH)],
            count: 0,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Values below this bound can be stored without growing.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.blocks.len() * Self::WIDTH
    }

    #[inline]
    pub fn blocks(&self) -> &[FixedBlock<W>] {
        &self.blocks
    }

    #[inline]
    fn locate(value: usize) -> (usize, u32) {
        (value / Self::WIDTH, (value % Self::WIDTH) as u32)
    }

    fn grow_to(&mut self, blocks: usize) {
        if self.blocks.len() < blocks {
            self.blocks.resize(blocks, FixedBlock::new());
        }
    }

    pub fn contains(&self, value: usize) -> bool {
        let (block, bit) = Self::locate(value);
        self.blocks.get(block).is_some_and(|b| b.has(bit))
    }

    /// Insert `value`, growing the block array if needed.
    pub fn insert(&mut self, value: usize) -> bool {
        let (block, bit) = Self::locate(value);
        self.grow_to(block + 1);
        if self.blocks[block].has(bit) {
            return false;
        }
        self.blocks[block] = self.blocks[block].with(bit);
        self.count += 1;
        true
    }

    pub fn remove(&mut self, value: usize) -> bool {
        let (block, bit) = Self::locate(value);
        match self.blocks.get_mut(block) {
            Some(b) if b.has(bit) => {
                *b = b.without(bit);
                self.count -= 1;
                true
            }
            _ => false,
        }
    }

    pub fn insert_all<I: IntoIterator<Item = usize>>(&mut self, values: I) -> bool {
        let mut added = false;
        for value in values {
            added |= self.insert(value);
        }
        added
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.count = 0;
    }

    fn recount(&mut self) {
        self.count = self.blocks.iter().map(FixedBlock::count).sum();
    }

    #[inline]
    fn block_at(&self, index: usize) -> FixedBlock<W> {
        self.blocks.get(index).copied().unwrap_or_default()
    }

    pub fn union_with(&mut self, other: &Self) {
        self.grow_to(other.blocks.len());
        for (a, &b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a = a.union(b);
        }
        self.recount();
    }

    pub fn intersect_with(&mut self, other: &Self) {
        self.blocks.truncate(other.blocks.len());
        for (a, &b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a = a.intersect(b);
        }
        self.recount();
    }

    pub fn except_with(&mut self, other: &Self) {
        for (a, &b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a = a.except(b);
        }
        self.recount();
    }

    pub fn symmetric_except_with(&mut self, other: &Self) {
        self.grow_to(other.blocks.len());
        for (a, &b) in self.blocks.iter_mut().zip(other.blocks.iter()) {
            *a = a.symmetric_except(b);
        }
        self.recount();
    }

    pub fn union(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.union_with(other);
        result
    }

    pub fn intersect(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.intersect_with(other);
        result
    }

    pub fn except(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.except_with(other);
        result
    }

    pub fn symmetric_except(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.symmetric_except_with(other);
        result
    }

    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.blocks
            .iter()
            .enumerate()
            .all(|(i, a)| a.is_subset_of(other.block_at(i)))
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    pub fn is_proper_subset_of(&self, other: &Self) -> bool {
        self.count < other.count && self.is_subset_of(other)
    }

    pub fn is_proper_superset_of(&self, other: &Self) -> bool {
        other.is_proper_subset_of(self)
    }

    pub fn overlaps(&self, other: &Self) -> bool {
        self.blocks
            .iter()
            .zip(other.blocks.iter())
            .any(|(a, &b)| a.overlaps(b))
    }

    pub fn set_equals(&self, other: &Self) -> bool {
        self.count == other.count && self.is_subset_of(other)
    }

    /// Drop trailing empty blocks.
    pub fn shrink_to_fit(&mut self) {
        while self.blocks.last().is_some_and(FixedBlock::is_empty) {
            self.blocks.pop();
        }
        self.blocks.shrink_to_fit();
    }

    pub fn iter(&self) -> Iter<'_, W> {
        Iter {
            blocks: self.blocks.iter().enumerate(),
            current: None,
        }
    }
}

impl<W: Word> PartialEq for GrowableSet<W> {
    fn eq(&self, other: &Self) -> bool {
        self.set_equals(other)
    }
}

impl<W: Word> Eq for GrowableSet<W> {}

impl<W: Word> fmt::Debug for GrowableSet<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<W: Word> FromIterator<usize> for GrowableSet<W> {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}

impl<W: Word> Extend<usize> for GrowableSet<W> {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

/// Ascending iterator over a [`GrowableSet`].
pub struct Iter<'a, W: Word> {
    blocks: std::iter::Enumerate<std::slice::Iter<'a, FixedBlock<W>>>,
    current: Option<(usize, BlockIter<W>)>,
}

impl<W: Word> Iterator for Iter<'_, W> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        loop {
            if let Some((base, bits)) = &mut self.current {
                if let Some(bit) = bits.next() {
                    return Some(*base + bit);
                }
            }
            let (index, block) = self.blocks.next()?;
            self.current = Some((index * FixedBlock::<W>::WIDTH, block.iter()));
        }
    }
}

impl<'a, W: Word> IntoIterator for &'a GrowableSet<W> {
    type Item = usize;
    type IntoIter = Iter<'a, W>;

    fn into_iter(self) -> Iter<'a, W> {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grows_on_insert() {
        let mut s = GrowableSet::<u8>::new();
        assert_eq!(s.capacity(), 0);
        assert!(s.insert(20));
        assert_eq!(s.capacity(), 24);
        assert!(!s.insert(20));
        assert!(s.contains(20));
        assert!(!s.contains(1_000_000));
        assert_eq!(s.len(), 1);
    }

    #[test]
    fn test_remove_beyond_end() {
        let mut s: GrowableSet = [1, 2, 3].into_iter().collect();
        assert!(!s.remove(500));
        assert!(s.remove(2));
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn test_algebra_with_different_lengths() {
        let short: GrowableSet = [1, 5, 60].into_iter().collect();
        let long: GrowableSet = [5, 60, 200, 900].into_iter().collect();

        assert_eq!(short.union(&long).iter().collect::<Vec<_>>(), vec![1, 5, 60, 200, 900]);
        assert_eq!(long.intersect(&short).iter().collect::<Vec<_>>(), vec![5, 60]);
        assert_eq!(long.except(&short).iter().collect::<Vec<_>>(), vec![200, 900]);
        assert_eq!(short.except(&long).iter().collect::<Vec<_>>(), vec![1]);
        assert_eq!(
            short.symmetric_except(&long).iter().collect::<Vec<_>>(),
            vec![1, 200, 900]
        );
    }

    #[test]
    fn test_relations_ignore_trailing_blocks() {
        let mut a: GrowableSet = [3, 4].into_iter().collect();
        let b: GrowableSet = [3, 4].into_iter().collect();
        a.insert(10_000);
        a.remove(10_000);
        assert_eq!(a, b);
        assert!(a.is_subset_of(&b));
        assert!(b.is_superset_of(&a));
        assert!(!a.is_proper_subset_of(&b));

        let c: GrowableSet = [3, 4, 700].into_iter().collect();
        assert!(a.is_proper_subset_of(&c));
        assert!(c.is_proper_superset_of(&a));
        assert!(a.overlaps(&c));

        a.shrink_to_fit();
        assert_eq!(a.capacity(), 64);
    }

    #[test]
    fn test_count_matches_enumeration() {
        let mut s = GrowableSet::<u32>::with_capacity(100);
        s.extend([0, 31, 32, 99, 150]);
        s.except_with(&[31, 150].into_iter().collect());
        assert_eq!(s.len(), s.iter().count());
        assert_eq!(format!("{:?}", s), "{0, 32, 99}");
    }
}
