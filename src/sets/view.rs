//! Read-only shifted views over a borrowed [`RangedSet`].

use crate::sets::ranged::RangedSet;
use crate::sets::word::Word;

/// A [`RangedSet`] seen with every member (and the domain itself) moved by
/// `delta`.
///
/// The view borrows the set, so the underlying blocks cannot change while it
/// exists. Nothing is copied until [`align_to`](Self::align_to) or
/// [`to_set`](Self::to_set) materialises a new set.
#[derive(Clone, Copy, Debug)]
pub struct ShiftedView<'a, W: Word = u64> {
    set: &'a RangedSet<W>,
    delta: i64,
}

impl<'a, W: Word> ShiftedView<'a, W> {
    pub(crate) fn new(set: &'a RangedSet<W>, delta: i64) -> Self {
        Self { set, delta }
    }

    #[inline]
    pub fn delta(&self) -> i64 {
        self.delta
    }

    #[inline]
    pub fn offset(&self) -> i64 {
        self.set.offset().saturating_add(self.delta)
    }

    #[inline]
    pub fn length(&self) -> usize {
        self.set.length()
    }

    #[inline]
    pub fn end(&self) -> i64 {
        self.set.end().saturating_add(self.delta)
    }

    /// Number of members.
    #[inline]
    pub fn len(&self) -> usize {
        self.set.count()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Membership in the shifted set; false outside the shifted domain.
    pub fn contains(&self, value: i64) -> bool {
        value
            .checked_sub(self.delta)
            .is_some_and(|source| self.set.contains(source).unwrap_or(false))
    }

    /// Shift the view further without touching the set.
    pub fn shifted(&self, delta: i64) -> ShiftedView<'a, W> {
        ShiftedView::new(self.set, self.delta.saturating_add(delta))
    }

    /// Ascending iterator over the shifted members.
    pub fn iter(&self) -> impl Iterator<Item = i64> + use<'a, W> {
        let delta = self.delta;
        self.set.iter().map(move |v| v + delta)
    }

    /// Materialise the shifted members onto `[new_offset, new_offset + new_length)`.
    pub fn align_to(&self, new_offset: i64, new_length: usize) -> RangedSet<W> {
        self.set
            .align_to(new_offset.saturating_sub(self.delta), new_length)
            .rebased(new_offset)
    }

    /// Materialise the view over its own shifted domain.
    pub fn to_set(&self) -> RangedSet<W> {
        self.set.clone().rebased(self.offset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_moves_members_and_domain() {
        let s = RangedSet::<u64>::from_values(0, 10, [0, 3, 9]).unwrap();
        let v = s.shifted(-3);
        assert_eq!(v.offset(), -3);
        assert_eq!(v.end(), 7);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![-3, 0, 6]);
        assert!(v.contains(0));
        assert!(!v.contains(3));
        assert!(!v.contains(100));
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_view_align_to() {
        let s = RangedSet::<u8>::from_values(0, 20, [1, 5, 15, 19]).unwrap();
        let aligned = s.shifted(-5).align_to(0, 20);
        assert_eq!(aligned.iter().collect::<Vec<_>>(), vec![0, 10, 14]);

        let aligned = s.shifted(7).align_to(0, 20);
        assert_eq!(aligned.iter().collect::<Vec<_>>(), vec![8, 12]);
    }

    #[test]
    fn test_view_to_set_and_chaining() {
        let s = RangedSet::<u64>::from_values(10, 70, [10, 75]).unwrap();
        let v = s.shifted(5).shifted(-15);
        assert_eq!(v.delta(), -10);
        let owned = v.to_set();
        assert_eq!(owned.offset(), 0);
        assert_eq!(owned.iter().collect::<Vec<_>>(), vec![0, 65]);
        // source untouched
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![10, 75]);
    }

    #[test]
    fn test_view_contains_at_extremes() {
        let s = RangedSet::<u64>::from_values(i64::MAX - 10, 10, [i64::MAX - 1]).unwrap();
        let v = s.shifted(-5);
        assert!(v.contains(i64::MAX - 6));
        assert!(!v.contains(i64::MIN));
        assert!(!s.shifted(i64::MIN).contains(i64::MAX));
    }
}
