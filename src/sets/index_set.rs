//! Sets over an index domain `[0, max)` with O(1) empty and full cases.

use crate::error::{Error, Result};
use crate::sets::ranged::RangedSet;
use crate::sets::word::Word;

/// A subset of `[0, max)`.
///
/// `Empty` and `Full` carry no storage. Every operation normalises its
/// result, so a `Partial` always holds strictly between 0 and `max` members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexSet<W: Word = u64> {
    Empty { max: usize },
    Full { max: usize },
    Partial(RangedSet<W>),
}

impl<W: Word> IndexSet<W> {
    pub fn empty(max: usize) -> Self {
        IndexSet::Empty { max }
    }

    pub fn full(max: usize) -> Self {
        IndexSet::Full { max }
    }

    pub fn from_indices<I: IntoIterator<Item = usize>>(max: usize, indices: I) -> Result<Self> {
        let set = RangedSet::from_values(0, max, indices.into_iter().map(|i| i as i64))?;
        Ok(Self::normalized(set))
    }

    /// Collapse a ranged set over `[0, max)` into the cheapest variant.
    fn normalized(set: RangedSet<W>) -> Self {
        let max = set.length();
        if set.count() == 0 {
            IndexSet::Empty { max }
        } else if set.count() == max {
            IndexSet::Full { max }
        } else {
            IndexSet::Partial(set)
        }
    }

    /// Expand into a ranged set regardless of variant.
    fn materialize(&self) -> RangedSet<W> {
        match self {
            IndexSet::Empty { max } => RangedSet::new(0, *max),
            IndexSet::Full { max } => RangedSet::new(0, *max).complement(),
            IndexSet::Partial(set) => set.clone(),
        }
    }

    #[inline]
    pub fn max(&self) -> usize {
        match self {
            IndexSet::Empty { max } | IndexSet::Full { max } => *max,
            IndexSet::Partial(set) => set.length(),
        }
    }

    pub fn count(&self) -> usize {
        match self {
            IndexSet::Empty { .. } => 0,
            IndexSet::Full { max } => *max,
            IndexSet::Partial(set) => set.count(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, IndexSet::Empty { .. })
    }

    pub fn is_full(&self) -> bool {
        matches!(self, IndexSet::Full { .. })
    }

    fn guard_index(&self, index: usize) -> Result<()> {
        if index < self.max() {
            Ok(())
        } else {
            Err(Error::out_of_range(index as i64, 0, self.max() as i64))
        }
    }

    fn guard(&self, other: &Self) -> Result<()> {
        if self.max() == other.max() {
            Ok(())
        } else {
            Err(Error::RangeMismatch {
                left: (0, self.max()),
                right: (0, other.max()),
            })
        }
    }

    pub fn contains(&self, index: usize) -> Result<bool> {
        self.guard_index(index)?;
        Ok(match self {
            IndexSet::Empty { .. } => false,
            IndexSet::Full { .. } => true,
            IndexSet::Partial(set) => set.contains(index as i64)?,
        })
    }

    pub fn add(&self, index: usize) -> Result<Self> {
        self.guard_index(index)?;
        if self.is_full() {
            return Ok(self.clone());
        }
        let mut set = self.materialize();
        set.insert(index as i64)?;
        Ok(Self::normalized(set))
    }

    pub fn remove(&self, index: usize) -> Result<Self> {
        self.guard_index(index)?;
        if self.is_empty() {
            return Ok(self.clone());
        }
        let mut set = self.materialize();
        set.remove(index as i64)?;
        Ok(Self::normalized(set))
    }

    pub fn union(&self, other: &Self) -> Result<Self> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Full { .. }, _) | (_, IndexSet::Empty { .. }) => self.clone(),
            (_, IndexSet::Full { .. }) | (IndexSet::Empty { .. }, _) => other.clone(),
            (IndexSet::Partial(a), IndexSet::Partial(b)) => Self::normalized(a.union(b)?),
        })
    }

    pub fn intersect(&self, other: &Self) -> Result<Self> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Empty { .. }, _) | (_, IndexSet::Full { .. }) => self.clone(),
            (_, IndexSet::Empty { .. }) | (IndexSet::Full { .. }, _) => other.clone(),
            (IndexSet::Partial(a), IndexSet::Partial(b)) => Self::normalized(a.intersect(b)?),
        })
    }

    pub fn except(&self, other: &Self) -> Result<Self> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Empty { .. }, _) | (_, IndexSet::Empty { .. }) => self.clone(),
            (_, IndexSet::Full { max }) => IndexSet::Empty { max: *max },
            (IndexSet::Full { .. }, _) => other.complement(),
            (IndexSet::Partial(a), IndexSet::Partial(b)) => Self::normalized(a.except(b)?),
        })
    }

    pub fn symmetric_except(&self, other: &Self) -> Result<Self> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Empty { .. }, _) => other.clone(),
            (_, IndexSet::Empty { .. }) => self.clone(),
            (IndexSet::Full { .. }, _) => other.complement(),
            (_, IndexSet::Full { .. }) => self.complement(),
            (IndexSet::Partial(a), IndexSet::Partial(b)) => {
                Self::normalized(a.symmetric_except(b)?)
            }
        })
    }

    pub fn complement(&self) -> Self {
        match self {
            IndexSet::Empty { max } => IndexSet::Full { max: *max },
            IndexSet::Full { max } => IndexSet::Empty { max: *max },
            IndexSet::Partial(set) => IndexSet::Partial(set.complement()),
        }
    }

    pub fn is_subset_of(&self, other: &Self) -> Result<bool> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Empty { .. }, _) | (_, IndexSet::Full { .. }) => true,
            (_, IndexSet::Empty { .. }) | (IndexSet::Full { .. }, _) => false,
            (IndexSet::Partial(a), IndexSet::Partial(b)) => a.is_subset_of(b)?,
        })
    }

    pub fn is_superset_of(&self, other: &Self) -> Result<bool> {
        other.is_subset_of(self)
    }

    pub fn overlaps(&self, other: &Self) -> Result<bool> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Empty { .. }, _) | (_, IndexSet::Empty { .. }) => false,
            (IndexSet::Full { .. }, _) | (_, IndexSet::Full { .. }) => true,
            (IndexSet::Partial(a), IndexSet::Partial(b)) => a.overlaps(b)?,
        })
    }

    pub fn set_equals(&self, other: &Self) -> Result<bool> {
        self.guard(other)?;
        Ok(match (self, other) {
            (IndexSet::Partial(a), IndexSet::Partial(b)) => a.set_equals(b)?,
            (IndexSet::Empty { .. }, IndexSet::Empty { .. })
            | (IndexSet::Full { .. }, IndexSet::Full { .. }) => true,
            _ => false,
        })
    }

    /// Ascending iterator over the member indices.
    pub fn iter(&self) -> Box<dyn Iterator<Item = usize> + '_> {
        match self {
            IndexSet::Empty { .. } => Box::new(std::iter::empty()),
            IndexSet::Full { max } => Box::new(0..*max),
            IndexSet::Partial(set) => Box::new(set.iter().map(|v| v as usize)),
        }
    }
}
