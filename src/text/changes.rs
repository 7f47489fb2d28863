//! Coalescing of collection change notifications.
//!
//! A collection that a [`Catalog`](super::Catalog) mirrors reports adds,
//! removes, updates and clears one at a time. Applying each immediately means
//! rebuilding an item index that may be thrown away by the next event, so
//! notifications are first folded into a [`ChangeBatch`] that keeps only the
//! net effect per item.

use super::catalog::ItemId;
use std::collections::BTreeMap;

/// A single change notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemChange<T> {
    Added(ItemId, T),
    Removed(ItemId),
    Updated(ItemId, T),
    Cleared,
}

/// Net pending effect for one item
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending<T> {
    /// Item is new since the batch started
    Added(T),
    /// Item existed before and has new content
    Updated(T),
    /// Item existed before and is gone
    Removed,
}

/// Accumulated batch of changes ready for processing
#[derive(Debug, Clone)]
pub struct ChangeBatch<T> {
    cleared: bool,
    pending: BTreeMap<ItemId, Pending<T>>,
}

impl<T> Default for ChangeBatch<T> {
    fn default() -> Self {
        Self {
            cleared: false,
            pending: BTreeMap::new(),
        }
    }
}

impl<T> ChangeBatch<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when applying the batch would do nothing
    pub fn is_empty(&self) -> bool {
        !self.cleared && self.pending.is_empty()
    }

    /// Number of items with a pending effect
    pub fn total_changes(&self) -> usize {
        self.pending.len()
    }

    /// Whether the target must be cleared before the pending items apply
    pub fn cleared(&self) -> bool {
        self.cleared
    }

    pub fn get(&self, id: ItemId) -> Option<&Pending<T>> {
        self.pending.get(&id)
    }

    /// Fold a change into the batch
    pub fn push(&mut self, change: ItemChange<T>) {
        match change {
            ItemChange::Cleared => {
                self.cleared = true;
                self.pending.clear();
            }
            ItemChange::Added(id, item) => {
                let next = match self.pending.remove(&id) {
                    // remove + add = update
                    Some(Pending::Removed) => Pending::Updated(item),
                    Some(Pending::Updated(_)) => Pending::Updated(item),
                    Some(Pending::Added(_)) | None => Pending::Added(item),
                };
                self.pending.insert(id, next);
            }
            ItemChange::Updated(id, item) => {
                let next = match self.pending.remove(&id) {
                    // add + update = add
                    Some(Pending::Added(_)) => Pending::Added(item),
                    Some(Pending::Updated(_)) | Some(Pending::Removed) | None => {
                        Pending::Updated(item)
                    }
                };
                self.pending.insert(id, next);
            }
            ItemChange::Removed(id) => match self.pending.remove(&id) {
                // add + remove = noop
                Some(Pending::Added(_)) => {}
                Some(Pending::Updated(_)) | Some(Pending::Removed) | None => {
                    self.pending.insert(id, Pending::Removed);
                }
            },
        }
    }

    /// Merge a later batch into this one
    pub fn merge(&mut self, other: ChangeBatch<T>) {
        if other.cleared {
            self.cleared = true;
            self.pending.clear();
        }
        for (id, pending) in other.pending {
            match pending {
                Pending::Added(item) => self.push(ItemChange::Added(id, item)),
                Pending::Updated(item) => self.push(ItemChange::Updated(id, item)),
                Pending::Removed => self.push(ItemChange::Removed(id)),
            }
        }
    }

    pub fn clear(&mut self) {
        self.cleared = false;
        self.pending.clear();
    }

    /// Split into the clear flag, removed ids and items to (re)index, in id order
    pub fn into_parts(self) -> (bool, Vec<ItemId>, Vec<(ItemId, T)>) {
        let mut removed = Vec::new();
        let mut upserts = Vec::new();
        for (id, pending) in self.pending {
            match pending {
                Pending::Removed => removed.push(id),
                Pending::Added(item) | Pending::Updated(item) => upserts.push((id, item)),
            }
        }
        (self.cleared, removed, upserts)
    }
}

impl<T> Extend<ItemChange<T>> for ChangeBatch<T> {
    fn extend<I: IntoIterator<Item = ItemChange<T>>>(&mut self, iter: I) {
        for change in iter {
            self.push(change);
        }
    }
}

impl<T> FromIterator<ItemChange<T>> for ChangeBatch<T> {
    fn from_iter<I: IntoIterator<Item = ItemChange<T>>>(iter: I) -> Self {
        let mut batch = Self::new();
        batch.extend(iter);
        batch
    }
}
