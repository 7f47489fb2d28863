//! Substring catalog over a keyed collection of texts.
//!
//! Each item gets its own [`SubstringIndex`]. Building them is independent,
//! side-effect-free work, so the catalog builds items on the rayon pool and
//! only collects the results.

use super::changes::ChangeBatch;
use super::substring::SubstringIndex;
use crate::error::{Error, Result};
use crate::sets::GrowableSet;
use crate::utils::CatalogConfig;
use ahash::RandomState;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};

/// Identifier of an item in a [`Catalog`]
pub type ItemId = usize;

/// Receiver of collection change notifications
pub trait ChangeListener<T> {
    fn item_added(&mut self, id: ItemId, item: &T);
    fn item_removed(&mut self, id: ItemId, item: &T);
    fn item_updated(&mut self, id: ItemId, previous: &T, item: &T);
    fn cleared(&mut self);
}

/// Per-item substring indexes keyed by [`ItemId`]
#[derive(Debug, Clone)]
pub struct Catalog {
    config: CatalogConfig,
    items: HashMap<ItemId, SubstringIndex, RandomState>,
    /// Dedicated build pool, present when `build_threads` is set
    pool: Option<Arc<ThreadPool>>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            config: CatalogConfig::default(),
            items: HashMap::default(),
            pool: None,
        }
    }
}

impl Catalog {
    /// An empty catalog. Builds the dedicated thread pool once when the
    /// configuration asks for a fixed number of build threads.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let pool = if config.parallel_build && config.build_threads > 0 {
            let threads = config.effective_build_threads();
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("packset-build-{i}"))
                .build()
                .map_err(|e| Error::Config(format!("failed to build thread pool: {e}")))?;
            debug!(threads, "created build pool");
            Some(Arc::new(pool))
        } else {
            None
        };
        Ok(Self {
            config,
            items: HashMap::default(),
            pool,
        })
    }

    /// Build a catalog over `items` with the default configuration
    pub fn from_items<I, T>(items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemId, T)>,
        T: AsRef<str> + Send + Sync,
    {
        Self::from_items_with(items, CatalogConfig::default())
    }

    /// Build a catalog over `items`
    pub fn from_items_with<I, T>(items: I, config: CatalogConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (ItemId, T)>,
        T: AsRef<str> + Send + Sync,
    {
        let mut catalog = Self::new(config)?;
        let items: Vec<(ItemId, T)> = items.into_iter().collect();
        catalog.index_all(&items);
        Ok(catalog)
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Item ids in ascending order
    pub fn ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self.items.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn get(&self, id: ItemId) -> Option<&SubstringIndex> {
        self.items.get(&id)
    }

    /// Index a single item, replacing any previous index for `id`
    pub fn insert(&mut self, id: ItemId, text: &str) {
        let index = SubstringIndex::with_case(text, self.config.case_sensitive);
        self.items.insert(id, index);
    }

    pub fn remove(&mut self, id: ItemId) -> bool {
        self.items.remove(&id).is_some()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Build indexes for `items` (in parallel when configured) and store them
    fn index_all<T>(&mut self, items: &[(ItemId, T)])
    where
        T: AsRef<str> + Send + Sync,
    {
        let case_sensitive = self.config.case_sensitive;
        let build = |(id, text): &(ItemId, T)| {
            (*id, SubstringIndex::with_case(text.as_ref(), case_sensitive))
        };

        let built: Vec<(ItemId, SubstringIndex)> = match (&self.pool, self.config.parallel_build) {
            (_, false) => items.iter().map(build).collect(),
            (Some(pool), true) => pool.install(|| items.par_iter().map(build).collect()),
            (None, true) => items.par_iter().map(build).collect(),
        };

        debug!(items = built.len(), parallel = self.config.parallel_build, "indexed items");
        self.items.extend(built);
    }

    /// Ids of the items whose text contains `sequence`
    ///
    /// With `restrict_to`, only those ids are checked, so successive calls
    /// can narrow a result set one constraint at a time.
    pub fn all_containing(&self, sequence: &str, restrict_to: Option<&GrowableSet>) -> GrowableSet {
        let matches: Vec<ItemId> = match restrict_to {
            Some(candidates) => candidates
                .iter()
                .collect::<Vec<_>>()
                .into_par_iter()
                .filter(|id| self.items.get(id).is_some_and(|index| index.contains(sequence)))
                .collect(),
            None => self
                .items
                .par_iter()
                .filter(|(_, index)| index.contains(sequence))
                .map(|(id, _)| *id)
                .collect(),
        };
        trace!(sequence, matches = matches.len(), "all_containing");
        matches.into_iter().collect()
    }

    /// Ids of the items whose text is exactly `text`
    pub fn find_exact(&self, text: &str) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = self
            .items
            .iter()
            .filter(|(_, index)| index.source_equals(text))
            .map(|(id, _)| *id)
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Apply a coalesced batch: clear if requested, drop removed items, then
    /// rebuild added and updated items together
    pub fn apply<T>(&mut self, batch: ChangeBatch<T>)
    where
        T: AsRef<str> + Send + Sync,
    {
        if batch.is_empty() {
            return;
        }
        let (cleared, removed, upserts) = batch.into_parts();
        debug!(cleared, removed = removed.len(), upserts = upserts.len(), "applying change batch");

        if cleared {
            self.items.clear();
        }
        for id in &removed {
            self.items.remove(id);
        }
        self.index_all(&upserts);
    }
}

impl<T: AsRef<str>> ChangeListener<T> for Catalog {
    fn item_added(&mut self, id: ItemId, item: &T) {
        trace!(id, "item added");
        self.insert(id, item.as_ref());
    }

    fn item_removed(&mut self, id: ItemId, _item: &T) {
        trace!(id, "item removed");
        self.remove(id);
    }

    fn item_updated(&mut self, id: ItemId, _previous: &T, item: &T) {
        trace!(id, "item updated");
        self.insert(id, item.as_ref());
    }

    fn cleared(&mut self) {
        trace!("catalog cleared");
        self.clear();
    }
}
