//! Memoized index builds keyed by `(split, direction)`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use crate::triples::{Split, TripleArray};

use super::{build, Direction, GroupedIndex};

/// Per-dataset cache of [`GroupedIndex`]es.
///
/// Each `(split, direction)` is built at most once. The build runs while the
/// key's map entry is held, so concurrent callers asking for the same key
/// wait for the first build instead of repeating it.
#[derive(Debug, Default)]
pub struct IndexCache {
    indexes: DashMap<(Split, Direction), Arc<GroupedIndex>>,
    builds: AtomicUsize,
}

impl IndexCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached index for `(split, direction)`, building it from
    /// `triples` on first use.
    pub fn get_or_build(
        &self,
        split: Split,
        direction: Direction,
        triples: &TripleArray,
    ) -> Arc<GroupedIndex> {
        if let Some(index) = self.indexes.get(&(split, direction)) {
            return Arc::clone(index.value());
        }

        let entry = self.indexes.entry((split, direction)).or_insert_with(|| {
            let index = build(triples, direction);
            self.builds.fetch_add(1, Ordering::Relaxed);
            tracing::info!(
                %split,
                %direction,
                keys = index.len(),
                "{} distinct {direction} pairs in {split}",
                index.len()
            );
            Arc::new(index)
        });
        Arc::clone(entry.value())
    }

    /// The cached index, without building.
    pub fn get(&self, split: Split, direction: Direction) -> Option<Arc<GroupedIndex>> {
        self.indexes
            .get(&(split, direction))
            .map(|e| Arc::clone(e.value()))
    }

    pub fn contains(&self, split: Split, direction: Direction) -> bool {
        self.indexes.contains_key(&(split, direction))
    }

    /// Cached keys, sorted.
    pub fn keys(&self) -> Vec<(Split, Direction)> {
        let mut keys: Vec<_> = self.indexes.iter().map(|e| *e.key()).collect();
        keys.sort();
        keys
    }

    /// Number of cached indexes.
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }

    /// How many builds have run over the cache's lifetime.
    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::Relaxed)
    }
}
