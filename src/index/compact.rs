//! Array form of a [`GroupedIndex`]: keys, concatenated values and offsets.
//!
//! Batch consumers slice `values[offsets[i]..offsets[i + 1]]` to get the
//! completions of `keys[i]` without touching a hash map.

use serde::Serialize;

use super::{GroupedIndex, IndexKey};

/// Compact keys/values/offsets view of a [`GroupedIndex`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompactIndex {
    keys: Vec<IndexKey>,
    values: Vec<u32>,
    offsets: Vec<usize>,
}

/// Flatten `index` into its compact form.
///
/// Keys keep the index's first-seen order and are not sorted.
pub fn prepare_index(index: &GroupedIndex) -> CompactIndex {
    let mut keys = Vec::with_capacity(index.len());
    let mut values = Vec::with_capacity(index.total_completions());
    let mut offsets = Vec::with_capacity(index.len() + 1);
    offsets.push(0);

    for (key, group) in index.iter() {
        keys.push(*key);
        values.extend_from_slice(group);
        offsets.push(values.len());
    }

    CompactIndex {
        keys,
        values,
        offsets,
    }
}

impl CompactIndex {
    /// Number of groups.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[IndexKey] {
        &self.keys
    }

    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Cumulative group sizes, prefixed with 0. Length is `len() + 1`.
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Key and completions of group `i`.
    pub fn group(&self, i: usize) -> Option<(&IndexKey, &[u32])> {
        let key = self.keys.get(i)?;
        Some((key, &self.values[self.offsets[i]..self.offsets[i + 1]]))
    }

    /// Position of `key`. Keys are unsorted, so this is a linear scan.
    pub fn position(&self, key: &IndexKey) -> Option<usize> {
        self.keys.iter().position(|k| k == key)
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&IndexKey, &[u32])> + '_ {
        self.keys
            .iter()
            .zip(self.offsets.windows(2))
            .map(|(key, w)| (key, &self.values[w[0]..w[1]]))
    }

    /// Take the three arrays apart.
    pub fn into_parts(self) -> (Vec<IndexKey>, Vec<u32>, Vec<usize>) {
        (self.keys, self.values, self.offsets)
    }
}
