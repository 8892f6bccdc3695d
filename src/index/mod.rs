//! 1-to-N indexes over a triple split.
//!
//! A [`GroupedIndex`] maps a two-column key, `(subject, predicate)` or
//! `(predicate, object)`, to the sorted list of identifiers that complete it.
//!
//! - [`builder`]: single-pass grouping of a split into a [`GroupedIndex`]
//! - [`cache`]: at-most-once memoization per `(split, direction)`
//! - [`compact`]: keys/values/offsets array form for batch consumers

pub mod builder;
pub mod cache;
pub mod compact;

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::triples::RelationId;

pub use builder::build;
pub use cache::IndexCache;
pub use compact::{prepare_index, CompactIndex};

/// Two-column grouping key, in column order (`[s, p]` or `[p, o]`).
pub type IndexKey = [u32; 2];

/// Which pair of columns an index groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// `(subject, predicate)` -> objects.
    Sp,
    /// `(predicate, object)` -> subjects.
    Po,
}

impl Direction {
    pub const ALL: [Direction; 2] = [Direction::Sp, Direction::Po];

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Sp => "sp",
            Direction::Po => "po",
        }
    }

    /// Grouping key of a `[s, p, o]` row.
    #[inline]
    pub fn key(self, row: &[u32; 3]) -> IndexKey {
        match self {
            Direction::Sp => [row[0], row[1]],
            Direction::Po => [row[1], row[2]],
        }
    }

    /// Completing identifier of a `[s, p, o]` row.
    #[inline]
    pub fn value(self, row: &[u32; 3]) -> u32 {
        match self {
            Direction::Sp => row[2],
            Direction::Po => row[0],
        }
    }

    /// The predicate component of a key produced by this direction.
    #[inline]
    pub fn predicate_of(self, key: &IndexKey) -> RelationId {
        match self {
            Direction::Sp => key[1],
            Direction::Po => key[0],
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sp" => Ok(Direction::Sp),
            "po" => Ok(Direction::Po),
            other => Err(DatasetError::InvalidArgument {
                kind: "direction",
                value: other.to_string(),
            }),
        }
    }
}

/// Mapping from [`IndexKey`] to ascending completion lists.
///
/// Keys iterate in first-seen order of the source split. Completion lists
/// are sorted ascending and keep duplicates when the split contains
/// duplicate triples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedIndex {
    keys: Vec<IndexKey>,
    groups: Vec<Vec<u32>>,
    positions: HashMap<IndexKey, usize>,
}

impl GroupedIndex {
    pub(crate) fn from_parts(
        keys: Vec<IndexKey>,
        groups: Vec<Vec<u32>>,
        positions: HashMap<IndexKey, usize>,
    ) -> Self {
        debug_assert_eq!(keys.len(), groups.len());
        debug_assert_eq!(keys.len(), positions.len());
        Self {
            keys,
            groups,
            positions,
        }
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorted completions of `key`, or `None` if the key never occurs.
    pub fn get(&self, key: &IndexKey) -> Option<&[u32]> {
        self.positions
            .get(key)
            .map(|&pos| self.groups[pos].as_slice())
    }

    pub fn contains_key(&self, key: &IndexKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Keys in first-seen order.
    pub fn keys(&self) -> &[IndexKey] {
        &self.keys
    }

    /// `(key, completions)` pairs in first-seen order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&IndexKey, &[u32])> + '_ {
        self.keys
            .iter()
            .zip(self.groups.iter().map(Vec::as_slice))
    }

    /// Sum of all group sizes, i.e. the number of rows indexed.
    pub fn total_completions(&self) -> usize {
        self.groups.iter().map(Vec::len).sum()
    }
}
