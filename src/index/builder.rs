//! Grouping a triple split into a [`GroupedIndex`].

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use rayon::prelude::*;

use crate::triples::TripleArray;

use super::{Direction, GroupedIndex, IndexKey};

/// Below this many groups the per-group sorts run on the calling thread.
const PARALLEL_SORT_MIN_GROUPS: usize = 4096;

/// Group `triples` by the key columns of `direction`.
///
/// One pass appends each row's completing id to its key's group, creating
/// groups in first-seen order. Each group is then sorted ascending; duplicate
/// completions are kept. Only the independent per-group sorts run on the
/// rayon pool, so key order and group contents are identical to a purely
/// sequential build.
pub fn build(triples: &TripleArray, direction: Direction) -> GroupedIndex {
    let mut positions: HashMap<IndexKey, usize> = HashMap::new();
    let mut keys: Vec<IndexKey> = Vec::new();
    let mut groups: Vec<Vec<u32>> = Vec::new();

    for row in triples.rows() {
        let key = direction.key(row);
        let slot = match positions.entry(key) {
            Entry::Occupied(e) => *e.get(),
            Entry::Vacant(e) => {
                keys.push(key);
                groups.push(Vec::new());
                *e.insert(groups.len() - 1)
            }
        };
        groups[slot].push(direction.value(row));
    }

    if groups.len() >= PARALLEL_SORT_MIN_GROUPS {
        groups.par_iter_mut().for_each(|g| g.sort());
    } else {
        groups.iter_mut().for_each(|g| g.sort());
    }

    GroupedIndex::from_parts(keys, groups, positions)
}
