//! Triple data model: identifiers, row-ordered triple arrays and split names.
//!
//! A split is stored as a dense `(n, 3)` row-major array. Row order is the
//! order in which the ingestion adapter read the rows and never changes, so a
//! row number is a stable handle into the split and its metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;

/// Dense entity identifier in `[0, num_entities)`.
pub type EntityId = u32;

/// Dense relation (predicate) identifier in `[0, num_relations)`.
pub type RelationId = u32;

/// Free-text metadata fields attached to an entity, relation or triple row.
pub type Meta = Vec<String>;

/// A `(subject, predicate, object)` triple over dense identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Triple {
    pub subject: EntityId,
    pub predicate: RelationId,
    pub object: EntityId,
}

impl Triple {
    pub fn new(subject: EntityId, predicate: RelationId, object: EntityId) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// The triple as a `[s, p, o]` row.
    pub fn as_row(&self) -> [u32; 3] {
        [self.subject, self.predicate, self.object]
    }
}

impl From<[u32; 3]> for Triple {
    fn from(row: [u32; 3]) -> Self {
        Self::new(row[0], row[1], row[2])
    }
}

/// Immutable, row-ordered `(n, 3)` array of triples.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TripleArray {
    rows: Vec<[u32; 3]>,
}

impl TripleArray {
    /// Create an empty array with room for `capacity` rows.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            rows: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, triple: Triple) {
        self.rows.push(triple.as_row());
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The triple at `row`, if any.
    pub fn get(&self, row: usize) -> Option<Triple> {
        self.rows.get(row).copied().map(Triple::from)
    }

    /// Raw row-major view.
    pub fn rows(&self) -> &[[u32; 3]] {
        &self.rows
    }

    /// Iterate triples in row order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = Triple> + '_ {
        self.rows.iter().copied().map(Triple::from)
    }
}

impl From<Vec<[u32; 3]>> for TripleArray {
    fn from(rows: Vec<[u32; 3]>) -> Self {
        Self { rows }
    }
}

impl FromIterator<Triple> for TripleArray {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(|t| t.as_row()).collect(),
        }
    }
}

/// One of the three triple collections of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Split {
    Train,
    Valid,
    Test,
}

impl Split {
    /// All splits in canonical order.
    pub const ALL: [Split; 3] = [Split::Train, Split::Valid, Split::Test];

    pub fn as_str(self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Valid => "valid",
            Split::Test => "test",
        }
    }
}

impl fmt::Display for Split {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Split {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "train" => Ok(Split::Train),
            "valid" => Ok(Split::Valid),
            "test" => Ok(Split::Test),
            other => Err(DatasetError::InvalidArgument {
                kind: "split",
                value: other.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_keep_insertion_order() {
        let triples: TripleArray = [Triple::new(2, 0, 1), Triple::new(0, 1, 2)]
            .into_iter()
            .collect();
        assert_eq!(triples.len(), 2);
        assert_eq!(triples.get(0), Some(Triple::new(2, 0, 1)));
        assert_eq!(triples.get(1), Some(Triple::new(0, 1, 2)));
        assert_eq!(triples.get(2), None);
        assert_eq!(triples.rows(), &[[2, 0, 1], [0, 1, 2]]);
    }

    #[test]
    fn split_parse() {
        for split in Split::ALL {
            assert_eq!(split.as_str().parse::<Split>().unwrap(), split);
        }
        let err = "bogus".parse::<Split>().unwrap_err();
        assert!(matches!(
            err,
            DatasetError::InvalidArgument { kind: "split", .. }
        ));
        // Names are case sensitive.
        assert!("Train".parse::<Split>().is_err());
    }
}
