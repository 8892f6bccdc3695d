//! Relation cardinality types: 1-1, 1-N, N-1 and N-N.
//!
//! Following Bordes et al., "Translating embeddings for modeling
//! multi-relational data" (NIPS 2013), each predicate is classified from the
//! training split by its average number of objects per `(subject, predicate)`
//! group (object side) and of subjects per `(predicate, object)` group
//! (subject side). A side is "N" when its average exceeds [`MANY_THRESHOLD`].
//!
//! A side without any training occurrence has no average. Such a side
//! classifies as "1", so a predicate absent from training is `1-1`.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DatasetError;
use crate::index::{Direction, GroupedIndex};
use crate::triples::RelationId;

/// A side is "N" when its average group size is strictly greater than this.
pub const MANY_THRESHOLD: f64 = 1.5;

/// Cardinality class of a predicate, written `{subject-side}-{object-side}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationType {
    #[serde(rename = "1-1")]
    OneToOne,
    #[serde(rename = "1-N")]
    OneToMany,
    #[serde(rename = "N-1")]
    ManyToOne,
    #[serde(rename = "N-N")]
    ManyToMany,
}

impl RelationType {
    pub const ALL: [RelationType; 4] = [
        RelationType::OneToOne,
        RelationType::OneToMany,
        RelationType::ManyToOne,
        RelationType::ManyToMany,
    ];

    /// Combine the two sides: `subject_many` is the "N" in `N-1`,
    /// `object_many` the "N" in `1-N`.
    pub fn from_sides(subject_many: bool, object_many: bool) -> Self {
        match (subject_many, object_many) {
            (false, false) => RelationType::OneToOne,
            (false, true) => RelationType::OneToMany,
            (true, false) => RelationType::ManyToOne,
            (true, true) => RelationType::ManyToMany,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RelationType::OneToOne => "1-1",
            RelationType::OneToMany => "1-N",
            RelationType::ManyToOne => "N-1",
            RelationType::ManyToMany => "N-N",
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationType {
    type Err = DatasetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RelationType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DatasetError::InvalidArgument {
                kind: "relation type",
                value: s.to_string(),
            })
    }
}

/// Fan-out / fan-in counts of one predicate over the training split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RelationStats {
    /// Objects summed over all `(s, p)` groups.
    pub out_total: usize,
    /// Number of distinct `(s, p)` groups.
    pub out_groups: usize,
    /// Subjects summed over all `(p, o)` groups.
    pub in_total: usize,
    /// Number of distinct `(p, o)` groups.
    pub in_groups: usize,
}

impl RelationStats {
    /// Average objects per `(s, p)` group; `None` without any group.
    pub fn avg_out(&self) -> Option<f64> {
        average(self.out_total, self.out_groups)
    }

    /// Average subjects per `(p, o)` group; `None` without any group.
    pub fn avg_in(&self) -> Option<f64> {
        average(self.in_total, self.in_groups)
    }

    pub fn relation_type(&self) -> RelationType {
        RelationType::from_sides(is_many(self.avg_in()), is_many(self.avg_out()))
    }
}

fn average(total: usize, groups: usize) -> Option<f64> {
    (groups > 0).then(|| total as f64 / groups as f64)
}

// An undefined average never exceeds the threshold.
fn is_many(avg: Option<f64>) -> bool {
    avg.is_some_and(|a| a > MANY_THRESHOLD)
}

/// Cardinality type of every predicate in `[0, num_relations)`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationTypeTable {
    stats: Vec<RelationStats>,
    types: Vec<RelationType>,
    per_type: BTreeMap<RelationType, BTreeSet<RelationId>>,
}

impl RelationTypeTable {
    /// Classify `num_relations` predicates from the training `sp` and `po`
    /// indexes.
    ///
    /// Every predicate id found in either index must be below
    /// `num_relations`; the dataset validates this before classifying.
    pub(crate) fn classify(num_relations: usize, sp: &GroupedIndex, po: &GroupedIndex) -> Self {
        let mut stats = vec![RelationStats::default(); num_relations];

        for (key, group) in sp.iter() {
            let s = &mut stats[Direction::Sp.predicate_of(key) as usize];
            s.out_total += group.len();
            s.out_groups += 1;
        }
        for (key, group) in po.iter() {
            let s = &mut stats[Direction::Po.predicate_of(key) as usize];
            s.in_total += group.len();
            s.in_groups += 1;
        }

        let types: Vec<RelationType> = stats.iter().map(RelationStats::relation_type).collect();
        let mut per_type: BTreeMap<RelationType, BTreeSet<RelationId>> = BTreeMap::new();
        for (p, t) in types.iter().enumerate() {
            per_type.entry(*t).or_default().insert(p as RelationId);
        }

        Self {
            stats,
            types,
            per_type,
        }
    }

    /// Number of classified predicates.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn get(&self, predicate: RelationId) -> Option<RelationType> {
        self.types.get(predicate as usize).copied()
    }

    pub fn stats(&self, predicate: RelationId) -> Option<&RelationStats> {
        self.stats.get(predicate as usize)
    }

    /// Types indexed by predicate id.
    pub fn types(&self) -> &[RelationType] {
        &self.types
    }

    /// Predicates of each type. Types without any predicate are absent.
    pub fn relations_per_type(&self) -> &BTreeMap<RelationType, BTreeSet<RelationId>> {
        &self.per_type
    }

    pub fn relations_of_type(&self, t: RelationType) -> Option<&BTreeSet<RelationId>> {
        self.per_type.get(&t)
    }

    /// `(predicate, type, stats)` in predicate order.
    pub fn iter(&self) -> impl Iterator<Item = (RelationId, RelationType, &RelationStats)> + '_ {
        self.types
            .iter()
            .zip(&self.stats)
            .enumerate()
            .map(|(p, (t, s))| (p as RelationId, *t, s))
    }
}
