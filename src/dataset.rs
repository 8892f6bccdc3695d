//! The dataset root: splits, metadata, index cache and relation types.
//!
//! A [`Dataset`] owns three immutable triple splits together with the entity
//! and relation metadata arrays. Derived structures are built from them:
//! 1-to-N indexes are built lazily and memoized per `(split, direction)`,
//! and the relation-type table is computed once, eagerly, at construction.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use crate::config::DatasetConfig;
use crate::error::{DatasetError, DatasetResult};
use crate::index::{prepare_index, CompactIndex, Direction, GroupedIndex, IndexCache};
use crate::ingest::{self, SplitData};
use crate::relation_types::{RelationType, RelationTypeTable};
use crate::triples::{Meta, RelationId, Split, TripleArray};

/// Everything the ingestion step produces, handed to [`Dataset::new`].
#[derive(Debug, Clone, Default)]
pub struct DatasetParts {
    /// Display name, used in diagnostics only.
    pub name: String,
    /// Entity id -> metadata. Its length is the number of entities.
    pub entities: Vec<Meta>,
    /// Relation id -> metadata. Its length is the number of relations.
    pub relations: Vec<Meta>,
    pub train: SplitData,
    pub valid: SplitData,
    pub test: SplitData,
}

/// A knowledge graph dataset with train/valid/test splits.
#[derive(Debug)]
pub struct Dataset {
    name: String,
    entities: Vec<Meta>,
    relations: Vec<Meta>,
    splits: [SplitData; 3],
    indexes: IndexCache,
    relation_types: RelationTypeTable,
}

impl Dataset {
    /// Build a dataset from ingested parts.
    ///
    /// Construction validates every split against the entity and relation
    /// counts and fails on the first out-of-range id. It then **eagerly builds
    /// the training `sp` and `po` indexes** to classify relation types, so its
    /// cost grows with the size of the training split.
    pub fn new(parts: DatasetParts) -> DatasetResult<Self> {
        let DatasetParts {
            name,
            entities,
            relations,
            train,
            valid,
            test,
        } = parts;

        let splits = [train, valid, test];
        for (split, data) in Split::ALL.into_iter().zip(&splits) {
            validate_split(split, data, entities.len(), relations.len())?;
        }

        let indexes = IndexCache::new();
        let train = &splits[Split::Train as usize].triples;
        let sp = indexes.get_or_build(Split::Train, Direction::Sp, train);
        let po = indexes.get_or_build(Split::Train, Direction::Po, train);
        let relation_types = RelationTypeTable::classify(relations.len(), &sp, &po);

        Ok(Self {
            name,
            entities,
            relations,
            splits,
            indexes,
            relation_types,
        })
    }

    /// Load the maps and splits named by `config` and construct the dataset.
    pub fn load(config: &DatasetConfig) -> DatasetResult<Self> {
        tracing::info!(name = %config.name, dir = %config.base_dir().display(), "loading dataset");

        let entities = ingest::load_map(&config.entity_map_path())?;
        let relations = ingest::load_map(&config.relation_map_path())?;
        let train = ingest::load_triples(&config.split_path(Split::Train))?;
        let valid = ingest::load_triples(&config.split_path(Split::Valid))?;
        let test = ingest::load_triples(&config.split_path(Split::Test))?;

        let dataset = Self::new(DatasetParts {
            name: config.name.clone(),
            entities,
            relations,
            train,
            valid,
            test,
        })?;

        tracing::info!(
            entities = dataset.num_entities(),
            relations = dataset.num_relations(),
            "dataset {} loaded",
            dataset.name
        );
        for (t, predicates) in dataset.relations_per_type() {
            tracing::info!(relation_type = %t, count = predicates.len(), "{} relations of type {t}", predicates.len());
        }
        for split in Split::ALL {
            tracing::info!(%split, triples = dataset.split(split).len(), "{split} triples");
        }

        Ok(dataset)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn num_entities(&self) -> usize {
        self.entities.len()
    }

    pub fn num_relations(&self) -> usize {
        self.relations.len()
    }

    /// Entity id -> metadata. Undeclared ids map to an empty sequence.
    pub fn entities(&self) -> &[Meta] {
        &self.entities
    }

    /// Relation id -> metadata. Undeclared ids map to an empty sequence.
    pub fn relations(&self) -> &[Meta] {
        &self.relations
    }

    /// Triples of `split`, in ingestion order.
    pub fn split(&self, split: Split) -> &TripleArray {
        &self.splits[split as usize].triples
    }

    /// Per-row metadata of `split`, parallel to [`Dataset::split`].
    pub fn split_meta(&self, split: Split) -> &[Meta] {
        &self.splits[split as usize].meta
    }

    /// The 1-to-N index of `split` grouped by `direction`.
    ///
    /// Built on first request and cached for the lifetime of the dataset;
    /// later calls return the same shared index.
    pub fn index_1_to_n(&self, split: Split, direction: Direction) -> Arc<GroupedIndex> {
        self.indexes
            .get_or_build(split, direction, self.split(split))
    }

    /// [`Dataset::index_1_to_n`] with string arguments (`"train"`, `"sp"`, ...).
    ///
    /// Unknown names fail with [`DatasetError::InvalidArgument`] before the
    /// cache is touched.
    pub fn index_1_to_n_named(&self, split: &str, direction: &str) -> DatasetResult<Arc<GroupedIndex>> {
        let split: Split = split.parse()?;
        let direction: Direction = direction.parse()?;
        Ok(self.index_1_to_n(split, direction))
    }

    /// Compact keys/values/offsets form of the cached index. Not cached itself.
    pub fn compact_index(&self, split: Split, direction: Direction) -> CompactIndex {
        prepare_index(&self.index_1_to_n(split, direction))
    }

    /// Cached `(split, direction)` pairs.
    pub fn cached_indexes(&self) -> Vec<(Split, Direction)> {
        self.indexes.keys()
    }

    /// Number of index builds performed so far.
    pub fn index_builds(&self) -> usize {
        self.indexes.builds()
    }

    pub fn relation_type(&self, predicate: RelationId) -> Option<RelationType> {
        self.relation_types.get(predicate)
    }

    pub fn relation_types(&self) -> &RelationTypeTable {
        &self.relation_types
    }

    pub fn relations_per_type(&self) -> &BTreeMap<RelationType, BTreeSet<RelationId>> {
        self.relation_types.relations_per_type()
    }
}

fn validate_split(
    split: Split,
    data: &SplitData,
    num_entities: usize,
    num_relations: usize,
) -> DatasetResult<()> {
    if data.meta.len() != data.triples.len() {
        return Err(DatasetError::MetadataLength {
            split: split.to_string(),
            rows: data.triples.len(),
            meta: data.meta.len(),
        });
    }

    let out_of_range = |row: usize, column: &'static str, id: u32, limit: usize| {
        DatasetError::IdentifierOutOfRange {
            split: split.to_string(),
            row,
            column,
            id,
            limit,
        }
    };
    for (row, &[s, p, o]) in data.triples.rows().iter().enumerate() {
        if s as usize >= num_entities {
            return Err(out_of_range(row, "subject", s, num_entities));
        }
        if p as usize >= num_relations {
            return Err(out_of_range(row, "predicate", p, num_relations));
        }
        if o as usize >= num_entities {
            return Err(out_of_range(row, "object", o, num_entities));
        }
    }
    Ok(())
}
