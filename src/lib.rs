// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # kge-dataset
//!
//! Knowledge graph embedding datasets: dense integer triples split into
//! train/valid/test, with the derived lookup structures that training and
//! evaluation loops need.
//!
//! ## Architecture
//!
//! - **Ingestion** (`ingest`): tab-separated entity/relation maps and split files
//! - **Dataset** (`dataset`): owns splits and metadata, validates identifiers
//! - **1-to-N indexes** (`index`): `(s,p) -> objects` and `(p,o) -> subjects`,
//!   memoized per split, with a compact keys/values/offsets form
//! - **Relation types** (`relation_types`): 1-1 / 1-N / N-1 / N-N classification
//!   of every predicate from the training split
//!
//! ## Library usage
//!
//! ```no_run
//! use kge_dataset::config::DatasetConfig;
//! use kge_dataset::dataset::Dataset;
//! use kge_dataset::index::Direction;
//! use kge_dataset::triples::Split;
//!
//! let config = DatasetConfig::with_name("fb15k-237");
//! let dataset = Dataset::load(&config).unwrap();
//! let sp = dataset.index_1_to_n(Split::Train, Direction::Sp);
//! let objects = sp.get(&[0, 3]);
//! let label = dataset.relation_type(3);
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod index;
pub mod ingest;
pub mod relation_types;
pub mod triples;
