//! Rich diagnostic error types for kge-dataset.
//!
//! Every failure carries a miette error code and help text so that a broken
//! dataset file or a bad CLI argument tells the user what to fix.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while loading a dataset or querying its indexes.
#[derive(Debug, Error, Diagnostic)]
pub enum DatasetError {
    #[error("invalid {kind}: \"{value}\"")]
    #[diagnostic(
        code(kge::dataset::invalid_argument),
        help(
            "Valid splits are: train, valid, test. \
             Valid directions are: sp (subject,predicate -> objects) \
             and po (predicate,object -> subjects)."
        )
    )]
    InvalidArgument { kind: &'static str, value: String },

    #[error(
        "{split} triple #{row}: {column} id {id} is out of range (must be < {limit})"
    )]
    #[diagnostic(
        code(kge::dataset::id_out_of_range),
        help(
            "Every subject and object must be declared in the entity map and every \
             predicate in the relation map. Check that the split file and the map \
             files belong to the same dataset."
        )
    )]
    IdentifierOutOfRange {
        split: String,
        row: usize,
        column: &'static str,
        id: u32,
        limit: usize,
    },

    #[error("{split}: {rows} triples but {meta} metadata rows")]
    #[diagnostic(
        code(kge::dataset::metadata_length),
        help("Each triple row needs exactly one (possibly empty) metadata row.")
    )]
    MetadataLength {
        split: String,
        rows: usize,
        meta: usize,
    },

    #[error("failed to read {path}")]
    #[diagnostic(
        code(kge::dataset::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    #[diagnostic(
        code(kge::dataset::parse),
        help(
            "Map files contain `index<TAB>meta...` rows and split files contain \
             `subject<TAB>predicate<TAB>object<TAB>meta...` rows, all ids being \
             non-negative integers."
        )
    )]
    Parse {
        path: String,
        line: u64,
        message: String,
    },

    #[error("failed to read dataset config: {path}")]
    #[diagnostic(
        code(kge::config::read),
        help("Ensure the config file exists and is valid TOML.")
    )]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset config: {path}: {message}")]
    #[diagnostic(
        code(kge::config::parse),
        help("Check the TOML syntax. Only `name` is required; file names default to *.del.")
    )]
    ConfigParse { path: String, message: String },
}

/// Result type for dataset operations.
pub type DatasetResult<T> = std::result::Result<T, DatasetError>;
