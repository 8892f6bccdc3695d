//! Reading tab-separated map and split files into dense arrays.
//!
//! - **Map files** hold `index<TAB>meta...` rows in any order. They become a
//!   dense array of size `max(index) + 1`; undeclared slots are empty.
//! - **Split files** hold `subject<TAB>predicate<TAB>object<TAB>meta...` rows.
//!   They become a [`TripleArray`] plus one metadata row per triple, in file
//!   order.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::error::{DatasetError, DatasetResult};
use crate::triples::{Meta, Triple, TripleArray};

/// A split as read from disk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitData {
    pub triples: TripleArray,
    pub meta: Vec<Meta>,
}

fn reader<R: Read>(source: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .flexible(true)
        .quoting(false)
        .from_reader(source)
}

fn open(path: &Path) -> DatasetResult<File> {
    File::open(path).map_err(|e| DatasetError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn record_line(record: &StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn parse_id(record: &StringRecord, column: usize, what: &str, origin: &str) -> DatasetResult<u32> {
    let field = record.get(column).ok_or_else(|| DatasetError::Parse {
        path: origin.to_string(),
        line: record_line(record),
        message: format!("missing {what} column"),
    })?;
    field.trim().parse::<u32>().map_err(|e| DatasetError::Parse {
        path: origin.to_string(),
        line: record_line(record),
        message: format!("invalid {what} \"{field}\": {e}"),
    })
}

fn csv_error(e: csv::Error, origin: &str) -> DatasetError {
    DatasetError::Parse {
        path: origin.to_string(),
        line: e.position().map(|p| p.line()).unwrap_or(0),
        message: e.to_string(),
    }
}

fn meta_from(record: &StringRecord, skip: usize) -> Meta {
    record.iter().skip(skip).map(str::to_string).collect()
}

/// Read an id -> metadata map. `origin` names the source in errors.
pub fn read_map<R: Read>(source: R, origin: &str) -> DatasetResult<Vec<Meta>> {
    let mut entries: Vec<Meta> = Vec::new();
    for result in reader(source).records() {
        let record = result.map_err(|e| csv_error(e, origin))?;
        let index = parse_id(&record, 0, "index", origin)? as usize;
        if index >= entries.len() {
            entries.resize(index + 1, Meta::new());
        }
        entries[index] = meta_from(&record, 1);
    }
    Ok(entries)
}

/// Read a map file from disk.
pub fn load_map(path: &Path) -> DatasetResult<Vec<Meta>> {
    let entries = read_map(open(path)?, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "loaded map");
    Ok(entries)
}

/// Read triples with their row metadata. `origin` names the source in errors.
pub fn read_triples<R: Read>(source: R, origin: &str) -> DatasetResult<SplitData> {
    let mut data = SplitData::default();
    for result in reader(source).records() {
        let record = result.map_err(|e| csv_error(e, origin))?;
        let s = parse_id(&record, 0, "subject", origin)?;
        let p = parse_id(&record, 1, "predicate", origin)?;
        let o = parse_id(&record, 2, "object", origin)?;
        data.triples.push(Triple::new(s, p, o));
        data.meta.push(meta_from(&record, 3));
    }
    Ok(data)
}

/// Read a split file from disk.
pub fn load_triples(path: &Path) -> DatasetResult<SplitData> {
    let data = read_triples(open(path)?, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), triples = data.triples.len(), "loaded split");
    Ok(data)
}
