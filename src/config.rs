//! Dataset configuration, persisted as TOML.
//!
//! ```toml
//! [dataset]
//! name = "fb15k-237"
//! # base_dir defaults to data/<name>
//! entity_map = "entity_map.del"
//! relation_map = "relation_map.del"
//! train = "train.del"
//! valid = "valid.del"
//! test = "test.del"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, DatasetResult};
use crate::triples::Split;

/// Where a dataset's files live and what it is called.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Display name, used in diagnostics only.
    pub name: String,
    /// Directory holding the files below. Defaults to `data/<name>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_dir: Option<PathBuf>,
    #[serde(default = "default_entity_map")]
    pub entity_map: String,
    #[serde(default = "default_relation_map")]
    pub relation_map: String,
    #[serde(default = "default_train")]
    pub train: String,
    #[serde(default = "default_valid")]
    pub valid: String,
    #[serde(default = "default_test")]
    pub test: String,
}

fn default_entity_map() -> String {
    "entity_map.del".into()
}
fn default_relation_map() -> String {
    "relation_map.del".into()
}
fn default_train() -> String {
    "train.del".into()
}
fn default_valid() -> String {
    "valid.del".into()
}
fn default_test() -> String {
    "test.del".into()
}

/// On-disk layout: the dataset settings live under a `[dataset]` table.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    dataset: DatasetConfig,
}

impl DatasetConfig {
    /// Config with default file names under `data/<name>`.
    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            base_dir: None,
            entity_map: default_entity_map(),
            relation_map: default_relation_map(),
            train: default_train(),
            valid: default_valid(),
            test: default_test(),
        }
    }

    /// Override the base directory.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    pub fn base_dir(&self) -> PathBuf {
        self.base_dir
            .clone()
            .unwrap_or_else(|| Path::new("data").join(&self.name))
    }

    /// Join `file` onto the base directory.
    pub fn resolve(&self, file: &str) -> PathBuf {
        self.base_dir().join(file)
    }

    pub fn entity_map_path(&self) -> PathBuf {
        self.resolve(&self.entity_map)
    }

    pub fn relation_map_path(&self) -> PathBuf {
        self.resolve(&self.relation_map)
    }

    pub fn split_path(&self, split: Split) -> PathBuf {
        match split {
            Split::Train => self.resolve(&self.train),
            Split::Valid => self.resolve(&self.valid),
            Split::Test => self.resolve(&self.test),
        }
    }

    /// Parse from TOML text.
    pub fn from_toml(content: &str, origin: &str) -> DatasetResult<Self> {
        toml::from_str::<ConfigFile>(content)
            .map(|file| file.dataset)
            .map_err(|e| DatasetError::ConfigParse {
                path: origin.to_string(),
                message: e.to_string(),
            })
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> DatasetResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Serialize back to TOML.
    pub fn to_toml(&self) -> DatasetResult<String> {
        let file = ConfigFile {
            dataset: self.clone(),
        };
        toml::to_string_pretty(&file).map_err(|e| DatasetError::ConfigParse {
            path: self.name.clone(),
            message: e.to_string(),
        })
    }
}
