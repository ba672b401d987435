//! FILENAME: persistence/src/lib.rs
//! CSV Persistence Module
//!
//! Handles loading and storing a dataset as delimited text. The codec and
//! the reader/writer only move lines; all table semantics (header bands,
//! shape validation) live in the `engine` crate.

mod codec;
mod csv_reader;
mod csv_writer;
mod error;

pub use codec::{join_fields, split_line};
pub use csv_reader::{from_lines, load_csv};
pub use csv_writer::{store_csv, to_lines};
pub use error::PersistenceError;

use engine::{DataSet, DataSetConfig};
use std::path::{Path, PathBuf};

/// A CSV file on disk together with the dataset configuration used to read
/// and write it. The file name is validated at construction, before any I/O.
#[derive(Debug, Clone)]
pub struct CsvFile {
    path: PathBuf,
    config: DataSetConfig,
}

impl CsvFile {
    pub fn new(path: impl Into<PathBuf>, config: DataSetConfig) -> Result<Self, PersistenceError> {
        let path = path.into();
        if path.as_os_str().is_empty() {
            return Err(PersistenceError::InvalidFileName(
                "file name can't be empty".to_string(),
            ));
        }
        if path.extension().and_then(|e| e.to_str()) != Some("csv") {
            return Err(PersistenceError::InvalidFileName(format!(
                "{} does not end with .csv",
                path.display()
            )));
        }
        Ok(CsvFile { path, config })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &DataSetConfig {
        &self.config
    }

    /// Loads the whole file into a fresh dataset.
    pub fn load(&self) -> Result<DataSet, PersistenceError> {
        load_csv(&self.path, self.config.clone())
    }

    /// Writes the dataset to the file, replacing its previous content.
    pub fn store(&self, dataset: &DataSet) -> Result<(), PersistenceError> {
        store_csv(dataset, &self.path)
    }
}
