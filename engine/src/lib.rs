//! FILENAME: engine/src/lib.rs
//! PURPOSE: Main library entry point for the CSV dataset engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod dataset;
pub mod error;
pub mod record;

// Re-export commonly used types at the crate root
pub use dataset::{DataSet, DataSetConfig, RecordKey};
pub use error::DataSetError;
pub use record::{Record, RecordKind};
