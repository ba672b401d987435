//! FILENAME: engine/src/error.rs

use crate::record::RecordKind;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSetError {
    #[error("{kind} position {position} not exits (count: {count})")]
    OutOfRange {
        kind: RecordKind,
        position: usize,
        count: usize,
    },

    #[error("there is not {kind} with label \"{label}\"")]
    LabelNotFound { kind: RecordKind, label: String },

    #[error("invalid number of {kind} elements: {actual}, expected {expected}")]
    InvalidShape {
        kind: RecordKind,
        actual: usize,
        expected: usize,
    },

    #[error("value \"{value}\" of {kind} ({position}) is not a numeric value")]
    NotNumeric {
        value: String,
        kind: RecordKind,
        position: usize,
    },

    #[error("value \"{value}\" of {kind} ({position}) is not a boolean value")]
    NotBoolean {
        value: String,
        kind: RecordKind,
        position: usize,
    },

    #[error("{kind} ({position}) has no elements")]
    EmptyRecord { kind: RecordKind, position: usize },
}
