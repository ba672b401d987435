//! FILENAME: persistence/src/csv_reader.rs

use crate::codec::split_line;
use crate::PersistenceError;
use engine::{DataSet, DataSetConfig};
use log::debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Reads a whole CSV file into a new dataset in one synchronous pass.
/// Header bands and the cross header fall out of the dataset's own row
/// protocol; the reader only splits lines.
pub fn load_csv(path: &Path, config: DataSetConfig) -> Result<DataSet, PersistenceError> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }

    let dataset = from_lines(lines, config)?;
    debug!(
        "loaded {} rows x {} columns from {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(dataset)
}

/// Builds a dataset from raw physical lines.
pub fn from_lines<I>(lines: I, config: DataSetConfig) -> Result<DataSet, PersistenceError>
where
    I: IntoIterator<Item = String>,
{
    let separator = config.separator;
    let mut dataset = DataSet::new(config);

    for line in lines {
        dataset.add_row(split_line(&line, separator))?;
    }
    Ok(dataset)
}
