//! FILENAME: persistence/src/csv_writer.rs

use crate::codec::join_fields;
use crate::PersistenceError;
use engine::DataSet;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes the dataset to `path` as delimited text, creating or truncating
/// the file. The dataset itself is not modified.
pub fn store_csv(dataset: &DataSet, path: &Path) -> Result<(), PersistenceError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    for line in to_lines(dataset) {
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;

    debug!(
        "stored {} rows x {} columns to {}",
        dataset.row_count(),
        dataset.column_count(),
        path.display()
    );
    Ok(())
}

/// Renders the dataset as physical lines: the column header band first (the
/// cross header leading it when both bands are present), then one line per
/// data row with its row label leading when that band is enabled.
pub fn to_lines(dataset: &DataSet) -> Vec<String> {
    let config = dataset.config();
    let mut lines = Vec::with_capacity(dataset.row_count() + 1);

    if config.column_headers {
        let mut fields = Vec::with_capacity(dataset.column_count() + 1);
        if config.row_headers {
            fields.push(dataset.cross_header().to_string());
        }
        fields.extend(dataset.column_header_values().iter().cloned());
        lines.push(join_fields(&fields, config.separator));
    }

    for position in 0..dataset.row_count() {
        let mut fields = Vec::with_capacity(dataset.column_count() + 1);
        if config.row_headers {
            fields.push(dataset.row_header_values()[position].clone());
        }
        // position is always in range here
        if let Ok(values) = dataset.row_values(position) {
            fields.extend(values);
        }
        lines.push(join_fields(&fields, config.separator));
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::DataSetConfig;

    fn values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    #[test]
    fn test_to_lines_with_column_headers() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1", "Column2"])).unwrap();
        ds.add_row(values(&["1", "2"])).unwrap();
        ds.add_row(values(&["3", "4"])).unwrap();

        assert_eq!(to_lines(&ds), vec!["Column1,Column2", "1,2", "3,4"]);
    }

    #[test]
    fn test_to_lines_writes_cross_header_without_mutating() {
        let config = DataSetConfig::new().with_row_headers(true);
        let mut ds = DataSet::new(config);
        ds.add_row(values(&["X", "Column0", "Column1"])).unwrap();
        ds.add_row(values(&["Row0", "1", "2"])).unwrap();

        assert_eq!(to_lines(&ds), vec!["X,Column0,Column1", "Row0,1,2"]);
        // rendering twice gives the same output; the header band is untouched
        assert_eq!(to_lines(&ds), vec!["X,Column0,Column1", "Row0,1,2"]);
        assert_eq!(ds.column_header_values(), values(&["Column0", "Column1"]));
    }

    #[test]
    fn test_to_lines_quotes_fields_containing_separator() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1", "Column2"])).unwrap();
        ds.add_row(values(&["1,5", "2"])).unwrap();

        assert_eq!(to_lines(&ds), vec!["Column1,Column2", "\"1,5\",2"]);
    }

    #[test]
    fn test_to_lines_with_custom_separator() {
        let config = DataSetConfig::new().with_separator(';');
        let mut ds = DataSet::new(config);
        ds.add_row(values(&["A", "B"])).unwrap();
        ds.add_row(values(&["1", "2"])).unwrap();

        assert_eq!(to_lines(&ds), vec!["A;B", "1;2"]);
    }
}
