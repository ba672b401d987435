//! FILENAME: engine/src/dataset.rs
//! PURPOSE: The in-memory CSV dataset (The mirrored dual-view table).
//! CONTEXT: This file defines the `DataSet` struct, which keeps an ordered
//! list of row records and an ordered list of column records describing the
//! same logical matrix from two angles, plus optional header bands. The two
//! views are not backed by shared storage, so every mutation is routed
//! through one routine that updates both sides before returning. Aggregations
//! locate the target record (by position or header label) and delegate to
//! `Record`.

use crate::error::DataSetError;
use crate::record::{Record, RecordKind};
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// Construction-time options of a dataset.
///
/// The separator is a single character by type; multi-character separators
/// cannot be expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSetConfig {
    pub separator: char,
    /// First physical line holds the column labels.
    pub column_headers: bool,
    /// First field of every data line holds the row label.
    pub row_headers: bool,
}

impl Default for DataSetConfig {
    fn default() -> Self {
        DataSetConfig {
            separator: ',',
            column_headers: true,
            row_headers: false,
        }
    }
}

impl DataSetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = separator;
        self
    }

    pub fn with_column_headers(mut self, column_headers: bool) -> Self {
        self.column_headers = column_headers;
        self
    }

    pub fn with_row_headers(mut self, row_headers: bool) -> Self {
        self.row_headers = row_headers;
        self
    }
}

/// Addresses a row or column either by its 0-based position or by its header
/// band label. Label lookup resolves to the first matching label.
#[derive(Debug, Clone, Copy)]
pub enum RecordKey<'a> {
    Position(usize),
    Label(&'a str),
}

impl<'a> From<usize> for RecordKey<'a> {
    fn from(position: usize) -> Self {
        RecordKey::Position(position)
    }
}

impl<'a> From<&'a str> for RecordKey<'a> {
    fn from(label: &'a str) -> Self {
        RecordKey::Label(label)
    }
}

/// The full in-memory dataset: ordered rows, ordered columns, optional
/// header bands and the cross-header label occupying cell [0][0] when both
/// bands are present.
///
/// Invariants after every public mutation:
/// - every column holds exactly `rows.len()` values and every row holds
///   exactly `columns.len()` values (the views are transposes of each other);
/// - an enabled header band holds one label per row/column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataSet {
    config: DataSetConfig,
    cross_header: String,
    column_header: Record,
    row_header: Record,
    rows: Vec<Record>,
    columns: Vec<Record>,
}

impl Default for DataSet {
    fn default() -> Self {
        Self::new(DataSetConfig::default())
    }
}

impl DataSet {
    pub fn new(config: DataSetConfig) -> Self {
        DataSet {
            config,
            cross_header: String::new(),
            column_header: Record::new(RecordKind::Column, 0),
            row_header: Record::new(RecordKind::Row, 0),
            rows: Vec::new(),
            columns: Vec::new(),
        }
    }

    pub fn config(&self) -> &DataSetConfig {
        &self.config
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// The [0][0] label. Only meaningful when both header bands are enabled.
    pub fn cross_header(&self) -> &str {
        &self.cross_header
    }

    /// Drops all rows, columns and headers, returning to the empty state.
    pub fn clear(&mut self) {
        self.cross_header.clear();
        self.column_header = Record::new(RecordKind::Column, 0);
        self.row_header = Record::new(RecordKind::Row, 0);
        self.rows.clear();
        self.columns.clear();
    }

    // ========================================================================
    // MUTATION
    // ========================================================================

    /// Appends a row at the end of the dataset.
    ///
    /// The first call carries header data when header bands are enabled:
    /// with both bands, `values[0]` is the cross header and the rest is the
    /// column header band; with column headers only, all values form the
    /// band. When the row header band is enabled, `values[0]` of every data
    /// row is its label.
    pub fn add_row(&mut self, values: Vec<String>) -> Result<(), DataSetError> {
        let mut values = self.ensure_values(RecordKind::Row, values)?;

        let is_first_row = self.rows.is_empty() && self.column_header.is_empty();

        // cell [0][0] carries no data when both bands are present
        if is_first_row && self.config.row_headers && self.config.column_headers {
            self.cross_header = values.remove(0);
            self.column_header = Record::with_values(RecordKind::Column, 0, values);
            return Ok(());
        }

        let label = if self.config.row_headers {
            Some(values.remove(0))
        } else {
            None
        };

        if is_first_row && self.config.column_headers {
            self.column_header = Record::with_values(RecordKind::Column, 0, values);
            return Ok(());
        }

        self.validate_row_width(values.len())?;

        if let Some(label) = label {
            self.row_header.push_value(label);
        }

        let position = self.rows.len();
        for (index, value) in values.iter().enumerate() {
            if index >= self.columns.len() {
                self.columns.push(Record::new(RecordKind::Column, index));
            }
            self.columns[index].push_value(value.clone());
        }
        self.rows.push(Record::with_values(RecordKind::Row, position, values));
        Ok(())
    }

    /// Inserts a row at `position`, shifting later rows down.
    pub fn add_row_at(&mut self, values: Vec<String>, position: usize) -> Result<(), DataSetError> {
        let mut values = self.ensure_values(RecordKind::Row, values)?;

        if position > self.rows.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Row,
                position,
                count: self.rows.len(),
            });
        }

        let label = if self.config.row_headers {
            Some(values.remove(0))
        } else {
            None
        };

        self.validate_row_width(values.len())?;

        if let Some(label) = label {
            self.row_header.insert_value(label, position)?;
        }

        for (index, value) in values.iter().enumerate() {
            if index >= self.columns.len() {
                self.columns.push(Record::new(RecordKind::Column, index));
            }
            self.columns[index].insert_value(value.clone(), position)?;
        }
        self.rows
            .insert(position, Record::with_values(RecordKind::Row, position, values));
        self.reindex_rows();
        Ok(())
    }

    /// Appends a column at the end of the dataset. Symmetric to [`add_row`]:
    /// when the column header band is enabled, `values[0]` is the new
    /// column's label.
    ///
    /// [`add_row`]: DataSet::add_row
    pub fn add_column(&mut self, values: Vec<String>) -> Result<(), DataSetError> {
        let mut values = self.ensure_values(RecordKind::Column, values)?;

        let is_first_column = self.columns.is_empty() && self.row_header.is_empty();

        if is_first_column && self.config.row_headers && self.config.column_headers {
            self.cross_header = values.remove(0);
            self.row_header = Record::with_values(RecordKind::Row, 0, values);
            return Ok(());
        }

        let label = if self.config.column_headers {
            Some(values.remove(0))
        } else {
            None
        };

        if is_first_column && self.config.row_headers {
            self.row_header = Record::with_values(RecordKind::Row, 0, values);
            return Ok(());
        }

        self.validate_column_height(values.len())?;

        if let Some(label) = label {
            self.column_header.push_value(label);
        }

        let position = self.columns.len();
        for (index, value) in values.iter().enumerate() {
            if index >= self.rows.len() {
                self.rows.push(Record::new(RecordKind::Row, index));
            }
            self.rows[index].push_value(value.clone());
        }
        self.columns
            .push(Record::with_values(RecordKind::Column, position, values));
        Ok(())
    }

    /// Inserts a column at `position`, shifting later columns right.
    pub fn add_column_at(
        &mut self,
        values: Vec<String>,
        position: usize,
    ) -> Result<(), DataSetError> {
        let mut values = self.ensure_values(RecordKind::Column, values)?;

        if position > self.columns.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Column,
                position,
                count: self.columns.len(),
            });
        }

        let label = if self.config.column_headers {
            Some(values.remove(0))
        } else {
            None
        };

        self.validate_column_height(values.len())?;

        if let Some(label) = label {
            self.column_header.insert_value(label, position)?;
        }

        for (index, value) in values.iter().enumerate() {
            if index >= self.rows.len() {
                self.rows.push(Record::new(RecordKind::Row, index));
            }
            self.rows[index].insert_value(value.clone(), position)?;
        }
        self.columns.insert(
            position,
            Record::with_values(RecordKind::Column, position, values),
        );
        self.reindex_columns();
        Ok(())
    }

    /// Removes the row at `position`: the row record itself, the cell at
    /// `position` of every column, and the row label when that band is
    /// enabled.
    pub fn remove_row(&mut self, position: usize) -> Result<(), DataSetError> {
        if position >= self.rows.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Row,
                position,
                count: self.rows.len(),
            });
        }

        self.rows.remove(position);
        for column in &mut self.columns {
            column.remove_value(position);
        }
        if self.config.row_headers && position < self.row_header.len() {
            self.row_header.remove_value(position);
        }
        self.reindex_rows();
        Ok(())
    }

    /// Removes the column at `position` from both views and its header label.
    pub fn remove_column(&mut self, position: usize) -> Result<(), DataSetError> {
        if position >= self.columns.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Column,
                position,
                count: self.columns.len(),
            });
        }

        self.columns.remove(position);
        for row in &mut self.rows {
            row.remove_value(position);
        }
        if self.config.column_headers && position < self.column_header.len() {
            self.column_header.remove_value(position);
        }
        self.reindex_columns();
        Ok(())
    }

    /// Removes the first column whose header label equals `label`.
    pub fn remove_column_by_label(&mut self, label: &str) -> Result<(), DataSetError> {
        let position = self.column_position(RecordKey::Label(label))?;
        self.remove_column(position)
    }

    /// Removes the first row whose header label equals `label`.
    pub fn remove_row_by_label(&mut self, label: &str) -> Result<(), DataSetError> {
        let position = self.row_position(RecordKey::Label(label))?;
        self.remove_row(position)
    }

    /// Replaces a row with new values (remove + insert at the same
    /// position). When the row header band is enabled, `values[0]` is the
    /// replacement label. Shape is validated before any state changes.
    pub fn replace_row<'a>(
        &mut self,
        key: impl Into<RecordKey<'a>>,
        values: Vec<String>,
    ) -> Result<(), DataSetError> {
        let position = self.row_position(key.into())?;
        let values = self.ensure_values(RecordKind::Row, values)?;
        let label_cells = if self.config.row_headers { 1 } else { 0 };
        self.validate_row_width(values.len() - label_cells)?;

        self.remove_row(position)?;
        self.add_row_at(values, position)
    }

    /// Replaces a column with new values (remove + insert at the same
    /// position). When the column header band is enabled, `values[0]` is the
    /// replacement label.
    pub fn replace_column<'a>(
        &mut self,
        key: impl Into<RecordKey<'a>>,
        values: Vec<String>,
    ) -> Result<(), DataSetError> {
        let position = self.column_position(key.into())?;
        let values = self.ensure_values(RecordKind::Column, values)?;
        let label_cells = if self.config.column_headers { 1 } else { 0 };
        self.validate_column_height(values.len() - label_cells)?;

        self.remove_column(position)?;
        self.add_column_at(values, position)
    }

    // ========================================================================
    // LOOKUP
    // ========================================================================

    /// The row addressed by position or row label.
    pub fn row<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<&Record, DataSetError> {
        let position = self.row_position(key.into())?;
        Ok(&self.rows[position])
    }

    /// The column addressed by position or column label.
    pub fn column<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<&Record, DataSetError> {
        let position = self.column_position(key.into())?;
        Ok(&self.columns[position])
    }

    pub fn row_values<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<Vec<String>, DataSetError> {
        Ok(self.row(key)?.values().to_vec())
    }

    pub fn column_values<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<String>, DataSetError> {
        Ok(self.column(key)?.values().to_vec())
    }

    pub fn row_unique_values<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<String>, DataSetError> {
        Ok(unique(self.row(key)?.values()))
    }

    pub fn column_unique_values<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<String>, DataSetError> {
        Ok(unique(self.column(key)?.values()))
    }

    pub fn row_values_as_decimals<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<BigDecimal>, DataSetError> {
        self.row(key)?.as_decimals()
    }

    pub fn row_values_as_doubles<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<f64>, DataSetError> {
        self.row(key)?.as_doubles()
    }

    pub fn row_values_as_integers<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<i64>, DataSetError> {
        self.row(key)?.as_integers()
    }

    pub fn row_values_as_booleans<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<bool>, DataSetError> {
        self.row(key)?.as_booleans()
    }

    pub fn column_values_as_decimals<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<BigDecimal>, DataSetError> {
        self.column(key)?.as_decimals()
    }

    pub fn column_values_as_doubles<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<f64>, DataSetError> {
        self.column(key)?.as_doubles()
    }

    pub fn column_values_as_integers<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<i64>, DataSetError> {
        self.column(key)?.as_integers()
    }

    pub fn column_values_as_booleans<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<Vec<bool>, DataSetError> {
        self.column(key)?.as_booleans()
    }

    /// Labels of the row header band, empty when the band is disabled.
    pub fn row_header_values(&self) -> &[String] {
        self.row_header.values()
    }

    /// Labels of the column header band, empty when the band is disabled.
    pub fn column_header_values(&self) -> &[String] {
        self.column_header.values()
    }

    pub fn row_header_unique_values(&self) -> Vec<String> {
        unique(self.row_header.values())
    }

    pub fn column_header_unique_values(&self) -> Vec<String> {
        unique(self.column_header.values())
    }

    /// Values of a row at the positions where a reference row equals
    /// `reference_value`.
    pub fn row_values_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<Vec<String>, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.values_at(&indexes)
    }

    /// Values of a column at the positions where a reference column equals
    /// `reference_value`.
    pub fn column_values_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<Vec<String>, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.values_at(&indexes)
    }

    // ========================================================================
    // AGGREGATION
    // ========================================================================

    pub fn count_row_values<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
        matching_value: &str,
    ) -> Result<usize, DataSetError> {
        self.row(key)?.count_values(matching_value)
    }

    pub fn count_column_values<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
        matching_value: &str,
    ) -> Result<usize, DataSetError> {
        self.column(key)?.count_values(matching_value)
    }

    pub fn sum_row<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.row(key)?.sum()
    }

    pub fn sum_column<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.column(key)?.sum()
    }

    pub fn mean_row<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.row(key)?.mean()
    }

    pub fn mean_column<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.column(key)?.mean()
    }

    pub fn median_row<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.row(key)?.median()
    }

    pub fn median_column<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<BigDecimal, DataSetError> {
        self.column(key)?.median()
    }

    pub fn variance_row<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<BigDecimal, DataSetError> {
        self.row(key)?.variance()
    }

    pub fn variance_column<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<BigDecimal, DataSetError> {
        self.column(key)?.variance()
    }

    pub fn std_dev_row<'a>(&self, key: impl Into<RecordKey<'a>>) -> Result<BigDecimal, DataSetError> {
        self.row(key)?.std_dev()
    }

    pub fn std_dev_column<'a>(
        &self,
        key: impl Into<RecordKey<'a>>,
    ) -> Result<BigDecimal, DataSetError> {
        self.column(key)?.std_dev()
    }

    pub fn sum_row_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.sum_at(&indexes)
    }

    pub fn sum_column_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.sum_at(&indexes)
    }

    pub fn mean_row_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.mean_at(&indexes)
    }

    pub fn mean_column_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.mean_at(&indexes)
    }

    pub fn median_row_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.median_at(&indexes)
    }

    pub fn median_column_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.median_at(&indexes)
    }

    pub fn variance_row_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.variance_at(&indexes)
    }

    pub fn variance_column_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.variance_at(&indexes)
    }

    pub fn std_dev_row_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.row(reference)?.indexes_of(reference_value);
        self.row(key)?.std_dev_at(&indexes)
    }

    pub fn std_dev_column_by_matching<'a, 'b>(
        &self,
        key: impl Into<RecordKey<'a>>,
        reference: impl Into<RecordKey<'b>>,
        reference_value: &str,
    ) -> Result<BigDecimal, DataSetError> {
        let indexes = self.column(reference)?.indexes_of(reference_value);
        self.column(key)?.std_dev_at(&indexes)
    }

    /// Min-max normalization of a row. With `replace` the stored row is
    /// substituted by the normalized values; otherwise the dataset is left
    /// untouched. Returns the normalized values either way.
    pub fn normalize_row<'a>(
        &mut self,
        key: impl Into<RecordKey<'a>>,
        replace: bool,
    ) -> Result<Vec<String>, DataSetError> {
        let position = self.row_position(key.into())?;
        let normalized = self.rows[position].normalize()?;

        if replace {
            let mut values = normalized.clone();
            if self.config.row_headers {
                values.insert(0, self.row_header.values()[position].clone());
            }
            self.replace_row(position, values)?;
        }
        Ok(normalized)
    }

    /// Min-max normalization of a column, mirroring [`normalize_row`].
    ///
    /// [`normalize_row`]: DataSet::normalize_row
    pub fn normalize_column<'a>(
        &mut self,
        key: impl Into<RecordKey<'a>>,
        replace: bool,
    ) -> Result<Vec<String>, DataSetError> {
        let position = self.column_position(key.into())?;
        let normalized = self.columns[position].normalize()?;

        if replace {
            let mut values = normalized.clone();
            if self.config.column_headers {
                values.insert(0, self.column_header.values()[position].clone());
            }
            self.replace_column(position, values)?;
        }
        Ok(normalized)
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    fn row_position(&self, key: RecordKey<'_>) -> Result<usize, DataSetError> {
        let position = match key {
            RecordKey::Position(position) => position,
            RecordKey::Label(label) => self
                .row_header
                .values()
                .iter()
                .position(|header| header == label)
                .ok_or_else(|| DataSetError::LabelNotFound {
                    kind: RecordKind::Row,
                    label: label.to_string(),
                })?,
        };

        if position >= self.rows.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Row,
                position,
                count: self.rows.len(),
            });
        }
        Ok(position)
    }

    fn column_position(&self, key: RecordKey<'_>) -> Result<usize, DataSetError> {
        let position = match key {
            RecordKey::Position(position) => position,
            RecordKey::Label(label) => self
                .column_header
                .values()
                .iter()
                .position(|header| header == label)
                .ok_or_else(|| DataSetError::LabelNotFound {
                    kind: RecordKind::Column,
                    label: label.to_string(),
                })?,
        };

        if position >= self.columns.len() {
            return Err(DataSetError::OutOfRange {
                kind: RecordKind::Column,
                position,
                count: self.columns.len(),
            });
        }
        Ok(position)
    }

    fn ensure_values(
        &self,
        kind: RecordKind,
        values: Vec<String>,
    ) -> Result<Vec<String>, DataSetError> {
        if values.is_empty() {
            return Err(DataSetError::InvalidShape {
                kind,
                actual: 0,
                expected: match kind {
                    RecordKind::Row => self.expected_row_width().unwrap_or(0),
                    RecordKind::Column => self.expected_column_height().unwrap_or(0),
                },
            });
        }
        Ok(values)
    }

    /// Width every data row must have, if the dataset already fixes one.
    fn expected_row_width(&self) -> Option<usize> {
        if self.config.column_headers && !self.column_header.is_empty() {
            Some(self.column_header.len())
        } else if !self.columns.is_empty() {
            Some(self.columns.len())
        } else {
            None
        }
    }

    fn expected_column_height(&self) -> Option<usize> {
        if self.config.row_headers && !self.row_header.is_empty() {
            Some(self.row_header.len())
        } else if !self.rows.is_empty() {
            Some(self.rows.len())
        } else {
            None
        }
    }

    fn validate_row_width(&self, actual: usize) -> Result<(), DataSetError> {
        if let Some(expected) = self.expected_row_width() {
            if actual != expected {
                return Err(DataSetError::InvalidShape {
                    kind: RecordKind::Row,
                    actual,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn validate_column_height(&self, actual: usize) -> Result<(), DataSetError> {
        if let Some(expected) = self.expected_column_height() {
            if actual != expected {
                return Err(DataSetError::InvalidShape {
                    kind: RecordKind::Column,
                    actual,
                    expected,
                });
            }
        }
        Ok(())
    }

    fn reindex_rows(&mut self) {
        for (index, row) in self.rows.iter_mut().enumerate() {
            row.set_position(index);
        }
    }

    fn reindex_columns(&mut self) {
        for (index, column) in self.columns.iter_mut().enumerate() {
            column.set_position(index);
        }
    }
}

/// First-occurrence-order deduplication.
fn unique(values: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    values
        .iter()
        .filter(|v| seen.insert(v.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn values(fields: &[&str]) -> Vec<String> {
        fields.iter().map(|f| f.to_string()).collect()
    }

    fn dec(s: &str) -> BigDecimal {
        s.parse().unwrap()
    }

    /// Default-config dataset (column headers only) with three data rows.
    fn sample() -> DataSet {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1", "Column2", "Column3", "Column4"])).unwrap();
        ds.add_row(values(&["1", "2", "3", "4"])).unwrap();
        ds.add_row(values(&["5", "6", "7", "8"])).unwrap();
        ds.add_row(values(&["9", "10", "11", "12"])).unwrap();
        ds
    }

    fn assert_shape_invariant(ds: &DataSet) {
        for column in 0..ds.column_count() {
            assert_eq!(ds.column_values(column).unwrap().len(), ds.row_count());
        }
        for row in 0..ds.row_count() {
            assert_eq!(ds.row_values(row).unwrap().len(), ds.column_count());
        }
    }

    #[test]
    fn test_add_rows_builds_both_views() {
        let ds = sample();
        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.column_count(), 4);
        assert_eq!(ds.row_values(1).unwrap(), values(&["5", "6", "7", "8"]));
        assert_eq!(ds.column_values(2).unwrap(), values(&["3", "7", "11"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_first_row_becomes_column_header_band() {
        let ds = sample();
        assert_eq!(
            ds.column_header_values(),
            values(&["Column1", "Column2", "Column3", "Column4"])
        );
    }

    #[test]
    fn test_add_column_appends_to_every_row() {
        let mut ds = sample();
        ds.add_column(values(&["Column5", "true", "false", "true"])).unwrap();

        assert_eq!(ds.column_count(), 5);
        assert_eq!(ds.row_values(0).unwrap(), values(&["1", "2", "3", "4", "true"]));
        assert_eq!(ds.column_values("Column5").unwrap(), values(&["true", "false", "true"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_add_row_at_position() {
        let mut ds = sample();
        ds.add_row_at(values(&["10", "20", "30", "40"]), 2).unwrap();

        assert_eq!(ds.row_count(), 4);
        assert_eq!(ds.row_values(2).unwrap(), values(&["10", "20", "30", "40"]));
        assert_eq!(ds.row_values(3).unwrap(), values(&["9", "10", "11", "12"]));
        assert_eq!(ds.column_values(0).unwrap(), values(&["1", "5", "10", "9"]));
        assert_eq!(ds.row(2).unwrap().position(), 2);
        assert_eq!(ds.row(3).unwrap().position(), 3);
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_add_column_at_position() {
        let mut ds = sample();
        ds.add_column_at(values(&["Column2.1", "10", "20", "30"]), 2).unwrap();

        assert_eq!(ds.column_count(), 5);
        assert_eq!(ds.row_values(0).unwrap(), values(&["1", "2", "10", "3", "4"]));
        assert_eq!(
            ds.column_header_values(),
            values(&["Column1", "Column2", "Column2.1", "Column3", "Column4"])
        );
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_remove_row_shifts_positions() {
        let mut ds = sample();
        ds.remove_row(1).unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.row_values(1).unwrap(), values(&["9", "10", "11", "12"]));
        assert_eq!(ds.column_values(0).unwrap(), values(&["1", "9"]));
        assert_eq!(ds.row(1).unwrap().position(), 1);
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_remove_column_updates_rows_and_header() {
        let mut ds = sample();
        ds.remove_column(1).unwrap();

        assert_eq!(ds.column_count(), 3);
        assert_eq!(ds.row_values(2).unwrap(), values(&["9", "11", "12"]));
        assert_eq!(ds.column_header_values(), values(&["Column1", "Column3", "Column4"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_remove_column_by_label() {
        let mut ds = sample();
        ds.remove_column_by_label("Column2").unwrap();
        assert_eq!(ds.column_header_values(), values(&["Column1", "Column3", "Column4"]));
        assert_eq!(ds.row_values(0).unwrap(), values(&["1", "3", "4"]));
    }

    #[test]
    fn test_replace_row() {
        let mut ds = sample();
        ds.replace_row(0, values(&["10", "20", "30", "40"])).unwrap();

        assert_eq!(ds.row_count(), 3);
        assert_eq!(ds.row_values(0).unwrap(), values(&["10", "20", "30", "40"]));
        assert_eq!(ds.column_values(0).unwrap(), values(&["10", "5", "9"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_replace_column_by_label() {
        let mut ds = sample();
        ds.replace_column("Column2", values(&["Column2", "60", "70", "80"])).unwrap();

        assert_eq!(ds.column_count(), 4);
        assert_eq!(ds.column_values("Column2").unwrap(), values(&["60", "70", "80"]));
        assert_eq!(ds.row_values(0).unwrap(), values(&["1", "60", "3", "4"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_cross_header_consumed_when_both_bands_enabled() {
        let config = DataSetConfig::new().with_row_headers(true);
        let mut ds = DataSet::new(config);
        ds.add_row(values(&["X", "Column0", "Column1"])).unwrap();
        ds.add_row(values(&["Row0", "1", "2"])).unwrap();
        ds.add_row(values(&["Row1", "5", "6"])).unwrap();

        assert_eq!(ds.cross_header(), "X");
        assert_eq!(ds.column_header_values(), values(&["Column0", "Column1"]));
        assert_eq!(ds.row_header_values(), values(&["Row0", "Row1"]));
        assert_eq!(ds.row_values("Row1").unwrap(), values(&["5", "6"]));
        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_count(), 2);
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_no_headers_mode() {
        let config = DataSetConfig::new().with_column_headers(false);
        let mut ds = DataSet::new(config);
        ds.add_row(values(&["1", "2", "3"])).unwrap();
        ds.add_row(values(&["4", "5", "6"])).unwrap();

        assert_eq!(ds.row_count(), 2);
        assert_eq!(ds.column_values(0).unwrap(), values(&["1", "4"]));
        assert!(ds.column_header_values().is_empty());
    }

    #[test]
    fn test_sum_row_and_column() {
        let ds = sample();
        assert_eq!(ds.sum_row(2).unwrap(), dec("42"));
        assert_eq!(ds.sum_column(3).unwrap(), dec("24"));
        assert_eq!(ds.sum_column("Column2").unwrap(), dec("18"));
    }

    #[test]
    fn test_mean_and_median() {
        let ds = sample();
        assert_eq!(ds.mean_row(2).unwrap(), dec("10.5"));
        assert_eq!(ds.median_column(3).unwrap(), dec("8"));
    }

    #[test]
    fn test_variance_and_std_dev() {
        let ds = sample();
        assert_eq!(ds.variance_row(0).unwrap(), dec("1.25000"));

        let mut ds = DataSet::default();
        ds.add_row(values(&["C1", "C2", "C3", "C4", "C5", "C6", "C7", "C8", "C9"])).unwrap();
        ds.add_row(values(&["4", "9", "11", "12", "17", "5", "8", "12", "14"])).unwrap();
        ds.add_row(values(&["5", "6", "7", "8", "5", "6", "7", "8", "1"])).unwrap();
        ds.add_row(values(&["5", "6", "7", "8", "5", "6", "7", "8", "1"])).unwrap();
        assert_eq!(ds.std_dev_row(0).unwrap(), dec("3.9378"));
    }

    #[test]
    fn test_sum_column_by_matching() {
        let mut ds = sample();
        ds.add_column(values(&["Column5", "true", "false", "true"])).unwrap();

        assert_eq!(
            ds.sum_column_by_matching("Column3", "Column5", "true").unwrap(),
            dec("14")
        );
    }

    #[test]
    fn test_sum_column_by_matching_without_matches_is_zero() {
        let mut ds = sample();
        ds.add_column(values(&["Column5", "false", "false", "false"])).unwrap();

        assert_eq!(
            ds.sum_column_by_matching("Column1", "Column5", "true").unwrap(),
            dec("0")
        );
    }

    #[test]
    fn test_column_values_by_matching() {
        let mut ds = sample();
        ds.add_column(values(&["Column5", "true", "false", "true"])).unwrap();

        assert_eq!(
            ds.column_values_by_matching("Column3", "Column5", "true").unwrap(),
            values(&["3", "11"])
        );
    }

    #[test]
    fn test_count_column_values() {
        let mut ds = sample();
        ds.add_column(values(&["Column5", "true", "false", "true"])).unwrap();
        assert_eq!(ds.count_column_values("Column5", "true").unwrap(), 2);
    }

    #[test]
    fn test_row_out_of_range() {
        let ds = sample();
        let err = ds.row_values(3).unwrap_err();
        assert_eq!(
            err,
            DataSetError::OutOfRange {
                kind: RecordKind::Row,
                position: 3,
                count: 3,
            }
        );
    }

    #[test]
    fn test_label_not_found() {
        let ds = sample();
        assert!(matches!(
            ds.sum_column("Nope"),
            Err(DataSetError::LabelNotFound { .. })
        ));
    }

    #[test]
    fn test_invalid_shape_leaves_dataset_untouched() {
        let mut ds = sample();
        let err = ds.add_row(values(&["1", "2"])).unwrap_err();
        assert!(matches!(err, DataSetError::InvalidShape { .. }));

        assert_eq!(ds.row_count(), 3);
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_sum_of_non_numeric_row_fails() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1", "Column2", "Column3"])).unwrap();
        ds.add_row(values(&["1", "2", "3"])).unwrap();
        ds.add_row(values(&["4", "5", "6"])).unwrap();
        ds.add_row(values(&["7", "8", "ABC"])).unwrap();

        let err = ds.sum_row(2).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value \"ABC\" of ROW (2) is not a numeric value"
        );
    }

    #[test]
    fn test_normalize_column_with_replace() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1"])).unwrap();
        for v in ["100", "50", "11", "5", "40", "140", "200"] {
            ds.add_row(values(&[v])).unwrap();
        }

        let normalized = ds.normalize_column(0, true).unwrap();
        let expected = values(&[
            "0.48718", "0.23077", "0.03077", "0.00000", "0.17949", "0.69231", "1.00000",
        ]);
        assert_eq!(normalized, expected);
        assert_eq!(ds.column_values(0).unwrap(), expected);
        assert_eq!(ds.column_header_values(), values(&["Column1"]));
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_normalize_column_without_replace_is_read_only() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1"])).unwrap();
        for v in ["100", "50", "200"] {
            ds.add_row(values(&[v])).unwrap();
        }

        let first = ds.normalize_column(0, false).unwrap();
        assert_eq!(ds.column_values(0).unwrap(), values(&["100", "50", "200"]));

        let second = ds.normalize_column(0, false).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_unique_values_keep_first_occurrence_order() {
        let mut ds = DataSet::default();
        ds.add_row(values(&["Column1", "Column2"])).unwrap();
        ds.add_row(values(&["b", "1"])).unwrap();
        ds.add_row(values(&["a", "2"])).unwrap();
        ds.add_row(values(&["b", "3"])).unwrap();

        assert_eq!(ds.column_unique_values(0).unwrap(), values(&["b", "a"]));
    }

    #[test]
    fn test_clear_returns_to_empty_state() {
        let mut ds = sample();
        ds.clear();

        assert_eq!(ds.row_count(), 0);
        assert_eq!(ds.column_count(), 0);
        assert!(ds.column_header_values().is_empty());
        assert_eq!(ds.cross_header(), "");

        // the cleared dataset accepts a fresh header band and data
        ds.add_row(values(&["A", "B"])).unwrap();
        ds.add_row(values(&["1", "2"])).unwrap();
        assert_eq!(ds.column_header_values(), values(&["A", "B"]));
        assert_eq!(ds.row_count(), 1);
    }

    #[test]
    fn test_row_header_only_mode() {
        let config = DataSetConfig::new()
            .with_column_headers(false)
            .with_row_headers(true);
        let mut ds = DataSet::new(config);
        ds.add_row(values(&["Row0", "1", "2", "3"])).unwrap();
        ds.add_row(values(&["Row1", "4", "5", "6"])).unwrap();

        assert_eq!(ds.row_header_values(), values(&["Row0", "Row1"]));
        assert_eq!(ds.row_values("Row0").unwrap(), values(&["1", "2", "3"]));
        assert_eq!(ds.column_count(), 3);
        assert_shape_invariant(&ds);
    }

    #[test]
    fn test_config_builder_and_serde() {
        let config = DataSetConfig::new()
            .with_separator(';')
            .with_row_headers(true);
        assert_eq!(config.separator, ';');
        assert!(config.column_headers);

        let json = serde_json::to_string(&config).unwrap();
        let back: DataSetConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
