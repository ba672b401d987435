//! FILENAME: engine/src/record.rs
//! PURPOSE: Defines a single row or column of the dataset and its numeric algorithms.
//! CONTEXT: This file contains the `Record` struct, an ordered sequence of
//! string cell values tagged with its orientation and position. All statistics
//! (sum, mean, median, variance, standard deviation, min-max normalization)
//! operate on `BigDecimal` conversions of the stored text so results are exact
//! up to the documented rounding rules.

use crate::error::DataSetError;
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fractional digits kept by mean, median, variance and normalization.
const ROUND_SCALE: i64 = 5;

/// Significant digits kept by the standard deviation.
const STD_DEV_PRECISION: u64 = 5;

/// Whether a record is a row or a column of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    Row,
    Column,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Row => write!(f, "ROW"),
            RecordKind::Column => write!(f, "COLUMN"),
        }
    }
}

/// An ordered sequence of string cell values representing one row or one
/// column. Cells are stored as text; numeric and boolean interpretations are
/// explicit, fallible conversions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    kind: RecordKind,
    position: usize,
    values: Vec<String>,
}

impl Record {
    pub(crate) fn new(kind: RecordKind, position: usize) -> Self {
        Record {
            kind,
            position,
            values: Vec::new(),
        }
    }

    pub(crate) fn with_values(kind: RecordKind, position: usize, values: Vec<String>) -> Self {
        Record {
            kind,
            position,
            values,
        }
    }

    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn set_position(&mut self, position: usize) {
        self.position = position;
    }

    pub(crate) fn push_value(&mut self, value: String) {
        self.values.push(value);
    }

    /// Inserts a cell value, shifting later cells up. Fails if `position`
    /// is past the end of the record.
    pub(crate) fn insert_value(&mut self, value: String, position: usize) -> Result<(), DataSetError> {
        if position > self.values.len() {
            return Err(DataSetError::OutOfRange {
                kind: self.kind,
                position,
                count: self.values.len(),
            });
        }
        self.values.insert(position, value);
        Ok(())
    }

    pub(crate) fn remove_value(&mut self, position: usize) -> String {
        self.values.remove(position)
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Ascending cell indexes whose value equals `reference_value`. May be empty.
    pub fn indexes_of(&self, reference_value: &str) -> Vec<usize> {
        self.values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.as_str() == reference_value)
            .map(|(i, _)| i)
            .collect()
    }

    /// The cell values at the given indexes, in index order.
    pub fn values_at(&self, indexes: &[usize]) -> Result<Vec<String>, DataSetError> {
        indexes
            .iter()
            .map(|&i| {
                self.values
                    .get(i)
                    .cloned()
                    .ok_or(DataSetError::OutOfRange {
                        kind: self.kind,
                        position: i,
                        count: self.values.len(),
                    })
            })
            .collect()
    }

    /// Number of cells equal to `matching_value`.
    pub fn count_values(&self, matching_value: &str) -> Result<usize, DataSetError> {
        self.ensure_not_empty()?;
        Ok(self
            .values
            .iter()
            .filter(|v| v.as_str() == matching_value)
            .count())
    }

    // ========================================================================
    // AGGREGATION
    // ========================================================================

    /// Exact sum of all cells.
    pub fn sum(&self) -> Result<BigDecimal, DataSetError> {
        Ok(self.decimals(None)?.into_iter().sum())
    }

    /// Exact sum of the cells at `indexes` only. An empty selection sums
    /// to zero; the mean/median/variance family rejects it instead.
    pub fn sum_at(&self, indexes: &[usize]) -> Result<BigDecimal, DataSetError> {
        if indexes.is_empty() {
            return Ok(BigDecimal::zero());
        }
        Ok(self.decimals(Some(indexes))?.into_iter().sum())
    }

    /// Arithmetic mean, rounded half-up to 5 fractional digits.
    pub fn mean(&self) -> Result<BigDecimal, DataSetError> {
        self.mean_of(None)
    }

    /// Mean over the cells at `indexes` only.
    pub fn mean_at(&self, indexes: &[usize]) -> Result<BigDecimal, DataSetError> {
        self.mean_of(Some(indexes))
    }

    fn mean_of(&self, indexes: Option<&[usize]>) -> Result<BigDecimal, DataSetError> {
        let decimals = self.decimals(indexes)?;
        let sum: BigDecimal = decimals.iter().sum();
        Ok(div_round(&sum, decimals.len()))
    }

    /// Numeric median. An even cell count averages the two central elements
    /// (rounded half-up to 5 digits); an odd count returns the central
    /// element exactly as stored.
    pub fn median(&self) -> Result<BigDecimal, DataSetError> {
        self.median_of(None)
    }

    /// Median over the cells at `indexes` only.
    pub fn median_at(&self, indexes: &[usize]) -> Result<BigDecimal, DataSetError> {
        self.median_of(Some(indexes))
    }

    fn median_of(&self, indexes: Option<&[usize]>) -> Result<BigDecimal, DataSetError> {
        let mut decimals = self.decimals(indexes)?;
        decimals.sort();

        let middle = decimals.len() / 2;
        if decimals.len() % 2 == 0 {
            let sum = &decimals[middle] + &decimals[middle - 1];
            Ok(div_round(&sum, 2))
        } else {
            Ok(decimals[middle].clone())
        }
    }

    /// Population variance (divisor n, not n-1) around the rounded mean,
    /// rounded half-up to 5 fractional digits.
    pub fn variance(&self) -> Result<BigDecimal, DataSetError> {
        self.variance_of(None)
    }

    /// Variance over the cells at `indexes` only.
    pub fn variance_at(&self, indexes: &[usize]) -> Result<BigDecimal, DataSetError> {
        self.variance_of(Some(indexes))
    }

    fn variance_of(&self, indexes: Option<&[usize]>) -> Result<BigDecimal, DataSetError> {
        let decimals = self.decimals(indexes)?;
        let mean = self.mean_of(indexes)?;

        let mut acc = BigDecimal::zero();
        for x in &decimals {
            acc += (x - &mean).square();
        }
        Ok(div_round(&acc, decimals.len()))
    }

    /// Standard deviation: square root of the population variance, kept to
    /// 5 significant digits.
    pub fn std_dev(&self) -> Result<BigDecimal, DataSetError> {
        let variance = self.variance()?;
        Ok(sqrt_prec(&variance))
    }

    /// Standard deviation over the cells at `indexes` only.
    pub fn std_dev_at(&self, indexes: &[usize]) -> Result<BigDecimal, DataSetError> {
        let variance = self.variance_at(indexes)?;
        Ok(sqrt_prec(&variance))
    }

    /// Min-max normalization `(x - min) / (max - min)` of every cell,
    /// formatted to 5 decimal digits. When all cells are equal the scaling is
    /// undefined and every output is the literal `"1.00000"`.
    pub fn normalize(&self) -> Result<Vec<String>, DataSetError> {
        let decimals = self.decimals(None)?;

        // decimals is non-empty here, so min/max always exist
        let min = decimals.iter().min().cloned().unwrap_or_else(BigDecimal::zero);
        let max = decimals.iter().max().cloned().unwrap_or_else(BigDecimal::zero);

        if min == max {
            return Ok(vec!["1.00000".to_string(); decimals.len()]);
        }

        let range = &max - &min;
        Ok(decimals
            .iter()
            .map(|x| round_scaled((x - &min) / &range).to_string())
            .collect())
    }

    // ========================================================================
    // CONVERSION
    // ========================================================================

    pub fn as_decimals(&self) -> Result<Vec<BigDecimal>, DataSetError> {
        self.values.iter().map(|v| self.to_decimal(v)).collect()
    }

    pub fn as_doubles(&self) -> Result<Vec<f64>, DataSetError> {
        self.values
            .iter()
            .map(|v| v.parse::<f64>().map_err(|_| self.not_numeric(v)))
            .collect()
    }

    pub fn as_integers(&self) -> Result<Vec<i64>, DataSetError> {
        self.values
            .iter()
            .map(|v| v.parse::<i64>().map_err(|_| self.not_numeric(v)))
            .collect()
    }

    /// Only case-insensitive "true"/"false" are accepted as booleans.
    pub fn as_booleans(&self) -> Result<Vec<bool>, DataSetError> {
        self.values
            .iter()
            .map(|v| {
                if v.eq_ignore_ascii_case("true") {
                    Ok(true)
                } else if v.eq_ignore_ascii_case("false") {
                    Ok(false)
                } else {
                    Err(DataSetError::NotBoolean {
                        value: v.clone(),
                        kind: self.kind,
                        position: self.position,
                    })
                }
            })
            .collect()
    }

    // ========================================================================
    // INTERNAL
    // ========================================================================

    /// Converts the whole record, or the cells at `indexes`, to decimals.
    /// Fails on an empty selection or a non-numeric cell.
    fn decimals(&self, indexes: Option<&[usize]>) -> Result<Vec<BigDecimal>, DataSetError> {
        self.ensure_not_empty()?;
        match indexes {
            None => self.as_decimals(),
            Some(indexes) => {
                if indexes.is_empty() {
                    return Err(DataSetError::EmptyRecord {
                        kind: self.kind,
                        position: self.position,
                    });
                }
                indexes
                    .iter()
                    .map(|&i| {
                        let value = self.values.get(i).ok_or(DataSetError::OutOfRange {
                            kind: self.kind,
                            position: i,
                            count: self.values.len(),
                        })?;
                        self.to_decimal(value)
                    })
                    .collect()
            }
        }
    }

    fn to_decimal(&self, value: &str) -> Result<BigDecimal, DataSetError> {
        value.parse::<BigDecimal>().map_err(|_| self.not_numeric(value))
    }

    fn not_numeric(&self, value: &str) -> DataSetError {
        DataSetError::NotNumeric {
            value: value.to_string(),
            kind: self.kind,
            position: self.position,
        }
    }

    fn ensure_not_empty(&self) -> Result<(), DataSetError> {
        if self.values.is_empty() {
            return Err(DataSetError::EmptyRecord {
                kind: self.kind,
                position: self.position,
            });
        }
        Ok(())
    }
}

fn div_round(numerator: &BigDecimal, divisor: usize) -> BigDecimal {
    round_scaled(numerator / BigDecimal::from(divisor as u64))
}

/// Half-up rounding that always lands on scale 5. `with_scale_round` leaves
/// a zero quotient at its incoming scale, which would render as `"0"`
/// instead of `"0.00000"`, so the scale is forced afterwards.
fn round_scaled(value: BigDecimal) -> BigDecimal {
    value
        .with_scale_round(ROUND_SCALE, RoundingMode::HalfUp)
        .with_scale(ROUND_SCALE)
}

fn sqrt_prec(variance: &BigDecimal) -> BigDecimal {
    // population variance is never negative, so the root always exists
    variance
        .sqrt()
        .unwrap_or_else(BigDecimal::zero)
        .with_prec(STD_DEV_PRECISION)
}
