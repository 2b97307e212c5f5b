//! In-memory labeled table with typed columns.

use crate::core::{RegressionError, SchemaError};
use indexmap::IndexMap;

/// A typed, one-dimensional column of observations.
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Floating point numbers; NaN marks a missing value.
    Float(Vec<f64>),
    /// Integer numbers.
    Int(Vec<i64>),
    /// Boolean values, coerced to 0.0 / 1.0.
    Bool(Vec<bool>),
    /// Text values, parsed as numbers on extraction.
    Text(Vec<String>),
}

impl Column {
    /// Create a Float column.
    pub fn float(data: impl Into<Vec<f64>>) -> Self {
        Column::Float(data.into())
    }

    /// Create an Int column.
    pub fn int(data: impl Into<Vec<i64>>) -> Self {
        Column::Int(data.into())
    }

    /// Create a Bool column.
    pub fn bool(data: impl Into<Vec<bool>>) -> Self {
        Column::Bool(data.into())
    }

    /// Create a Text column.
    pub fn text<S: AsRef<str>>(data: &[S]) -> Self {
        Column::Text(data.iter().map(|s| s.as_ref().to_string()).collect())
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        match self {
            Column::Float(v) => v.len(),
            Column::Int(v) => v.len(),
            Column::Bool(v) => v.len(),
            Column::Text(v) => v.len(),
        }
    }

    /// Check if the column is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Type name of the column.
    pub fn dtype(&self) -> &'static str {
        match self {
            Column::Float(_) => "float64",
            Column::Int(_) => "int64",
            Column::Bool(_) => "bool",
            Column::Text(_) => "string",
        }
    }

    /// Convert to numbers, with NaN for missing values.
    ///
    /// Text is trimmed and parsed; `""`, `NA`, `NaN` and `null` (any case)
    /// count as missing. Anything else that fails to parse, and any infinite
    /// value, is a type error.
    pub fn to_f64(&self, name: &str) -> Result<Vec<f64>, RegressionError> {
        let type_error = |row: usize, value: String| RegressionError::Type {
            column: name.to_string(),
            row,
            value,
        };
        match self {
            Column::Float(v) => match v.iter().position(|x| x.is_infinite()) {
                Some(row) => Err(type_error(row, v[row].to_string())),
                None => Ok(v.clone()),
            },
            Column::Int(v) => Ok(v.iter().map(|&x| x as f64).collect()),
            Column::Bool(v) => Ok(v.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect()),
            Column::Text(v) => v
                .iter()
                .enumerate()
                .map(|(row, raw)| {
                    let s = raw.trim();
                    if is_missing_token(s) {
                        return Ok(f64::NAN);
                    }
                    match s.parse::<f64>() {
                        Ok(value) if value.is_finite() => Ok(value),
                        _ => Err(type_error(row, raw.clone())),
                    }
                })
                .collect(),
        }
    }
}

fn is_missing_token(s: &str) -> bool {
    s.is_empty()
        || s.eq_ignore_ascii_case("na")
        || s.eq_ignore_ascii_case("nan")
        || s.eq_ignore_ascii_case("null")
}

/// A labeled table: named columns of equal length, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct Table {
    columns: IndexMap<String, Column>,
    nrows: usize,
}

impl Table {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table from `(name, column)` pairs.
    pub fn from_columns<I, S>(columns: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (S, Column)>,
        S: Into<String>,
    {
        columns
            .into_iter()
            .try_fold(Table::new(), |table, (name, column)| {
                table.with_column(name, column)
            })
    }

    /// Add a column, rejecting duplicates and length mismatches.
    pub fn with_column<S: Into<String>>(mut self, name: S, column: Column) -> Result<Self, SchemaError> {
        let name = name.into();

        if self.columns.contains_key(&name) {
            return Err(SchemaError::DuplicateColumn(name));
        }

        if !self.columns.is_empty() && column.len() != self.nrows {
            return Err(SchemaError::LengthMismatch {
                column: name,
                expected: self.nrows,
                got: column.len(),
            });
        }

        if self.columns.is_empty() {
            self.nrows = column.len();
        }

        self.columns.insert(name, column);
        Ok(self)
    }

    /// Get the shape of the table (rows, columns).
    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.columns.len())
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    /// Column names in insertion order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(|k| k.as_str()).collect()
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Check if a column exists.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    /// Extract a column as numbers (NaN for missing).
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>, RegressionError> {
        let column = self
            .columns
            .get(name)
            .ok_or_else(|| SchemaError::ColumnNotFound(name.to_string()))?;
        column.to_f64(name)
    }
}
