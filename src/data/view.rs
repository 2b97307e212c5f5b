//! Immutable explanatory/criterion partition of a table.

use crate::core::{NaAction, NaHandler, NaInfo, RegressionError, SchemaError};
use faer::{Col, Mat};

use super::table::Table;

/// Minimum number of complete observations a view must hold.
pub const MIN_OBSERVATIONS: usize = 2;

/// Numeric extraction of explanatory columns and one criterion column.
///
/// Rows of `explanatory_matrix` are observations, columns follow
/// `explanatory_columns`. A view never contains missing values and is never
/// modified once built; strategies borrow it.
#[derive(Debug, Clone)]
pub struct DatasetView {
    explanatory_columns: Vec<String>,
    criterion_column: String,
    explanatory_matrix: Mat<f64>,
    criterion_vector: Col<f64>,
    na_info: NaInfo,
}

impl DatasetView {
    /// Build a view, failing on any missing value.
    ///
    /// # Errors
    ///
    /// - `SchemaError` for an empty selection, unknown or repeated columns, a
    ///   criterion that is also explanatory, or fewer than 2 observations
    /// - `RegressionError::Type` for text that is not numeric or any infinite value
    /// - `RegressionError::MissingValues` if any selected value is missing
    pub fn new<S: AsRef<str>>(
        table: &Table,
        explanatory_columns: &[S],
        criterion_column: &str,
    ) -> Result<Self, RegressionError> {
        Self::with_na_action(table, explanatory_columns, criterion_column, NaAction::Fail)
    }

    /// Build a view applying `na_action` to incomplete rows.
    pub fn with_na_action<S: AsRef<str>>(
        table: &Table,
        explanatory_columns: &[S],
        criterion_column: &str,
        na_action: NaAction,
    ) -> Result<Self, RegressionError> {
        let names: Vec<String> = explanatory_columns
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        validate_selection(&names, criterion_column)?;

        for name in names.iter().map(String::as_str).chain([criterion_column]) {
            if !table.has_column(name) {
                return Err(SchemaError::ColumnNotFound(name.to_string()).into());
            }
        }

        let n_rows = table.nrows();
        let mut x = Mat::zeros(n_rows, names.len());
        for (j, name) in names.iter().enumerate() {
            let values = table.numeric_column(name)?;
            for (i, v) in values.into_iter().enumerate() {
                x[(i, j)] = v;
            }
        }
        let criterion = table.numeric_column(criterion_column)?;
        let y = Col::from_fn(n_rows, |i| criterion[i]);

        let processed = NaHandler::process(&x, &y, na_action)?;
        if processed.na_info.has_removed() {
            log::warn!(
                "dropped {} of {} rows with missing values",
                processed.na_info.n_removed(),
                processed.na_info.n_original
            );
        }

        Self::assemble(
            names,
            criterion_column.to_string(),
            processed.x_clean,
            processed.y_clean,
            processed.na_info,
        )
    }

    /// Build a view directly from already-numeric parts.
    pub fn from_parts<S: AsRef<str>>(
        explanatory_columns: &[S],
        criterion_column: &str,
        explanatory_matrix: Mat<f64>,
        criterion_vector: Col<f64>,
    ) -> Result<Self, RegressionError> {
        let names: Vec<String> = explanatory_columns
            .iter()
            .map(|s| s.as_ref().to_string())
            .collect();
        validate_selection(&names, criterion_column)?;

        if explanatory_matrix.ncols() != names.len() {
            return Err(RegressionError::Dimension {
                expected: names.len(),
                got: explanatory_matrix.ncols(),
            });
        }
        if explanatory_matrix.nrows() != criterion_vector.nrows() {
            return Err(SchemaError::LengthMismatch {
                column: criterion_column.to_string(),
                expected: explanatory_matrix.nrows(),
                got: criterion_vector.nrows(),
            }
            .into());
        }

        reject_infinite(&names, criterion_column, &explanatory_matrix, &criterion_vector)?;

        let processed = NaHandler::process(&explanatory_matrix, &criterion_vector, NaAction::Fail)?;
        Self::assemble(
            names,
            criterion_column.to_string(),
            processed.x_clean,
            processed.y_clean,
            processed.na_info,
        )
    }

    fn assemble(
        explanatory_columns: Vec<String>,
        criterion_column: String,
        explanatory_matrix: Mat<f64>,
        criterion_vector: Col<f64>,
        na_info: NaInfo,
    ) -> Result<Self, RegressionError> {
        let n = explanatory_matrix.nrows();
        if n < MIN_OBSERVATIONS {
            return Err(SchemaError::InsufficientObservations {
                needed: MIN_OBSERVATIONS,
                got: n,
            }
            .into());
        }

        Ok(Self {
            explanatory_columns,
            criterion_column,
            explanatory_matrix,
            criterion_vector,
            na_info,
        })
    }

    /// Explanatory column names, in matrix column order.
    pub fn explanatory_columns(&self) -> &[String] {
        &self.explanatory_columns
    }

    /// Criterion column name.
    pub fn criterion_column(&self) -> &str {
        &self.criterion_column
    }

    /// Explanatory matrix (observations × explanatory columns).
    pub fn explanatory_matrix(&self) -> &Mat<f64> {
        &self.explanatory_matrix
    }

    /// Criterion vector, one entry per observation.
    pub fn criterion_vector(&self) -> &Col<f64> {
        &self.criterion_vector
    }

    /// Rows removed by the missing value policy.
    pub fn na_info(&self) -> &NaInfo {
        &self.na_info
    }

    /// Number of observations.
    pub fn n_observations(&self) -> usize {
        self.explanatory_matrix.nrows()
    }

    /// Number of explanatory columns.
    pub fn n_features(&self) -> usize {
        self.explanatory_matrix.ncols()
    }

    /// Position of an explanatory column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.explanatory_columns.iter().position(|c| c == name)
    }
}

/// Infinite values are a type error; NaN stays a missing value.
fn reject_infinite(
    names: &[String],
    criterion_column: &str,
    x: &Mat<f64>,
    y: &Col<f64>,
) -> Result<(), RegressionError> {
    let infinite = |column: &str, row: usize, value: f64| RegressionError::Type {
        column: column.to_string(),
        row,
        value: value.to_string(),
    };
    for (j, name) in names.iter().enumerate() {
        if let Some(row) = (0..x.nrows()).find(|&i| x[(i, j)].is_infinite()) {
            return Err(infinite(name.as_str(), row, x[(row, j)]));
        }
    }
    if let Some(row) = (0..y.nrows()).find(|&i| y[i].is_infinite()) {
        return Err(infinite(criterion_column, row, y[row]));
    }
    Ok(())
}

fn validate_selection(names: &[String], criterion_column: &str) -> Result<(), SchemaError> {
    if names.is_empty() {
        return Err(SchemaError::NoExplanatoryColumns);
    }
    for (i, name) in names.iter().enumerate() {
        if names[..i].contains(name) {
            return Err(SchemaError::DuplicateSelection(name.clone()));
        }
    }
    if names.iter().any(|n| n == criterion_column) {
        return Err(SchemaError::CriterionIsExplanatory(criterion_column.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::NaError;
    use crate::data::Column;

    fn sample_table() -> Table {
        Table::from_columns([
            ("x1", Column::float(vec![1.0, 2.0, 3.0, 4.0])),
            ("x2", Column::int(vec![0, 1, 0, 1])),
            ("y", Column::float(vec![2.0, 4.5, 6.0, 8.5])),
        ])
        .unwrap()
    }

    #[test]
    fn test_extraction() {
        let view = DatasetView::new(&sample_table(), &["x1", "x2"], "y").unwrap();

        assert_eq!(view.n_observations(), 4);
        assert_eq!(view.n_features(), 2);
        assert_eq!(view.explanatory_columns(), &["x1".to_string(), "x2".to_string()]);
        assert_eq!(view.criterion_column(), "y");
        assert_eq!(view.explanatory_matrix()[(1, 1)], 1.0);
        assert_eq!(view.criterion_vector()[3], 8.5);
        assert_eq!(view.column_index("x2"), Some(1));
    }

    #[test]
    fn test_schema_errors() {
        let table = sample_table();

        let err = DatasetView::new(&table, &["x1", "x9"], "y").unwrap_err();
        assert!(matches!(err, RegressionError::Schema(SchemaError::ColumnNotFound(ref c)) if c == "x9"));

        let err = DatasetView::new(&table, &["x1"], "nope").unwrap_err();
        assert!(err.is_schema());

        let err = DatasetView::new(&table, &["x1", "y"], "y").unwrap_err();
        assert!(matches!(
            err,
            RegressionError::Schema(SchemaError::CriterionIsExplanatory(_))
        ));

        let empty: [&str; 0] = [];
        let err = DatasetView::new(&table, &empty, "y").unwrap_err();
        assert!(matches!(
            err,
            RegressionError::Schema(SchemaError::NoExplanatoryColumns)
        ));

        let err = DatasetView::new(&table, &["x1", "x1"], "y").unwrap_err();
        assert!(matches!(
            err,
            RegressionError::Schema(SchemaError::DuplicateSelection(_))
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let table = Table::from_columns([
            ("x", Column::float(vec![1.0])),
            ("y", Column::float(vec![1.0])),
        ])
        .unwrap();
        let err = DatasetView::new(&table, &["x"], "y").unwrap_err();
        assert!(matches!(
            err,
            RegressionError::Schema(SchemaError::InsufficientObservations { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn test_missing_values_policies() {
        let table = Table::from_columns([
            ("x", Column::float(vec![1.0, f64::NAN, 3.0, 4.0])),
            ("y", Column::text(&["1", "2", "NA", "4"])),
        ])
        .unwrap();

        let err = DatasetView::new(&table, &["x"], "y").unwrap_err();
        assert!(matches!(
            err,
            RegressionError::MissingValues(NaError::NaValuesPresent { n_na: 2 })
        ));

        let view = DatasetView::with_na_action(&table, &["x"], "y", NaAction::Omit).unwrap();
        assert_eq!(view.n_observations(), 2);
        assert_eq!(view.na_info().kept_indices, vec![0, 3]);
    }

    #[test]
    fn test_type_error() {
        let table = Table::from_columns([
            ("x", Column::text(&["1", "two", "3"])),
            ("y", Column::float(vec![1.0, 2.0, 3.0])),
        ])
        .unwrap();
        let err = DatasetView::new(&table, &["x"], "y").unwrap_err();
        assert!(matches!(err, RegressionError::Type { row: 1, .. }));
    }

    #[test]
    fn test_from_parts() {
        let x = Mat::from_fn(3, 1, |i, _| i as f64);
        let y = Col::from_fn(3, |i| 2.0 * i as f64);
        let view = DatasetView::from_parts(&["t"], "y", x, y).unwrap();
        assert_eq!(view.n_observations(), 3);

        let x = Mat::from_fn(3, 2, |i, _| i as f64);
        let y = Col::from_fn(3, |i| i as f64);
        let err = DatasetView::from_parts(&["t"], "y", x, y).unwrap_err();
        assert!(matches!(err, RegressionError::Dimension { expected: 1, got: 2 }));
    }
}
