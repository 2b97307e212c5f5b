//! Error types shared by dataset construction and every fitting strategy.

use super::na_action::NaError;
use super::options::OptionsError;
use thiserror::Error;

/// Problems with the column selection or shape of a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("column '{0}' not found in table")]
    ColumnNotFound(String),

    #[error("at least one explanatory column is required")]
    NoExplanatoryColumns,

    #[error("criterion column '{0}' is also listed as an explanatory column")]
    CriterionIsExplanatory(String),

    #[error("column '{0}' is selected more than once")]
    DuplicateSelection(String),

    #[error("duplicate column name: {0}")]
    DuplicateColumn(String),

    #[error("column '{column}' has {got} rows but the table has {expected}")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },
}

/// Errors that can occur while building a dataset view, fitting or predicting.
#[derive(Debug, Error)]
pub enum RegressionError {
    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("column '{column}' is not numeric: value {value:?} at row {row} cannot be coerced")]
    Type {
        column: String,
        row: usize,
        value: String,
    },

    #[error("dimension mismatch: model was fit with {expected} explanatory columns, got {got}")]
    Dimension { expected: usize, got: usize },

    #[error("design matrix is singular: rank {rank} is below the {n_params} model parameters")]
    SingularMatrix { rank: usize, n_params: usize },

    #[error("insufficient observations: need at least {needed}, got {got}")]
    InsufficientObservations { needed: usize, got: usize },

    #[error(transparent)]
    MissingValues(#[from] NaError),

    #[error("invalid options: {0}")]
    InvalidOptions(#[from] OptionsError),

    #[error("numerical error: {0}")]
    NumericalError(String),
}

impl RegressionError {
    /// True for errors caused by the column selection (`SchemaError`).
    pub fn is_schema(&self) -> bool {
        matches!(self, RegressionError::Schema(_))
    }

    /// True for errors caused by a non-identifiable linear model.
    pub fn is_singular(&self) -> bool {
        matches!(self, RegressionError::SingularMatrix { .. })
    }
}

/// A solver stopped at its iteration budget before meeting its tolerance.
///
/// Carried on the fitted model rather than returned as an error.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvergenceWarning {
    /// Name of the solver that emitted the warning.
    pub solver: &'static str,
    /// Iterations (sweeps) performed.
    pub iterations: usize,
    /// Largest update in the final sweep.
    pub final_change: f64,
    /// Tolerance that was not reached.
    pub tolerance: f64,
}

impl std::fmt::Display for ConvergenceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} did not converge after {} iterations (last change {:.3e} > tolerance {:.1e})",
            self.solver, self.iterations, self.final_change, self.tolerance
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_conversion() {
        let err: RegressionError = SchemaError::ColumnNotFound("x9".into()).into();
        assert!(err.is_schema());
        assert!(err.to_string().contains("x9"));
    }

    #[test]
    fn test_singular_predicate() {
        let err = RegressionError::SingularMatrix {
            rank: 2,
            n_params: 3,
        };
        assert!(err.is_singular());
        assert!(!err.is_schema());
    }

    #[test]
    fn test_convergence_warning_display() {
        let w = ConvergenceWarning {
            solver: "svr",
            iterations: 10,
            final_change: 0.5,
            tolerance: 1e-3,
        };
        assert!(w.to_string().starts_with("svr did not converge after 10"));
    }
}
