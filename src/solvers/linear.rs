//! Ordinary least squares strategy returning named coefficients.

use crate::core::{LeastSquaresResult, LinearOptions, OptionsError, RegressionError};
use crate::data::DatasetView;
use crate::solvers::least_squares::{predict_linear, LeastSquares};
use crate::solvers::traits::{FittedRegressor, Regressor};
use crate::utils::parallel;
use faer::{Col, Mat};
use indexmap::IndexMap;

/// OLS-Linear strategy.
///
/// Fits by QR with column pivoting on centred data; the intercept is
/// recovered from the column means. Collinear columns are aliased: their
/// coefficient is NaN and they contribute nothing to predictions.
///
/// # Example
///
/// ```rust
/// use regress_harness::prelude::*;
///
/// let table = Table::from_columns([
///     ("x", Column::float(vec![0.0, 1.0, 2.0, 3.0])),
///     ("y", Column::float(vec![1.0, 3.0, 5.0, 7.0])),
/// ]).unwrap();
/// let view = DatasetView::new(&table, &["x"], "y").unwrap();
///
/// let fitted = LinearRegressor::default().fit(&view).unwrap();
/// assert!((fitted.coefficient("x").unwrap() - 2.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Default)]
pub struct LinearRegressor {
    options: LinearOptions,
}

impl LinearRegressor {
    /// Create a regressor with the given options.
    pub fn new(options: LinearOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> LinearRegressorBuilder {
        LinearRegressorBuilder::default()
    }

    /// Options used for fitting.
    pub fn options(&self) -> &LinearOptions {
        &self.options
    }
}

impl Regressor for LinearRegressor {
    type Fitted = FittedLinear;

    fn fit(&self, view: &DatasetView) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;
        log::debug!(
            "fitting linear model on {} rows x {} columns (intercept: {})",
            view.n_observations(),
            view.n_features(),
            self.options.fit_intercept
        );

        let solver = LeastSquares::builder()
            .with_intercept(self.options.fit_intercept)
            .rank_tolerance(self.options.rank_tolerance)
            .build();
        let x = view.explanatory_matrix();
        let y = view.criterion_vector();
        let fitted = parallel::install(self.options.parallelism, || solver.fit(x, y))??;
        let result = fitted.into_result();

        if result.has_aliased() {
            log::warn!(
                "design is rank deficient (rank {} of {}); aliased coefficients set to NaN",
                result.rank,
                view.n_features()
            );
        }

        let coefficients = view
            .explanatory_columns()
            .iter()
            .cloned()
            .zip(result.coefficients.iter().copied())
            .collect();

        Ok(FittedLinear {
            explanatory_columns: view.explanatory_columns().to_vec(),
            coefficients,
            result,
        })
    }
}

/// A fitted OLS-Linear model.
#[derive(Debug, Clone)]
pub struct FittedLinear {
    explanatory_columns: Vec<String>,
    coefficients: IndexMap<String, f64>,
    result: LeastSquaresResult,
}

impl FittedLinear {
    /// Coefficient per explanatory column, in column order.
    pub fn coefficients(&self) -> &IndexMap<String, f64> {
        &self.coefficients
    }

    /// Coefficient of a single column (NaN if aliased).
    pub fn coefficient(&self, name: &str) -> Option<f64> {
        self.coefficients.get(name).copied()
    }

    /// Intercept, 0.0 when fit without one.
    pub fn intercept(&self) -> f64 {
        self.result.intercept.unwrap_or(0.0)
    }

    /// Numerical rank of the centred design.
    pub fn rank(&self) -> usize {
        self.result.rank
    }

    /// Columns dropped as linearly dependent.
    pub fn aliased_columns(&self) -> Vec<&str> {
        self.explanatory_columns
            .iter()
            .zip(&self.result.aliased)
            .filter(|(_, &a)| a)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// In-sample R².
    pub fn r_squared(&self) -> f64 {
        self.result.r_squared
    }

    /// Full least-squares result.
    pub fn result(&self) -> &LeastSquaresResult {
        &self.result
    }
}

impl FittedRegressor for FittedLinear {
    fn explanatory_columns(&self) -> &[String] {
        &self.explanatory_columns
    }

    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64> {
        predict_linear(
            x,
            &self.result.coefficients,
            &self.result.aliased,
            self.intercept(),
        )
    }
}

/// Builder for `LinearRegressor`.
#[derive(Debug, Clone, Default)]
pub struct LinearRegressorBuilder {
    options: LinearOptions,
}

impl LinearRegressorBuilder {
    /// Set whether to include an intercept term.
    pub fn fit_intercept(mut self, include: bool) -> Self {
        self.options.fit_intercept = include;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set worker threads (`-1` for all cores).
    pub fn parallelism(mut self, threads: i32) -> Self {
        self.options.parallelism = threads;
        self
    }

    /// Build the regressor, validating the options.
    pub fn build(self) -> Result<LinearRegressor, OptionsError> {
        self.options.validate()?;
        Ok(LinearRegressor::new(self.options))
    }

    /// Build without validation; `fit` still validates.
    pub fn build_unchecked(self) -> LinearRegressor {
        LinearRegressor::new(self.options)
    }
}
