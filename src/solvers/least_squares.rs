//! Ordinary least squares on a raw design matrix.
//!
//! This is the numeric engine behind the Linear and StatisticalOLS strategies,
//! the VIF auxiliary regressions and the ADF test regression.

use crate::core::{Inference, InterceptInference, LeastSquaresResult, RegressionError};
use crate::inference::CoefficientInference;
use crate::utils::{
    center_columns, center_vector, detect_constant_columns, pivoted_rank, scale_columns,
};
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, FisherSnedecor};

/// Least-squares estimator using QR decomposition with column pivoting.
///
/// Aliased (collinear) coefficients are set to NaN and contribute nothing to
/// predictions. Columns are scaled to unit norm before the decomposition and
/// `rank_tolerance` is relative to the largest pivot, so rank decisions do
/// not depend on the units of the data.
///
/// # Example
///
/// ```rust
/// use regress_harness::solvers::LeastSquares;
/// use faer::{Col, Mat};
///
/// let x = Mat::from_fn(10, 1, |i, _| i as f64);
/// let y = Col::from_fn(10, |i| 2.0 + 3.0 * i as f64);
///
/// let fitted = LeastSquares::builder().with_intercept(true).build().fit(&x, &y).unwrap();
/// assert!((fitted.result().coefficients[0] - 3.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct LeastSquares {
    with_intercept: bool,
    compute_inference: bool,
    confidence_level: f64,
    rank_tolerance: f64,
}

impl Default for LeastSquares {
    fn default() -> Self {
        Self {
            with_intercept: true,
            compute_inference: false,
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
        }
    }
}

impl LeastSquares {
    /// Create a builder for configuring the solver.
    pub fn builder() -> LeastSquaresBuilder {
        LeastSquaresBuilder::default()
    }

    /// Numerical column rank of `x` from the diagonal of the pivoted R factor
    /// of its unit-norm columns.
    pub fn numerical_rank(x: &Mat<f64>, tolerance: f64) -> usize {
        if x.nrows() == 0 || x.ncols() == 0 {
            return 0;
        }
        let (scaled, _) = scale_columns(x);
        let qr = scaled.col_piv_qr();
        pivoted_rank(qr.R(), tolerance)
    }

    /// Check if a matrix has full column rank.
    ///
    /// A matrix with fewer rows than columns is never of full column rank.
    pub fn is_full_rank(x: &Mat<f64>, tolerance: f64) -> bool {
        x.nrows() >= x.ncols() && Self::numerical_rank(x, tolerance) == x.ncols()
    }

    /// Fit the model to a design matrix and response.
    pub fn fit(&self, x: &Mat<f64>, y: &Col<f64>) -> Result<FittedLeastSquares, RegressionError> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if x.nrows() != y.nrows() {
            return Err(RegressionError::Dimension {
                expected: x.nrows(),
                got: y.nrows(),
            });
        }

        if n_samples < 2 {
            return Err(RegressionError::InsufficientObservations {
                needed: 2,
                got: n_samples,
            });
        }

        let constant_cols = detect_constant_columns(x, self.rank_tolerance);

        let (coefficients, intercept, aliased, rank) = if self.with_intercept {
            let (x_centered, x_means) = center_columns(x);
            let (y_centered, y_mean) = center_vector(y);

            let (coefficients, aliased, rank) =
                self.solve_with_qr(&x_centered, &y_centered, &constant_cols);

            // intercept = y_mean - x_means' * coefficients
            let mut intercept = y_mean;
            for j in 0..n_features {
                if !aliased[j] {
                    intercept -= x_means[j] * coefficients[j];
                }
            }
            (coefficients, Some(intercept), aliased, rank)
        } else {
            if n_features == 0 || Self::all_zero(x) {
                return Err(RegressionError::NumericalError(
                    "no usable columns for a model without intercept".to_string(),
                ));
            }
            // Constant (non-zero) columns carry the level when there is no intercept.
            let no_constants = vec![false; n_features];
            let (coefficients, aliased, rank) = self.solve_with_qr(x, y, &no_constants);
            (coefficients, None, aliased, rank)
        };

        let fitted_values = predict_linear(x, &coefficients, &aliased, intercept.unwrap_or(0.0));
        let residuals = Col::from_fn(n_samples, |i| y[i] - fitted_values[i]);

        let n_params = rank + usize::from(intercept.is_some());
        let result = self.compute_statistics(
            x,
            y,
            coefficients,
            intercept,
            residuals,
            fitted_values,
            aliased,
            rank,
            n_params,
        )?;

        Ok(FittedLeastSquares { result })
    }

    fn all_zero(x: &Mat<f64>) -> bool {
        (0..x.ncols()).all(|j| (0..x.nrows()).all(|i| x[(i, j)] == 0.0))
    }

    /// Solve the least squares problem using QR decomposition with column pivoting.
    ///
    /// Wide designs are allowed; the columns beyond the numerical rank are
    /// aliased.
    fn solve_with_qr(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        constant_cols: &[bool],
    ) -> (Col<f64>, Vec<bool>, usize) {
        let n_features = x.ncols();
        let n_samples = x.nrows();

        if n_features == 0 {
            return (Col::zeros(0), Vec::new(), 0);
        }

        // Constant columns are zeroed so the pivoting sends them last
        let masked = Mat::from_fn(n_samples, n_features, |i, j| {
            if constant_cols[j] {
                0.0
            } else {
                x[(i, j)]
            }
        });
        let (scaled, norms) = scale_columns(&masked);

        let qr = scaled.col_piv_qr();
        let q = qr.compute_Q();
        let r = qr.R();

        // perm_inv[j] = position of original column j in the pivoted order
        let perm_inv: Vec<usize> = qr.P().arrays().0.to_vec();
        let rank = pivoted_rank(r, self.rank_tolerance);

        if rank == 0 {
            return (
                Col::from_fn(n_features, |_| f64::NAN),
                vec![true; n_features],
                0,
            );
        }

        let aliased: Vec<bool> = (0..n_features)
            .map(|j| constant_cols[j] || perm_inv[j] >= rank)
            .collect();

        let qty = q.transpose() * y;

        // Back-substitution on the leading rank x rank block of R
        let mut beta_reduced = Col::<f64>::zeros(rank);
        for i in (0..rank).rev() {
            let mut sum = qty[i];
            for j in (i + 1)..rank {
                sum -= r[(i, j)] * beta_reduced[j];
            }
            beta_reduced[i] = sum / r[(i, i)];
        }

        let coefficients = Col::from_fn(n_features, |j| {
            if aliased[j] {
                f64::NAN
            } else {
                beta_reduced[perm_inv[j]] / norms[j]
            }
        });

        (coefficients, aliased, rank)
    }

    /// Compute fit statistics and optionally inference statistics.
    #[allow(clippy::too_many_arguments)]
    fn compute_statistics(
        &self,
        x: &Mat<f64>,
        y: &Col<f64>,
        coefficients: Col<f64>,
        intercept: Option<f64>,
        residuals: Col<f64>,
        fitted_values: Col<f64>,
        aliased: Vec<bool>,
        rank: usize,
        n_params: usize,
    ) -> Result<LeastSquaresResult, RegressionError> {
        let n = y.nrows();
        let n_f = n as f64;

        let y_mean: f64 = y.iter().sum::<f64>() / n_f;
        // Uncentred total sum of squares for models without intercept
        let tss: f64 = if intercept.is_some() {
            y.iter().map(|&yi| (yi - y_mean).powi(2)).sum()
        } else {
            y.iter().map(|&yi| yi.powi(2)).sum()
        };
        let rss: f64 = residuals.iter().map(|&r| r.powi(2)).sum();

        let r_squared = if tss > 0.0 {
            (1.0 - rss / tss).clamp(0.0, 1.0)
        } else if rss < 1e-10 {
            1.0
        } else {
            0.0
        };

        let df_total = if intercept.is_some() { n_f - 1.0 } else { n_f };
        let df_resid = n.saturating_sub(n_params) as f64;
        let adj_r_squared = if df_resid > 0.0 && df_total > 0.0 {
            1.0 - (1.0 - r_squared) * df_total / df_resid
        } else {
            f64::NAN
        };

        let mse = if df_resid > 0.0 {
            rss / df_resid
        } else {
            f64::NAN
        };
        let rmse = mse.sqrt();

        let ess = tss - rss;
        let df_model = (n_params - usize::from(intercept.is_some())) as f64;
        let f_statistic = if df_model > 0.0 && df_resid > 0.0 && mse > 0.0 {
            (ess / df_model) / mse
        } else {
            f64::NAN
        };

        let f_pvalue = if f_statistic.is_finite() {
            FisherSnedecor::new(df_model, df_resid)
                .map_or(f64::NAN, |d| 1.0 - d.cdf(f_statistic))
        } else {
            f64::NAN
        };

        // Concentrated Gaussian log-likelihood with the ML variance rss / n
        let log_likelihood = if rss > 0.0 {
            -0.5 * n_f * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0)
        } else {
            f64::NAN
        };

        let k = n_params as f64;
        let aic = -2.0 * log_likelihood + 2.0 * k;
        let bic = -2.0 * log_likelihood + k * n_f.ln();

        let mut result = LeastSquaresResult {
            coefficients,
            intercept,
            residuals,
            fitted_values,
            rank,
            n_parameters: n_params,
            n_observations: n,
            aliased,
            r_squared,
            adj_r_squared,
            mse,
            rmse,
            f_statistic,
            f_pvalue,
            log_likelihood,
            aic,
            bic,
            inference: None,
        };

        if self.compute_inference {
            result.inference = self.compute_inference(x, &result)?;
        }

        Ok(result)
    }

    /// Standard errors, t tests and confidence intervals for every term.
    ///
    /// `Ok(None)` when the residual df is zero. The non-aliased columns are of
    /// full rank by construction, so a singular cross-product is an error.
    fn compute_inference(
        &self,
        x: &Mat<f64>,
        result: &LeastSquaresResult,
    ) -> Result<Option<Inference>, RegressionError> {
        let df = result.residual_df() as f64;
        if df <= 0.0 || !result.mse.is_finite() {
            return Ok(None);
        }

        let tolerance = self.rank_tolerance;
        let (se, se_int) = match result.intercept {
            Some(_) => CoefficientInference::standard_errors_with_intercept(
                x,
                result.mse,
                &result.aliased,
                tolerance,
            )
            .map(|(se, se_int)| (se, Some(se_int))),
            None => CoefficientInference::standard_errors(x, result.mse, &result.aliased, tolerance)
                .map(|se| (se, None)),
        }
        .map_err(|reason| {
            RegressionError::NumericalError(format!("standard errors unavailable: {reason}"))
        })?;

        let t_statistics = CoefficientInference::t_statistics(&result.coefficients, &se);
        let p_values = CoefficientInference::p_values(&t_statistics, df);
        let (conf_lower, conf_upper) = CoefficientInference::confidence_intervals(
            &result.coefficients,
            &se,
            df,
            self.confidence_level,
        );

        let intercept = result.intercept.zip(se_int).map(|(b0, se0)| {
            let t_statistic = if se0 > 0.0 { b0 / se0 } else { f64::NAN };
            let t_crit = CoefficientInference::t_critical(df, self.confidence_level);
            InterceptInference {
                std_error: se0,
                t_statistic,
                p_value: CoefficientInference::p_value(t_statistic, df),
                conf_interval: (b0 - t_crit * se0, b0 + t_crit * se0),
            }
        });

        Ok(Some(Inference {
            std_errors: se,
            t_statistics,
            p_values,
            conf_lower,
            conf_upper,
            confidence_level: self.confidence_level,
            intercept,
        }))
    }
}

/// Evaluate `intercept + X b`, skipping aliased coefficients.
pub(crate) fn predict_linear(
    x: &Mat<f64>,
    coefficients: &Col<f64>,
    aliased: &[bool],
    intercept: f64,
) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| {
        let mut pred = intercept;
        for j in 0..x.ncols() {
            if !aliased[j] {
                pred += x[(i, j)] * coefficients[j];
            }
        }
        pred
    })
}

/// A fitted least-squares model.
#[derive(Debug, Clone)]
pub struct FittedLeastSquares {
    result: LeastSquaresResult,
}

impl FittedLeastSquares {
    /// Coefficients, fit statistics and inference.
    pub fn result(&self) -> &LeastSquaresResult {
        &self.result
    }

    /// Consume the fit and return its result.
    pub fn into_result(self) -> LeastSquaresResult {
        self.result
    }

    /// Predict on a matrix with the same columns as the training design.
    pub fn predict(&self, x: &Mat<f64>) -> Col<f64> {
        predict_linear(
            x,
            &self.result.coefficients,
            &self.result.aliased,
            self.result.intercept.unwrap_or(0.0),
        )
    }
}

/// Builder for `LeastSquares`.
#[derive(Debug, Clone, Default)]
pub struct LeastSquaresBuilder {
    solver: LeastSquares,
}

impl LeastSquaresBuilder {
    /// Set whether to include an intercept term.
    pub fn with_intercept(mut self, include: bool) -> Self {
        self.solver.with_intercept = include;
        self
    }

    /// Set whether to compute inference statistics.
    pub fn compute_inference(mut self, compute: bool) -> Self {
        self.solver.compute_inference = compute;
        self
    }

    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.solver.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition, relative to the largest
    /// pivot of the unit-norm design.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.solver.rank_tolerance = tol;
        self
    }

    /// Build the solver.
    pub fn build(self) -> LeastSquares {
        self.solver
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::prepend_intercept;
    use approx::assert_relative_eq;

    #[test]
    fn test_simple_fit() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let fitted = LeastSquares::builder().build().fit(&x, &y).expect("model should fit");
        let result = fitted.result();

        assert_relative_eq!(result.coefficients[0], 3.0, epsilon = 1e-10);
        assert_relative_eq!(result.intercept.expect("intercept exists"), 2.0, epsilon = 1e-10);
        assert_relative_eq!(result.r_squared, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_predict() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(5, |i| 2.0 + 3.0 * i as f64);

        let fitted = LeastSquares::builder().build().fit(&x, &y).expect("model should fit");

        let x_new = Mat::from_fn(2, 1, |i, _| (i + 10) as f64);
        let preds = fitted.predict(&x_new);

        assert_relative_eq!(preds[0], 32.0, epsilon = 1e-10);
        assert_relative_eq!(preds[1], 35.0, epsilon = 1e-10);
    }

    #[test]
    fn test_no_intercept() {
        let x = Mat::from_fn(6, 1, |i, _| (i + 1) as f64);
        let y = Col::from_fn(6, |i| 4.0 * (i + 1) as f64);

        let fitted = LeastSquares::builder()
            .with_intercept(false)
            .build()
            .fit(&x, &y)
            .unwrap();
        assert!(fitted.result().intercept.is_none());
        assert_relative_eq!(fitted.result().coefficients[0], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn test_collinear_column_is_aliased() {
        let x = Mat::from_fn(8, 2, |i, j| if j == 0 { i as f64 } else { 2.0 * i as f64 });
        let y = Col::from_fn(8, |i| 1.0 + i as f64);

        let fitted = LeastSquares::builder().build().fit(&x, &y).unwrap();
        let result = fitted.result();

        assert_eq!(result.rank, 1);
        assert!(result.has_aliased());
        assert_eq!(result.aliased.iter().filter(|&&a| a).count(), 1);
        assert!(result.coefficients.iter().any(|c| c.is_nan()));
        for i in 0..8 {
            assert_relative_eq!(result.fitted_values[i], 1.0 + i as f64, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_inference_populated() {
        let x = Mat::from_fn(20, 1, |i, _| i as f64);
        let y = Col::from_fn(20, |i| 1.0 + 0.5 * i as f64 + if i % 2 == 0 { 0.3 } else { -0.3 });

        let fitted = LeastSquares::builder()
            .compute_inference(true)
            .build()
            .fit(&x, &y)
            .unwrap();
        let result = fitted.result();

        let inference = result.inference.as_ref().unwrap();
        assert_eq!(inference.std_errors.nrows(), 1);
        let (lo, hi) = inference.intercept.unwrap().conf_interval;
        assert!(lo < result.intercept.unwrap() && result.intercept.unwrap() < hi);
        assert!(result.log_likelihood.is_finite());
        assert_relative_eq!(
            result.aic,
            -2.0 * result.log_likelihood + 4.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn test_is_full_rank_wide_matrix() {
        let wide = Mat::from_fn(2, 3, |i, j| (i * 3 + j) as f64 + if i == j { 1.0 } else { 0.0 });
        assert!(!LeastSquares::is_full_rank(&wide, 1e-10));

        let tall = Mat::from_fn(5, 2, |i, j| if j == 0 { 1.0 } else { i as f64 });
        assert!(LeastSquares::is_full_rank(&tall, 1e-10));
    }

    #[test]
    fn test_rank_does_not_depend_on_units() {
        let big = Mat::from_fn(12, 3, |i, j| {
            let a = 1e5 * (1.0 + (i % 5) as f64);
            let b = 1e5 * (2.0 + (i * i % 7) as f64);
            [a, b, a + b][j]
        });
        assert_eq!(LeastSquares::numerical_rank(&prepend_intercept(&big), 1e-10), 3);

        let tiny = Mat::from_fn(30, 1, |i, _| 1e-12 * i as f64);
        assert!(LeastSquares::is_full_rank(&prepend_intercept(&tiny), 1e-10));
    }

    #[test]
    fn test_tiny_units_fit_with_inference() {
        let x = Mat::from_fn(30, 1, |i, _| 1e-8 * i as f64);
        let y = Col::from_fn(30, |i| 0.5 * i as f64 + if i % 3 == 0 { 0.2 } else { -0.1 });

        let fitted = LeastSquares::builder()
            .compute_inference(true)
            .build()
            .fit(&x, &y)
            .unwrap();
        let result = fitted.result();

        assert_eq!(result.rank, 1);
        assert_relative_eq!(result.coefficients[0], 0.5e8, max_relative = 1e-2);
        let se = result.inference.as_ref().unwrap().std_errors[0];
        assert!(se.is_finite() && se > 0.0);
    }

    #[test]
    fn test_wide_design_aliases_extra_columns() {
        let x = Mat::from_fn(2, 2, |i, j| if j == 0 { 1.0 + i as f64 } else { 3.0 + 2.0 * i as f64 });
        let y = Col::from_fn(2, |i| 4.0 + 6.0 * i as f64);

        let fitted = LeastSquares::builder().build().fit(&x, &y).unwrap();
        let result = fitted.result();

        assert_eq!(result.rank, 1);
        assert_eq!(result.aliased.iter().filter(|&&a| a).count(), 1);
        assert_eq!(result.residual_df(), 0);
        assert!(result.mse.is_nan());
        assert_relative_eq!(result.fitted_values[1], 10.0, epsilon = 1e-9);
    }

    #[test]
    fn test_dimension_mismatch() {
        let x = Mat::from_fn(5, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| i as f64);
        let err = LeastSquares::builder().build().fit(&x, &y).unwrap_err();
        assert!(matches!(err, RegressionError::Dimension { expected: 5, got: 4 }));
    }
}
