//! Coefficient inference calculations.

use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::utils::{pivoted_rank, prepend_intercept, scale_columns};

/// Computes inference statistics for regression coefficients.
pub struct CoefficientInference;

impl CoefficientInference {
    /// Compute standard errors for OLS coefficients without an intercept.
    ///
    /// SE(β_j) = sqrt(σ² * (X'X)^(-1)_{jj})
    pub fn standard_errors(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
        tolerance: f64,
    ) -> Result<Col<f64>, &'static str> {
        let n_features = x.ncols();
        let n_active: usize = aliased.iter().filter(|&&a| !a).count();

        if n_active == 0 {
            return Err("All features are aliased");
        }

        let active: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();
        let x_active = Mat::from_fn(x.nrows(), n_active, |i, k| x[(i, active[k])]);
        let xtx_inv = Self::gram_inverse_diagonal(&x_active, tolerance)?;

        let mut se = Col::from_fn(n_features, |_| f64::NAN);
        for (k, &j) in active.iter().enumerate() {
            let var = mse * xtx_inv[k];
            se[j] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
        }

        Ok(se)
    }

    /// Compute standard errors for intercept and coefficients using the
    /// augmented design matrix [1 | X], matching R's `lm()`.
    ///
    /// Returns (coefficient_SE, intercept_SE).
    pub fn standard_errors_with_intercept(
        x: &Mat<f64>,
        mse: f64,
        aliased: &[bool],
        tolerance: f64,
    ) -> Result<(Col<f64>, f64), &'static str> {
        let n_features = x.ncols();
        let active: Vec<usize> = (0..n_features).filter(|&j| !aliased[j]).collect();

        // [1 | X_active]
        let x_active = Mat::from_fn(x.nrows(), active.len(), |i, k| x[(i, active[k])]);
        let x_aug = prepend_intercept(&x_active);
        let xtx_aug_inv = Self::gram_inverse_diagonal(&x_aug, tolerance)?;

        let se_intercept = (mse * xtx_aug_inv[0]).sqrt();

        let mut se_coef = Col::from_fn(n_features, |_| f64::NAN);
        for (k, &j) in active.iter().enumerate() {
            let var = mse * xtx_aug_inv[k + 1];
            se_coef[j] = if var >= 0.0 { var.sqrt() } else { f64::NAN };
        }

        Ok((se_coef, se_intercept))
    }

    /// Compute t-statistics for coefficients.
    ///
    /// t_j = β_j / SE(β_j)
    pub fn t_statistics(coefficients: &Col<f64>, std_errors: &Col<f64>) -> Col<f64> {
        Col::from_fn(coefficients.nrows(), |j| {
            if std_errors[j].is_nan() || std_errors[j] == 0.0 {
                f64::NAN
            } else {
                coefficients[j] / std_errors[j]
            }
        })
    }

    /// Two-sided p-value for a single t-statistic.
    pub fn p_value(t: f64, df: f64) -> f64 {
        if df <= 0.0 || t.is_nan() {
            return f64::NAN;
        }
        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => 2.0 * (1.0 - dist.cdf(t.abs())),
            Err(_) => f64::NAN,
        }
    }

    /// Compute p-values from t-statistics.
    ///
    /// p_j = 2 * P(|T| > |t_j|) where T ~ t(df)
    pub fn p_values(t_statistics: &Col<f64>, df: f64) -> Col<f64> {
        Col::from_fn(t_statistics.nrows(), |j| Self::p_value(t_statistics[j], df))
    }

    /// Critical value t_{1-α/2, df}.
    pub fn t_critical(df: f64, confidence_level: f64) -> f64 {
        if df <= 0.0 {
            return f64::NAN;
        }
        StudentsT::new(0.0, 1.0, df)
            .map(|d| d.inverse_cdf(1.0 - (1.0 - confidence_level) / 2.0))
            .unwrap_or(f64::NAN)
    }

    /// Compute confidence intervals for coefficients.
    ///
    /// CI_j = β_j ± t_{α/2, df} * SE(β_j)
    pub fn confidence_intervals(
        coefficients: &Col<f64>,
        std_errors: &Col<f64>,
        df: f64,
        confidence_level: f64,
    ) -> (Col<f64>, Col<f64>) {
        let n = coefficients.nrows();
        let t_crit = Self::t_critical(df, confidence_level);

        let lower = Col::from_fn(n, |j| coefficients[j] - t_crit * std_errors[j]);
        let upper = Col::from_fn(n, |j| coefficients[j] + t_crit * std_errors[j]);

        (lower, upper)
    }

    /// Diagonal of (A'A)^(-1) from a column-pivoted QR of A with unit-norm
    /// columns, without forming A'A.
    ///
    /// With `A D^-1 P = Q R`, entry j is the squared norm of row `perm(j)` of
    /// `R^-1`, divided by `d_j²`.
    fn gram_inverse_diagonal(a: &Mat<f64>, tolerance: f64) -> Result<Col<f64>, &'static str> {
        let size = a.ncols();
        if a.nrows() < size {
            return Err("fewer observations than columns");
        }

        let (scaled, norms) = scale_columns(a);
        let qr = scaled.col_piv_qr();
        let r = qr.R();
        if pivoted_rank(r, tolerance) < size {
            return Err("design is not of full column rank");
        }
        let perm_inv: Vec<usize> = qr.P().arrays().0.to_vec();

        // Upper-triangular inverse, one column at a time
        let mut r_inv = Mat::<f64>::zeros(size, size);
        for col in 0..size {
            for i in (0..=col).rev() {
                let mut sum = if i == col { 1.0 } else { 0.0 };
                for k in (i + 1)..=col {
                    sum -= r[(i, k)] * r_inv[(k, col)];
                }
                r_inv[(i, col)] = sum / r[(i, i)];
            }
        }

        Ok(Col::from_fn(size, |j| {
            let row = perm_inv[j];
            let norm_sq: f64 = (row..size).map(|k| r_inv[(row, k)].powi(2)).sum();
            norm_sq / norms[j].powi(2)
        }))
    }
}
