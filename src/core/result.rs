//! Output of a least-squares solve on a raw design matrix.

use faer::Col;

/// Coefficients and fit statistics of one least-squares solve.
///
/// `coefficients` never includes the intercept. Aliased coefficients are NaN
/// and `aliased[j]` is set; they take no part in predictions.
#[derive(Debug, Clone)]
pub struct LeastSquaresResult {
    pub coefficients: Col<f64>,
    pub intercept: Option<f64>,
    pub residuals: Col<f64>,
    pub fitted_values: Col<f64>,

    /// Numerical rank of the design (centred when an intercept is fit).
    pub rank: usize,
    /// Non-aliased parameters, intercept included.
    pub n_parameters: usize,
    pub n_observations: usize,
    pub aliased: Vec<bool>,

    /// Centred R² with an intercept, uncentred without.
    pub r_squared: f64,
    pub adj_r_squared: f64,
    /// RSS / residual df.
    pub mse: f64,
    pub rmse: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,

    /// Present only when inference was requested and the residual df is positive.
    pub inference: Option<Inference>,
}

/// Per-coefficient standard errors, tests and intervals.
#[derive(Debug, Clone)]
pub struct Inference {
    pub std_errors: Col<f64>,
    pub t_statistics: Col<f64>,
    pub p_values: Col<f64>,
    pub conf_lower: Col<f64>,
    pub conf_upper: Col<f64>,
    pub confidence_level: f64,
    pub intercept: Option<InterceptInference>,
}

/// Inference for the intercept term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterceptInference {
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    pub conf_interval: (f64, f64),
}

impl LeastSquaresResult {
    /// n minus the number of estimated parameters.
    pub fn residual_df(&self) -> usize {
        self.n_observations.saturating_sub(self.n_parameters)
    }

    /// Parameters excluding the intercept.
    pub fn model_df(&self) -> usize {
        self.n_parameters - usize::from(self.intercept.is_some() && self.n_parameters > 0)
    }

    pub fn has_aliased(&self) -> bool {
        self.aliased.contains(&true)
    }

    /// Residual sum of squares.
    pub fn rss(&self) -> f64 {
        self.residuals.iter().map(|r| r * r).sum()
    }

    /// t statistic of coefficient `j`, if inference ran.
    pub fn t_statistic(&self, j: usize) -> Option<f64> {
        self.inference.as_ref().map(|inf| inf.t_statistics[j])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(n: usize, p: usize, intercept: Option<f64>) -> LeastSquaresResult {
        LeastSquaresResult {
            coefficients: Col::zeros(p),
            intercept,
            residuals: Col::from_fn(n, |i| i as f64),
            fitted_values: Col::zeros(n),
            rank: p,
            n_parameters: p + usize::from(intercept.is_some()),
            n_observations: n,
            aliased: vec![false; p],
            r_squared: 0.0,
            adj_r_squared: 0.0,
            mse: 0.0,
            rmse: 0.0,
            f_statistic: f64::NAN,
            f_pvalue: f64::NAN,
            log_likelihood: f64::NAN,
            aic: f64::NAN,
            bic: f64::NAN,
            inference: None,
        }
    }

    #[test]
    fn test_degrees_of_freedom() {
        let with = result(100, 3, Some(1.0));
        assert_eq!(with.residual_df(), 96);
        assert_eq!(with.model_df(), 3);

        let without = result(100, 3, None);
        assert_eq!(without.residual_df(), 97);
        assert_eq!(without.model_df(), 3);
    }

    #[test]
    fn test_rss_and_aliasing() {
        let mut r = result(3, 2, None);
        assert!((r.rss() - 5.0).abs() < 1e-12);
        assert!(!r.has_aliased());
        r.aliased[1] = true;
        assert!(r.has_aliased());
        assert_eq!(r.t_statistic(0), None);
    }
}
