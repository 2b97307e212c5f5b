//! OLS with full inference and residual diagnostics.

use crate::core::{
    AdfOptions, Inference, LeastSquaresResult, NaInfo, OptionsError, RegressionError,
    StatisticalOlsOptions,
};
use crate::data::DatasetView;
use crate::diagnostics::{standardized_residuals, Diagnostics};
use crate::solvers::least_squares::{predict_linear, LeastSquares};
use crate::solvers::traits::{FittedRegressor, Regressor};
use crate::utils::prepend_intercept;
use faer::{Col, Mat};

/// Name of the intercept term in the term table.
pub const INTERCEPT: &str = "Intercept";

/// Statistical OLS strategy.
///
/// Fits `criterion ~ Intercept + explanatory...` on the design `[1 | X]` and
/// then runs the stationarity, autocorrelation, VIF, Durbin-Watson and
/// Jarque-Bera diagnostics on the result.
///
/// # Errors
/// `RegressionError::SingularMatrix` when `[1 | X]` is not of full column
/// rank, including every case with fewer observations than parameters.
#[derive(Debug, Clone, Default)]
pub struct StatisticalOlsRegressor {
    options: StatisticalOlsOptions,
}

impl StatisticalOlsRegressor {
    /// Create a regressor with the given options.
    pub fn new(options: StatisticalOlsOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> StatisticalOlsRegressorBuilder {
        StatisticalOlsRegressorBuilder::default()
    }

    /// Options used for fitting.
    pub fn options(&self) -> &StatisticalOlsOptions {
        &self.options
    }
}

impl Regressor for StatisticalOlsRegressor {
    type Fitted = FittedStatisticalOls;

    fn fit(&self, view: &DatasetView) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;

        let x = view.explanatory_matrix();
        let y = view.criterion_vector();

        let design = prepend_intercept(x);
        let n_params = design.ncols();
        if !LeastSquares::is_full_rank(&design, self.options.rank_tolerance) {
            let rank = LeastSquares::numerical_rank(&design, self.options.rank_tolerance);
            return Err(RegressionError::SingularMatrix { rank, n_params });
        }

        log::debug!(
            "fitting statistical OLS: {} ~ {} ({} observations)",
            view.criterion_column(),
            view.explanatory_columns().join(" + "),
            view.n_observations()
        );

        let result = LeastSquares::builder()
            .with_intercept(true)
            .compute_inference(true)
            .confidence_level(self.options.confidence_level)
            .rank_tolerance(self.options.rank_tolerance)
            .build()
            .fit(x, y)?
            .into_result();

        let terms = term_table(view.explanatory_columns(), &result);
        let summary = FitSummary::from_result(&result);

        let residuals: Vec<f64> = result.residuals.iter().copied().collect();
        let diagnostics =
            Diagnostics::compute(view.explanatory_columns(), x, &residuals, &self.options);

        Ok(FittedStatisticalOls {
            explanatory_columns: view.explanatory_columns().to_vec(),
            terms,
            summary,
            diagnostics,
            na_info: view.na_info().clone(),
            result,
        })
    }
}

/// Inference for one model term.
#[derive(Debug, Clone, PartialEq)]
pub struct TermEstimate {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_statistic: f64,
    pub p_value: f64,
    /// (lower, upper) at the configured confidence level.
    pub conf_interval: (f64, f64),
}

fn term_table(names: &[String], result: &LeastSquaresResult) -> Vec<TermEstimate> {
    let inference = result.inference.as_ref();
    let intercept_inference = inference.and_then(|inf| inf.intercept);

    let intercept = TermEstimate {
        name: INTERCEPT.to_string(),
        estimate: result.intercept.unwrap_or(f64::NAN),
        std_error: intercept_inference.map_or(f64::NAN, |i| i.std_error),
        t_statistic: intercept_inference.map_or(f64::NAN, |i| i.t_statistic),
        p_value: intercept_inference.map_or(f64::NAN, |i| i.p_value),
        conf_interval: intercept_inference.map_or((f64::NAN, f64::NAN), |i| i.conf_interval),
    };

    let terms = names.iter().enumerate().map(|(j, name)| {
        let at = |pick: &dyn Fn(&Inference) -> f64| inference.map_or(f64::NAN, pick);
        TermEstimate {
            name: name.clone(),
            estimate: result.coefficients[j],
            std_error: at(&|inf| inf.std_errors[j]),
            t_statistic: at(&|inf| inf.t_statistics[j]),
            p_value: at(&|inf| inf.p_values[j]),
            conf_interval: (at(&|inf| inf.conf_lower[j]), at(&|inf| inf.conf_upper[j])),
        }
    });

    std::iter::once(intercept).chain(terms).collect()
}

/// Model-level fit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub n_observations: usize,
    pub df_model: usize,
    pub df_residual: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: f64,
    pub f_pvalue: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Residual standard error, sqrt(RSS / df_residual).
    pub residual_std_error: f64,
}

impl FitSummary {
    fn from_result(result: &LeastSquaresResult) -> Self {
        Self {
            n_observations: result.n_observations,
            df_model: result.model_df(),
            df_residual: result.residual_df(),
            r_squared: result.r_squared,
            adj_r_squared: result.adj_r_squared,
            f_statistic: result.f_statistic,
            f_pvalue: result.f_pvalue,
            log_likelihood: result.log_likelihood,
            aic: result.aic,
            bic: result.bic,
            residual_std_error: result.rmse,
        }
    }
}

/// A fitted statistical OLS model.
#[derive(Debug, Clone)]
pub struct FittedStatisticalOls {
    explanatory_columns: Vec<String>,
    terms: Vec<TermEstimate>,
    summary: FitSummary,
    diagnostics: Diagnostics,
    na_info: NaInfo,
    result: LeastSquaresResult,
}

impl FittedStatisticalOls {
    /// Term table: `Intercept` first, then the explanatory columns in order.
    pub fn terms(&self) -> &[TermEstimate] {
        &self.terms
    }

    /// Look up a term by name.
    pub fn term(&self, name: &str) -> Option<&TermEstimate> {
        self.terms.iter().find(|t| t.name == name)
    }

    /// Fit statistics.
    pub fn summary(&self) -> &FitSummary {
        &self.summary
    }

    /// Residual diagnostics.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Residuals, one per observation in the view.
    pub fn residuals(&self) -> &Col<f64> {
        &self.result.residuals
    }

    /// Fitted values, one per observation in the view.
    pub fn fitted_values(&self) -> &Col<f64> {
        &self.result.fitted_values
    }

    /// Residuals padded with NaN back to the table length when the view was
    /// built with `NaAction::Exclude`; otherwise the plain residuals.
    pub fn residuals_expanded(&self) -> Col<f64> {
        self.na_info.expand(&self.result.residuals)
    }

    /// Residuals divided by the residual standard error.
    pub fn standardized_residuals(&self) -> Col<f64> {
        standardized_residuals(&self.result.residuals, self.result.mse)
    }

    /// Full least-squares result.
    pub fn result(&self) -> &LeastSquaresResult {
        &self.result
    }
}

impl FittedRegressor for FittedStatisticalOls {
    fn explanatory_columns(&self) -> &[String] {
        &self.explanatory_columns
    }

    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64> {
        predict_linear(
            x,
            &self.result.coefficients,
            &self.result.aliased,
            self.result.intercept.unwrap_or(0.0),
        )
    }
}

/// Builder for `StatisticalOlsRegressor`.
#[derive(Debug, Clone, Default)]
pub struct StatisticalOlsRegressorBuilder {
    options: StatisticalOlsOptions,
}

impl StatisticalOlsRegressorBuilder {
    /// Set the confidence level for confidence intervals.
    pub fn confidence_level(mut self, level: f64) -> Self {
        self.options.confidence_level = level;
        self
    }

    /// Set the rank tolerance for QR decomposition.
    pub fn rank_tolerance(mut self, tol: f64) -> Self {
        self.options.rank_tolerance = tol;
        self
    }

    /// Set the maximum ACF lag.
    pub fn acf_lags(mut self, lags: usize) -> Self {
        self.options.acf_lags = lags;
        self
    }

    /// Set the stationarity test options.
    pub fn adf(mut self, adf: AdfOptions) -> Self {
        self.options.adf = adf;
        self
    }

    /// Set the VIF flagging threshold.
    pub fn vif_threshold(mut self, threshold: f64) -> Self {
        self.options.vif_threshold = threshold;
        self
    }

    /// Set the significance level of the ADF judgment.
    pub fn significance(mut self, alpha: f64) -> Self {
        self.options.significance = alpha;
        self
    }

    /// Build the regressor, validating the options.
    pub fn build(self) -> Result<StatisticalOlsRegressor, OptionsError> {
        self.options.validate()?;
        Ok(StatisticalOlsRegressor::new(self.options))
    }

    /// Build without validation; `fit` still validates.
    pub fn build_unchecked(self) -> StatisticalOlsRegressor {
        StatisticalOlsRegressor::new(self.options)
    }
}
