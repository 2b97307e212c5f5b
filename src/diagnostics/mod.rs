//! Residual and design diagnostics for the statistical OLS strategy.
//!
//! - **Stationarity**: Augmented Dickey-Fuller test on the residual series
//! - **Autocorrelation**: residual ACF and the Durbin-Watson statistic
//! - **VIF**: Variance Inflation Factor for multicollinearity detection
//! - **Normality**: Jarque-Bera test of the residuals
//!
//! # Example
//!
//! ```rust
//! use regress_harness::diagnostics::{acf, variance_inflation_factor};
//! use faer::Mat;
//!
//! let x = Mat::from_fn(50, 2, |i, j| if j == 0 { i as f64 } else { (i as f64).sin() });
//! let vif = variance_inflation_factor(&x);
//! assert!(vif[0] < 10.0);
//!
//! let series: Vec<f64> = (0..50).map(|i| (i as f64 * 0.3).cos()).collect();
//! assert_eq!(acf(&series, 40).len(), 41);
//! ```

mod autocorrelation;
mod residuals;
mod stationarity;
mod vif;

pub use autocorrelation::{acf, durbin_watson};
pub use residuals::{jarque_bera, standardized_residuals, JarqueBera};
pub use stationarity::{
    adf_test, mackinnon_critical_values, mackinnon_p_value, AdfResult, CriticalValues,
};
pub use vif::{high_vif_predictors, variance_inflation_factor, vif_table};

use crate::core::StatisticalOlsOptions;
use faer::Mat;
use indexmap::IndexMap;

/// Diagnostics computed on a statistical OLS fit.
#[derive(Debug, Clone)]
pub struct Diagnostics {
    /// ADF test of the residuals; `None` when the series is too short or
    /// degenerate for the test regression.
    pub stationarity: Option<AdfResult>,
    /// Residual ACF at lags `0..=min(acf_lags, n - 1)`.
    pub autocorrelation: Vec<f64>,
    /// VIF per explanatory column (intercept excluded), in column order.
    pub vif: IndexMap<String, f64>,
    /// Columns whose VIF exceeds the configured threshold.
    pub high_vif: Vec<String>,
    pub durbin_watson: f64,
    pub jarque_bera: JarqueBera,
}

impl Diagnostics {
    /// Run every diagnostic on a residual series and its explanatory matrix.
    pub fn compute(
        names: &[String],
        x: &Mat<f64>,
        residuals: &[f64],
        options: &StatisticalOlsOptions,
    ) -> Self {
        let stationarity = match adf_test(residuals, &options.adf, options.significance) {
            Ok(result) => Some(result),
            Err(e) => {
                log::warn!("ADF test skipped: {e}");
                None
            }
        };

        let vif = vif_table(names, x);
        let high_vif = high_vif_predictors(&vif, options.vif_threshold);
        if !high_vif.is_empty() {
            log::warn!(
                "multicollinearity: VIF above {} for {:?}",
                options.vif_threshold,
                high_vif
            );
        }

        Self {
            stationarity,
            autocorrelation: acf(residuals, options.acf_lags),
            vif,
            high_vif,
            durbin_watson: durbin_watson(residuals),
            jarque_bera: jarque_bera(residuals),
        }
    }

    /// True when the ADF test ran and rejected the unit-root null.
    pub fn residuals_stationary(&self) -> bool {
        self.stationarity
            .as_ref()
            .is_some_and(|s| s.rejects_unit_root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_short_series() {
        let names = vec!["a".to_string()];
        let x = Mat::from_fn(3, 1, |i, _| i as f64);
        let residuals = [0.5, -1.0, 0.5];

        let diagnostics = Diagnostics::compute(&names, &x, &residuals, &StatisticalOlsOptions::default());

        assert_eq!(diagnostics.autocorrelation.len(), 3);
        assert_eq!(diagnostics.vif["a"], 1.0);
        assert!(diagnostics.high_vif.is_empty());
        assert_eq!(diagnostics.autocorrelation[0], 1.0);
    }
}
