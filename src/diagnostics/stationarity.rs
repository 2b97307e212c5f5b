//! Augmented Dickey-Fuller unit-root test.
//!
//! Tests H0: the series has a unit root (non-stationary). The test
//! regression is
//!
//! ```text
//! Δy_t = ρ y_{t-1} + [c + δ t] + Σ_{i=1..k} γ_i Δy_{t-i} + ε_t
//! ```
//!
//! and the statistic is the t-ratio of ρ. P-values use the MacKinnon (1994)
//! response surfaces and critical values the MacKinnon (2010) tables.

use crate::core::{AdfOptions, AdfRegression, Autolag, RegressionError};
use crate::solvers::LeastSquares;
use faer::{Col, Mat};
use statrs::distribution::{ContinuousCDF, Normal};

/// Critical values of the ADF statistic.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CriticalValues {
    pub one_percent: f64,
    pub five_percent: f64,
    pub ten_percent: f64,
}

/// Result of an ADF test.
#[derive(Debug, Clone, PartialEq)]
pub struct AdfResult {
    /// t-ratio of the lagged level.
    pub statistic: f64,
    /// MacKinnon approximate p-value.
    pub p_value: f64,
    /// Number of lagged differences in the final regression.
    pub used_lag: usize,
    /// Observations in the final regression.
    pub n_obs: usize,
    pub critical_values: CriticalValues,
    /// Best information criterion when the lag was chosen automatically.
    pub ic_best: Option<f64>,
    pub regression: AdfRegression,
    /// `p_value < significance`: the unit-root null is rejected.
    pub rejects_unit_root: bool,
}

// MacKinnon (1994) response-surface coefficients for one integrated series,
// lowest order first.
const TAU_NC_SMALLP: [f64; 3] = [0.6344, 1.2378, 0.032496];
const TAU_NC_LARGEP: [f64; 4] = [0.4797, 0.93557, -0.06999, 0.033066];
const TAU_C_SMALLP: [f64; 3] = [2.1659, 1.4412, 0.038269];
const TAU_C_LARGEP: [f64; 4] = [1.7339, 0.93202, -0.12745, -0.010368];
const TAU_CT_SMALLP: [f64; 3] = [3.2512, 1.6047, 0.049588];
const TAU_CT_LARGEP: [f64; 4] = [2.5261, 0.61654, -0.37956, -0.060285];

// MacKinnon (2010) critical value surfaces: b0 + b1/n + b2/n² + b3/n³
const CRIT_NC: [[f64; 4]; 3] = [
    [-2.56574, -2.2358, -3.627, 0.0],
    [-1.94100, -0.2686, -3.365, 31.223],
    [-1.61682, 0.2656, -2.714, 25.364],
];
const CRIT_C: [[f64; 4]; 3] = [
    [-3.43035, -6.5393, -16.786, -79.433],
    [-2.86154, -2.8903, -4.234, -40.040],
    [-2.56677, -1.5384, -2.809, 0.0],
];
const CRIT_CT: [[f64; 4]; 3] = [
    [-3.95877, -9.0531, -28.428, -134.155],
    [-3.41049, -4.3904, -9.036, -45.374],
    [-3.12705, -2.5856, -3.925, -22.380],
];

/// Evaluate `c0 + c1 x + c2 x² + ...`.
fn polyval(coefficients: &[f64], x: f64) -> f64 {
    coefficients.iter().rev().fold(0.0, |acc, &c| acc * x + c)
}

/// MacKinnon (1994) approximate p-value of an ADF statistic.
pub fn mackinnon_p_value(statistic: f64, regression: AdfRegression) -> f64 {
    let (tau_max, tau_min, tau_star, small, large): (f64, f64, f64, &[f64], &[f64]) =
        match regression {
            AdfRegression::NoConstant => {
                (f64::INFINITY, -19.04, -1.04, &TAU_NC_SMALLP, &TAU_NC_LARGEP)
            }
            AdfRegression::Constant => (2.74, -18.83, -1.61, &TAU_C_SMALLP, &TAU_C_LARGEP),
            AdfRegression::ConstantTrend => {
                (0.7, -16.18, -2.89, &TAU_CT_SMALLP, &TAU_CT_LARGEP)
            }
        };

    if statistic > tau_max {
        return 1.0;
    }
    if statistic < tau_min {
        return 0.0;
    }

    let coefficients = if statistic <= tau_star { small } else { large };
    let z = polyval(coefficients, statistic);
    Normal::new(0.0, 1.0).map_or(f64::NAN, |d| d.cdf(z))
}

/// MacKinnon (2010) critical values for a regression with `n_obs` rows.
pub fn mackinnon_critical_values(regression: AdfRegression, n_obs: usize) -> CriticalValues {
    let table = match regression {
        AdfRegression::NoConstant => &CRIT_NC,
        AdfRegression::Constant => &CRIT_C,
        AdfRegression::ConstantTrend => &CRIT_CT,
    };
    let inv_n = 1.0 / n_obs as f64;
    CriticalValues {
        one_percent: polyval(&table[0], inv_n),
        five_percent: polyval(&table[1], inv_n),
        ten_percent: polyval(&table[2], inv_n),
    }
}

/// Default maximum lag: `ceil(12 (n/100)^{1/4})`, bounded by `n/2 - ntrend - 1`.
fn max_lag(n: usize, options: &AdfOptions) -> Result<usize, RegressionError> {
    let ntrend = options.regression.n_trend();
    let bound = (n / 2).checked_sub(ntrend + 1).ok_or(
        RegressionError::InsufficientObservations {
            needed: 2 * (ntrend + 1),
            got: n,
        },
    )?;

    match options.max_lag {
        Some(lag) if lag > bound => Err(RegressionError::NumericalError(format!(
            "max_lag {lag} exceeds {bound} for a series of length {n}"
        ))),
        Some(lag) => Ok(lag),
        None => {
            let default = (12.0 * (n as f64 / 100.0).powf(0.25)).ceil() as usize;
            Ok(default.min(bound))
        }
    }
}

/// Test regression for `lag` lagged differences, on rows `start..n-1`.
///
/// Column 0 is the lagged level, followed by the deterministic terms and
/// the lagged differences.
fn design(
    series: &[f64],
    diff: &[f64],
    lag: usize,
    start: usize,
    regression: AdfRegression,
) -> (Mat<f64>, Col<f64>) {
    let nobs = diff.len() - start;
    let ntrend = regression.n_trend();

    let x = Mat::from_fn(nobs, 1 + ntrend + lag, |r, c| {
        let t = start + r;
        match c {
            0 => series[t],
            c if c <= ntrend => {
                if c == 1 {
                    1.0
                } else {
                    (r + 1) as f64
                }
            }
            c => diff[t - (c - ntrend)],
        }
    });
    let y = Col::from_fn(nobs, |r| diff[start + r]);
    (x, y)
}

/// Run the ADF test on a series.
///
/// # Errors
/// `InsufficientObservations` when the series is too short for the chosen
/// regression, `NumericalError` when the test regression is degenerate.
pub fn adf_test(
    series: &[f64],
    options: &AdfOptions,
    significance: f64,
) -> Result<AdfResult, RegressionError> {
    let n = series.len();
    let maxlag = max_lag(n, options)?;
    let diff: Vec<f64> = series.windows(2).map(|w| w[1] - w[0]).collect();
    let solver = LeastSquares::builder().with_intercept(false).build();

    let (used_lag, ic_best) = match options.autolag {
        Autolag::Fixed => (maxlag, None),
        Autolag::Aic | Autolag::Bic => {
            // Same sample for every candidate so the criteria are comparable
            let mut best: Option<(f64, usize)> = None;
            for lag in 0..=maxlag {
                let (x, y) = design(series, &diff, lag, maxlag, options.regression);
                let Ok(fitted) = solver.fit(&x, &y) else {
                    continue;
                };
                let result = fitted.result();
                let ic = match options.autolag {
                    Autolag::Bic => result.bic,
                    _ => result.aic,
                };
                if ic.is_finite() && best.map_or(true, |(b, _)| ic < b) {
                    best = Some((ic, lag));
                }
            }
            let (ic, lag) = best.ok_or_else(|| {
                RegressionError::NumericalError("no ADF lag order could be fit".to_string())
            })?;
            (lag, Some(ic))
        }
    };

    let (x, y) = design(series, &diff, used_lag, used_lag, options.regression);
    let n_obs = y.nrows();
    let fitted = LeastSquares::builder()
        .with_intercept(false)
        .compute_inference(true)
        .build()
        .fit(&x, &y)?;
    let result = fitted.result();

    let statistic = result.t_statistic(0).unwrap_or(f64::NAN);
    if !statistic.is_finite() {
        return Err(RegressionError::NumericalError(
            "ADF statistic is not finite".to_string(),
        ));
    }

    let p_value = mackinnon_p_value(statistic, options.regression);
    log::debug!("ADF statistic {statistic:.4} (lag {used_lag}, n = {n_obs}), p = {p_value:.4}");

    Ok(AdfResult {
        statistic,
        p_value,
        used_lag,
        n_obs,
        critical_values: mackinnon_critical_values(options.regression, n_obs),
        ic_best,
        regression: options.regression,
        rejects_unit_root: p_value < significance,
    })
}
