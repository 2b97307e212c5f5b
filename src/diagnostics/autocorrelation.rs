//! Autocorrelation of residual series.

/// Sample autocorrelation function at lags `0..=max_lag`.
///
/// Uses the unadjusted estimator
///
/// ```text
/// acf(k) = Σ_{t<n-k} (x_t - m)(x_{t+k} - m) / Σ_t (x_t - m)²
/// ```
///
/// `max_lag` is capped at `n - 1`. Lag 0 is always 1; the remaining lags are
/// NaN when the series has zero variance.
pub fn acf(series: &[f64], max_lag: usize) -> Vec<f64> {
    let n = series.len();
    if n == 0 {
        return Vec::new();
    }

    let mean = series.iter().sum::<f64>() / n as f64;
    let centered: Vec<f64> = series.iter().map(|v| v - mean).collect();
    let denom: f64 = centered.iter().map(|v| v * v).sum();
    let nlags = max_lag.min(n - 1);

    (0..=nlags)
        .map(|k| {
            if k == 0 {
                1.0
            } else if denom <= 0.0 {
                f64::NAN
            } else {
                let num: f64 = centered[..n - k]
                    .iter()
                    .zip(&centered[k..])
                    .map(|(a, b)| a * b)
                    .sum();
                num / denom
            }
        })
        .collect()
}

/// Durbin-Watson statistic: Σ (e_t - e_{t-1})² / Σ e_t².
///
/// Near 2 for uncorrelated residuals, toward 0 for positive and toward 4 for
/// negative first-order autocorrelation. NaN when every residual is zero.
pub fn durbin_watson(residuals: &[f64]) -> f64 {
    let ss: f64 = residuals.iter().map(|e| e * e).sum();
    if ss <= 0.0 {
        return f64::NAN;
    }
    let diff_ss: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    diff_ss / ss
}
