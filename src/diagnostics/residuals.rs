//! Standardized residuals and residual normality.

use faer::Col;
use statrs::distribution::{ChiSquared, ContinuousCDF};

/// Compute standardized residuals: e_i / s
///
/// Where s is the residual standard error (sqrt of MSE).
pub fn standardized_residuals(residuals: &Col<f64>, mse: f64) -> Col<f64> {
    if mse <= 0.0 || !mse.is_finite() {
        return Col::from_fn(residuals.nrows(), |i| {
            if residuals[i].abs() < 1e-14 {
                0.0
            } else {
                f64::NAN
            }
        });
    }

    let s = mse.sqrt();
    Col::from_fn(residuals.nrows(), |i| residuals[i] / s)
}

/// Jarque-Bera normality test of a residual series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JarqueBera {
    pub statistic: f64,
    /// Upper tail of χ² with 2 degrees of freedom.
    pub p_value: f64,
    pub skewness: f64,
    /// Non-excess kurtosis (3 for a normal distribution).
    pub kurtosis: f64,
}

/// JB = n/6 (S² + (K - 3)² / 4) with moment estimators of skewness S and
/// kurtosis K. All fields are NaN when the residuals have zero variance.
pub fn jarque_bera(residuals: &[f64]) -> JarqueBera {
    let n = residuals.len() as f64;
    let mean = residuals.iter().sum::<f64>() / n;

    let (m2, m3, m4) = residuals.iter().fold((0.0, 0.0, 0.0), |(m2, m3, m4), &e| {
        let d = e - mean;
        (m2 + d * d, m3 + d * d * d, m4 + d * d * d * d)
    });
    let (m2, m3, m4) = (m2 / n, m3 / n, m4 / n);

    if m2 <= 0.0 || !m2.is_finite() {
        return JarqueBera {
            statistic: f64::NAN,
            p_value: f64::NAN,
            skewness: f64::NAN,
            kurtosis: f64::NAN,
        };
    }

    let skewness = m3 / m2.powf(1.5);
    let kurtosis = m4 / (m2 * m2);
    let statistic = n / 6.0 * (skewness.powi(2) + (kurtosis - 3.0).powi(2) / 4.0);
    let p_value = ChiSquared::new(2.0).map_or(f64::NAN, |d| 1.0 - d.cdf(statistic));

    JarqueBera {
        statistic,
        p_value,
        skewness,
        kurtosis,
    }
}
