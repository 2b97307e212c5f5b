//! Variance Inflation Factor (VIF) for multicollinearity detection.

use crate::solvers::LeastSquares;
use crate::utils::{column, drop_column};
use faer::{Col, Mat};
use indexmap::IndexMap;

/// R² at or above `1 - VIF_R2_TOLERANCE` is reported as an infinite VIF.
const VIF_R2_TOLERANCE: f64 = 1e-14;

/// Compute Variance Inflation Factor for each explanatory column.
///
/// `x` holds the explanatory columns only; the intercept is implicit. For
/// column j:
///
/// VIF_j = 1 / (1 - R²_j)
///
/// where R²_j is the R² from regressing x_j on all other columns with an
/// intercept. This equals the VIF of design column j + 1 in `[1 | X]`.
///
/// # Interpretation
/// - VIF = 1: No correlation with other predictors
/// - VIF > 10: High multicollinearity
/// - VIF = ∞: x_j is an exact linear combination of the others
pub fn variance_inflation_factor(x: &Mat<f64>) -> Col<f64> {
    let n = x.nrows();
    let p = x.ncols();

    if n < 3 || p < 2 {
        // Regressing on the intercept alone gives R² = 0
        return Col::from_fn(p, |_| 1.0);
    }

    let model = LeastSquares::builder().with_intercept(true).build();

    Col::from_fn(p, |j| {
        let x_other = drop_column(x, j);
        let y_j = column(x, j);

        match model.fit(&x_other, &y_j) {
            Ok(fitted) => {
                let r_squared = fitted.result().r_squared;
                let vif_j = if r_squared < 1.0 - VIF_R2_TOLERANCE {
                    1.0 / (1.0 - r_squared)
                } else {
                    f64::INFINITY
                };
                vif_j.max(1.0)
            }
            Err(e) => {
                log::warn!("VIF auxiliary regression for column {j} failed: {e}");
                f64::NAN
            }
        }
    })
}

/// VIF keyed by explanatory column name, in column order.
pub fn vif_table(names: &[String], x: &Mat<f64>) -> IndexMap<String, f64> {
    let vif = variance_inflation_factor(x);
    names.iter().cloned().zip(vif.iter().copied()).collect()
}

/// Identify predictors with high multicollinearity.
///
/// Returns the names whose VIF exceeds `threshold` (common choices: 5 or 10).
pub fn high_vif_predictors(vif: &IndexMap<String, f64>, threshold: f64) -> Vec<String> {
    vif.iter()
        .filter(|(_, &v)| v > threshold)
        .map(|(name, _)| name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vif_orthogonal_predictors() {
        let mut x: Mat<f64> = Mat::zeros(100, 2);
        for i in 0..100 {
            x[(i, 0)] = (i as f64 * 0.1).sin();
            x[(i, 1)] = (i as f64 * 0.1).cos();
        }

        let vif = variance_inflation_factor(&x);

        assert!(
            (vif[0] - 1.0).abs() < 0.5,
            "VIF[0] = {} should be near 1 for orthogonal predictor",
            vif[0]
        );
        assert!((vif[1] - 1.0).abs() < 0.5);
    }

    #[test]
    fn test_vif_collinear_predictors() {
        let mut x: Mat<f64> = Mat::zeros(100, 2);
        for i in 0..100 {
            x[(i, 0)] = i as f64;
            x[(i, 1)] = i as f64 + 0.01 * (i as f64).sin();
        }

        let vif = variance_inflation_factor(&x);
        assert!(vif[0] > 10.0, "VIF[0] = {} should be high", vif[0]);
        assert!(vif[1] > 10.0);
    }

    #[test]
    fn test_vif_exact_combination_is_infinite() {
        let x = Mat::from_fn(30, 3, |i, j| {
            let a = i as f64;
            let b = ((i * 7) % 11) as f64;
            match j {
                0 => a,
                1 => b,
                _ => a + b,
            }
        });

        let vif = variance_inflation_factor(&x);
        for j in 0..3 {
            assert!(vif[j].is_infinite() || vif[j] > 1e10, "VIF[{j}] = {}", vif[j]);
        }
    }

    #[test]
    fn test_single_predictor() {
        let x = Mat::from_fn(10, 1, |i, _| i as f64);
        let vif = variance_inflation_factor(&x);
        assert_eq!(vif[0], 1.0);
    }

    #[test]
    fn test_high_vif_names() {
        let names = vec!["a".to_string(), "b".to_string(), "c".to_string()];
        let x = Mat::from_fn(30, 3, |i, j| match j {
            0 => i as f64,
            1 => 2.0 * i as f64 + 1.0,
            _ => ((i * 5) % 7) as f64,
        });

        let table = vif_table(&names, &x);
        let flagged = high_vif_predictors(&table, 10.0);
        assert_eq!(flagged, vec!["a".to_string(), "b".to_string()]);
    }
}
