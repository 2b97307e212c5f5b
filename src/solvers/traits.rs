//! Core traits for regression strategies.

use crate::core::RegressionError;
use crate::data::DatasetView;
use faer::{Col, Mat};

/// A regression strategy that can be fit to a dataset view.
///
/// Fitting returns a separate fitted model; the strategy itself and the
/// view are left untouched.
pub trait Regressor {
    /// The type of the fitted model.
    type Fitted: FittedRegressor;

    /// Fit the model to the view's explanatory matrix and criterion vector.
    fn fit(&self, view: &DatasetView) -> Result<Self::Fitted, RegressionError>;
}

/// A fitted regression model that can make predictions.
pub trait FittedRegressor {
    /// Names of the explanatory columns the model was fit on, in order.
    fn explanatory_columns(&self) -> &[String];

    /// Predict on a matrix whose column count has already been checked.
    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64>;

    /// Number of explanatory columns the model expects.
    fn n_features(&self) -> usize {
        self.explanatory_columns().len()
    }

    /// Make predictions on new data.
    ///
    /// # Arguments
    /// * `x` - Matrix of shape (n_samples, n_features) with columns in the
    ///   same order as at fit time
    ///
    /// # Errors
    /// `RegressionError::Dimension` when the column count differs.
    fn predict(&self, x: &Mat<f64>) -> Result<Col<f64>, RegressionError> {
        check_columns(self.n_features(), x)?;
        Ok(self.predict_unchecked(x))
    }

    /// Predict on the explanatory matrix of a view.
    fn predict_view(&self, view: &DatasetView) -> Result<Col<f64>, RegressionError> {
        self.predict(view.explanatory_matrix())
    }

    /// Calculate the score (R²) of the predictions on a view.
    fn score(&self, view: &DatasetView) -> Result<f64, RegressionError> {
        let predictions = self.predict_view(view)?;
        Ok(r_squared(view.criterion_vector(), &predictions))
    }
}

/// Fail with `Dimension` unless `x` has `expected` columns.
pub(crate) fn check_columns(expected: usize, x: &Mat<f64>) -> Result<(), RegressionError> {
    if x.ncols() != expected {
        return Err(RegressionError::Dimension {
            expected,
            got: x.ncols(),
        });
    }
    Ok(())
}

/// Coefficient of determination of `predictions` against `y`.
pub fn r_squared(y: &Col<f64>, predictions: &Col<f64>) -> f64 {
    let n = y.nrows();
    let y_mean: f64 = y.iter().sum::<f64>() / n as f64;

    let tss: f64 = y.iter().map(|&yi| (yi - y_mean).powi(2)).sum();
    let rss: f64 = y
        .iter()
        .zip(predictions.iter())
        .map(|(&yi, &pi)| (yi - pi).powi(2))
        .sum();

    if tss == 0.0 {
        // Perfect prediction of constant target
        if rss == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - rss / tss
    }
}
