//! Epsilon-insensitive support-vector regression.

use crate::core::{ConvergenceWarning, Kernel, OptionsError, RegressionError, SvrOptions};
use crate::data::DatasetView;
use crate::solvers::traits::{FittedRegressor, Regressor};
use crate::utils::rows;
use faer::{Col, Mat};

/// Coefficients with magnitude at or below this are treated as zero.
const SUPPORT_TOLERANCE: f64 = 1e-12;

/// SVR strategy.
///
/// Solves the ε-SVR dual
///
/// ```text
/// min_β  ½ βᵀ(K + 1)β − yᵀβ + ε‖β‖₁   subject to  −C ≤ β_i ≤ C
/// ```
///
/// by cyclic coordinate descent. Adding 1 to every kernel entry absorbs the
/// bias, so the prediction is `f(x) = Σ β_j (K(x_j, x) + 1)`.
#[derive(Debug, Clone, Default)]
pub struct SvrRegressor {
    options: SvrOptions,
}

impl SvrRegressor {
    /// Create a regressor with the given options.
    pub fn new(options: SvrOptions) -> Self {
        Self { options }
    }

    /// Create a builder for configuring the regressor.
    pub fn builder() -> SvrRegressorBuilder {
        SvrRegressorBuilder::default()
    }

    /// Options used for fitting.
    pub fn options(&self) -> &SvrOptions {
        &self.options
    }

    /// Soft thresholding operator: S(z, γ) = sign(z) * max(|z| - γ, 0)
    fn soft_threshold(z: f64, gamma: f64) -> f64 {
        if z > gamma {
            z - gamma
        } else if z < -gamma {
            z + gamma
        } else {
            0.0
        }
    }

    /// Gram matrix of the bias-augmented kernel.
    fn gram(&self, data: &[Vec<f64>]) -> Mat<f64> {
        let n = data.len();
        let mut gram = Mat::zeros(n, n);
        for i in 0..n {
            for j in 0..=i {
                let k = self.options.kernel.evaluate(&data[i], &data[j]) + 1.0;
                gram[(i, j)] = k;
                gram[(j, i)] = k;
            }
        }
        gram
    }

    /// Returns the dual coefficients, sweeps performed and final max change.
    fn coordinate_descent(&self, gram: &Mat<f64>, y: &Col<f64>) -> (Col<f64>, usize, f64) {
        let n = y.nrows();
        let c = self.options.c;
        let epsilon = self.options.epsilon;

        let mut beta = Col::<f64>::zeros(n);
        // f = (K + 1) β, kept in sync with every update
        let mut f = Col::<f64>::zeros(n);

        let mut sweeps = 0;
        let mut max_change = f64::INFINITY;

        while sweeps < self.options.max_iterations {
            sweeps += 1;
            max_change = 0.0f64;

            for i in 0..n {
                let k_ii = gram[(i, i)];
                if k_ii < 1e-14 {
                    continue;
                }

                let old = beta[i];
                // Gradient of the smooth part with β_i removed
                let g = f[i] - k_ii * old - y[i];
                let new = (-Self::soft_threshold(g, epsilon) / k_ii).clamp(-c, c);

                let delta: f64 = new - old;
                if delta.abs() > 1e-14 {
                    for r in 0..n {
                        f[r] += gram[(r, i)] * delta;
                    }
                }

                beta[i] = new;
                max_change = max_change.max(delta.abs());
            }

            if max_change < self.options.tolerance {
                break;
            }
        }

        (beta, sweeps, max_change)
    }
}

impl Regressor for SvrRegressor {
    type Fitted = FittedSvr;

    fn fit(&self, view: &DatasetView) -> Result<Self::Fitted, RegressionError> {
        self.options.validate()?;
        log::debug!(
            "fitting SVR ({:?}, C = {}, epsilon = {}) on {} rows",
            self.options.kernel,
            self.options.c,
            self.options.epsilon,
            view.n_observations()
        );

        let data = rows(view.explanatory_matrix());
        let gram = self.gram(&data);
        let (beta, sweeps, final_change) =
            self.coordinate_descent(&gram, view.criterion_vector());

        let convergence = if final_change >= self.options.tolerance {
            let warning = ConvergenceWarning {
                solver: "svr",
                iterations: sweeps,
                final_change,
                tolerance: self.options.tolerance,
            };
            log::warn!("{warning}");
            Some(warning)
        } else {
            None
        };

        let (support_vectors, dual_coefficients): (Vec<Vec<f64>>, Vec<f64>) = data
            .into_iter()
            .zip(beta.iter().copied())
            .filter(|(_, b)| b.abs() > SUPPORT_TOLERANCE)
            .unzip();

        if support_vectors.is_empty() {
            log::warn!("SVR has no support vectors: every residual lies inside the epsilon tube");
        }

        Ok(FittedSvr {
            explanatory_columns: view.explanatory_columns().to_vec(),
            kernel: self.options.kernel,
            support_vectors,
            dual_coefficients,
            convergence,
        })
    }
}

/// A fitted SVR model.
///
/// The support vectors and dual coefficients are kept private; the model is
/// used through `predict`.
#[derive(Debug, Clone)]
pub struct FittedSvr {
    explanatory_columns: Vec<String>,
    kernel: Kernel,
    support_vectors: Vec<Vec<f64>>,
    dual_coefficients: Vec<f64>,
    convergence: Option<ConvergenceWarning>,
}

impl FittedSvr {
    /// Number of training rows with a non-zero dual coefficient.
    pub fn n_support_vectors(&self) -> usize {
        self.support_vectors.len()
    }

    /// Kernel used for fitting.
    pub fn kernel(&self) -> Kernel {
        self.kernel
    }

    /// Set when the solver hit its sweep budget.
    pub fn convergence_warning(&self) -> Option<&ConvergenceWarning> {
        self.convergence.as_ref()
    }

    /// True when the solver met its tolerance.
    pub fn converged(&self) -> bool {
        self.convergence.is_none()
    }
}

impl FittedRegressor for FittedSvr {
    fn explanatory_columns(&self) -> &[String] {
        &self.explanatory_columns
    }

    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64> {
        let data = rows(x);
        Col::from_fn(x.nrows(), |i| {
            self.support_vectors
                .iter()
                .zip(&self.dual_coefficients)
                .map(|(sv, b)| b * (self.kernel.evaluate(sv, &data[i]) + 1.0))
                .sum()
        })
    }
}

/// Builder for `SvrRegressor`.
#[derive(Debug, Clone, Default)]
pub struct SvrRegressorBuilder {
    options: SvrOptions,
}

impl SvrRegressorBuilder {
    /// Set the kernel.
    pub fn kernel(mut self, kernel: Kernel) -> Self {
        self.options.kernel = kernel;
        self
    }

    /// Set the regularization parameter C.
    pub fn c(mut self, c: f64) -> Self {
        self.options.c = c;
        self
    }

    /// Set the width of the epsilon-insensitive tube.
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.options.epsilon = epsilon;
        self
    }

    /// Set convergence tolerance.
    pub fn tolerance(mut self, tol: f64) -> Self {
        self.options.tolerance = tol;
        self
    }

    /// Set maximum number of sweeps.
    pub fn max_iterations(mut self, max_iter: usize) -> Self {
        self.options.max_iterations = max_iter;
        self
    }

    /// Build the regressor, validating the options.
    pub fn build(self) -> Result<SvrRegressor, OptionsError> {
        self.options.validate()?;
        Ok(SvrRegressor::new(self.options))
    }

    /// Build without validation; `fit` still validates.
    pub fn build_unchecked(self) -> SvrRegressor {
        SvrRegressor::new(self.options)
    }
}
