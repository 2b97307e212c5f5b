//! Common test utilities and data generators.
#![allow(dead_code)]

use faer::{Col, Mat};
use regress_harness::{Column, DatasetView, Table};

/// Deterministic uniform draws in [-1, 1) from a 64-bit LCG.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Lcg(seed)
    }

    pub fn next_uniform(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        ((self.0 >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
    }

    /// Approximately standard normal draw (Box-Muller).
    pub fn next_normal(&mut self) -> f64 {
        let u1 = (self.next_uniform() + 1.0) / 2.0;
        let u2 = (self.next_uniform() + 1.0) / 2.0;
        (-2.0 * u1.max(1e-12).ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }
}

/// Generate `y = intercept + Σ (j + 1) x_j + noise` with uniform explanatory values.
pub fn generate_linear_data(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> (Mat<f64>, Col<f64>, Vec<f64>) {
    let mut rng = Lcg::new(seed);
    let coefficients: Vec<f64> = (0..n_features).map(|j| (j + 1) as f64).collect();

    let mut x = Mat::zeros(n_samples, n_features);
    let mut y = Col::zeros(n_samples);
    for i in 0..n_samples {
        let mut yi = intercept;
        for j in 0..n_features {
            x[(i, j)] = rng.next_uniform() * 5.0;
            yi += x[(i, j)] * coefficients[j];
        }
        y[i] = yi + noise_std * rng.next_uniform();
    }

    (x, y, coefficients)
}

/// Column names `x1..xp`.
pub fn feature_names(p: usize) -> Vec<String> {
    (1..=p).map(|j| format!("x{j}")).collect()
}

/// Wrap generated data in a labeled table with criterion column `y`.
pub fn to_table(x: &Mat<f64>, y: &Col<f64>) -> Table {
    let names = feature_names(x.ncols());
    let mut table = Table::new();
    for (j, name) in names.iter().enumerate() {
        let values: Vec<f64> = (0..x.nrows()).map(|i| x[(i, j)]).collect();
        table = table.with_column(name.as_str(), Column::float(values)).unwrap();
    }
    let criterion: Vec<f64> = y.iter().copied().collect();
    table.with_column("y", Column::float(criterion)).unwrap()
}

/// Linear data wrapped straight into a view over every feature.
pub fn linear_view(
    n_samples: usize,
    n_features: usize,
    intercept: f64,
    noise_std: f64,
    seed: u64,
) -> DatasetView {
    let (x, y, _) = generate_linear_data(n_samples, n_features, intercept, noise_std, seed);
    DatasetView::from_parts(&feature_names(n_features), "y", x, y).unwrap()
}

/// Gaussian white noise.
pub fn white_noise(n: usize, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    (0..n).map(|_| rng.next_normal()).collect()
}

/// Random walk with a constant upward drift.
pub fn drifting_walk(n: usize, drift: f64, seed: u64) -> Vec<f64> {
    let mut rng = Lcg::new(seed);
    let mut level = 10.0;
    (0..n)
        .map(|_| {
            level += drift + 0.5 * rng.next_normal();
            level
        })
        .collect()
}

/// Approximate equality check for floating point values.
pub fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}
