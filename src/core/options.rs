//! Per-strategy configuration and validation.

use thiserror::Error;

/// Value of `parallelism` meaning "use every available core".
pub const ALL_CORES: i32 = -1;

/// Errors that can occur when validating strategy options.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OptionsError {
    #[error("confidence_level must be in (0, 1), got {0}")]
    InvalidConfidenceLevel(f64),
    #[error("significance must be in (0, 1), got {0}")]
    InvalidSignificance(f64),
    #[error("tolerance must be positive, got {0}")]
    InvalidTolerance(f64),
    #[error("max_iterations must be at least 1, got {0}")]
    InvalidMaxIterations(usize),
    #[error("parallelism must be -1 (all cores) or at least 1, got {0}")]
    InvalidParallelism(i32),
    #[error("regularization C must be positive, got {0}")]
    InvalidC(f64),
    #[error("epsilon must be non-negative, got {0}")]
    InvalidEpsilon(f64),
    #[error("kernel gamma must be positive, got {0}")]
    InvalidGamma(f64),
    #[error("polynomial degree must be at least 1")]
    InvalidDegree,
    #[error("n_trees must be at least 1")]
    InvalidTreeCount,
    #[error("max_features is invalid: {0}")]
    InvalidMaxFeatures(String),
    #[error("min_samples_split must be at least 2 and min_samples_leaf at least 1")]
    InvalidMinSamples,
    #[error("max_depth must be at least 1")]
    InvalidMaxDepth,
    #[error("vif_threshold must be at least 1, got {0}")]
    InvalidVifThreshold(f64),
}

fn validate_parallelism(parallelism: i32) -> Result<(), OptionsError> {
    if parallelism == ALL_CORES || parallelism >= 1 {
        Ok(())
    } else {
        Err(OptionsError::InvalidParallelism(parallelism))
    }
}

/// Options for the OLS-Linear strategy.
#[derive(Debug, Clone)]
pub struct LinearOptions {
    /// Whether to fit an intercept term (default: true).
    pub fit_intercept: bool,
    /// Tolerance on the R diagonal used for rank determination.
    pub rank_tolerance: f64,
    /// Worker threads for the QR solve, `-1` for all cores.
    pub parallelism: i32,
}

impl Default for LinearOptions {
    fn default() -> Self {
        Self {
            fit_intercept: true,
            rank_tolerance: 1e-10,
            parallelism: ALL_CORES,
        }
    }
}

impl LinearOptions {
    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.rank_tolerance > 0.0) {
            return Err(OptionsError::InvalidTolerance(self.rank_tolerance));
        }
        validate_parallelism(self.parallelism)
    }
}

/// Kernel function for support-vector regression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// `<x, z>`
    Linear,
    /// `exp(-gamma * |x - z|²)`
    Rbf { gamma: f64 },
    /// `(gamma * <x, z> + coef0)^degree`
    Polynomial { degree: u32, gamma: f64, coef0: f64 },
    /// `tanh(gamma * <x, z> + coef0)`
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Default for Kernel {
    fn default() -> Self {
        Kernel::Rbf { gamma: 0.1 }
    }
}

impl Kernel {
    /// Evaluate the kernel on two equal-length rows.
    pub fn evaluate(&self, a: &[f64], b: &[f64]) -> f64 {
        match *self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let sq: f64 = a.iter().zip(b).map(|(x, z)| (x - z).powi(2)).sum();
                (-gamma * sq).exp()
            }
            Kernel::Polynomial {
                degree,
                gamma,
                coef0,
            } => (gamma * dot(a, b) + coef0).powi(degree as i32),
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    fn validate(&self) -> Result<(), OptionsError> {
        match *self {
            Kernel::Linear => Ok(()),
            Kernel::Rbf { gamma } | Kernel::Sigmoid { gamma, .. } => {
                if gamma > 0.0 {
                    Ok(())
                } else {
                    Err(OptionsError::InvalidGamma(gamma))
                }
            }
            Kernel::Polynomial { degree, gamma, .. } => {
                if degree == 0 {
                    Err(OptionsError::InvalidDegree)
                } else if !(gamma > 0.0) {
                    Err(OptionsError::InvalidGamma(gamma))
                } else {
                    Ok(())
                }
            }
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, z)| x * z).sum()
}

/// Options for the SVR strategy.
#[derive(Debug, Clone)]
pub struct SvrOptions {
    /// Kernel function (default: RBF with gamma = 0.1).
    pub kernel: Kernel,
    /// Regularization parameter C (default: 1.0).
    pub c: f64,
    /// Width of the epsilon-insensitive tube (default: 0.1).
    pub epsilon: f64,
    /// Stop when the largest dual update in a sweep falls below this.
    pub tolerance: f64,
    /// Maximum number of coordinate-descent sweeps.
    pub max_iterations: usize,
}

impl Default for SvrOptions {
    fn default() -> Self {
        Self {
            kernel: Kernel::default(),
            c: 1.0,
            epsilon: 0.1,
            tolerance: 1e-3,
            max_iterations: 10_000,
        }
    }
}

impl SvrOptions {
    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        self.kernel.validate()?;
        if !(self.c > 0.0) {
            return Err(OptionsError::InvalidC(self.c));
        }
        if !(self.epsilon >= 0.0) {
            return Err(OptionsError::InvalidEpsilon(self.epsilon));
        }
        if !(self.tolerance > 0.0) {
            return Err(OptionsError::InvalidTolerance(self.tolerance));
        }
        if self.max_iterations < 1 {
            return Err(OptionsError::InvalidMaxIterations(self.max_iterations));
        }
        Ok(())
    }
}

/// Impurity criterion used to choose tree splits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitCriterion {
    /// Weighted reduction of the node mean squared error.
    #[default]
    SquaredError,
    /// Friedman's improvement score `n_l n_r / (n_l + n_r) * (mean_l - mean_r)²`.
    FriedmanMse,
}

/// Number of candidate features examined at each split.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MaxFeatures {
    /// Every feature (the regression default).
    #[default]
    Auto,
    /// `ceil(sqrt(p))`
    Sqrt,
    /// `ceil(log2(p))`, at least 1
    Log2,
    /// A fixed count, capped at `p`.
    Count(usize),
    /// A fraction of `p` in (0, 1].
    Fraction(f64),
}

impl MaxFeatures {
    /// Resolve to a concrete count for `n_features` columns.
    pub fn resolve(&self, n_features: usize) -> usize {
        let p = n_features.max(1);
        let k = match *self {
            MaxFeatures::Auto => p,
            MaxFeatures::Sqrt => (p as f64).sqrt().ceil() as usize,
            MaxFeatures::Log2 => (p as f64).log2().ceil() as usize,
            MaxFeatures::Count(k) => k,
            MaxFeatures::Fraction(f) => (f * p as f64).ceil() as usize,
        };
        k.clamp(1, p)
    }
}

/// Options for the random-forest strategy.
#[derive(Debug, Clone)]
pub struct ForestOptions {
    /// Number of trees (default: 100).
    pub n_trees: usize,
    /// Split criterion (default: squared error).
    pub criterion: SplitCriterion,
    /// Candidate features per split (default: all).
    pub max_features: MaxFeatures,
    /// Maximum tree depth, unlimited when `None`.
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node.
    pub min_samples_split: usize,
    /// Minimum samples in each leaf.
    pub min_samples_leaf: usize,
    /// Draw a bootstrap sample per tree (default: true).
    pub bootstrap: bool,
    /// Seed for reproducible forests; drawn from the OS when `None`.
    pub seed: Option<u64>,
    /// Worker threads for tree training, `-1` for all cores.
    pub parallelism: i32,
}

impl Default for ForestOptions {
    fn default() -> Self {
        Self {
            n_trees: 100,
            criterion: SplitCriterion::SquaredError,
            max_features: MaxFeatures::Auto,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            bootstrap: true,
            seed: None,
            parallelism: ALL_CORES,
        }
    }
}

impl ForestOptions {
    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if self.n_trees < 1 {
            return Err(OptionsError::InvalidTreeCount);
        }
        match self.max_features {
            MaxFeatures::Count(0) => {
                return Err(OptionsError::InvalidMaxFeatures("count must be at least 1".into()))
            }
            MaxFeatures::Fraction(f) if !(f > 0.0 && f <= 1.0) => {
                return Err(OptionsError::InvalidMaxFeatures(format!(
                    "fraction must be in (0, 1], got {f}"
                )))
            }
            _ => {}
        }
        if self.min_samples_split < 2 || self.min_samples_leaf < 1 {
            return Err(OptionsError::InvalidMinSamples);
        }
        if self.max_depth == Some(0) {
            return Err(OptionsError::InvalidMaxDepth);
        }
        validate_parallelism(self.parallelism)
    }
}

/// Deterministic terms included in the ADF test regression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdfRegression {
    /// No constant, no trend (`"nc"`).
    #[default]
    NoConstant,
    /// Constant only (`"c"`).
    Constant,
    /// Constant and linear trend (`"ct"`).
    ConstantTrend,
}

impl AdfRegression {
    /// Number of deterministic regressors.
    pub fn n_trend(&self) -> usize {
        match self {
            AdfRegression::NoConstant => 0,
            AdfRegression::Constant => 1,
            AdfRegression::ConstantTrend => 2,
        }
    }
}

/// How the ADF lag order is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Autolag {
    /// Minimize the Akaike information criterion.
    #[default]
    Aic,
    /// Minimize the Bayesian information criterion.
    Bic,
    /// Use the maximum lag as given.
    Fixed,
}

/// Options for the Augmented Dickey-Fuller test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AdfOptions {
    pub regression: AdfRegression,
    pub autolag: Autolag,
    /// Upper bound on the lag order; `12 * (n/100)^(1/4)` when `None`.
    pub max_lag: Option<usize>,
}

/// Options for the statistical OLS strategy and its diagnostics.
#[derive(Debug, Clone)]
pub struct StatisticalOlsOptions {
    /// Confidence level for coefficient intervals (default: 0.95).
    pub confidence_level: f64,
    /// Tolerance on the R diagonal used for rank determination.
    pub rank_tolerance: f64,
    /// Maximum ACF lag (default: 40, capped at `n - 1`).
    pub acf_lags: usize,
    /// Stationarity test settings.
    pub adf: AdfOptions,
    /// VIF above this value is flagged (default: 10).
    pub vif_threshold: f64,
    /// Significance level for the ADF judgment (default: 0.05).
    pub significance: f64,
}

impl Default for StatisticalOlsOptions {
    fn default() -> Self {
        Self {
            confidence_level: 0.95,
            rank_tolerance: 1e-10,
            acf_lags: 40,
            adf: AdfOptions::default(),
            vif_threshold: 10.0,
            significance: 0.05,
        }
    }
}

impl StatisticalOlsOptions {
    /// Validate the options and return an error if invalid.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(OptionsError::InvalidConfidenceLevel(self.confidence_level));
        }
        if !(self.significance > 0.0 && self.significance < 1.0) {
            return Err(OptionsError::InvalidSignificance(self.significance));
        }
        if !(self.rank_tolerance > 0.0) {
            return Err(OptionsError::InvalidTolerance(self.rank_tolerance));
        }
        if !(self.vif_threshold >= 1.0) {
            return Err(OptionsError::InvalidVifThreshold(self.vif_threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let linear = LinearOptions::default();
        assert!(linear.fit_intercept);
        assert_eq!(linear.parallelism, ALL_CORES);

        let svr = SvrOptions::default();
        assert_eq!(svr.kernel, Kernel::Rbf { gamma: 0.1 });
        assert!((svr.c - 1.0).abs() < 1e-12);

        let forest = ForestOptions::default();
        assert_eq!(forest.n_trees, 100);
        assert_eq!(forest.criterion, SplitCriterion::SquaredError);
        assert_eq!(forest.max_features, MaxFeatures::Auto);

        let stats = StatisticalOlsOptions::default();
        assert_eq!(stats.adf.regression, AdfRegression::NoConstant);
        assert_eq!(stats.acf_lags, 40);
    }

    #[test]
    fn test_validation_parallelism() {
        let opts = LinearOptions {
            parallelism: 0,
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidParallelism(0))
        ));

        let opts = ForestOptions {
            parallelism: -3,
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidParallelism(-3))
        ));
    }

    #[test]
    fn test_validation_svr() {
        let opts = SvrOptions {
            c: 0.0,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidC(_))));

        let opts = SvrOptions {
            kernel: Kernel::Rbf { gamma: -1.0 },
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidGamma(_))));

        let opts = SvrOptions {
            kernel: Kernel::Polynomial {
                degree: 0,
                gamma: 1.0,
                coef0: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidDegree)));
    }

    #[test]
    fn test_validation_forest() {
        let opts = ForestOptions {
            n_trees: 0,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidTreeCount)));

        let opts = ForestOptions {
            max_features: MaxFeatures::Fraction(1.5),
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidMaxFeatures(_))
        ));

        let opts = ForestOptions {
            min_samples_split: 1,
            ..Default::default()
        };
        assert!(matches!(opts.validate(), Err(OptionsError::InvalidMinSamples)));
    }

    #[test]
    fn test_validation_statistical_ols() {
        let opts = StatisticalOlsOptions {
            confidence_level: 1.0,
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidConfidenceLevel(_))
        ));

        let opts = StatisticalOlsOptions {
            vif_threshold: 0.5,
            ..Default::default()
        };
        assert!(matches!(
            opts.validate(),
            Err(OptionsError::InvalidVifThreshold(_))
        ));
    }

    #[test]
    fn test_nan_options_are_rejected() {
        let linear = LinearOptions {
            rank_tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(linear.validate(), Err(OptionsError::InvalidTolerance(_))));

        let svr = SvrOptions {
            c: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(svr.validate(), Err(OptionsError::InvalidC(_))));
        let svr = SvrOptions {
            epsilon: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(svr.validate(), Err(OptionsError::InvalidEpsilon(_))));
        let svr = SvrOptions {
            tolerance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(svr.validate(), Err(OptionsError::InvalidTolerance(_))));

        let ols = StatisticalOlsOptions {
            significance: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(ols.validate(), Err(OptionsError::InvalidSignificance(_))));
    }

    #[test]
    fn test_max_features_resolve() {
        assert_eq!(MaxFeatures::Auto.resolve(9), 9);
        assert_eq!(MaxFeatures::Sqrt.resolve(9), 3);
        assert_eq!(MaxFeatures::Log2.resolve(8), 3);
        assert_eq!(MaxFeatures::Log2.resolve(1), 1);
        assert_eq!(MaxFeatures::Count(20).resolve(4), 4);
        assert_eq!(MaxFeatures::Fraction(0.5).resolve(5), 3);
    }

    #[test]
    fn test_kernel_evaluate() {
        let a = [1.0, 2.0];
        let b = [3.0, 4.0];
        assert!((Kernel::Linear.evaluate(&a, &b) - 11.0).abs() < 1e-12);
        let rbf = Kernel::Rbf { gamma: 0.5 }.evaluate(&a, &b);
        assert!((rbf - (-0.5_f64 * 8.0).exp()).abs() < 1e-12);
        let poly = Kernel::Polynomial {
            degree: 2,
            gamma: 1.0,
            coef0: 1.0,
        }
        .evaluate(&a, &b);
        assert!((poly - 144.0).abs() < 1e-12);
        assert!((Kernel::Rbf { gamma: 1.0 }.evaluate(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_adf_trend_counts() {
        assert_eq!(AdfRegression::NoConstant.n_trend(), 0);
        assert_eq!(AdfRegression::Constant.n_trend(), 1);
        assert_eq!(AdfRegression::ConstantTrend.n_trend(), 2);
    }
}
