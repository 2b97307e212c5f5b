//! Strategy selection over the four regressors.

use crate::core::RegressionError;
use crate::data::DatasetView;
use crate::solvers::forest::{FittedForest, RandomForestRegressor};
use crate::solvers::linear::{FittedLinear, LinearRegressor};
use crate::solvers::statistical_ols::{FittedStatisticalOls, StatisticalOlsRegressor};
use crate::solvers::svr::{FittedSvr, SvrRegressor};
use crate::solvers::traits::{FittedRegressor, Regressor};
use faer::{Col, Mat};

/// A modeling strategy chosen at fit time.
///
/// Each variant owns its configured regressor.
///
/// # Example
///
/// ```rust
/// use regress_harness::prelude::*;
///
/// let table = Table::from_columns([
///     ("x", Column::float(vec![0.0, 1.0, 2.0, 3.0, 4.0])),
///     ("y", Column::float(vec![1.0, 2.9, 5.1, 7.0, 9.0])),
/// ]).unwrap();
/// let view = DatasetView::new(&table, &["x"], "y").unwrap();
///
/// for strategy in [ModelStrategy::linear(), ModelStrategy::svr()] {
///     let fitted = strategy.fit(&view).unwrap();
///     assert_eq!(fitted.predict(view.explanatory_matrix()).unwrap().nrows(), 5);
/// }
/// ```
#[derive(Debug, Clone)]
pub enum ModelStrategy {
    Linear(LinearRegressor),
    Svr(SvrRegressor),
    RandomForest(RandomForestRegressor),
    StatisticalOls(StatisticalOlsRegressor),
}

impl ModelStrategy {
    /// OLS-Linear with default options.
    pub fn linear() -> Self {
        ModelStrategy::Linear(LinearRegressor::default())
    }

    /// SVR with default options.
    pub fn svr() -> Self {
        ModelStrategy::Svr(SvrRegressor::default())
    }

    /// Random forest with default options.
    pub fn random_forest() -> Self {
        ModelStrategy::RandomForest(RandomForestRegressor::default())
    }

    /// Statistical OLS with default options.
    pub fn statistical_ols() -> Self {
        ModelStrategy::StatisticalOls(StatisticalOlsRegressor::default())
    }

    /// Short name of the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            ModelStrategy::Linear(_) => "linear",
            ModelStrategy::Svr(_) => "svr",
            ModelStrategy::RandomForest(_) => "random_forest",
            ModelStrategy::StatisticalOls(_) => "statistical_ols",
        }
    }

    /// Fit the selected strategy to a view.
    pub fn fit(&self, view: &DatasetView) -> Result<FittedModel, RegressionError> {
        Ok(match self {
            ModelStrategy::Linear(r) => FittedModel::Linear(r.fit(view)?),
            ModelStrategy::Svr(r) => FittedModel::Svr(r.fit(view)?),
            ModelStrategy::RandomForest(r) => FittedModel::RandomForest(r.fit(view)?),
            ModelStrategy::StatisticalOls(r) => FittedModel::StatisticalOls(r.fit(view)?),
        })
    }
}

impl From<LinearRegressor> for ModelStrategy {
    fn from(r: LinearRegressor) -> Self {
        ModelStrategy::Linear(r)
    }
}

impl From<SvrRegressor> for ModelStrategy {
    fn from(r: SvrRegressor) -> Self {
        ModelStrategy::Svr(r)
    }
}

impl From<RandomForestRegressor> for ModelStrategy {
    fn from(r: RandomForestRegressor) -> Self {
        ModelStrategy::RandomForest(r)
    }
}

impl From<StatisticalOlsRegressor> for ModelStrategy {
    fn from(r: StatisticalOlsRegressor) -> Self {
        ModelStrategy::StatisticalOls(r)
    }
}

/// The result of fitting a `ModelStrategy`; one variant per strategy.
#[derive(Debug, Clone)]
pub enum FittedModel {
    Linear(FittedLinear),
    Svr(FittedSvr),
    RandomForest(FittedForest),
    StatisticalOls(FittedStatisticalOls),
}

impl FittedModel {
    fn inner(&self) -> &dyn FittedRegressor {
        match self {
            FittedModel::Linear(m) => m,
            FittedModel::Svr(m) => m,
            FittedModel::RandomForest(m) => m,
            FittedModel::StatisticalOls(m) => m,
        }
    }

    /// The linear fit, if this is one.
    pub fn as_linear(&self) -> Option<&FittedLinear> {
        match self {
            FittedModel::Linear(m) => Some(m),
            _ => None,
        }
    }

    /// The SVR fit, if this is one.
    pub fn as_svr(&self) -> Option<&FittedSvr> {
        match self {
            FittedModel::Svr(m) => Some(m),
            _ => None,
        }
    }

    /// The forest fit, if this is one.
    pub fn as_random_forest(&self) -> Option<&FittedForest> {
        match self {
            FittedModel::RandomForest(m) => Some(m),
            _ => None,
        }
    }

    /// The statistical OLS fit, if this is one.
    pub fn as_statistical_ols(&self) -> Option<&FittedStatisticalOls> {
        match self {
            FittedModel::StatisticalOls(m) => Some(m),
            _ => None,
        }
    }
}

impl FittedRegressor for FittedModel {
    fn explanatory_columns(&self) -> &[String] {
        self.inner().explanatory_columns()
    }

    fn predict_unchecked(&self, x: &Mat<f64>) -> Col<f64> {
        self.inner().predict_unchecked(x)
    }
}
