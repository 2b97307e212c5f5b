//! Regression strategies and the least-squares engine they share.

mod forest;
mod least_squares;
mod linear;
mod statistical_ols;
mod strategy;
mod svr;
mod traits;
mod tree;

pub use forest::{FittedForest, RandomForestRegressor, RandomForestRegressorBuilder};
pub use least_squares::{FittedLeastSquares, LeastSquares, LeastSquaresBuilder};
pub use linear::{FittedLinear, LinearRegressor, LinearRegressorBuilder};
pub use statistical_ols::{
    FitSummary, FittedStatisticalOls, StatisticalOlsRegressor, StatisticalOlsRegressorBuilder,
    TermEstimate, INTERCEPT,
};
pub use strategy::{FittedModel, ModelStrategy};
pub use svr::{FittedSvr, SvrRegressor, SvrRegressorBuilder};
pub use traits::{r_squared, FittedRegressor, Regressor};
