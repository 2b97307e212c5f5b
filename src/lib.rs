//! A regression harness over labeled tables.
//!
//! A [`DatasetView`](data::DatasetView) partitions a [`Table`](data::Table) into
//! explanatory columns and one criterion column. A
//! [`ModelStrategy`](solvers::ModelStrategy) fits one of four regressors to the
//! view:
//!
//! - **Linear**: ordinary least squares with optional intercept
//! - **Svr**: epsilon-insensitive support vector regression
//! - **RandomForest**: bagged CART trees with ranked feature importances
//! - **StatisticalOls**: OLS with full inference and residual diagnostics
//!   (ADF stationarity, ACF, VIF, Durbin-Watson, Jarque-Bera)
//!
//! Charts are never drawn by the fitting code. An [`Analysis`](analysis::Analysis)
//! hands chartable output to an injected [`Renderer`](render::Renderer).
//!
//! # Example
//!
//! ```rust
//! use regress_harness::prelude::*;
//!
//! let table = Table::from_columns([
//!     ("x1", Column::float(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])),
//!     ("x2", Column::float(vec![2.0, 1.0, 4.0, 3.0, 6.0, 5.0])),
//!     ("y", Column::float(vec![9.0, 8.0, 19.0, 18.0, 29.0, 28.0])),
//! ]).unwrap();
//! let view = DatasetView::new(&table, &["x1", "x2"], "y").unwrap();
//!
//! let fitted = LinearRegressor::default().fit(&view).unwrap();
//! assert!((fitted.coefficient("x1").unwrap() - 2.0).abs() < 1e-8);
//! assert!((fitted.coefficient("x2").unwrap() - 3.0).abs() < 1e-8);
//! assert!((fitted.intercept() - 1.0).abs() < 1e-8);
//! ```

pub mod analysis;
pub mod core;
pub mod data;
pub mod diagnostics;
pub mod importance;
pub mod inference;
pub mod render;
pub mod solvers;
pub mod utils;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::analysis::Analysis;
    pub use crate::core::{
        AdfOptions, AdfRegression, Autolag, ConvergenceWarning, ForestOptions, Kernel,
        LinearOptions, MaxFeatures, NaAction, NaError, NaInfo, OptionsError, RegressionError,
        SchemaError, SplitCriterion, StatisticalOlsOptions, SvrOptions, ALL_CORES,
    };
    pub use crate::data::{Column, DatasetView, Table};
    pub use crate::diagnostics::{AdfResult, Diagnostics};
    pub use crate::importance::{rank_importances, RankedFeature};
    pub use crate::render::{NoopRenderer, Renderer};
    pub use crate::solvers::{
        FittedForest, FittedLinear, FittedModel, FittedRegressor, FittedStatisticalOls,
        FittedSvr, LinearRegressor, ModelStrategy, RandomForestRegressor, Regressor,
        StatisticalOlsRegressor, SvrRegressor, TermEstimate, INTERCEPT,
    };
}

pub use crate::core::{RegressionError, SchemaError};
pub use crate::data::{Column, DatasetView, Table};
pub use crate::solvers::{FittedModel, FittedRegressor, ModelStrategy, Regressor};
