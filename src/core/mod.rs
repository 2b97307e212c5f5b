//! Core types for regression analysis.

mod error;
mod na_action;
mod options;
mod result;

pub use error::{ConvergenceWarning, RegressionError, SchemaError};
pub use na_action::{NaAction, NaError, NaHandler, NaInfo, NaResult};
pub use options::{
    AdfOptions, AdfRegression, Autolag, ForestOptions, Kernel, LinearOptions, MaxFeatures,
    OptionsError, SplitCriterion, StatisticalOlsOptions, SvrOptions, ALL_CORES,
};
pub use result::{Inference, InterceptInference, LeastSquaresResult};
