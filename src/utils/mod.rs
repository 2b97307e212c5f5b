//! Shared numeric helpers.

mod matrix;
pub(crate) mod parallel;

pub use matrix::{
    center_columns, center_vector, column, detect_constant_columns, drop_column,
    pivoted_rank, prepend_intercept, rows, scale_columns,
};
