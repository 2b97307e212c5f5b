//! Tabular input and the dataset view consumed by every strategy.

mod table;
mod view;

pub use table::{Column, Table};
pub use view::{DatasetView, MIN_OBSERVATIONS};
