//! Missing-value policy applied while a dataset view is extracted.
//!
//! # Example
//!
//! ```
//! use regress_harness::core::{NaAction, NaHandler};
//! use faer::{Col, Mat};
//!
//! let x = Mat::from_fn(5, 2, |i, j| if i == 2 { f64::NAN } else { (i + j) as f64 });
//! let y = Col::from_fn(5, |i| if i == 3 { f64::NAN } else { i as f64 });
//!
//! let result = NaHandler::process(&x, &y, NaAction::Omit).unwrap();
//! assert_eq!(result.x_clean.nrows(), 3);
//! assert_eq!(result.na_info.kept_indices, vec![0, 1, 4]);
//! ```

use faer::{Col, Mat};
use thiserror::Error;

/// What to do with rows that hold a missing value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NaAction {
    /// Refuse to build the view.
    #[default]
    Fail,
    /// Drop the rows; outputs are shorter than the table.
    Omit,
    /// Drop the rows; residual-shaped outputs can be padded back with NaN.
    Exclude,
}

/// Missing-value failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NaError {
    #[error("{n_na} rows contain missing values")]
    NaValuesPresent { n_na: usize },

    #[error("every row contains a missing value")]
    AllNa,
}

/// Which table rows survived the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NaInfo {
    /// Rows in the source table.
    pub n_original: usize,
    /// Table positions of the rows kept, ascending.
    pub kept_indices: Vec<usize>,
    pub action: NaAction,
}

impl NaInfo {
    /// Every row kept.
    pub fn complete(n_rows: usize, action: NaAction) -> Self {
        Self {
            n_original: n_rows,
            kept_indices: (0..n_rows).collect(),
            action,
        }
    }

    pub fn n_removed(&self) -> usize {
        self.n_original - self.kept_indices.len()
    }

    pub fn has_removed(&self) -> bool {
        self.n_removed() > 0
    }

    /// True for `Exclude` with at least one dropped row.
    pub fn needs_expansion(&self) -> bool {
        self.action == NaAction::Exclude && self.has_removed()
    }

    /// Scatter per-observation values back to table positions, NaN elsewhere.
    ///
    /// Returns a copy unchanged unless `needs_expansion()`.
    pub fn expand(&self, values: &Col<f64>) -> Col<f64> {
        if !self.needs_expansion() {
            return values.clone();
        }

        let mut padded = Col::from_fn(self.n_original, |_| f64::NAN);
        for (k, &row) in self.kept_indices.iter().enumerate() {
            padded[row] = values[k];
        }
        padded
    }
}

/// Complete-case data plus the record of what was dropped.
#[derive(Debug, Clone)]
pub struct NaResult {
    pub x_clean: Mat<f64>,
    pub y_clean: Col<f64>,
    pub na_info: NaInfo,
}

/// Applies a `NaAction` to an explanatory matrix and criterion vector.
pub struct NaHandler;

impl NaHandler {
    /// # Errors
    ///
    /// `NaValuesPresent` under `Fail` when any row is incomplete, `AllNa`
    /// when no complete row remains.
    pub fn process(x: &Mat<f64>, y: &Col<f64>, action: NaAction) -> Result<NaResult, NaError> {
        let n = x.nrows();
        let kept: Vec<usize> = (0..n)
            .filter(|&i| !y[i].is_nan() && (0..x.ncols()).all(|j| !x[(i, j)].is_nan()))
            .collect();

        let n_na = n - kept.len();
        if n_na > 0 && action == NaAction::Fail {
            return Err(NaError::NaValuesPresent { n_na });
        }
        if kept.is_empty() && n > 0 {
            return Err(NaError::AllNa);
        }

        let (x_clean, y_clean) = if n_na == 0 {
            (x.clone(), y.clone())
        } else {
            (
                Mat::from_fn(kept.len(), x.ncols(), |i, j| x[(kept[i], j)]),
                Col::from_fn(kept.len(), |i| y[kept[i]]),
            )
        };

        Ok(NaResult {
            x_clean,
            y_clean,
            na_info: NaInfo {
                n_original: n,
                kept_indices: kept,
                action,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Row 1 misses an explanatory value, row 3 the criterion.
    fn gappy() -> (Mat<f64>, Col<f64>) {
        let x = Mat::from_fn(5, 2, |i, j| if i == 1 && j == 1 { f64::NAN } else { (i + j) as f64 });
        let y = Col::from_fn(5, |i| if i == 3 { f64::NAN } else { i as f64 * 2.0 });
        (x, y)
    }

    #[test]
    fn test_fail_counts_incomplete_rows() {
        let (x, y) = gappy();
        let err = NaHandler::process(&x, &y, NaAction::Fail).unwrap_err();
        assert_eq!(err, NaError::NaValuesPresent { n_na: 2 });
    }

    #[test]
    fn test_omit_keeps_complete_rows() {
        let (x, y) = gappy();
        let result = NaHandler::process(&x, &y, NaAction::Omit).unwrap();

        assert_eq!(result.na_info.kept_indices, vec![0, 2, 4]);
        assert_eq!(result.na_info.n_removed(), 2);
        assert_eq!(result.y_clean[2], 8.0);
        assert_eq!(result.x_clean[(1, 0)], 2.0);
        assert!(!result.na_info.needs_expansion());
    }

    #[test]
    fn test_exclude_pads_with_nan() {
        let (x, y) = gappy();
        let info = NaHandler::process(&x, &y, NaAction::Exclude).unwrap().na_info;

        let padded = info.expand(&Col::from_fn(3, |i| i as f64 + 10.0));
        assert_eq!(padded.nrows(), 5);
        assert_eq!(padded[0], 10.0);
        assert!(padded[1].is_nan());
        assert_eq!(padded[2], 11.0);
        assert!(padded[3].is_nan());
        assert_eq!(padded[4], 12.0);
    }

    #[test]
    fn test_complete_data_passes_every_policy() {
        let x = Mat::from_fn(4, 1, |i, _| i as f64);
        let y = Col::from_fn(4, |i| i as f64);
        for action in [NaAction::Fail, NaAction::Omit, NaAction::Exclude] {
            let result = NaHandler::process(&x, &y, action).unwrap();
            assert_eq!(result.na_info, NaInfo::complete(4, action));
        }
    }

    #[test]
    fn test_all_rows_missing() {
        let x = Mat::from_fn(3, 1, |_, _| f64::NAN);
        let y = Col::from_fn(3, |_| 1.0);
        assert_eq!(
            NaHandler::process(&x, &y, NaAction::Omit).unwrap_err(),
            NaError::AllNa
        );
    }
}
