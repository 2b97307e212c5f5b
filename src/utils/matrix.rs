//! Matrix utility functions.

use faer::{Col, Mat, MatRef};

/// Detect columns that are constant (zero variance).
///
/// A column is constant when no value differs from the first by more than
/// `tolerance` times the column's largest magnitude.
pub fn detect_constant_columns(x: &Mat<f64>, tolerance: f64) -> Vec<bool> {
    let n_rows = x.nrows();

    if n_rows == 0 {
        return vec![true; x.ncols()];
    }

    (0..x.ncols())
        .map(|j| {
            let first = x[(0, j)];
            let scale = (0..n_rows).map(|i| x[(i, j)].abs()).fold(0.0, f64::max);
            (1..n_rows).all(|i| (x[(i, j)] - first).abs() <= tolerance * scale)
        })
        .collect()
}

/// Scale every column of `x` to unit Euclidean norm.
///
/// Returns the scaled matrix and the norms divided out. All-zero columns are
/// left as they are with a norm of 1.
pub fn scale_columns(x: &Mat<f64>) -> (Mat<f64>, Vec<f64>) {
    let norms: Vec<f64> = (0..x.ncols())
        .map(|j| {
            let norm = (0..x.nrows()).map(|i| x[(i, j)].powi(2)).sum::<f64>().sqrt();
            if norm > 0.0 {
                norm
            } else {
                1.0
            }
        })
        .collect();
    let scaled = Mat::from_fn(x.nrows(), x.ncols(), |i, j| x[(i, j)] / norms[j]);
    (scaled, norms)
}

/// Rank read off the diagonal of a column-pivoted R factor.
///
/// Counts the leading entries with `|R_ii| > tolerance * |R_00|`.
pub fn pivoted_rank(r: MatRef<'_, f64>, tolerance: f64) -> usize {
    let size = r.nrows().min(r.ncols());
    if size == 0 {
        return 0;
    }
    let threshold = tolerance * r[(0, 0)].abs();
    (0..size).take_while(|&i| r[(i, i)].abs() > threshold).count()
}

/// Center a matrix by subtracting column means.
pub fn center_columns(x: &Mat<f64>) -> (Mat<f64>, Col<f64>) {
    let n_rows = x.nrows();
    let n_cols = x.ncols();

    let means = Col::from_fn(n_cols, |j| {
        (0..n_rows).map(|i| x[(i, j)]).sum::<f64>() / n_rows as f64
    });
    let centered = Mat::from_fn(n_rows, n_cols, |i, j| x[(i, j)] - means[j]);

    (centered, means)
}

/// Center a vector by subtracting the mean.
pub fn center_vector(y: &Col<f64>) -> (Col<f64>, f64) {
    let n = y.nrows();
    let mean: f64 = y.iter().sum::<f64>() / n as f64;

    let centered = Col::from_fn(n, |i| y[i] - mean);

    (centered, mean)
}

/// Build `[1 | X]`: a column of ones followed by the columns of `x`.
pub fn prepend_intercept(x: &Mat<f64>) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() + 1, |i, j| {
        if j == 0 {
            1.0
        } else {
            x[(i, j - 1)]
        }
    })
}

/// Copy the rows of `x` into owned vectors.
pub fn rows(x: &Mat<f64>) -> Vec<Vec<f64>> {
    (0..x.nrows())
        .map(|i| (0..x.ncols()).map(|j| x[(i, j)]).collect())
        .collect()
}

/// Copy column `j` of `x`.
pub fn column(x: &Mat<f64>, j: usize) -> Col<f64> {
    Col::from_fn(x.nrows(), |i| x[(i, j)])
}

/// Copy every column of `x` except `skip`.
pub fn drop_column(x: &Mat<f64>, skip: usize) -> Mat<f64> {
    Mat::from_fn(x.nrows(), x.ncols() - 1, |i, j| {
        if j < skip {
            x[(i, j)]
        } else {
            x[(i, j + 1)]
        }
    })
}
