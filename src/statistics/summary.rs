//! NaN-tolerant column summaries.

use nalgebra::DMatrix;

/// Mean of every column, skipping NaN entries.
///
/// A column whose entries are all NaN has mean NaN, and so does every column
/// of a matrix with zero rows.
pub fn nan_mean_columns(matrix: &DMatrix<f64>) -> Vec<f64> {
    matrix
        .column_iter()
        .map(|column| {
            let (sum, count) = column
                .iter()
                .filter(|x| !x.is_nan())
                .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
            if count == 0 {
                f64::NAN
            } else {
                sum / count as f64
            }
        })
        .collect()
}
