//! Per-node standardization and non-finite cleanup.

use crate::types::TimeSeriesMatrix;

/// Z-score every column using the sample standard deviation (ddof = 1).
///
/// Columns with zero variance (or containing non-finite values) come out
/// non-finite; pass the result through [`replace_non_finite`] before use.
pub fn zscore_columns(series: &TimeSeriesMatrix) -> TimeSeriesMatrix {
    let mut out = series.clone();
    let n = series.nrows() as f64;

    for mut column in out.column_iter_mut() {
        let mean = column.iter().sum::<f64>() / n;
        let variance = column.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        let std = variance.sqrt();
        for value in column.iter_mut() {
            *value = (*value - mean) / std;
        }
    }

    out
}

/// Replace NaN and infinite entries with 0 in place.
///
/// # Returns
///
/// Number of entries that were replaced.
pub fn replace_non_finite(series: &mut TimeSeriesMatrix) -> usize {
    let mut replaced = 0;
    for value in series.iter_mut() {
        if !value.is_finite() {
            *value = 0.0;
            replaced += 1;
        }
    }
    replaced
}

/// Z-score then clean: the normalisation applied to plain activity series.
///
/// Returns the normalised matrix and the number of replaced entries.
pub fn standardize(series: &TimeSeriesMatrix) -> (TimeSeriesMatrix, usize) {
    let mut z = zscore_columns(series);
    let replaced = replace_non_finite(&mut z);
    (z, replaced)
}
