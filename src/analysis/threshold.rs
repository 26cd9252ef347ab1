//! Histogram-percentile thresholding of the edge matrix.
//!
//! Used in area-under-curve mode: the edge values of every surrogate trial
//! are binned over one shared range, the per-trial histograms are summed,
//! and the bin edge at the target percentile becomes a global cutoff.

use std::time::Instant;

use tracing::info;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::config::StatisticMode;
use crate::error::{Error, Result};
use crate::source::SurrogateStore;
use crate::statistics::{EdgeIndex, Histogram};
use crate::types::EdgeMatrix;

/// Pooled histogram of surrogate edge values.
///
/// Trials are reloaded from `store`, cleaned of non-finite values (without
/// z-scoring) and binned independently, then summed bin by bin.
pub fn pooled_surrogate_histogram(
    store: &dyn SurrogateStore,
    index: &EdgeIndex,
    shape: (usize, usize),
    range: (f64, f64),
    bins: usize,
    num_trials: usize,
) -> Result<Histogram> {
    if num_trials == 0 {
        return Err(Error::InvalidInputShape(
            "histogram needs at least one surrogate trial".to_string(),
        ));
    }
    // Validate range and bins once before fanning out.
    let empty = Histogram::new(range, bins)?;
    let start = Instant::now();

    let trial_histogram = |trial: usize| -> Result<Histogram> {
        let raw = store
            .load(trial)
            .map_err(|source| Error::NullModelTrialFailure { trial, source })?;
        if raw.shape() != shape {
            return Err(Error::SurrogateShapeMismatch {
                trial,
                expected_rows: shape.0,
                expected_cols: shape.1,
                found_rows: raw.nrows(),
                found_cols: raw.ncols(),
            });
        }
        let (series, _) = StatisticMode::AreaUnderCurve.normalize(&raw);
        let mut hist = empty.clone();
        index.for_each_edge_value(&series, |_, _, value| hist.add(value))?;
        Ok(hist)
    };

    #[cfg(feature = "parallel")]
    let histograms: Result<Vec<Histogram>> = crate::thread_pool::install(|| {
        (0..num_trials).into_par_iter().map(trial_histogram).collect()
    });

    #[cfg(not(feature = "parallel"))]
    let histograms: Result<Vec<Histogram>> = (0..num_trials).map(trial_histogram).collect();

    let mut pooled = empty;
    for hist in histograms? {
        pooled.merge(&hist)?;
    }

    info!(
        trials = num_trials,
        bins,
        values = pooled.total(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pooled surrogate histogram ready"
    );
    Ok(pooled)
}

/// Keep only peak rows of `ets`, then zero entries below `cutoff`.
///
/// Every row not listed in `peaks` is exactly zero in the output.
pub fn threshold_edge_matrix(ets: &EdgeMatrix, peaks: &[usize], cutoff: Option<f64>) -> EdgeMatrix {
    let mut out = EdgeMatrix::zeros(ets.nrows(), ets.ncols());
    for &t in peaks {
        out.set_row(t, &ets.row(t));
    }
    if let Some(cutoff) = cutoff {
        out.apply(|x| {
            if *x < cutoff {
                *x = 0.0;
            }
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::types::TimeSeriesMatrix;

    struct RampStore;

    impl SurrogateStore for RampStore {
        fn load(&self, trial: usize) -> std::result::Result<TimeSeriesMatrix, SourceError> {
            Ok(TimeSeriesMatrix::from_fn(4, 3, |t, n| (t + n + trial) as f64))
        }
    }

    #[test]
    fn test_rows_outside_peaks_are_zero() {
        let ets = EdgeMatrix::from_fn(6, 4, |t, e| (t * 4 + e) as f64 + 1.0);
        let out = threshold_edge_matrix(&ets, &[1, 4], None);

        for t in 0..6 {
            for e in 0..4 {
                if t == 1 || t == 4 {
                    assert_eq!(out[(t, e)], ets[(t, e)]);
                } else {
                    assert_eq!(out[(t, e)], 0.0);
                }
            }
        }
    }

    #[test]
    fn test_cutoff_zeroes_small_values() {
        let ets = EdgeMatrix::from_row_slice(2, 3, &[1.0, 5.0, -2.0, 7.0, 8.0, 9.0]);
        let out = threshold_edge_matrix(&ets, &[0], Some(2.0));
        assert_eq!(out.row(0).iter().copied().collect::<Vec<_>>(), vec![0.0, 5.0, 0.0]);
        assert!(out.row(1).iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_pooled_histogram_counts_every_edge_value() {
        let index = EdgeIndex::new(3).unwrap();
        let hist = pooled_surrogate_histogram(&RampStore, &index, (4, 3), (0.0, 100.0), 50, 5).unwrap();
        // 5 trials x 4 time points x 3 edges
        assert_eq!(hist.total(), 60);
    }

    #[test]
    fn test_pooled_histogram_rejects_shape_mismatch() {
        let index = EdgeIndex::new(3).unwrap();
        let result = pooled_surrogate_histogram(&RampStore, &index, (5, 3), (0.0, 100.0), 50, 2);
        assert!(matches!(result, Err(Error::SurrogateShapeMismatch { .. })));
    }
}
