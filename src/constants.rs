//! Default values for detection parameters.

/// Number of surrogate trials in the null model.
pub const DEFAULT_NUM_TRIALS: usize = 100;

/// Critical empirical p-value for a frame to count as significant.
pub const DEFAULT_CRITICAL_P: f64 = 0.001;

/// Bins of the pooled surrogate edge histogram.
pub const DEFAULT_HISTOGRAM_BINS: usize = 500;

/// Percentile (0-100) of the pooled surrogate edge histogram used as cutoff.
pub const DEFAULT_PERCENTILE: f64 = 95.0;

/// Base seed used when the configuration does not provide one.
pub const DEFAULT_SEED: u64 = 42;

/// Relative tolerance for singular values in least-squares solves.
pub const SVD_EPS: f64 = 1e-12;
