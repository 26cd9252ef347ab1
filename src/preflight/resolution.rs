//! P-value resolution check.
//!
//! Empirical p-values are multiples of `1 / pool`, where the pool holds
//! `T * num_trials` surrogate RSS values. When the critical p-value is below
//! that step, only frames exceeding every surrogate value can be significant.

use serde::{Deserialize, Serialize};

/// Warning from the resolution check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ResolutionWarning {
    /// The pooled null is too small to resolve the critical p-value.
    CoarsePValues {
        /// Number of pooled surrogate RSS values.
        pool_size: usize,
        /// Configured critical p-value.
        critical_p_value: f64,
    },
}

impl ResolutionWarning {
    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            ResolutionWarning::CoarsePValues {
                pool_size,
                critical_p_value,
            } => format!(
                "Null pool of {} values resolves p-values in steps of {:.2e}, coarser than \
                 the critical p-value {}. Only frames above every surrogate value can be \
                 significant; consider more trials.",
                pool_size,
                1.0 / *pool_size as f64,
                critical_p_value
            ),
        }
    }
}

/// Warn when `critical_p_value * pool_size < 1`.
pub fn resolution_check(
    time_points: usize,
    num_trials: usize,
    critical_p_value: f64,
) -> Option<ResolutionWarning> {
    let pool_size = time_points * num_trials;
    if pool_size > 0 && critical_p_value * (pool_size as f64) < 1.0 {
        Some(ResolutionWarning::CoarsePValues {
            pool_size,
            critical_p_value,
        })
    } else {
        None
    }
}
