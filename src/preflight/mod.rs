//! Preflight checks on the input before detection.
//!
//! These checks never abort a run. They flag inputs that detection handles
//! silently but that usually point at a problem upstream.
//!
//! # Checks Performed
//!
//! - **Series**: constant nodes (z-scored mode), non-finite values, very short
//!   series
//! - **Resolution**: null pool too small to resolve the critical p-value

mod resolution;
mod series;

pub use resolution::{resolution_check, ResolutionWarning};
pub use series::{constant_nodes, series_check, SeriesWarning};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::StatisticMode;
use crate::types::TimeSeriesMatrix;

/// Result of running all preflight checks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreflightResult {
    /// Warnings about the observed series.
    pub series: Vec<SeriesWarning>,

    /// Warnings about p-value resolution.
    pub resolution: Vec<ResolutionWarning>,
}

impl PreflightResult {
    /// Create a new empty preflight result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are any warnings.
    pub fn has_warnings(&self) -> bool {
        self.count() > 0
    }

    /// Total number of warnings.
    pub fn count(&self) -> usize {
        self.series.len() + self.resolution.len()
    }

    /// Human-readable descriptions of every warning.
    pub fn descriptions(&self) -> Vec<String> {
        self.series
            .iter()
            .map(SeriesWarning::description)
            .chain(self.resolution.iter().map(ResolutionWarning::description))
            .collect()
    }
}

/// Run all preflight checks and log each warning.
pub fn run_all_checks(
    series: &TimeSeriesMatrix,
    mode: StatisticMode,
    num_trials: usize,
    critical_p_value: f64,
) -> PreflightResult {
    let mut result = PreflightResult::new();
    result.series = series_check(series, mode);
    result
        .resolution
        .extend(resolution_check(series.nrows(), num_trials, critical_p_value));

    for description in result.descriptions() {
        warn!("preflight: {}", description);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preflight_result_default() {
        let result = PreflightResult::new();
        assert!(!result.has_warnings());
        assert_eq!(result.count(), 0);
    }

    #[test]
    fn test_run_all_checks_collects_both_kinds() {
        let series = TimeSeriesMatrix::from_element(5, 3, 1.0);
        let result = run_all_checks(&series, StatisticMode::ZScored, 2, 0.001);

        // three constant nodes plus a short series
        assert_eq!(result.series.len(), 4);
        assert_eq!(result.resolution.len(), 1);
        assert_eq!(result.descriptions().len(), 5);
    }

    #[test]
    fn test_auc_mode_skips_constant_nodes() {
        let series = TimeSeriesMatrix::from_element(5, 3, 1.0);
        let result = run_all_checks(&series, StatisticMode::AreaUnderCurve, 2, 0.001);

        // only the short series and the coarse pool remain
        assert_eq!(
            result.series,
            vec![SeriesWarning::ShortSeries {
                time_points: 5,
                recommended: 10
            }]
        );
        assert_eq!(result.resolution.len(), 1);
    }
}
