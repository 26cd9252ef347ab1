//! Configuration for event detection.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CRITICAL_P, DEFAULT_HISTOGRAM_BINS, DEFAULT_NUM_TRIALS, DEFAULT_PERCENTILE,
};
use crate::error::{Error, Result};
use crate::statistics::{replace_non_finite, standardize};
use crate::types::TimeSeriesMatrix;

/// Configuration options for `CoactivationDetector`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Surrogate trials in the null model (default: 100).
    pub num_trials: usize,

    /// Critical empirical p-value (default: 0.001).
    ///
    /// A frame is significant when its p-value is strictly below this value.
    pub critical_p_value: f64,

    /// Collapse contiguous significant frames into one event (default: true).
    pub segment_events: bool,

    /// Summary statistic carried by the series (default: `ZScored`).
    pub statistic: StatisticMode,

    /// Bins of the pooled surrogate edge histogram (default: 500).
    ///
    /// Only used with [`StatisticMode::AreaUnderCurve`].
    pub histogram_bins: usize,

    /// Percentile of the pooled surrogate edge histogram, 0-100 (default: 95).
    ///
    /// Only used with [`StatisticMode::AreaUnderCurve`].
    pub percentile: f64,

    /// Optional deterministic seed for circular-shift randomization.
    pub seed: Option<u64>,

    /// Optional guardrail on the duration of a single null-model trial.
    pub max_trial_duration_ms: Option<u64>,
}

/// Summary statistic of the input series.
///
/// Selected once per run; every component receives it explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatisticMode {
    /// Plain activity series, z-scored per node before building edges.
    #[default]
    ZScored,

    /// Area-under-curve style series: not zero-mean, kept in raw magnitude,
    /// and thresholded with a pooled surrogate histogram percentile.
    AreaUnderCurve,
}

impl StatisticMode {
    /// Whether series of this mode are z-scored before building edges.
    pub fn standardizes(self) -> bool {
        matches!(self, Self::ZScored)
    }

    /// Whether this mode applies the histogram percentile cutoff.
    pub fn uses_histogram_threshold(self) -> bool {
        matches!(self, Self::AreaUnderCurve)
    }

    /// Normalise a raw series for edge construction.
    ///
    /// `ZScored` standardizes every node; `AreaUnderCurve` keeps magnitudes.
    /// Both replace non-finite entries with 0. Returns the normalised series
    /// and the number of replaced entries.
    pub fn normalize(self, series: &TimeSeriesMatrix) -> (TimeSeriesMatrix, usize) {
        match self {
            Self::ZScored => standardize(series),
            Self::AreaUnderCurve => {
                let mut out = series.clone();
                let replaced = replace_non_finite(&mut out);
                (out, replaced)
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_trials: DEFAULT_NUM_TRIALS,
            critical_p_value: DEFAULT_CRITICAL_P,
            segment_events: true,
            statistic: StatisticMode::ZScored,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            percentile: DEFAULT_PERCENTILE,
            seed: None,
            max_trial_duration_ms: None,
        }
    }
}

impl Config {
    /// Check every field against its valid domain.
    pub fn validate(&self) -> Result<()> {
        if self.num_trials == 0 {
            return Err(Error::InvalidInputShape(
                "null model needs at least one trial".to_string(),
            ));
        }
        if !(self.critical_p_value > 0.0 && self.critical_p_value <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "critical p-value must be in (0, 1], got {}",
                self.critical_p_value
            )));
        }
        if self.statistic.uses_histogram_threshold() {
            if self.histogram_bins == 0 {
                return Err(Error::InvalidConfig(
                    "histogram needs at least one bin".to_string(),
                ));
            }
            if !(self.percentile >= 0.0) {
                return Err(Error::InvalidConfig(format!(
                    "percentile must be non-negative, got {}",
                    self.percentile
                )));
            }
        }
        Ok(())
    }
}
