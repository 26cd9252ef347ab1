//! Detection result types.

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

use crate::analysis::{activity_mask, debias, DeconvolutionFit, Deconvolver, Event};
use crate::config::StatisticMode;
use crate::error::Result;
use crate::null_model::NullDistribution;
use crate::preflight::PreflightResult;
use crate::statistics::EdgeIndex;
use crate::types::{ActivityMask, EdgeMatrix, TimeSeriesMatrix};

/// Serializable summary of one detection run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventReport {
    /// Summary statistic the series was treated as.
    pub statistic: StatisticMode,

    /// Null policy used ("circular-shift" or "surrogates").
    pub null_policy: String,

    /// Critical empirical p-value.
    pub critical_p_value: f64,

    /// Whether contiguous significant frames were merged into events.
    pub segmented: bool,

    /// Observed RSS, one value per time point.
    pub rss: Vec<f64>,

    /// Empirical p-value of every time point.
    pub p_values: Vec<f64>,

    /// Detected events, ascending by start frame.
    pub events: Vec<Event>,

    /// Peak frame of every event, ascending.
    pub peaks: Vec<usize>,

    /// Summary of the null distribution.
    pub null: NullSummary,

    /// Histogram percentile cutoff applied to edge values.
    ///
    /// Only set in area-under-curve mode.
    pub histogram_threshold: Option<f64>,

    /// Preflight warnings.
    pub preflight: PreflightResult,

    /// Metadata for debugging.
    pub metadata: Metadata,
}

impl EventReport {
    /// Number of detected events.
    pub fn num_events(&self) -> usize {
        self.events.len()
    }

    /// Whether any frame was significant.
    pub fn has_events(&self) -> bool {
        !self.events.is_empty()
    }

    /// Largest observed RSS.
    pub fn max_rss(&self) -> f64 {
        self.rss.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Summary of the pooled null distribution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NullSummary {
    /// Number of surrogate trials.
    pub num_trials: usize,

    /// Number of pooled surrogate RSS values (T x trials).
    pub pool_size: usize,

    /// Pooled RSS quantile at `1 - critical_p_value`.
    ///
    /// Observed frames well above this value are significant.
    pub critical_rss: f64,

    /// Largest pooled surrogate RSS.
    pub max_rss: f64,

    /// (min, max) of surrogate edge values, in area-under-curve mode.
    pub edge_range: Option<(f64, f64)>,
}

impl NullSummary {
    /// Summarise `null` for the given critical p-value.
    pub fn from_distribution(null: &NullDistribution, critical_p_value: f64, keep_range: bool) -> Self {
        let pooled = null.pooled_sorted();
        Self {
            num_trials: null.num_trials(),
            pool_size: pooled.len(),
            critical_rss: null.quantile(1.0 - critical_p_value),
            max_rss: pooled.last().copied().unwrap_or(f64::NAN),
            edge_range: keep_range.then(|| null.edge_range()),
        }
    }
}

/// Metadata for debugging and analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    /// Number of time points (T).
    pub time_points: usize,

    /// Number of nodes (N).
    pub nodes: usize,

    /// Number of edges, N(N-1)/2.
    pub edges: usize,

    /// Non-finite entries of the observed series replaced by 0.
    pub non_finite_replaced: usize,

    /// Base seed of circular-shift randomization.
    pub seed: u64,

    /// Wall-clock time spent sampling the null model.
    pub null_model_secs: f64,

    /// Total analysis time in seconds.
    pub runtime_secs: f64,
}

/// Full result of a detection run.
///
/// Holds the matrices behind an [`EventReport`]; only the report is
/// serialized.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    /// Serializable summary.
    pub report: EventReport,

    /// Edge enumeration shared by every edge-indexed array below.
    pub edge_index: EdgeIndex,

    /// Observed series as given to the detector (T x N).
    pub raw: TimeSeriesMatrix,

    /// Normalised observed series (T x N), the input of the edge matrix.
    pub series: TimeSeriesMatrix,

    /// Observed edge co-fluctuation matrix (T x E).
    pub edges: EdgeMatrix,

    /// Pooled null distribution.
    pub null: NullDistribution,

    /// Edge rows at the peaks (peaks x E).
    pub peak_edges: EdgeMatrix,

    /// Per-edge mean of `peak_edges`, NaN when there are no peaks.
    pub mean_peak_cofluctuation: Vec<f64>,

    /// Edge matrix zeroed outside the peaks and, in area-under-curve mode,
    /// below the histogram cutoff.
    pub thresholded: EdgeMatrix,
}

impl DetectionResult {
    /// Peak frames, ascending.
    pub fn peaks(&self) -> &[usize] {
        &self.report.peaks
    }

    /// Detected events.
    pub fn events(&self) -> &[Event] {
        &self.report.events
    }

    /// Node-by-frame activity implied by the thresholded edge matrix.
    pub fn activity_mask(&self) -> ActivityMask {
        activity_mask(&self.thresholded, &self.edge_index)
    }

    /// Deconvolve the observed series restricted to the detected activity.
    ///
    /// The deconvolver sees the raw input, not the z-scored series.
    pub fn debias(
        &self,
        convolution: &DMatrix<f64>,
        deconvolver: &dyn Deconvolver,
    ) -> Result<DeconvolutionFit> {
        debias(
            &self.thresholded,
            &self.edge_index,
            &self.raw,
            convolution,
            deconvolver,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::null_model::NullTrial;

    #[test]
    fn test_null_summary() {
        let null = NullDistribution::from_trials(
            vec![
                NullTrial {
                    trial: 0,
                    rss: vec![1.0, 2.0],
                    edge_range: (-1.0, 3.0),
                },
                NullTrial {
                    trial: 1,
                    rss: vec![3.0, 4.0],
                    edge_range: (-2.0, 1.0),
                },
            ],
            2,
        )
        .unwrap();

        let summary = NullSummary::from_distribution(&null, 0.5, true);
        assert_eq!(summary.num_trials, 2);
        assert_eq!(summary.pool_size, 4);
        assert_eq!(summary.max_rss, 4.0);
        assert_eq!(summary.edge_range, Some((-2.0, 3.0)));

        let summary = NullSummary::from_distribution(&null, 0.5, false);
        assert_eq!(summary.edge_range, None);
    }
}
