//! Main `CoactivationDetector` entry point and builder.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::analysis::{detect_events, pooled_surrogate_histogram, threshold_edge_matrix};
use crate::config::{Config, StatisticMode};
use crate::constants::DEFAULT_SEED;
use crate::error::{Error, Result};
use crate::null_model::{NullModelSampler, NullPolicy};
use crate::preflight::run_all_checks;
use crate::result::{DetectionResult, EventReport, Metadata, NullSummary};
use crate::source::TimeSeriesExtractor;
use crate::statistics::{nan_mean_columns, rss_from_edges, EdgeIndex};
use crate::types::{EdgeMatrix, TimeSeriesMatrix};

/// Main entry point for co-activation event detection.
///
/// Use the builder pattern to configure and run detection.
///
/// # Example
///
/// ```ignore
/// use coactivation::{CoactivationDetector, NullPolicy};
///
/// let result = CoactivationDetector::new()
///     .num_trials(200)
///     .critical_p_value(0.01)
///     .seed(7)
///     .detect(&series, NullPolicy::CircularShift)?;
///
/// for event in result.events() {
///     println!("frames {}..={}, peak {}", event.start, event.end, event.peak);
/// }
/// ```
///
/// Area-under-curve series need externally generated surrogates:
///
/// ```ignore
/// use coactivation::{CoactivationDetector, DelimitedExtractor, NullPolicy,
///     PrefixSurrogateStore, StatisticMode};
///
/// let store = PrefixSurrogateStore::new("surr/trial_", ".txt", "labels.txt", DelimitedExtractor);
/// let result = CoactivationDetector::new()
///     .statistic(StatisticMode::AreaUnderCurve)
///     .percentile(95.0)
///     .detect(&auc, NullPolicy::Surrogates(&store))?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct CoactivationDetector {
    config: Config,
}

impl CoactivationDetector {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create with a reduced null model for quick exploratory runs.
    ///
    /// Settings:
    /// - 20 trials (vs 100 default)
    /// - critical p-value 0.01 (vs 0.001 default), which 20 trials can resolve
    pub fn quick() -> Self {
        Self {
            config: Config {
                num_trials: 20,
                critical_p_value: 0.01,
                ..Config::default()
            },
        }
    }

    /// Create from an existing configuration.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the number of null-model trials.
    pub fn num_trials(mut self, n: usize) -> Self {
        self.config.num_trials = n;
        self
    }

    /// Set the critical empirical p-value.
    pub fn critical_p_value(mut self, p: f64) -> Self {
        self.config.critical_p_value = p;
        self
    }

    /// Merge contiguous significant frames into events.
    pub fn segment_events(mut self, segment: bool) -> Self {
        self.config.segment_events = segment;
        self
    }

    /// Set the summary statistic of the input series.
    pub fn statistic(mut self, mode: StatisticMode) -> Self {
        self.config.statistic = mode;
        self
    }

    /// Set the number of bins of the pooled surrogate histogram.
    pub fn histogram_bins(mut self, bins: usize) -> Self {
        self.config.histogram_bins = bins;
        self
    }

    /// Set the histogram percentile (0-100) used as edge cutoff.
    pub fn percentile(mut self, percentile: f64) -> Self {
        self.config.percentile = percentile;
        self
    }

    /// Set deterministic seed for circular-shift randomization.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    /// Fail when any single null-model trial takes longer than `ms`.
    pub fn max_trial_duration_ms(mut self, ms: u64) -> Self {
        self.config.max_trial_duration_ms = Some(ms);
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Extract a series with `extractor`, then run [`detect`](Self::detect).
    pub fn detect_from(
        &self,
        extractor: &dyn TimeSeriesExtractor,
        source: &Path,
        labels: &Path,
        policy: NullPolicy<'_>,
    ) -> Result<DetectionResult> {
        let raw = extractor.extract(source, labels)?;
        debug!(
            source = %source.display(),
            rows = raw.nrows(),
            cols = raw.ncols(),
            "extracted series"
        );
        self.detect(&raw, policy)
    }

    /// Detect co-activation events in a raw T x N series.
    ///
    /// # Errors
    ///
    /// - `InvalidConfig` for out-of-domain settings, or area-under-curve mode
    ///   combined with circular shifts.
    /// - `InvalidInputShape` for fewer than two time points or nodes, or zero
    ///   trials.
    /// - Null-model failures (`NullModelTrialFailure`, `TrialTimeout`,
    ///   `SurrogateShapeMismatch`) abort the run.
    /// - `ThresholdOutOfRange` when the histogram percentile has no cutoff.
    pub fn detect(&self, raw: &TimeSeriesMatrix, policy: NullPolicy<'_>) -> Result<DetectionResult> {
        let start_time = Instant::now();
        let config = &self.config;

        // Step 1: Configuration and mode
        config.validate()?;
        let mode = config.statistic;
        let store = match policy {
            NullPolicy::Surrogates(store) => Some(store),
            NullPolicy::CircularShift if mode.uses_histogram_threshold() => {
                return Err(Error::InvalidConfig(
                    "area-under-curve mode requires external surrogates".to_string(),
                ));
            }
            NullPolicy::CircularShift => None,
        };

        // Step 2: Shape and preflight
        let (time_points, nodes) = raw.shape();
        if time_points < 2 || nodes < 2 {
            return Err(Error::InvalidInputShape(format!(
                "need at least 2 time points and 2 nodes, got {time_points}x{nodes}"
            )));
        }
        let preflight = run_all_checks(raw, mode, config.num_trials, config.critical_p_value);

        info!(
            time_points,
            nodes,
            trials = config.num_trials,
            mode = ?mode,
            policy = policy.name(),
            "detecting co-activation events"
        );

        // Step 3: Normalise
        let (series, non_finite_replaced) = mode.normalize(raw);

        // Step 4: Edges and observed RSS
        let edge_index = EdgeIndex::new(nodes)?;
        let edges = edge_index.edge_series(&series)?;
        let rss = rss_from_edges(&edges);

        // Step 5: Null model
        let null_start = Instant::now();
        let sampler = NullModelSampler::new(&series, &edge_index, policy, mode, config)?;
        let null = sampler.sample()?;
        let null_model_secs = null_start.elapsed().as_secs_f64();

        // Step 6: Events
        let detection = detect_events(&rss, &null, config.critical_p_value, config.segment_events);
        info!(
            significant = detection.significant.len(),
            events = detection.events.len(),
            "event detection done"
        );

        // Step 7: Peak co-fluctuation
        let peaks = &detection.peaks;
        let peak_edges = EdgeMatrix::from_fn(peaks.len(), edge_index.len(), |r, e| edges[(peaks[r], e)]);
        let mean_peak_cofluctuation = nan_mean_columns(&peak_edges);

        // Step 8: Histogram cutoff (area-under-curve only)
        let histogram_threshold = match store {
            Some(store) if mode.uses_histogram_threshold() => {
                let histogram = pooled_surrogate_histogram(
                    store,
                    &edge_index,
                    raw.shape(),
                    null.edge_range(),
                    config.histogram_bins,
                    config.num_trials,
                )?;
                let cutoff = histogram.percentile_threshold(config.percentile)?;
                info!(percentile = config.percentile, cutoff, "histogram threshold");
                Some(cutoff)
            }
            _ => None,
        };

        // Step 9: Thresholded edge matrix
        let thresholded = threshold_edge_matrix(&edges, peaks, histogram_threshold);

        // Step 10: Assemble
        let report = EventReport {
            statistic: mode,
            null_policy: policy.name().to_string(),
            critical_p_value: config.critical_p_value,
            segmented: config.segment_events,
            rss,
            p_values: detection.p_values,
            events: detection.events,
            peaks: detection.peaks,
            null: NullSummary::from_distribution(
                &null,
                config.critical_p_value,
                mode.uses_histogram_threshold(),
            ),
            histogram_threshold,
            preflight,
            metadata: Metadata {
                time_points,
                nodes,
                edges: edge_index.len(),
                non_finite_replaced,
                seed: config.seed.unwrap_or(DEFAULT_SEED),
                null_model_secs,
                runtime_secs: start_time.elapsed().as_secs_f64(),
            },
        };

        Ok(DetectionResult {
            report,
            edge_index,
            raw: raw.clone(),
            series,
            edges,
            null,
            peak_edges,
            mean_peak_cofluctuation,
            thresholded,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detector_default_config() {
        let detector = CoactivationDetector::new();
        assert_eq!(detector.config().num_trials, 100);
        assert_eq!(detector.config().critical_p_value, 0.001);
        assert!(detector.config().segment_events);
    }

    #[test]
    fn test_detector_builder() {
        let detector = CoactivationDetector::new()
            .num_trials(250)
            .critical_p_value(0.05)
            .segment_events(false)
            .statistic(StatisticMode::AreaUnderCurve)
            .histogram_bins(64)
            .percentile(90.0)
            .seed(3)
            .max_trial_duration_ms(1_000);

        let config = detector.config();
        assert_eq!(config.num_trials, 250);
        assert_eq!(config.critical_p_value, 0.05);
        assert!(!config.segment_events);
        assert_eq!(config.statistic, StatisticMode::AreaUnderCurve);
        assert_eq!(config.histogram_bins, 64);
        assert_eq!(config.percentile, 90.0);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.max_trial_duration_ms, Some(1_000));
    }

    #[test]
    fn test_detector_quick() {
        let detector = CoactivationDetector::quick();
        assert_eq!(detector.config().num_trials, 20);
        assert_eq!(detector.config().critical_p_value, 0.01);
    }

    #[test]
    fn test_too_small_input_rejected() {
        let detector = CoactivationDetector::quick();
        for (t, n) in [(1, 5), (10, 1), (0, 0)] {
            let result = detector.detect(&TimeSeriesMatrix::zeros(t, n), NullPolicy::CircularShift);
            assert!(matches!(result, Err(Error::InvalidInputShape(_))), "{t}x{n}");
        }
    }

    #[test]
    fn test_auc_with_circular_shift_rejected() {
        let detector = CoactivationDetector::quick().statistic(StatisticMode::AreaUnderCurve);
        let series = TimeSeriesMatrix::from_fn(10, 3, |t, n| (t + n) as f64);
        assert!(matches!(
            detector.detect(&series, NullPolicy::CircularShift),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_result_shapes() {
        let series = TimeSeriesMatrix::from_fn(30, 4, |t, n| ((t * (n + 3)) % 11) as f64);
        let result = CoactivationDetector::quick()
            .seed(1)
            .detect(&series, NullPolicy::CircularShift)
            .unwrap();

        assert_eq!(result.edges.shape(), (30, 6));
        assert_eq!(result.thresholded.shape(), (30, 6));
        assert_eq!(result.report.rss.len(), 30);
        assert_eq!(result.report.p_values.len(), 30);
        assert_eq!(result.peak_edges.nrows(), result.peaks().len());
        assert_eq!(result.mean_peak_cofluctuation.len(), 6);
        assert_eq!(result.null.rss_matrix().shape(), (30, 20));
        assert_eq!(result.report.metadata.edges, 6);
        assert!(result.report.histogram_threshold.is_none());
    }
}
