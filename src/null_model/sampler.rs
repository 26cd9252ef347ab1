//! Parallel Monte-Carlo sampling of the null model.

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use super::{NullDistribution, NullPolicy, NullTrial};
use crate::config::{Config, StatisticMode};
use crate::constants::DEFAULT_SEED;
use crate::error::{Error, Result};
use crate::statistics::{circular_shift_columns, counter_rng_seed, EdgeIndex};
use crate::types::TimeSeriesMatrix;

/// Runs `num_trials` independent surrogate trials and pools their RSS.
///
/// Every trial reads the shared, already normalised observed series and the
/// shared edge index, and writes only its own [`NullTrial`]. Circular-shift
/// trials seed their own RNG from the trial index, so results do not depend
/// on scheduling.
#[derive(Debug, Clone)]
pub struct NullModelSampler<'a> {
    series: &'a TimeSeriesMatrix,
    index: &'a EdgeIndex,
    policy: NullPolicy<'a>,
    mode: StatisticMode,
    num_trials: usize,
    base_seed: u64,
    max_trial_duration: Option<Duration>,
}

impl<'a> NullModelSampler<'a> {
    /// Create a sampler over the normalised observed `series`.
    ///
    /// # Errors
    ///
    /// - `InvalidInputShape` when `config.num_trials` is zero or the series
    ///   does not match the edge index.
    /// - `InvalidConfig` for area-under-curve mode without external
    ///   surrogates.
    pub fn new(
        series: &'a TimeSeriesMatrix,
        index: &'a EdgeIndex,
        policy: NullPolicy<'a>,
        mode: StatisticMode,
        config: &Config,
    ) -> Result<Self> {
        if config.num_trials == 0 {
            return Err(Error::InvalidInputShape(
                "null model needs at least one trial".to_string(),
            ));
        }
        if series.ncols() != index.n_nodes() {
            return Err(Error::InvalidInputShape(format!(
                "series has {} nodes, edge index {}",
                series.ncols(),
                index.n_nodes()
            )));
        }
        if mode.uses_histogram_threshold() && matches!(policy, NullPolicy::CircularShift) {
            return Err(Error::InvalidConfig(
                "area-under-curve mode requires external surrogates".to_string(),
            ));
        }

        Ok(Self {
            series,
            index,
            policy,
            mode,
            num_trials: config.num_trials,
            base_seed: config.seed.unwrap_or(DEFAULT_SEED),
            max_trial_duration: config.max_trial_duration_ms.map(Duration::from_millis),
        })
    }

    /// Number of trials this sampler runs.
    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    /// Run every trial and pool the results.
    ///
    /// The first failing trial aborts the batch; a partial null distribution
    /// is never returned.
    pub fn sample(&self) -> Result<NullDistribution> {
        let start = Instant::now();
        info!(
            trials = self.num_trials,
            policy = self.policy.name(),
            "sampling null model"
        );

        #[cfg(feature = "parallel")]
        let trials: Result<Vec<NullTrial>> = crate::thread_pool::install(|| {
            (0..self.num_trials)
                .into_par_iter()
                .map(|trial| self.run_trial(trial))
                .collect()
        });

        #[cfg(not(feature = "parallel"))]
        let trials: Result<Vec<NullTrial>> =
            (0..self.num_trials).map(|trial| self.run_trial(trial)).collect();

        let null = NullDistribution::from_trials(trials?, self.series.nrows())?;
        info!(
            trials = null.num_trials(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "null model ready"
        );
        Ok(null)
    }

    /// Produce the surrogate RSS of one trial.
    pub fn run_trial(&self, trial: usize) -> Result<NullTrial> {
        let start = Instant::now();

        let (surrogate, replaced) = self.surrogate_series(trial)?;
        let (mut rss, edge_range) = self.index.rss_and_range(&surrogate)?;

        if self.mode.uses_histogram_threshold() {
            // Fix-up: area-under-curve surrogates carry a boundary artifact at
            // the first time point, an outsized RSS that would inflate the null
            // distribution. Zero it; nothing else is altered.
            if let Some(first) = rss.first_mut() {
                *first = 0.0;
            }
        }

        let elapsed = start.elapsed();
        if let Some(limit) = self.max_trial_duration {
            if elapsed > limit {
                return Err(Error::TrialTimeout {
                    trial,
                    elapsed_ms: elapsed.as_millis() as u64,
                    limit_ms: limit.as_millis() as u64,
                });
            }
        }

        debug!(trial, replaced, elapsed_us = elapsed.as_micros() as u64, "null trial done");
        Ok(NullTrial {
            trial,
            rss,
            edge_range,
        })
    }

    /// Surrogate series of `trial` and the number of non-finite values replaced.
    fn surrogate_series(&self, trial: usize) -> Result<(TimeSeriesMatrix, usize)> {
        match self.policy {
            NullPolicy::CircularShift => {
                let mut rng =
                    Xoshiro256PlusPlus::seed_from_u64(counter_rng_seed(self.base_seed, trial as u64));
                Ok((circular_shift_columns(self.series, &mut rng), 0))
            }
            NullPolicy::Surrogates(store) => {
                let raw = store
                    .load(trial)
                    .map_err(|source| Error::NullModelTrialFailure { trial, source })?;
                if raw.shape() != self.series.shape() {
                    return Err(Error::SurrogateShapeMismatch {
                        trial,
                        expected_rows: self.series.nrows(),
                        expected_cols: self.series.ncols(),
                        found_rows: raw.nrows(),
                        found_cols: raw.ncols(),
                    });
                }
                let (prepared, replaced) = self.mode.normalize(&raw);
                if replaced > 0 {
                    debug!(trial, replaced, source = %store.locate(trial), "replaced non-finite surrogate values");
                }
                Ok((prepared, replaced))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::source::SurrogateStore;

    fn ramp_series(t: usize, n: usize) -> TimeSeriesMatrix {
        TimeSeriesMatrix::from_fn(t, n, |i, j| ((i * (j + 2)) % 7) as f64 - 3.0)
    }

    struct FixedStore {
        series: TimeSeriesMatrix,
        missing: Option<usize>,
    }

    impl SurrogateStore for FixedStore {
        fn load(&self, trial: usize) -> std::result::Result<TimeSeriesMatrix, SourceError> {
            if Some(trial) == self.missing {
                return Err(SourceError::Io {
                    path: format!("surrogate_{trial}").into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
                });
            }
            Ok(self.series.clone())
        }
    }

    #[test]
    fn test_zero_trials_rejected() {
        let series = ramp_series(10, 3);
        let index = EdgeIndex::new(3).unwrap();
        let config = Config {
            num_trials: 0,
            ..Config::default()
        };
        let result = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::CircularShift,
            StatisticMode::ZScored,
            &config,
        );
        assert!(matches!(result, Err(Error::InvalidInputShape(_))));
    }

    #[test]
    fn test_auc_requires_surrogates() {
        let series = ramp_series(10, 3);
        let index = EdgeIndex::new(3).unwrap();
        let result = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::CircularShift,
            StatisticMode::AreaUnderCurve,
            &Config::default(),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_circular_shift_is_reproducible() {
        let series = ramp_series(40, 5);
        let index = EdgeIndex::new(5).unwrap();
        let config = Config {
            num_trials: 12,
            seed: Some(9),
            ..Config::default()
        };
        let sampler = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::CircularShift,
            StatisticMode::ZScored,
            &config,
        )
        .unwrap();

        let a = sampler.sample().unwrap();
        let b = sampler.sample().unwrap();
        assert_eq!(a.rss_matrix(), b.rss_matrix());
        assert_eq!(a.rss_matrix().shape(), (40, 12));
        assert!(a.pooled_sorted().iter().all(|&x| x >= 0.0));
    }

    #[test]
    fn test_sequential_trials_match_sample() {
        let series = ramp_series(30, 6);
        let index = EdgeIndex::new(6).unwrap();
        let config = Config {
            num_trials: 16,
            seed: Some(77),
            ..Config::default()
        };
        let sampler = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::CircularShift,
            StatisticMode::ZScored,
            &config,
        )
        .unwrap();

        // one trial at a time, in index order, on the calling thread
        let trials: Vec<NullTrial> = (0..16)
            .map(|trial| sampler.run_trial(trial).unwrap())
            .collect();
        let sequential = NullDistribution::from_trials(trials, 30).unwrap();

        let pooled = sampler.sample().unwrap();
        assert_eq!(sequential.rss_matrix(), pooled.rss_matrix());
        assert_eq!(sequential.pooled_sorted(), pooled.pooled_sorted());
        assert_eq!(sequential.edge_range(), pooled.edge_range());
    }

    #[test]
    fn test_missing_surrogate_names_trial() {
        let series = ramp_series(10, 3);
        let index = EdgeIndex::new(3).unwrap();
        let store = FixedStore {
            series: series.clone(),
            missing: Some(4),
        };
        let config = Config {
            num_trials: 8,
            ..Config::default()
        };
        let sampler = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::Surrogates(&store),
            StatisticMode::ZScored,
            &config,
        )
        .unwrap();

        match sampler.sample() {
            Err(Error::NullModelTrialFailure { trial, .. }) => assert_eq!(trial, 4),
            other => panic!("expected trial failure, got {other:?}"),
        }
    }

    #[test]
    fn test_auc_surrogates_zero_first_time_point() {
        let series = ramp_series(10, 3).map(|x| x.abs() + 1.0);
        let index = EdgeIndex::new(3).unwrap();
        let mut raw = series.clone();
        raw[(4, 1)] = f64::NAN;
        let store = FixedStore {
            series: raw,
            missing: None,
        };
        let config = Config {
            num_trials: 3,
            statistic: StatisticMode::AreaUnderCurve,
            ..Config::default()
        };
        let sampler = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::Surrogates(&store),
            StatisticMode::AreaUnderCurve,
            &config,
        )
        .unwrap();

        let null = sampler.sample().unwrap();
        for j in 0..3 {
            assert_eq!(null.rss_matrix()[(0, j)], 0.0);
            assert!(null.rss_matrix()[(1, j)] > 0.0);
            assert!(null.rss_matrix().column(j).iter().all(|x| x.is_finite()));
        }
    }

    #[test]
    fn test_shape_mismatch_rejected() {
        let series = ramp_series(10, 3);
        let index = EdgeIndex::new(3).unwrap();
        let store = FixedStore {
            series: ramp_series(9, 3),
            missing: None,
        };
        let sampler = NullModelSampler::new(
            &series,
            &index,
            NullPolicy::Surrogates(&store),
            StatisticMode::ZScored,
            &Config {
                num_trials: 2,
                ..Config::default()
            },
        )
        .unwrap();
        assert!(matches!(
            sampler.sample(),
            Err(Error::SurrogateShapeMismatch { .. })
        ));
    }
}
