//! Pooled null distribution assembled from independent trials.

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::statistics::{compute_quantile_sorted, empirical_p_values};

/// Result of one surrogate trial.
#[derive(Debug, Clone, PartialEq)]
pub struct NullTrial {
    /// Trial index.
    pub trial: usize,
    /// Surrogate RSS, one value per time point.
    pub rss: Vec<f64>,
    /// (min, max) over all edge values of the surrogate.
    pub edge_range: (f64, f64),
}

/// Null distribution of RSS pooled over all trials and time points.
#[derive(Debug, Clone)]
pub struct NullDistribution {
    rss: DMatrix<f64>,
    pooled: Vec<f64>,
    edge_range: (f64, f64),
}

impl NullDistribution {
    /// Assemble trials into a T x trials matrix in trial-index order.
    ///
    /// Trials may arrive in any order, but indices must cover `0..n` exactly
    /// once and every RSS vector must have `time_points` entries.
    pub fn from_trials(mut trials: Vec<NullTrial>, time_points: usize) -> Result<Self> {
        if trials.is_empty() {
            return Err(Error::InvalidInputShape(
                "null distribution needs at least one trial".to_string(),
            ));
        }

        trials.sort_by_key(|t| t.trial);
        for (expected, trial) in trials.iter().enumerate() {
            if trial.trial != expected {
                return Err(Error::InvalidInputShape(format!(
                    "null trial {expected} is missing or duplicated"
                )));
            }
            if trial.rss.len() != time_points {
                return Err(Error::InvalidInputShape(format!(
                    "null trial {} has {} time points, expected {}",
                    trial.trial,
                    trial.rss.len(),
                    time_points
                )));
            }
        }

        let rss = DMatrix::from_fn(time_points, trials.len(), |t, j| trials[j].rss[t]);

        let mut pooled: Vec<f64> = rss.iter().copied().collect();
        pooled.sort_by(|a, b| a.total_cmp(b));

        let edge_range = trials.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), t| (lo.min(t.edge_range.0), hi.max(t.edge_range.1)),
        );

        Ok(Self {
            rss,
            pooled,
            edge_range,
        })
    }

    /// T x trials matrix of surrogate RSS; column j is trial j.
    pub fn rss_matrix(&self) -> &DMatrix<f64> {
        &self.rss
    }

    /// Number of trials.
    pub fn num_trials(&self) -> usize {
        self.rss.ncols()
    }

    /// All surrogate RSS values, ascending.
    pub fn pooled_sorted(&self) -> &[f64] {
        &self.pooled
    }

    /// (min of trial minima, max of trial maxima) over surrogate edge values.
    pub fn edge_range(&self) -> (f64, f64) {
        self.edge_range
    }

    /// Empirical p-value of every observed RSS value.
    pub fn p_values(&self, observed: &[f64]) -> Vec<f64> {
        empirical_p_values(observed, &self.pooled)
    }

    /// Quantile `p` of the pooled surrogate RSS.
    pub fn quantile(&self, p: f64) -> f64 {
        compute_quantile_sorted(&self.pooled, p.clamp(0.0, 1.0))
    }
}
