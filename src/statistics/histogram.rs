//! Fixed-range histograms and percentile cutoffs.
//!
//! Binning follows the usual equal-width convention: `bins + 1` evenly spaced
//! edges over `[lo, hi]`, every bin half-open except the last, which also
//! holds `hi`. Values outside the range and NaN are not counted.

use crate::error::{Error, Result};

/// Equal-width histogram over a fixed range.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    lo: f64,
    hi: f64,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create an empty histogram with `bins` bins over `range`.
    ///
    /// A zero-width range is widened to `[lo - 0.5, hi + 0.5]`.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for zero bins, a non-finite range or `lo > hi`.
    pub fn new(range: (f64, f64), bins: usize) -> Result<Self> {
        let (mut lo, mut hi) = range;
        if bins == 0 {
            return Err(Error::InvalidConfig("histogram needs at least one bin".to_string()));
        }
        if !lo.is_finite() || !hi.is_finite() || lo > hi {
            return Err(Error::InvalidConfig(format!(
                "invalid histogram range [{lo}, {hi}]"
            )));
        }
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        Ok(Self {
            lo,
            hi,
            counts: vec![0; bins],
        })
    }

    /// Number of bins.
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Per-bin counts.
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of counted values.
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The `bins + 1` bin edges.
    pub fn edges(&self) -> Vec<f64> {
        let bins = self.bins();
        let width = (self.hi - self.lo) / bins as f64;
        (0..=bins)
            .map(|i| if i == bins { self.hi } else { self.lo + width * i as f64 })
            .collect()
    }

    /// Count one value.
    #[inline]
    pub fn add(&mut self, value: f64) {
        if !(value >= self.lo && value <= self.hi) {
            return;
        }
        let bins = self.bins();
        let scaled = (value - self.lo) / (self.hi - self.lo) * bins as f64;
        let idx = (scaled as usize).min(bins - 1);
        self.counts[idx] += 1;
    }

    /// Count every value of an iterator.
    pub fn accumulate<I: IntoIterator<Item = f64>>(&mut self, values: I) {
        for value in values {
            self.add(value);
        }
    }

    /// Add the counts of `other` bin by bin.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` when the two histograms do not share range and bins.
    pub fn merge(&mut self, other: &Histogram) -> Result<()> {
        if self.lo != other.lo || self.hi != other.hi || self.bins() != other.bins() {
            return Err(Error::InvalidConfig(
                "cannot merge histograms with different binning".to_string(),
            ));
        }
        for (a, b) in self.counts.iter_mut().zip(&other.counts) {
            *a += b;
        }
        Ok(())
    }

    /// Running sum of the counts as a percentage of the total mass.
    ///
    /// All zeros when the histogram is empty.
    pub fn cumulative_percent(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.bins()];
        }
        let mut running = 0u64;
        self.counts
            .iter()
            .map(|&c| {
                running += c;
                running as f64 / total as f64 * 100.0
            })
            .collect()
    }

    /// Bin edge at `percentile` (0-100) of the cumulative distribution.
    ///
    /// With `k` the number of bins whose cumulative percentage is at most
    /// `percentile`, the cutoff is edge `k`: all mass up to, but not beyond,
    /// the target percentile lies below it. At 100 every bin qualifies and
    /// the cutoff is the top edge.
    ///
    /// # Errors
    ///
    /// `ThresholdOutOfRange` when the histogram is empty or when
    /// `percentile` lies beyond 100 (or is NaN).
    pub fn percentile_threshold(&self, percentile: f64) -> Result<f64> {
        if self.total() == 0 {
            return Err(Error::ThresholdOutOfRange {
                percentile,
                reason: "histogram holds no mass".to_string(),
            });
        }
        if !(percentile <= 100.0) {
            return Err(Error::ThresholdOutOfRange {
                percentile,
                reason: "percentile is beyond all observed mass".to_string(),
            });
        }

        let k = self
            .cumulative_percent()
            .iter()
            .filter(|&&c| c <= percentile)
            .count();

        Ok(self.edges()[k])
    }
}
