//! Shared synthetic data for integration tests.
#![allow(dead_code)]

use coactivation::TimeSeriesMatrix;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Gaussian noise, `t` frames by `n` nodes.
pub fn noise(t: usize, n: usize, seed: u64) -> TimeSeriesMatrix {
    let mut rng = StdRng::seed_from_u64(seed);
    TimeSeriesMatrix::from_fn(t, n, |_, _| rng.sample::<f64, _>(StandardNormal))
}

/// Gaussian noise with a shared burst of `amplitude` on `nodes` at `frame`.
pub fn noise_with_burst(
    t: usize,
    n: usize,
    frame: usize,
    nodes: std::ops::Range<usize>,
    amplitude: f64,
    seed: u64,
) -> TimeSeriesMatrix {
    let mut series = noise(t, n, seed);
    for node in nodes {
        series[(frame, node)] += amplitude;
    }
    series
}
