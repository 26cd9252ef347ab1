//! Statistical building blocks for co-fluctuation event detection.
//!
//! - Per-node z-scoring and non-finite cleanup
//! - Edge enumeration, edge co-fluctuation series and RSS
//! - Circular-shift randomization with counter-based seeding
//! - Empirical p-values against a pooled null sample
//! - Quantiles, fixed-range histograms and NaN-tolerant means

mod circular;
mod edges;
mod histogram;
mod pvalue;
mod quantile;
mod standardize;
mod summary;

pub use circular::{circular_shift_columns, counter_rng_seed};
pub use edges::{rss_from_edges, EdgeIndex};
pub use histogram::Histogram;
pub use pvalue::{empirical_p_value, empirical_p_values};
pub use quantile::compute_quantile_sorted;
pub use standardize::{replace_non_finite, standardize, zscore_columns};
pub use summary::nan_mean_columns;
