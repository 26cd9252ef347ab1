//! # coactivation
//!
//! Detect co-activation events in multivariate time series.
//!
//! Every pair of nodes forms an edge whose co-fluctuation at time `t` is the
//! product of the two (z-scored) node values. The root-sum-of-squares (RSS)
//! over all edges measures how strongly the whole network co-fluctuates at
//! each frame. Frames whose RSS is improbably high under a surrogate null
//! model are significant; contiguous runs of significant frames are events,
//! each represented by its peak frame.
//!
//! The pipeline outputs:
//! - Observed RSS and its empirical p-value per frame
//! - Events and their peak frames
//! - The edge matrix restricted to the peaks (optionally cut at a histogram
//!   percentile of the surrogate edge values)
//! - A node-by-frame activity mask for downstream deconvolution
//!
//! ## Null models
//!
//! - [`NullPolicy::CircularShift`] rolls every node by an independent random
//!   offset. Reproducible for a given seed regardless of thread count.
//! - [`NullPolicy::Surrogates`] loads externally generated surrogate series
//!   from a [`SurrogateStore`]. Required for
//!   [`StatisticMode::AreaUnderCurve`] series.
//!
//! ## Quick Start
//!
//! ```ignore
//! use coactivation::{CoactivationDetector, NullPolicy};
//!
//! let result = CoactivationDetector::new()
//!     .critical_p_value(0.01)
//!     .seed(42)
//!     .detect(&series, NullPolicy::CircularShift)?;
//!
//! println!("{}", coactivation::output::format_report(&result.report));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod config;
mod constants;
mod detector;
mod error;
mod result;
mod types;

// Functional modules
pub mod analysis;
pub mod null_model;
pub mod output;
pub mod preflight;
pub mod source;
pub mod statistics;
pub mod thread_pool;

// Re-exports for public API
pub use analysis::{DeconvolutionFit, Deconvolver, Event, LeastSquaresDeconvolver};
pub use config::{Config, StatisticMode};
pub use constants::{
    DEFAULT_CRITICAL_P, DEFAULT_HISTOGRAM_BINS, DEFAULT_NUM_TRIALS, DEFAULT_PERCENTILE,
    DEFAULT_SEED,
};
pub use detector::CoactivationDetector;
pub use error::{Error, Result, SourceError};
pub use null_model::{NullDistribution, NullPolicy};
pub use result::{DetectionResult, EventReport, Metadata, NullSummary};
pub use source::{DelimitedExtractor, PrefixSurrogateStore, SurrogateStore, TimeSeriesExtractor};
pub use statistics::EdgeIndex;
pub use types::{ActivityMask, EdgeMatrix, TimeSeriesMatrix};

/// Detect events in `series` with default configuration and circular shifts.
///
/// Equivalent to `CoactivationDetector::new().detect(series, NullPolicy::CircularShift)`.
pub fn detect(series: &TimeSeriesMatrix) -> Result<DetectionResult> {
    CoactivationDetector::new().detect(series, NullPolicy::CircularShift)
}
