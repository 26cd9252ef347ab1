//! External collaborators that supply series to the pipeline.
//!
//! - [`TimeSeriesExtractor`]: turns a source file plus a label scheme into a
//!   T x N regional time-series matrix in canonical node order.
//! - [`SurrogateStore`]: loads the independently generated surrogate series
//!   of one null-model trial.
//!
//! [`DelimitedExtractor`] and [`PrefixSurrogateStore`] are file-based
//! implementations over delimited text.

mod delimited;
mod store;

pub use delimited::{read_labels, read_matrix, DelimitedExtractor};
pub use store::PrefixSurrogateStore;

use std::path::Path;

use crate::error::SourceError;
use crate::types::TimeSeriesMatrix;

/// Extracts regional time series from a source.
///
/// Implementations must be deterministic for a given `(source, labels)` pair.
pub trait TimeSeriesExtractor: Send + Sync {
    /// Extract a T x N matrix, one column per region.
    fn extract(&self, source: &Path, labels: &Path) -> Result<TimeSeriesMatrix, SourceError>;
}

/// Read-only store of surrogate series keyed by trial index.
///
/// Shared across worker threads; `load` must not mutate shared state.
pub trait SurrogateStore: Send + Sync {
    /// Load the surrogate series of `trial`.
    fn load(&self, trial: usize) -> Result<TimeSeriesMatrix, SourceError>;

    /// Human-readable location of `trial`, for logs.
    fn locate(&self, trial: usize) -> String {
        format!("trial {trial}")
    }
}
