//! Type aliases and common types.

use nalgebra::DMatrix;

/// T x N matrix of regional time series (rows = time points, columns = nodes).
pub type TimeSeriesMatrix = DMatrix<f64>;

/// T x E matrix of edge co-fluctuations (columns follow the [`EdgeIndex`] order).
///
/// [`EdgeIndex`]: crate::statistics::EdgeIndex
pub type EdgeMatrix = DMatrix<f64>;

/// T x N boolean mask of node activity.
pub type ActivityMask = DMatrix<bool>;
