//! Checks on the observed series before normalisation.
//!
//! None of these stop detection. In z-scored mode constant nodes z-score to
//! NaN and end up as all-zero columns. Non-finite values are replaced by 0,
//! and very short series give a small, coarse null pool.

use serde::{Deserialize, Serialize};

use crate::config::StatisticMode;
use crate::types::TimeSeriesMatrix;

/// Fewer time points than this triggers [`SeriesWarning::ShortSeries`].
const MIN_RECOMMENDED_TIME_POINTS: usize = 10;

/// Warning about the observed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SeriesWarning {
    /// A node has zero variance.
    ///
    /// It contributes nothing to any edge after z-scoring.
    ConstantNode {
        /// Column index of the node.
        node: usize,
    },

    /// The series contains NaN or infinite entries.
    NonFiniteValues {
        /// Number of non-finite entries.
        count: usize,
    },

    /// The series is very short.
    ShortSeries {
        /// Number of time points.
        time_points: usize,
        /// Recommended minimum.
        recommended: usize,
    },
}

impl SeriesWarning {
    /// Get a human-readable description of the warning.
    pub fn description(&self) -> String {
        match self {
            SeriesWarning::ConstantNode { node } => {
                format!("Node {} is constant; its edges are all zero after z-scoring.", node)
            }
            SeriesWarning::NonFiniteValues { count } => {
                format!("{} non-finite values in the series were replaced by 0.", count)
            }
            SeriesWarning::ShortSeries {
                time_points,
                recommended,
            } => format!(
                "Only {} time points (at least {} recommended); circular shifts have few \
                 distinct offsets.",
                time_points, recommended
            ),
        }
    }
}

/// Nodes whose finite values are all equal.
pub fn constant_nodes(series: &TimeSeriesMatrix) -> Vec<usize> {
    series
        .column_iter()
        .enumerate()
        .filter(|(_, column)| {
            let mut finite = column.iter().filter(|x| x.is_finite());
            match finite.next() {
                Some(first) => finite.all(|x| x == first),
                None => false,
            }
        })
        .map(|(j, _)| j)
        .collect()
}

/// Run every series check that applies to `mode`.
///
/// Constant nodes are only flagged when the mode z-scores; area-under-curve
/// series keep their magnitude, so a constant node still feeds its edges.
pub fn series_check(series: &TimeSeriesMatrix, mode: StatisticMode) -> Vec<SeriesWarning> {
    let mut warnings: Vec<SeriesWarning> = Vec::new();
    if mode.standardizes() {
        warnings.extend(
            constant_nodes(series)
                .into_iter()
                .map(|node| SeriesWarning::ConstantNode { node }),
        );
    }

    let count = series.iter().filter(|x| !x.is_finite()).count();
    if count > 0 {
        warnings.push(SeriesWarning::NonFiniteValues { count });
    }

    if series.nrows() < MIN_RECOMMENDED_TIME_POINTS {
        warnings.push(SeriesWarning::ShortSeries {
            time_points: series.nrows(),
            recommended: MIN_RECOMMENDED_TIME_POINTS,
        });
    }

    warnings
}
