//! Edge co-fluctuation series and root-sum-of-squares.
//!
//! An edge is an unordered node pair (u, v) with u < v. The edge
//! co-fluctuation at time t is the product of the two node values at t, and
//! the RSS at t is the Euclidean norm of all edge co-fluctuations at t.
//!
//! The enumeration order of edges is fixed by [`EdgeIndex`]: the strict upper
//! triangle of an N x N matrix, flattened row by row. Every edge-indexed
//! array produced by this crate follows that order.

use crate::error::{Error, Result};
use crate::types::{EdgeMatrix, TimeSeriesMatrix};

/// Canonical enumeration of the node pairs of an N-node network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeIndex {
    n_nodes: usize,
    u: Vec<usize>,
    v: Vec<usize>,
}

impl EdgeIndex {
    /// Build the index for `n_nodes` nodes.
    ///
    /// # Errors
    ///
    /// `InvalidInputShape` when fewer than two nodes are given.
    pub fn new(n_nodes: usize) -> Result<Self> {
        if n_nodes < 2 {
            return Err(Error::InvalidInputShape(format!(
                "need at least 2 nodes to form an edge, got {n_nodes}"
            )));
        }

        let n_edges = n_nodes * (n_nodes - 1) / 2;
        let mut u = Vec::with_capacity(n_edges);
        let mut v = Vec::with_capacity(n_edges);
        for i in 0..n_nodes {
            for j in (i + 1)..n_nodes {
                u.push(i);
                v.push(j);
            }
        }

        Ok(Self { n_nodes, u, v })
    }

    /// Number of nodes.
    pub fn n_nodes(&self) -> usize {
        self.n_nodes
    }

    /// Number of edges, N(N-1)/2.
    pub fn len(&self) -> usize {
        self.u.len()
    }

    /// Always false; an index has at least one edge.
    pub fn is_empty(&self) -> bool {
        self.u.is_empty()
    }

    /// First endpoint of every edge.
    pub fn sources(&self) -> &[usize] {
        &self.u
    }

    /// Second endpoint of every edge.
    pub fn targets(&self) -> &[usize] {
        &self.v
    }

    /// Endpoints of edge `e`.
    pub fn endpoints(&self, e: usize) -> (usize, usize) {
        (self.u[e], self.v[e])
    }

    /// Iterate over `(u, v)` pairs in canonical order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.u.iter().copied().zip(self.v.iter().copied())
    }

    fn check_columns(&self, series: &TimeSeriesMatrix) -> Result<()> {
        if series.ncols() != self.n_nodes {
            return Err(Error::InvalidInputShape(format!(
                "edge index built for {} nodes, series has {} columns",
                self.n_nodes,
                series.ncols()
            )));
        }
        Ok(())
    }

    /// Build the T x E edge co-fluctuation matrix of `series`.
    pub fn edge_series(&self, series: &TimeSeriesMatrix) -> Result<EdgeMatrix> {
        self.check_columns(series)?;

        let mut ets = EdgeMatrix::zeros(series.nrows(), self.len());
        for (e, (a, b)) in self.pairs().enumerate() {
            let col_a = series.column(a);
            let col_b = series.column(b);
            for (t, out) in ets.column_mut(e).iter_mut().enumerate() {
                *out = col_a[t] * col_b[t];
            }
        }
        Ok(ets)
    }

    /// Visit every edge value of every time point as `(t, e, value)`.
    ///
    /// Used where only aggregates of the edge matrix are needed, so the
    /// matrix itself is never allocated.
    pub fn for_each_edge_value<F>(&self, series: &TimeSeriesMatrix, mut visit: F) -> Result<()>
    where
        F: FnMut(usize, usize, f64),
    {
        self.check_columns(series)?;
        for t in 0..series.nrows() {
            let row = series.row(t);
            for (e, (a, b)) in self.pairs().enumerate() {
                visit(t, e, row[a] * row[b]);
            }
        }
        Ok(())
    }

    /// RSS of `series` without materialising the edge matrix.
    pub fn rss(&self, series: &TimeSeriesMatrix) -> Result<Vec<f64>> {
        self.rss_and_range(series).map(|(rss, _)| rss)
    }

    /// RSS of `series` plus the (min, max) over all of its edge values.
    pub fn rss_and_range(&self, series: &TimeSeriesMatrix) -> Result<(Vec<f64>, (f64, f64))> {
        let mut sum_sq = vec![0.0; series.nrows()];
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;

        self.for_each_edge_value(series, |t, _, value| {
            sum_sq[t] += value * value;
            lo = lo.min(value);
            hi = hi.max(value);
        })?;

        let rss = sum_sq.into_iter().map(f64::sqrt).collect();
        Ok((rss, (lo, hi)))
    }
}

/// RSS of each row of an edge matrix.
pub fn rss_from_edges(ets: &EdgeMatrix) -> Vec<f64> {
    ets.row_iter()
        .map(|row| row.iter().map(|x| x * x).sum::<f64>().sqrt())
        .collect()
}
