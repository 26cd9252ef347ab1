//! Debiasing: hand the activity of the detected events to a deconvolver.
//!
//! The thresholded edge matrix says which edges survived at which frames.
//! Both endpoints of a surviving edge count as active at that frame, and the
//! resulting node-by-frame mask restricts a deconvolution of the series
//! against a caller-supplied convolution matrix.

use nalgebra::{DMatrix, DVector};
use tracing::debug;

use crate::constants::SVD_EPS;
use crate::error::{Error, Result};
use crate::statistics::EdgeIndex;
use crate::types::{ActivityMask, EdgeMatrix, TimeSeriesMatrix};

/// Coefficients and fitted series returned by a [`Deconvolver`].
#[derive(Debug, Clone, PartialEq)]
pub struct DeconvolutionFit {
    /// T x N activity-inducing coefficients.
    pub coefficients: DMatrix<f64>,
    /// T x N fitted series, `convolution * coefficients`.
    pub fitted: DMatrix<f64>,
}

/// Solver that explains a series as a convolution of sparse activity.
pub trait Deconvolver {
    /// Fit `series` (T x N) against the T x T `convolution` matrix, using only
    /// the frames marked in `mask` (T x N) as candidate activity.
    fn fit(
        &self,
        convolution: &DMatrix<f64>,
        series: &TimeSeriesMatrix,
        mask: &ActivityMask,
    ) -> Result<DeconvolutionFit>;
}

/// Mark both endpoints of every non-zero entry of `thresholded` as active.
pub fn activity_mask(thresholded: &EdgeMatrix, index: &EdgeIndex) -> ActivityMask {
    let mut mask = ActivityMask::from_element(thresholded.nrows(), index.n_nodes(), false);
    for (e, column) in thresholded.column_iter().enumerate() {
        let (u, v) = index.endpoints(e);
        for (t, &value) in column.iter().enumerate() {
            if value != 0.0 {
                mask[(t, u)] = true;
                mask[(t, v)] = true;
            }
        }
    }
    mask
}

/// Build the activity mask from `thresholded` and run `deconvolver`.
///
/// # Errors
///
/// `InvalidInputShape` when the edge matrix, series, index and convolution
/// disagree on T, N or E. Errors from the deconvolver are passed through.
pub fn debias(
    thresholded: &EdgeMatrix,
    index: &EdgeIndex,
    series: &TimeSeriesMatrix,
    convolution: &DMatrix<f64>,
    deconvolver: &dyn Deconvolver,
) -> Result<DeconvolutionFit> {
    let (t, n) = series.shape();
    if thresholded.shape() != (t, index.len()) {
        return Err(Error::InvalidInputShape(format!(
            "thresholded edge matrix is {}x{}, expected {}x{}",
            thresholded.nrows(),
            thresholded.ncols(),
            t,
            index.len()
        )));
    }
    if n != index.n_nodes() {
        return Err(Error::InvalidInputShape(format!(
            "series has {n} nodes, edge index has {}",
            index.n_nodes()
        )));
    }
    if convolution.shape() != (t, t) {
        return Err(Error::InvalidInputShape(format!(
            "convolution matrix is {}x{}, expected {t}x{t}",
            convolution.nrows(),
            convolution.ncols()
        )));
    }

    let mask = activity_mask(thresholded, index);
    debug!(
        active = mask.iter().filter(|&&a| a).count(),
        "activity mask built"
    );

    let fit = deconvolver.fit(convolution, series, &mask)?;
    if fit.coefficients.shape() != (t, n) || fit.fitted.shape() != (t, n) {
        return Err(Error::Deconvolution(format!(
            "deconvolver returned {:?} coefficients and {:?} fitted, expected {:?}",
            fit.coefficients.shape(),
            fit.fitted.shape(),
            (t, n)
        )));
    }
    Ok(fit)
}

/// Ordinary least squares restricted to the active frames of each node.
///
/// For node j with active frames A, solves `min ||H[:, A] b - x_j||` through
/// an SVD, writes `b` into rows A of column j and leaves the other rows zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct LeastSquaresDeconvolver;

impl LeastSquaresDeconvolver {
    /// Create the deconvolver.
    pub fn new() -> Self {
        Self
    }
}

impl Deconvolver for LeastSquaresDeconvolver {
    fn fit(
        &self,
        convolution: &DMatrix<f64>,
        series: &TimeSeriesMatrix,
        mask: &ActivityMask,
    ) -> Result<DeconvolutionFit> {
        let (t, n) = series.shape();
        let mut coefficients = DMatrix::zeros(t, n);

        for j in 0..n {
            let active: Vec<usize> = (0..t).filter(|&i| mask[(i, j)]).collect();
            if active.is_empty() {
                continue;
            }

            let design = DMatrix::from_fn(t, active.len(), |r, c| convolution[(r, active[c])]);
            let target = DVector::from_iterator(t, series.column(j).iter().copied());
            let beta = design
                .svd(true, true)
                .solve(&target, SVD_EPS)
                .map_err(|msg| Error::Deconvolution(format!("node {j}: {msg}")))?;

            for (k, &row) in active.iter().enumerate() {
                coefficients[(row, j)] = beta[k];
            }
        }

        let fitted = convolution * &coefficients;
        Ok(DeconvolutionFit {
            coefficients,
            fitted,
        })
    }
}
