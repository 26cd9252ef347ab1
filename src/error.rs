//! Error types for the detection pipeline and its collaborators.

use std::path::PathBuf;

/// Errors raised by the detection pipeline.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input matrix (or a trial count) cannot support the computation.
    #[error("invalid input shape: {0}")]
    InvalidInputShape(String),

    /// A configuration value is out of its valid domain.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A null-model trial could not be produced; the batch is aborted.
    #[error("null-model trial {trial} failed")]
    NullModelTrialFailure {
        /// Index of the failing trial.
        trial: usize,
        /// Underlying collaborator error.
        #[source]
        source: SourceError,
    },

    /// A null-model trial exceeded the configured duration.
    #[error("null-model trial {trial} took {elapsed_ms} ms (limit {limit_ms} ms)")]
    TrialTimeout {
        /// Index of the slow trial.
        trial: usize,
        /// Observed duration in milliseconds.
        elapsed_ms: u64,
        /// Configured limit in milliseconds.
        limit_ms: u64,
    },

    /// A surrogate does not have the shape of the observed series.
    #[error(
        "surrogate for trial {trial} is {found_rows}x{found_cols}, expected {expected_rows}x{expected_cols}"
    )]
    SurrogateShapeMismatch {
        /// Index of the offending trial.
        trial: usize,
        /// Observed time points.
        expected_rows: usize,
        /// Observed nodes.
        expected_cols: usize,
        /// Surrogate time points.
        found_rows: usize,
        /// Surrogate nodes.
        found_cols: usize,
    },

    /// The histogram percentile cannot be resolved to a bin edge.
    #[error("percentile {percentile} out of range: {reason}")]
    ThresholdOutOfRange {
        /// Requested percentile (0-100).
        percentile: f64,
        /// Why no bin edge qualifies.
        reason: String,
    },

    /// The deconvolution collaborator failed.
    #[error("deconvolution failed: {0}")]
    Deconvolution(String),

    /// Extraction of the observed series failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Errors raised by external collaborators (extractors, surrogate stores).
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// File could not be read.
    #[error("cannot read {}", path.display())]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// File content is not a numeric matrix.
    #[error("{}:{line}: {message}", path.display())]
    Parse {
        /// File that was being parsed.
        path: PathBuf,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Label file does not match the data.
    #[error("bad labels in {}: {message}", path.display())]
    Labels {
        /// Label file.
        path: PathBuf,
        /// What went wrong.
        message: String,
    },

    /// Any other collaborator failure.
    #[error(transparent)]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
