//! Surrogate store over numbered files.

use std::path::{Path, PathBuf};

use super::{SurrogateStore, TimeSeriesExtractor};
use crate::error::SourceError;
use crate::types::TimeSeriesMatrix;

/// Loads trial `i` from `{prefix}{i}{suffix}` through an extractor.
///
/// Each surrogate file is reduced with the same label file as the observed
/// data, so node order is identical across trials.
#[derive(Debug, Clone)]
pub struct PrefixSurrogateStore<E> {
    prefix: String,
    suffix: String,
    labels: PathBuf,
    extractor: E,
}

impl<E: TimeSeriesExtractor> PrefixSurrogateStore<E> {
    /// Create a store for files named `{prefix}{trial}{suffix}`.
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        labels: impl AsRef<Path>,
        extractor: E,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            labels: labels.as_ref().to_path_buf(),
            extractor,
        }
    }

    /// Path of the surrogate file for `trial`.
    pub fn path(&self, trial: usize) -> PathBuf {
        PathBuf::from(format!("{}{}{}", self.prefix, trial, self.suffix))
    }
}

impl<E: TimeSeriesExtractor> SurrogateStore for PrefixSurrogateStore<E> {
    fn load(&self, trial: usize) -> Result<TimeSeriesMatrix, SourceError> {
        self.extractor.extract(&self.path(trial), &self.labels)
    }

    fn locate(&self, trial: usize) -> String {
        self.path(trial).display().to_string()
    }
}
