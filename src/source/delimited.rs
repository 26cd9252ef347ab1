//! Delimited-text matrices and label-mean region extraction.
//!
//! Files hold one time point per line, values separated by whitespace or
//! commas. Blank lines and lines starting with `#` are skipped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use super::TimeSeriesExtractor;
use crate::error::SourceError;
use crate::types::TimeSeriesMatrix;

fn read_to_string(path: &Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn data_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'))
}

fn fields(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|f| !f.is_empty())
}

/// Read a delimited numeric matrix (rows = time points).
///
/// `nan` and `inf` tokens are accepted; cleanup is left to the caller.
pub fn read_matrix(path: &Path) -> Result<TimeSeriesMatrix, SourceError> {
    let text = read_to_string(path)?;

    let mut values = Vec::new();
    let mut ncols = None;
    let mut nrows = 0;

    for (line_no, line) in data_lines(&text) {
        let start = values.len();
        for field in fields(line) {
            let value: f64 = field.parse().map_err(|_| SourceError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("not a number: {field:?}"),
            })?;
            values.push(value);
        }
        let width = values.len() - start;
        match ncols {
            None => ncols = Some(width),
            Some(expected) if expected != width => {
                return Err(SourceError::Parse {
                    path: path.to_path_buf(),
                    line: line_no,
                    message: format!("expected {expected} columns, found {width}"),
                });
            }
            Some(_) => {}
        }
        nrows += 1;
    }

    let ncols = ncols.unwrap_or(0);
    Ok(TimeSeriesMatrix::from_row_slice(nrows, ncols, &values))
}

/// Read integer region labels, one per data column.
///
/// Labels may span any number of lines; label 0 marks background.
pub fn read_labels(path: &Path) -> Result<Vec<u32>, SourceError> {
    let text = read_to_string(path)?;
    let mut labels = Vec::new();
    for (line_no, line) in data_lines(&text) {
        for field in fields(line) {
            let label = field.parse().map_err(|_| SourceError::Parse {
                path: path.to_path_buf(),
                line: line_no,
                message: format!("not a label: {field:?}"),
            })?;
            labels.push(label);
        }
    }
    Ok(labels)
}

/// Extracts regional series by averaging the data columns of each label.
///
/// The output has one column per distinct non-zero label, in ascending label
/// order. Columns labelled 0 are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct DelimitedExtractor;

impl DelimitedExtractor {
    /// Create an extractor.
    pub fn new() -> Self {
        Self
    }

    /// Reduce `data` to one mean column per non-zero label.
    pub fn reduce(
        data: &TimeSeriesMatrix,
        labels: &[u32],
        labels_path: &Path,
    ) -> Result<TimeSeriesMatrix, SourceError> {
        if labels.len() != data.ncols() {
            return Err(SourceError::Labels {
                path: labels_path.to_path_buf(),
                message: format!(
                    "{} labels for {} data columns",
                    labels.len(),
                    data.ncols()
                ),
            });
        }

        let mut regions: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (col, &label) in labels.iter().enumerate() {
            if label != 0 {
                regions.entry(label).or_default().push(col);
            }
        }
        if regions.is_empty() {
            return Err(SourceError::Labels {
                path: labels_path.to_path_buf(),
                message: "no non-zero labels".to_string(),
            });
        }

        let mut out = TimeSeriesMatrix::zeros(data.nrows(), regions.len());
        for (region, columns) in regions.values().enumerate() {
            let scale = 1.0 / columns.len() as f64;
            for &col in columns {
                for t in 0..data.nrows() {
                    out[(t, region)] += data[(t, col)] * scale;
                }
            }
        }
        Ok(out)
    }
}

impl TimeSeriesExtractor for DelimitedExtractor {
    fn extract(&self, source: &Path, labels: &Path) -> Result<TimeSeriesMatrix, SourceError> {
        let data = read_matrix(source)?;
        let label_values = read_labels(labels)?;
        Self::reduce(&data, &label_values, labels)
    }
}
