//! Reference dataset loading
//!
//! The reference dataset is the tabular file the classifier was originally
//! fit on: one integer column per feature plus the `anxiety_level` and
//! `stress_level` columns, which never enter the feature vector. The only
//! thing the pipeline needs from it is the observed per-column min/max, so
//! that is all this module keeps.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::PredictError;

/// Per-column observed bounds of a reference dataset
#[derive(Debug, Clone)]
pub struct Dataset {
    bounds: HashMap<String, (i64, i64)>,
    rows: usize,
}

impl Dataset {
    /// Load and scan a CSV file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PredictError> {
        let text = fs::read_to_string(path.as_ref()).map_err(|e| {
            PredictError::Dataset(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        Self::parse(&text)
    }

    /// Scan CSV text: a header row of column names, then integer rows
    pub fn parse(text: &str) -> Result<Self, PredictError> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let header = lines
            .next()
            .ok_or_else(|| PredictError::Dataset("dataset is empty".to_string()))?;
        let columns: Vec<&str> = header.split(',').map(str::trim).collect();

        let mut bounds: Vec<Option<(i64, i64)>> = vec![None; columns.len()];
        let mut rows = 0usize;

        for (line_no, line) in lines.enumerate() {
            let values: Vec<&str> = line.split(',').map(str::trim).collect();
            if values.len() != columns.len() {
                return Err(PredictError::Dataset(format!(
                    "row {} has {} values, expected {}",
                    line_no + 2,
                    values.len(),
                    columns.len()
                )));
            }

            for (i, raw) in values.iter().enumerate() {
                let value: i64 = raw.parse().map_err(|_| {
                    PredictError::Dataset(format!(
                        "row {}, column '{}': '{}' is not an integer",
                        line_no + 2,
                        columns[i],
                        raw
                    ))
                })?;
                bounds[i] = Some(match bounds[i] {
                    None => (value, value),
                    Some((min, max)) => (min.min(value), max.max(value)),
                });
            }
            rows += 1;
        }

        if rows == 0 {
            return Err(PredictError::Dataset("dataset has no data rows".to_string()));
        }

        let bounds = columns
            .iter()
            .zip(bounds)
            .map(|(name, b)| {
                // rows > 0 guarantees every column was seen
                (name.to_string(), b.unwrap_or((0, 0)))
            })
            .collect();

        Ok(Self { bounds, rows })
    }

    /// Observed (min, max) of a column, if the column exists
    pub fn column_bounds(&self, name: &str) -> Option<(i64, i64)> {
        self.bounds.get(name).copied()
    }

    /// Number of data rows scanned
    pub fn rows(&self) -> usize {
        self.rows
    }
}
