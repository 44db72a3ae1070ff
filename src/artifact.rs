//! Persisted model artifact
//!
//! The artifact is the `{scaler, model}` bundle the classifier was fit
//! into: a per-feature scaling transform and a three-class linear scorer.
//! It is loaded once at startup and read-only for the rest of the process;
//! every width is cross-checked at load time so a mismatched bundle fails
//! before it can serve a single prediction.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::PredictError;

/// Current artifact schema version
pub const ARTIFACT_VERSION: &str = "stress.model.v1";

/// Number of output classes
pub const NUM_CLASSES: usize = 3;

/// Pre-fitted per-feature scaling transform
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Scaler {
    /// Zero-mean unit-variance: (x - mean) / scale
    Standard { mean: Vec<f64>, scale: Vec<f64> },
    /// Range scaling: (x - min) / (max - min)
    MinMax { min: Vec<f64>, max: Vec<f64> },
    /// Pass-through; width recorded for shape checks
    Identity { width: usize },
}

impl Scaler {
    /// Number of features the scaler was fit on
    pub fn width(&self) -> usize {
        match self {
            Scaler::Standard { mean, .. } => mean.len(),
            Scaler::MinMax { min, .. } => min.len(),
            Scaler::Identity { width } => *width,
        }
    }

    /// Apply the fitted transform elementwise
    pub fn transform(&self, raw: &[f64]) -> Result<Vec<f64>, PredictError> {
        if raw.len() != self.width() {
            return Err(PredictError::Inference(format!(
                "scaler was fit on {} features, got {}",
                self.width(),
                raw.len()
            )));
        }

        let out = match self {
            Scaler::Standard { mean, scale } => raw
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    if scale[i] == 0.0 {
                        return Err(PredictError::Inference(format!(
                            "scaler has zero scale for feature {}",
                            i
                        )));
                    }
                    Ok((x - mean[i]) / scale[i])
                })
                .collect::<Result<Vec<_>, _>>()?,
            Scaler::MinMax { min, max } => raw
                .iter()
                .enumerate()
                .map(|(i, &x)| {
                    let range = max[i] - min[i];
                    // zero-width fitted range maps to 0, the fitted value itself
                    if range == 0.0 {
                        0.0
                    } else {
                        (x - min[i]) / range
                    }
                })
                .collect(),
            Scaler::Identity { .. } => raw.to_vec(),
        };

        if let Some(i) = out.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::Inference(format!(
                "non-finite value after scaling feature {}",
                i
            )));
        }
        Ok(out)
    }
}

/// Opaque classifier contract: a normalized vector in, one score per class
/// out. The predicted class is the argmax of the scores.
pub trait Classifier {
    fn scores(&self, normalized: &[f64]) -> Result<Vec<f64>, PredictError>;
    /// Number of input features the classifier expects
    fn width(&self) -> usize;
}

/// Three-class linear scorer: scores = weights · x + intercepts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// One weight row per class
    pub weights: Vec<Vec<f64>>,
    /// One intercept per class
    pub intercepts: Vec<f64>,
}

impl Classifier for LinearModel {
    fn scores(&self, normalized: &[f64]) -> Result<Vec<f64>, PredictError> {
        if normalized.len() != self.width() {
            return Err(PredictError::Inference(format!(
                "model was fit on {} features, got {}",
                self.width(),
                normalized.len()
            )));
        }
        if let Some(i) = normalized.iter().position(|v| !v.is_finite()) {
            return Err(PredictError::Inference(format!(
                "non-finite value at feature {}",
                i
            )));
        }

        Ok(self
            .weights
            .iter()
            .zip(&self.intercepts)
            .map(|(row, b)| row.iter().zip(normalized).map(|(w, x)| w * x).sum::<f64>() + b)
            .collect())
    }

    fn width(&self) -> usize {
        self.weights.first().map(Vec::len).unwrap_or(0)
    }
}

/// The persisted `{scaler, model}` bundle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub artifact_version: String,
    pub scaler: Scaler,
    pub model: LinearModel,
}

impl ModelArtifact {
    /// Load the artifact from a JSON file
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PredictError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            PredictError::ModelLoad(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        let artifact = Self::from_json(&json)?;
        tracing::debug!(
            path = %path.as_ref().display(),
            width = artifact.width(),
            "model artifact loaded"
        );
        Ok(artifact)
    }

    /// Parse and validate the artifact from JSON text
    pub fn from_json(json: &str) -> Result<Self, PredictError> {
        let artifact: Self = serde_json::from_str(json)
            .map_err(|e| PredictError::ModelLoad(format!("corrupt artifact: {}", e)))?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Cross-check the bundle's internal shapes
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.artifact_version != ARTIFACT_VERSION {
            return Err(PredictError::ModelLoad(format!(
                "unsupported artifact version '{}', expected '{}'",
                self.artifact_version, ARTIFACT_VERSION
            )));
        }

        match &self.scaler {
            Scaler::Standard { mean, scale } if mean.len() != scale.len() => {
                return Err(PredictError::ModelLoad(format!(
                    "scaler mean/scale widths differ: {} vs {}",
                    mean.len(),
                    scale.len()
                )));
            }
            Scaler::MinMax { min, max } if min.len() != max.len() => {
                return Err(PredictError::ModelLoad(format!(
                    "scaler min/max widths differ: {} vs {}",
                    min.len(),
                    max.len()
                )));
            }
            _ => {}
        }

        if self.model.weights.len() != NUM_CLASSES
            || self.model.intercepts.len() != NUM_CLASSES
        {
            return Err(PredictError::ModelLoad(format!(
                "model must carry {} classes, got {} weight rows and {} intercepts",
                NUM_CLASSES,
                self.model.weights.len(),
                self.model.intercepts.len()
            )));
        }

        let width = self.scaler.width();
        for (i, row) in self.model.weights.iter().enumerate() {
            if row.len() != width {
                return Err(PredictError::ModelLoad(format!(
                    "weight row {} has width {}, scaler expects {}",
                    i,
                    row.len(),
                    width
                )));
            }
        }

        Ok(())
    }

    /// Number of input features the bundle expects
    pub fn width(&self) -> usize {
        self.scaler.width()
    }

    /// Identity-scaler artifact, useful for tests and smoke checks
    pub fn identity(width: usize) -> Self {
        Self {
            artifact_version: ARTIFACT_VERSION.to_string(),
            scaler: Scaler::Identity { width },
            model: LinearModel {
                weights: vec![vec![0.0; width]; NUM_CLASSES],
                intercepts: vec![0.0; NUM_CLASSES],
            },
        }
    }
}
