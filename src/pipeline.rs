//! Pipeline orchestration
//!
//! `StressPredictor` is the normalize-and-classify glue: shape check,
//! fitted scaler transform, classifier scores, argmax, class mapping.
//! It holds the long-lived read-only artifact; `predict` has no hidden
//! state, so the same raw vector always yields the same class.

use crate::artifact::{Classifier, ModelArtifact};
use crate::error::PredictError;
use crate::present::StressLevel;
use crate::schema::FeatureSchema;

/// Stress classifier over a fixed schema and a loaded artifact
#[derive(Debug)]
pub struct StressPredictor {
    schema: FeatureSchema,
    artifact: ModelArtifact,
}

impl StressPredictor {
    /// Bind a schema to a loaded artifact.
    ///
    /// Fails with [`PredictError::ModelLoad`] when the schema width and
    /// the artifact width disagree; serving with a mismatched pair would
    /// silently misalign every feature.
    pub fn new(schema: FeatureSchema, artifact: ModelArtifact) -> Result<Self, PredictError> {
        if schema.len() != artifact.width() {
            return Err(PredictError::ModelLoad(format!(
                "schema has {} features but the artifact was fit on {}",
                schema.len(),
                artifact.width()
            )));
        }
        Ok(Self { schema, artifact })
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Predict the stress class for one raw answer vector
    pub fn predict(&self, raw: &[i64]) -> Result<StressLevel, PredictError> {
        self.predict_with(&self.artifact.model, raw)
    }

    /// Predict with a caller-supplied classifier over the same scaler.
    ///
    /// The shape check runs before anything else; on mismatch the
    /// classifier is never invoked.
    pub fn predict_with(
        &self,
        classifier: &dyn Classifier,
        raw: &[i64],
    ) -> Result<StressLevel, PredictError> {
        if raw.len() != self.schema.len() {
            return Err(PredictError::ShapeMismatch {
                expected: self.schema.len(),
                got: raw.len(),
            });
        }

        let raw_f64: Vec<f64> = raw.iter().map(|&v| v as f64).collect();
        let normalized = self.artifact.scaler.transform(&raw_f64)?;
        let scores = classifier.scores(&normalized)?;
        let index = argmax(&scores)?;
        let level = StressLevel::from_index(index)?;

        tracing::debug!(class = index, label = level.label(), "prediction computed");
        Ok(level)
    }
}

/// Index of the highest score; ties break toward the lower class
fn argmax(scores: &[f64]) -> Result<usize, PredictError> {
    if scores.is_empty() {
        return Err(PredictError::Inference("classifier returned no scores".to_string()));
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(PredictError::Inference("classifier returned NaN score".to_string()));
    }

    let mut best = 0;
    for (i, &score) in scores.iter().enumerate() {
        if score > scores[best] {
            best = i;
        }
    }
    Ok(best)
}
