//! Error types for stress-predict

use thiserror::Error;

/// Errors that can occur on the prediction path
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Input vector has {got} values but the schema defines {expected} features")]
    ShapeMismatch { expected: usize, got: usize },

    #[error("Failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    #[error("Classifier returned out-of-range class index {0}")]
    UnknownClass(usize),

    #[error("Reference dataset error: {0}")]
    Dataset(String),

    #[error("Missing user name")]
    MissingUserName,
}

/// Errors on the best-effort outcome logging path.
///
/// Kept separate from [`PredictError`]: a sink failure is an operational
/// event, never a user-facing one.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Credential unavailable: {0}")]
    Credential(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Sheet append rejected: HTTP {status}: {body}")]
    Rejected { status: u16, body: String },
}
