//! stress-predict - Questionnaire-driven stress level classifier
//!
//! Collects a fixed set of self-reported lifestyle indicators, normalizes
//! them with a pre-fitted scaler, classifies the vector into one of three
//! stress classes, and best-effort appends the outcome to an external
//! spreadsheet. The pipeline is deterministic: feature schema → raw answer
//! vector → scaler transform → classifier scores → argmax → presentation.
//!
//! ## Modules
//!
//! - **schema / dataset**: the ordered feature descriptors and the optional
//!   reference dataset their domains can be derived from
//! - **binner**: display-only low/mid/high annotation of raw answers
//! - **artifact / pipeline**: the persisted `{scaler, model}` bundle and
//!   the normalize-and-classify glue
//! - **present / sink**: result rendering data and the best-effort
//!   spreadsheet append

pub mod artifact;
pub mod binner;
pub mod dataset;
pub mod error;
pub mod form;
pub mod pipeline;
pub mod present;
pub mod schema;
pub mod sink;

pub use artifact::{Classifier, LinearModel, ModelArtifact, Scaler};
pub use dataset::Dataset;
pub use error::{PredictError, SinkError};
pub use pipeline::StressPredictor;
pub use present::{LevelColor, Presentation, StressLevel};
pub use schema::{Domain, FeatureDescriptor, FeatureSchema};
pub use sink::{log_outcome, CredentialSource, OutcomeRecord, OutcomeSink, SheetsSink};

/// Crate version embedded in sink provenance
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for sink provenance
pub const PRODUCER_NAME: &str = "stress-predict";
