//! Scoring pipeline seam.
//!
//! The trained pipeline is an external artifact. The service only depends
//! on the [`ScoringPipeline`] trait: a fixed column schema plus a
//! probability for the positive (no-show) class.

pub mod fixed;
pub mod loader;
pub mod logistic;
pub mod schema;
pub mod types;

use std::path::PathBuf;

use thiserror::Error;

pub use fixed::FixedPipeline;
pub use loader::{load_pipeline, ModelState};
pub use logistic::LogisticPipeline;
pub use schema::{ColumnKind, ColumnSpec, FeatureSchema, SchemaViolation};
pub use types::{Cell, FeatureRow, ScoringPipeline};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pipeline artifact not found: {0}")]
    ModelNotFound(PathBuf),

    #[error("Malformed pipeline artifact: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid pipeline artifact: {0}")]
    InvalidArtifact(String),

    #[error("Schema mismatch: {0}")]
    Schema(#[from] SchemaViolation),

    #[error("Feature '{0}' missing from input row")]
    MissingFeature(String),

    #[error("Found unknown category {value:?} in column '{column}' during transform")]
    UnknownCategory { column: String, value: String },

    #[error("Pipeline returned an invalid probability: {0}")]
    InvalidProbability(f64),

    #[error("Inference failed: {0}")]
    Inference(String),
}
