//! Process-wide service state.
//!
//! Built once at startup and shared behind an `Arc`. Nothing in here is
//! written after construction, so request handlers read it without locks.

use std::path::PathBuf;
use std::sync::Arc;

use crate::pipeline::{load_pipeline, ModelState, ScoringPipeline};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Scoring pipeline not loaded: {reason}")]
    ModelNotLoaded { reason: String },
}

#[derive(Debug)]
pub struct CoreState {
    /// Whether the pipeline loaded, fixed for the process lifetime.
    model: ModelState,
    /// Artifact path the pipeline was (or failed to be) loaded from.
    pub model_path: PathBuf,
    /// RFC 3339 timestamp of process start.
    pub started_at: String,
}

impl CoreState {
    pub fn new(model: ModelState, model_path: PathBuf) -> Self {
        Self {
            model,
            model_path,
            started_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Load the artifact at `model_path` and build the state around the result.
    pub fn load(model_path: PathBuf) -> Self {
        let model = load_pipeline(&model_path);
        Self::new(model, model_path)
    }

    /// State with an already-constructed pipeline (tests, embedding).
    pub fn with_pipeline(pipeline: impl ScoringPipeline + 'static) -> Self {
        Self::new(ModelState::ready(pipeline), PathBuf::new())
    }

    /// State that answers every prediction with "model unavailable".
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::new(
            ModelState::Unavailable {
                reason: reason.into(),
            },
            PathBuf::new(),
        )
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_ready()
    }

    pub fn pipeline(&self) -> Result<Arc<dyn ScoringPipeline>, CoreError> {
        match &self.model {
            ModelState::Ready(pipeline) => Ok(Arc::clone(pipeline)),
            ModelState::Unavailable { reason } => Err(CoreError::ModelNotLoaded {
                reason: reason.clone(),
            }),
        }
    }
}
