use std::path::Path;
use std::sync::Arc;

use super::logistic::LogisticPipeline;
use super::types::ScoringPipeline;

/// Outcome of the startup load. Fixed for the lifetime of the process.
#[derive(Clone)]
pub enum ModelState {
    Ready(Arc<dyn ScoringPipeline>),
    Unavailable { reason: String },
}

impl ModelState {
    pub fn ready(pipeline: impl ScoringPipeline + 'static) -> Self {
        ModelState::Ready(Arc::new(pipeline))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ModelState::Ready(_))
    }
}

impl std::fmt::Debug for ModelState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelState::Ready(pipeline) => f
                .debug_struct("Ready")
                .field("columns", &pipeline.schema().len())
                .finish(),
            ModelState::Unavailable { reason } => f
                .debug_struct("Unavailable")
                .field("reason", reason)
                .finish(),
        }
    }
}

/// Load the pipeline artifact at `path`.
///
/// Never fails: a missing or broken artifact is logged and the service
/// keeps running in degraded mode, answering every prediction with
/// "model unavailable" until restarted.
pub fn load_pipeline(path: &Path) -> ModelState {
    match LogisticPipeline::load(path) {
        Ok(pipeline) => {
            tracing::info!(
                path = %path.display(),
                columns = pipeline.schema().len(),
                "Scoring pipeline loaded"
            );
            ModelState::ready(pipeline)
        }
        Err(e) => {
            tracing::error!(
                path = %path.display(),
                error = %e,
                "Scoring pipeline could not be loaded; serving in degraded mode"
            );
            ModelState::Unavailable {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_artifact_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let state = load_pipeline(&dir.path().join("model_carelink.json"));
        assert!(!state.is_ready());
        match state {
            ModelState::Unavailable { reason } => assert!(reason.contains("not found")),
            ModelState::Ready(_) => panic!("expected degraded state"),
        }
    }

    #[test]
    fn bundled_artifact_loads_with_patient_schema() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("model_carelink.json");
        let state = load_pipeline(&path);
        match state {
            ModelState::Ready(pipeline) => {
                assert_eq!(
                    pipeline.schema(),
                    &crate::pipeline::FeatureSchema::carelink()
                );
            }
            ModelState::Unavailable { reason } => panic!("bundled artifact failed: {reason}"),
        }
    }
}
