//! API error types with structured JSON responses.
//!
//! Three closed failure kinds, each with its own status and code, so
//! clients can tell a bad payload from a model-side problem without
//! parsing message text.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::core_state::CoreError;
use crate::pipeline::PipelineError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("AI model not loaded on server.")]
    ModelUnavailable,
    #[error("Failed to process JSON input: {0}")]
    MalformedRequest(String),
    #[error("Prediction error, check the feature columns and their order: {0}")]
    PredictionFailure(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ModelUnavailable | ApiError::PredictionFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::ModelUnavailable => "MODEL_UNAVAILABLE",
            ApiError::MalformedRequest(_) => "MALFORMED_REQUEST",
            ApiError::PredictionFailure(_) => "PREDICTION_FAILED",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::ModelUnavailable => tracing::warn!("Prediction refused: model unavailable"),
            ApiError::MalformedRequest(detail) => {
                tracing::debug!(detail = %detail, "Rejected malformed prediction request")
            }
            ApiError::PredictionFailure(detail) => tracing::warn!(detail = %detail, "Prediction failed"),
        }

        let body = ErrorBody {
            error: self.to_string(),
            code: self.code(),
        };

        (self.status(), Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ModelNotLoaded { .. } => ApiError::ModelUnavailable,
        }
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        ApiError::PredictionFailure(err.to_string())
    }
}
