//! Health check endpoint.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::types::ApiContext;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub version: &'static str,
    pub started_at: String,
}

/// `GET /health` - liveness plus model readiness.
///
/// Always 200: a degraded server is alive, it just cannot score.
pub async fn check(State(ctx): State<ApiContext>) -> Json<HealthResponse> {
    let model_loaded = ctx.core.model_loaded();

    Json(HealthResponse {
        status: if model_loaded { "ok" } else { "degraded" },
        model_loaded,
        version: crate::config::APP_VERSION,
        started_at: ctx.core.started_at.clone(),
    })
}
