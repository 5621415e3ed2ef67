//! Risk prediction endpoint.
//!
//! `POST /predict_risk` - score one patient/appointment record.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use serde_json::Value;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::{RiskAssessment, RiskBand};
use crate::pipeline::FeatureRow;
use crate::scoring;

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub status: &'static str,
    pub carelink_risk_score: u16,
    pub risk_band: RiskBand,
    pub no_show_probability: f64,
    pub interpretation: String,
}

impl From<RiskAssessment> for PredictionResponse {
    fn from(assessment: RiskAssessment) -> Self {
        Self {
            status: "success",
            carelink_risk_score: assessment.risk_score,
            risk_band: assessment.risk_band,
            no_show_probability: assessment.no_show_probability,
            interpretation: assessment.interpretation(),
        }
    }
}

/// `POST /predict_risk` - no-show risk for one record.
///
/// The body is parsed as JSON whatever its `Content-Type`. Readiness is
/// checked before the body is looked at, so a degraded server answers
/// every request the same way.
pub async fn predict_risk(
    State(ctx): State<ApiContext>,
    body: Bytes,
) -> Result<Json<PredictionResponse>, ApiError> {
    let pipeline = ctx.core.pipeline()?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::MalformedRequest(e.to_string()))?;
    let object = payload.as_object().ok_or_else(|| {
        ApiError::MalformedRequest(format!(
            "expected a JSON object, got {}",
            json_kind(&payload)
        ))
    })?;

    let row = FeatureRow::from_json_object(object);
    let assessment = scoring::assess(pipeline.as_ref(), &row)?;

    tracing::debug!(
        score = assessment.risk_score,
        band = %assessment.risk_band,
        "Risk assessed"
    );

    Ok(Json(PredictionResponse::from(assessment)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
