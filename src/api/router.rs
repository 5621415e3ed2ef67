//! Risk API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the risk API router.
///
/// Routes:
/// - `POST /predict_risk`
/// - `GET /health`
pub fn risk_api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    Router::new()
        .route("/predict_risk", post(endpoints::predict::predict_risk))
        .route("/health", get(endpoints::health::check))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    use crate::pipeline::FixedPipeline;

    fn ready_core(probability: f64) -> Arc<CoreState> {
        Arc::new(CoreState::with_pipeline(FixedPipeline::new(probability)))
    }

    fn full_payload() -> serde_json::Value {
        json!({
            "patient_age": 77,
            "patient_neighborhood": "Brasilândia",
            "digital_affinity_score": 22,
            "has_caregiver": false,
            "appointment_specialty": "Speech Therapy",
            "consecutive_missed_appointments": 1,
            "historical_absenteeism_rate": 0.27,
            "days_since_last_appointment": 19,
            "days_since_first_appointment": 52
        })
    }

    fn post_predict(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/predict_risk")
            .body(body.into())
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn predict_returns_score_and_band() {
        let app = risk_api_router(ready_core(0.45));

        let response = app
            .oneshot(post_predict(full_payload().to_string()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "success");
        assert_eq!(json["carelink_risk_score"], 450);
        assert_eq!(json["risk_band"], "MEDIUM");
        assert_eq!(json["no_show_probability"], 0.45);
        assert_eq!(json["interpretation"], "Patient classified as MEDIUM risk");
    }

    #[tokio::test]
    async fn predict_ignores_content_type() {
        let app = risk_api_router(ready_core(0.9));

        let req = Request::builder()
            .method("POST")
            .uri("/predict_risk")
            .header("Content-Type", "text/plain")
            .body(Body::from(full_payload().to_string()))
            .unwrap();
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_body(response).await;
        assert_eq!(json["risk_band"], "CRITICAL");
    }

    #[tokio::test]
    async fn non_json_body_returns_400_naming_parse_problem() {
        let app = risk_api_router(ready_core(0.45));

        let response = app.oneshot(post_predict("{\"patient_age\": 77,")).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = json_body(response).await;
        assert_eq!(json["code"], "MALFORMED_REQUEST");
        assert!(json["error"].as_str().unwrap().contains("EOF while parsing"));
    }

    #[tokio::test]
    async fn unloaded_model_returns_500_regardless_of_payload() {
        for body in [full_payload().to_string(), "garbage".to_string(), String::new()] {
            let app = risk_api_router(Arc::new(CoreState::unavailable("artifact missing")));
            let response = app.oneshot(post_predict(body)).await.unwrap();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let json = json_body(response).await;
            assert_eq!(json["code"], "MODEL_UNAVAILABLE");
            assert_eq!(json["error"], "AI model not loaded on server.");
        }
    }

    #[tokio::test]
    async fn eight_fields_returns_500_schema_mismatch() {
        let app = risk_api_router(ready_core(0.45));
        let mut payload = full_payload();
        payload
            .as_object_mut()
            .unwrap()
            .shift_remove("days_since_first_appointment");

        let response = app.oneshot(post_predict(payload.to_string())).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert_eq!(json["code"], "PREDICTION_FAILED");
        let message = json["error"].as_str().unwrap();
        assert!(message.contains("Schema mismatch"));
        assert!(message.contains("days_since_first_appointment"));
    }

    #[tokio::test]
    async fn misordered_fields_return_500_schema_mismatch() {
        let app = risk_api_router(ready_core(0.45));
        let payload = r#"{
            "patient_neighborhood": "Brasilândia",
            "patient_age": 77,
            "digital_affinity_score": 22,
            "has_caregiver": false,
            "appointment_specialty": "Speech Therapy",
            "consecutive_missed_appointments": 1,
            "historical_absenteeism_rate": 0.27,
            "days_since_last_appointment": 19,
            "days_since_first_appointment": 52
        }"#;

        let response = app.oneshot(post_predict(payload)).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = json_body(response).await;
        assert!(json["error"].as_str().unwrap().contains("column order mismatch"));
    }

    #[tokio::test]
    async fn health_reports_model_state() {
        let app = risk_api_router(Arc::new(CoreState::unavailable("artifact missing")));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = json_body(response).await;
        assert_eq!(json["status"], "degraded");
        assert_eq!(json["model_loaded"], false);
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let app = risk_api_router(ready_core(0.1));
        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        let id = response
            .headers()
            .get(middleware::audit::REQUEST_ID_HEADER)
            .unwrap()
            .to_str()
            .unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
    }

    #[tokio::test]
    async fn get_on_predict_is_method_not_allowed() {
        let app = risk_api_router(ready_core(0.1));
        let req = Request::builder()
            .uri("/predict_risk")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_route_returns_404() {
        let app = risk_api_router(ready_core(0.1));
        let req = Request::builder()
            .uri("/nonexistent")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
