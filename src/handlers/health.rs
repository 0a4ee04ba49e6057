use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use super::AppState;

/// Health check endpoint
/// Returns 200 OK if the service is running
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({
        "status": "healthy",
        "service": "medirank",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

/// Readiness check endpoint
/// Ready once every model and encoder artifact has loaded
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    match state.artifacts.artifacts() {
        Ok(_) => (StatusCode::OK, Json(json!({
            "status": "ready",
            "service": "medirank",
        }))),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, Json(json!({
            "status": "unavailable",
            "service": "medirank",
            "error": e.to_string(),
        }))),
    }
}
