/// Dependency status and liveness handlers
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::health::HealthReport;
use crate::AppState;

/// GET /status
///
/// Always answers 200; unhealthy dependencies show up as `ERROR` entries.
pub async fn status(State(state): State<AppState>) -> Json<HealthReport> {
    Json(state.health.status().await)
}

/// GET /health
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
