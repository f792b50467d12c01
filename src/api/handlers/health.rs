//! Health check handler

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;

/// GET /health - Store reachability and transparency log liveness
///
/// Returns 200 OK if the database is reachable, 503 Service Unavailable if
/// not. The transparency log is reported but never fails the check.
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let report = state.ledger.health().await;
    let healthy = report.is_healthy();
    let body = Json(HealthResponse::from(report));

    if healthy {
        Ok(body)
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, body))
    }
}
