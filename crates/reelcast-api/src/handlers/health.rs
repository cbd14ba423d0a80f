//! Health probes.

use axum::Json;
use serde::Serialize;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// GET /ready
pub async fn ready() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ready" })
}
