//! Batch sweep trigger.

use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use reelcast_models::SweepOutcome;

use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub success: bool,
    pub processed: usize,
    pub results: Vec<SweepOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// POST /api/sweep
///
/// Processes every due job and returns one outcome per attempted job. When
/// a sweep secret is configured, the bearer token is checked before any job
/// is read.
pub async fn run_sweep(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<SweepResponse>> {
    if let Some(ref secret) = state.config.sweep_secret {
        let expected = format!("Bearer {secret}");
        let presented = headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if presented != expected {
            return Err(ApiError::unauthorized("invalid sweep credentials"));
        }
    }

    let results = state.orchestrator.run_due(Utc::now()).await?;

    if results.is_empty() {
        return Ok(Json(SweepResponse {
            success: true,
            processed: 0,
            results,
            message: Some("no due jobs to process".to_string()),
        }));
    }

    let succeeded = results.iter().filter(|r| r.outcome.is_success()).count();
    let failed = results.len() - succeeded;
    metrics::record_sweep(succeeded as u64, failed as u64);
    info!(processed = results.len(), succeeded, failed, "sweep finished");

    Ok(Json(SweepResponse {
        success: true,
        processed: results.len(),
        results,
        message: None,
    }))
}
