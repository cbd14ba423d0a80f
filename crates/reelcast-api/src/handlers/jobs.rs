//! Job intake and management handlers.

use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use reelcast_models::{Job, JobId, NewJob};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Intake request.
#[derive(Debug, Deserialize)]
pub struct CreateJobRequest {
    /// Text description driving generation
    pub prompt: String,
    /// Caption for the eventual publish; defaults to the prompt
    #[serde(default)]
    pub caption: Option<String>,
    /// When the job becomes eligible; defaults to immediately
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct CreateJobResponse {
    pub job_id: JobId,
    pub message: String,
}

/// POST /api/jobs
///
/// Create a job. If it is already due, its id is handed to the pipeline
/// worker and the request returns without waiting for the run.
pub async fn create_job(
    State(state): State<AppState>,
    Json(request): Json<CreateJobRequest>,
) -> ApiResult<Json<CreateJobResponse>> {
    if request.prompt.trim().is_empty() {
        return Err(ApiError::validation("prompt is required"));
    }

    let scheduled = request.scheduled_time;
    let new = NewJob::new(request.prompt, request.caption, scheduled);
    let job = state.orchestrator.store().create(new).await?;

    let now = Utc::now();
    let message = if job.scheduled_time <= now {
        if !state.pipeline.submit(job.id.clone()) {
            return Err(ApiError::internal("pipeline worker unavailable"));
        }
        info!(job_id = %job.id, "job submitted for immediate processing");
        "video generation started".to_string()
    } else {
        info!(job_id = %job.id, scheduled_time = %job.scheduled_time, "job scheduled");
        "video scheduled for generation and publishing".to_string()
    };

    Ok(Json(CreateJobResponse {
        job_id: job.id,
        message,
    }))
}

#[derive(Debug, Serialize)]
pub struct JobsResponse {
    pub jobs: Vec<Job>,
}

/// GET /api/jobs
///
/// All jobs, newest-first.
pub async fn list_jobs(State(state): State<AppState>) -> ApiResult<Json<JobsResponse>> {
    let jobs = state.orchestrator.store().list().await?;
    Ok(Json(JobsResponse { jobs }))
}

#[derive(Debug, Serialize)]
pub struct DeleteJobResponse {
    pub success: bool,
    pub message: String,
}

/// DELETE /api/jobs/:job_id
pub async fn delete_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<DeleteJobResponse>> {
    let id = JobId::from_string(job_id);
    let deleted = state.orchestrator.store().delete(&id).await?;

    if !deleted {
        return Err(ApiError::not_found("job not found"));
    }

    info!(job_id = %id, "job deleted");
    Ok(Json(DeleteJobResponse {
        success: true,
        message: "job deleted".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct PublishJobResponse {
    pub job_id: JobId,
    pub publish_id: String,
    pub message: String,
}

/// POST /api/jobs/:job_id/publish
///
/// Manual publish trigger for a job that already has a durable asset.
pub async fn publish_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<PublishJobResponse>> {
    let id = JobId::from_string(job_id);
    let publish_id = state.orchestrator.publish_existing(&id).await?;

    Ok(Json(PublishJobResponse {
        job_id: id,
        publish_id,
        message: "published".to_string(),
    }))
}
