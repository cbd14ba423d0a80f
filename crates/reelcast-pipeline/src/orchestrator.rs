//! Pipeline orchestration.
//!
//! One logical worker drives each job sequentially through
//! Generate -> Transfer -> Publish. Status is persisted before and after
//! every external call, so a crash mid-pipeline leaves a visibly stuck
//! `processing` job rather than a silently lost one.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use reelcast_models::{Job, JobId, JobOutcome, JobPatch, JobStatus, SweepOutcome};
use reelcast_providers::GenerateOptions;
use reelcast_store::JobStore;

use crate::error::{PipelineError, PipelineResult};
use crate::traits::{Archiver, Generator, Publisher};

/// Drives jobs through the pipeline state machine.
#[derive(Clone)]
pub struct Orchestrator {
    store: Arc<dyn JobStore>,
    generator: Arc<dyn Generator>,
    archiver: Arc<dyn Archiver>,
    publisher: Arc<dyn Publisher>,
}

impl Orchestrator {
    pub fn new(
        store: Arc<dyn JobStore>,
        generator: Arc<dyn Generator>,
        archiver: Arc<dyn Archiver>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self {
            store,
            generator,
            archiver,
            publisher,
        }
    }

    pub fn store(&self) -> &Arc<dyn JobStore> {
        &self.store
    }

    /// Run one pending job through the full pipeline. Returns the publish
    /// confirmation id on success; on stage failure the job is marked
    /// `failed` with the stage's message before the error is returned.
    pub async fn run_job(&self, id: &JobId) -> PipelineResult<String> {
        let job = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::JobNotFound(id.clone()))?;

        if job.status != JobStatus::Pending {
            return Err(PipelineError::NotPending(id.clone()));
        }

        // Persisted before any external call
        self.store
            .update(id, JobPatch::status(JobStatus::Processing))
            .await?;
        info!(job_id = %id, "pipeline started");

        let generated = match self
            .generator
            .generate(&job.prompt, &GenerateOptions::default())
            .await
        {
            Ok(generated) => generated,
            Err(e) => return Err(self.fail_job(id, e.into()).await),
        };

        let name = asset_name(id);
        let stored = match self.archiver.store_remote(&generated.asset_url, &name).await {
            Ok(stored) => stored,
            Err(e) => return Err(self.fail_job(id, e.into()).await),
        };

        self.store
            .update(id, JobPatch::default().with_asset_url(&stored.url))
            .await?;

        let publish_id = match self.publisher.publish(&stored.url, &job.caption).await {
            Ok(publish_id) => publish_id,
            Err(e) => return Err(self.fail_job(id, e.into()).await),
        };

        self.store
            .update(
                id,
                JobPatch::status(JobStatus::Completed).with_publish_id(&publish_id),
            )
            .await?;

        info!(job_id = %id, publish_id = %publish_id, "pipeline completed");
        Ok(publish_id)
    }

    /// Process every due job, one full pipeline run at a time. Each job's
    /// failure is captured as its own outcome; siblings always proceed.
    pub async fn run_due(&self, now: DateTime<Utc>) -> PipelineResult<Vec<SweepOutcome>> {
        let due = self.store.list_due(now).await?;
        info!(count = due.len(), "sweeping due jobs");

        let mut outcomes = Vec::with_capacity(due.len());
        for job in due {
            let outcome = match self.run_job(&job.id).await {
                Ok(publish_id) => JobOutcome::Success { publish_id },
                Err(e) => {
                    warn!(job_id = %job.id, error = %e, "pipeline run failed");
                    JobOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            };
            outcomes.push(SweepOutcome {
                job_id: job.id,
                outcome,
            });
        }

        Ok(outcomes)
    }

    /// Manual re-trigger for a job that already has a durable asset but no
    /// publish id: runs only the Publisher stage, entered at the
    /// Transfer-complete point.
    pub async fn publish_existing(&self, id: &JobId) -> PipelineResult<String> {
        let job = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::JobNotFound(id.clone()))?;

        if job.publish_id.is_some() || job.status == JobStatus::Completed {
            return Err(PipelineError::AlreadyPublished(id.clone()));
        }
        let asset_url = job
            .asset_url
            .as_deref()
            .ok_or_else(|| PipelineError::NoAsset(id.clone()))?;

        let publish_id = match self.publisher.publish(asset_url, &job.caption).await {
            Ok(publish_id) => publish_id,
            Err(e) => return Err(self.fail_job(id, e.into()).await),
        };

        self.store
            .update(
                id,
                JobPatch::status(JobStatus::Completed).with_publish_id(&publish_id),
            )
            .await?;

        info!(job_id = %id, publish_id = %publish_id, "manual publish completed");
        Ok(publish_id)
    }

    /// Record a stage failure on the job and hand the error back.
    async fn fail_job(&self, id: &JobId, err: PipelineError) -> PipelineError {
        if let Err(store_err) = self.store.update(id, JobPatch::failed(err.to_string())).await {
            warn!(job_id = %id, error = %store_err, "failed to record job failure");
        }
        err
    }

    /// Look up a job snapshot; helper for callers that report on jobs.
    pub async fn get_job(&self, id: &JobId) -> PipelineResult<Job> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| PipelineError::JobNotFound(id.clone()))
    }
}

/// Durable object name for a job's asset.
fn asset_name(id: &JobId) -> String {
    format!("video_{}_{}.mp4", id, Utc::now().timestamp_millis())
}
