//! Intake worker queue.
//!
//! Intake-triggered pipeline runs are handed off through an explicit channel
//! to a single consumer task, so the intake request returns immediately and
//! a failed run is observed and logged by the worker instead of vanishing in
//! a detached task.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{info, warn};

use reelcast_models::JobId;

use crate::orchestrator::Orchestrator;

/// Submits job ids to the pipeline worker.
#[derive(Clone)]
pub struct PipelineHandle {
    tx: mpsc::UnboundedSender<JobId>,
}

impl PipelineHandle {
    /// Hand a job off for processing. Returns false if the worker has
    /// stopped.
    pub fn submit(&self, id: JobId) -> bool {
        self.tx.send(id).is_ok()
    }
}

/// Single-consumer worker that runs submitted jobs to completion, one at a
/// time.
pub struct PipelineWorker;

impl PipelineWorker {
    /// Spawn the worker task and return a handle for submitting jobs. The
    /// worker stops once every handle has been dropped.
    pub fn spawn(orchestrator: Arc<Orchestrator>) -> PipelineHandle {
        let (tx, mut rx) = mpsc::unbounded_channel::<JobId>();

        tokio::spawn(async move {
            info!("pipeline worker started");
            while let Some(id) = rx.recv().await {
                match orchestrator.run_job(&id).await {
                    Ok(publish_id) => {
                        info!(job_id = %id, publish_id = %publish_id, "job processed");
                    }
                    Err(e) => {
                        warn!(job_id = %id, error = %e, "job processing failed");
                    }
                }
            }
            info!("pipeline worker stopped");
        });

        PipelineHandle { tx }
    }
}
