//! Pipeline error types.

use thiserror::Error;

use reelcast_models::JobId;
use reelcast_providers::{GeneratorError, PublishError};
use reelcast_storage::StorageError;
use reelcast_store::StoreError;

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors from a pipeline run.
///
/// Stage errors (`Generation`, `Transfer`, `Publish`) are absorbed at the
/// orchestrator boundary: they are recorded on the job and reported as
/// per-job outcomes, never thrown across sibling jobs in a batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("job not found: {0}")]
    JobNotFound(JobId),

    #[error("job {0} is not pending")]
    NotPending(JobId),

    #[error("job {0} has no stored asset to publish")]
    NoAsset(JobId),

    #[error("job {0} is already published")]
    AlreadyPublished(JobId),

    #[error(transparent)]
    Generation(#[from] GeneratorError),

    #[error(transparent)]
    Transfer(#[from] StorageError),

    #[error(transparent)]
    Publish(#[from] PublishError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
