//! The job store contract.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use reelcast_models::{Job, JobId, JobPatch, NewJob};

use crate::error::StoreResult;

/// Registry of job records keyed by id.
///
/// The store is the sole owner of job records: callers always receive
/// snapshots, and mutation goes through [`JobStore::update`], which merges a
/// patch atomically with respect to concurrent readers.
#[async_trait]
pub trait JobStore: Send + Sync {
    /// Allocate a unique id and create a pending job.
    async fn create(&self, new: NewJob) -> StoreResult<Job>;

    /// Fetch a snapshot of a job by id.
    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>>;

    /// Merge a patch into an existing record. Returns the updated snapshot,
    /// or `None` if the id is unknown.
    async fn update(&self, id: &JobId, patch: JobPatch) -> StoreResult<Option<Job>>;

    /// All jobs, newest-first by creation time.
    async fn list(&self) -> StoreResult<Vec<Job>>;

    /// Pending jobs whose scheduled time has passed, newest-first.
    async fn list_due(&self, now: DateTime<Utc>) -> StoreResult<Vec<Job>>;

    /// Remove a job. Returns whether a record existed.
    async fn delete(&self, id: &JobId) -> StoreResult<bool>;
}
