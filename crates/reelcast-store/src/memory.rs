//! In-memory job store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use reelcast_models::{Job, JobId, JobPatch, NewJob};

use crate::error::StoreResult;
use crate::traits::JobStore;

/// Process-wide in-memory job registry.
///
/// Records do not survive a restart; that is a deliberate simplification, and
/// a durable store is expected to implement [`JobStore`] in its place.
#[derive(Default)]
pub struct MemoryStore {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted_newest_first(mut jobs: Vec<Job>) -> Vec<Job> {
        // created_at descending; id as a stable tiebreak
        jobs.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        jobs
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create(&self, new: NewJob) -> StoreResult<Job> {
        let job = Job::new(new);
        debug!(job_id = %job.id, scheduled_time = %job.scheduled_time, "created job");
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        Ok(job)
    }

    async fn get(&self, id: &JobId) -> StoreResult<Option<Job>> {
        Ok(self.jobs.read().await.get(id).cloned())
    }

    async fn update(&self, id: &JobId, patch: JobPatch) -> StoreResult<Option<Job>> {
        let mut jobs = self.jobs.write().await;
        Ok(jobs.get_mut(id).map(|job| {
            job.apply(patch);
            job.clone()
        }))
    }

    async fn list(&self) -> StoreResult<Vec<Job>> {
        let jobs = self.jobs.read().await.values().cloned().collect();
        Ok(Self::sorted_newest_first(jobs))
    }

    async fn list_due(&self, now: DateTime<Utc>) -> StoreResult<Vec<Job>> {
        let due = self
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.is_due(now))
            .cloned()
            .collect();
        Ok(Self::sorted_newest_first(due))
    }

    async fn delete(&self, id: &JobId) -> StoreResult<bool> {
        Ok(self.jobs.write().await.remove(id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reelcast_models::JobStatus;

    fn new_job(prompt: &str) -> NewJob {
        NewJob::new(prompt, None, None)
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = MemoryStore::new();
        let job = store.create(new_job("a sunset")).await.unwrap();
        assert_eq!(job.status, JobStatus::Pending);

        let fetched = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(fetched.prompt, "a sunset");
        assert_eq!(fetched.created_at, job.created_at);
    }

    #[tokio::test]
    async fn test_update_merges_and_returns_snapshot() {
        let store = MemoryStore::new();
        let job = store.create(new_job("p")).await.unwrap();

        let updated = store
            .update(&job.id, JobPatch::status(JobStatus::Processing))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, JobStatus::Processing);

        // Snapshots are copies; mutating one must not leak into the store
        let mut snapshot = store.get(&job.id).await.unwrap().unwrap();
        snapshot.status = JobStatus::Completed;
        let fresh = store.get(&job.id).await.unwrap().unwrap();
        assert_eq!(fresh.status, JobStatus::Processing);
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_noop() {
        let store = MemoryStore::new();
        let missing = store
            .update(&JobId::from_string("nope"), JobPatch::status(JobStatus::Failed))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_list_ordering_newest_first() {
        let store = MemoryStore::new();
        let first = store.create(new_job("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = store.create(new_job("second")).await.unwrap();

        let jobs = store.list().await.unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, second.id);
        assert_eq!(jobs[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_due_filters_status_and_schedule() {
        let store = MemoryStore::new();
        let now = Utc::now();

        let due = store
            .create(NewJob::new("due", None, Some(now - chrono::Duration::minutes(1))))
            .await
            .unwrap();
        let future = store
            .create(NewJob::new("future", None, Some(now + chrono::Duration::hours(1))))
            .await
            .unwrap();
        let done = store
            .create(NewJob::new("done", None, Some(now - chrono::Duration::hours(1))))
            .await
            .unwrap();
        store
            .update(&done.id, JobPatch::status(JobStatus::Completed))
            .await
            .unwrap();

        let due_jobs = store.list_due(now).await.unwrap();
        assert_eq!(due_jobs.len(), 1);
        assert_eq!(due_jobs[0].id, due.id);

        // Everything is still present in list()
        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.iter().any(|j| j.id == future.id));
    }

    #[tokio::test]
    async fn test_delete() {
        let store = MemoryStore::new();
        let job = store.create(new_job("p")).await.unwrap();

        assert!(store.delete(&job.id).await.unwrap());
        assert!(store.get(&job.id).await.unwrap().is_none());
        assert!(!store.delete(&job.id).await.unwrap());
    }
}
