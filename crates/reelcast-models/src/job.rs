//! Job definitions for the prompt-to-publish pipeline.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Job status in the pipeline state machine.
///
/// Transitions only move forward: `Pending -> Processing -> Completed`, with
/// `Failed` reachable from `Processing` at any stage. Terminal jobs are never
/// mutated again by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Job is waiting for its scheduled time
    #[default]
    Pending,
    /// Job is being driven through the pipeline
    Processing,
    /// Video generated, stored, and published
    Completed,
    /// A pipeline stage failed; `error` holds the message
    Failed,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One prompt-to-publish unit of work.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Job {
    /// Unique job ID, assigned at creation
    pub id: JobId,

    /// Text description driving video generation
    pub prompt: String,

    /// Text accompanying the eventual publish
    pub caption: String,

    /// The job becomes eligible for processing once this time has passed
    pub scheduled_time: DateTime<Utc>,

    /// Current pipeline status
    pub status: JobStatus,

    /// Durable asset URL, set once transfer succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_url: Option<String>,

    /// Publish confirmation ID, set once publish succeeds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publish_id: Option<String>,

    /// When the job was created
    pub created_at: DateTime<Utc>,

    /// Last failure message, set on transition to `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// Create a pending job from intake fields.
    pub fn new(new: NewJob) -> Self {
        Self {
            id: JobId::new(),
            prompt: new.prompt,
            caption: new.caption,
            scheduled_time: new.scheduled_time,
            status: JobStatus::Pending,
            asset_url: None,
            publish_id: None,
            created_at: Utc::now(),
            error: None,
        }
    }

    /// Whether the job is due at the given time.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status == JobStatus::Pending && self.scheduled_time <= now
    }

    /// Merge a patch into this job.
    pub fn apply(&mut self, patch: JobPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(asset_url) = patch.asset_url {
            self.asset_url = Some(asset_url);
        }
        if let Some(publish_id) = patch.publish_id {
            self.publish_id = Some(publish_id);
        }
        if let Some(error) = patch.error {
            self.error = Some(error);
        }
    }
}

/// Fields required to create a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewJob {
    pub prompt: String,
    pub caption: String,
    pub scheduled_time: DateTime<Utc>,
}

impl NewJob {
    /// Build intake fields with their defaults: the caption falls back to
    /// the prompt and the schedule to "immediately".
    pub fn new(
        prompt: impl Into<String>,
        caption: Option<String>,
        scheduled_time: Option<DateTime<Utc>>,
    ) -> Self {
        let prompt = prompt.into();
        Self {
            caption: caption.unwrap_or_else(|| prompt.clone()),
            scheduled_time: scheduled_time.unwrap_or_else(Utc::now),
            prompt,
        }
    }
}

/// Partial update merged into a stored job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobPatch {
    pub status: Option<JobStatus>,
    pub asset_url: Option<String>,
    pub publish_id: Option<String>,
    pub error: Option<String>,
}

impl JobPatch {
    pub fn status(status: JobStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    /// Patch for a failed pipeline run.
    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: Some(JobStatus::Failed),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn with_asset_url(mut self, url: impl Into<String>) -> Self {
        self.asset_url = Some(url.into());
        self
    }

    pub fn with_publish_id(mut self, id: impl Into<String>) -> Self {
        self.publish_id = Some(id.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_defaults() {
        let new = NewJob::new("sunset over mountains", None, None);
        assert_eq!(new.caption, "sunset over mountains");

        let job = Job::new(new);
        assert_eq!(job.status, JobStatus::Pending);
        assert!(job.asset_url.is_none());
        assert!(job.publish_id.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_explicit_caption_kept() {
        let new = NewJob::new("a prompt", Some("a caption".into()), None);
        assert_eq!(new.caption, "a caption");
        assert_eq!(new.prompt, "a prompt");
    }

    #[test]
    fn test_is_due() {
        let now = Utc::now();
        let mut job = Job::new(NewJob::new("p", None, Some(now - chrono::Duration::minutes(1))));
        assert!(job.is_due(now));

        job.scheduled_time = now + chrono::Duration::minutes(5);
        assert!(!job.is_due(now));

        job.scheduled_time = now - chrono::Duration::minutes(5);
        job.status = JobStatus::Completed;
        assert!(!job.is_due(now));
    }

    #[test]
    fn test_apply_patch_merges() {
        let mut job = Job::new(NewJob::new("p", None, None));
        let created_at = job.created_at;

        job.apply(JobPatch::status(JobStatus::Processing));
        assert_eq!(job.status, JobStatus::Processing);

        job.apply(JobPatch::default().with_asset_url("https://blob/video.mp4"));
        assert_eq!(job.status, JobStatus::Processing);
        assert_eq!(job.asset_url.as_deref(), Some("https://blob/video.mp4"));

        job.apply(JobPatch::failed("publish timed out"));
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("publish timed out"));
        // Untouched fields survive the merge
        assert_eq!(job.asset_url.as_deref(), Some("https://blob/video.mp4"));
        assert_eq!(job.created_at, created_at);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Processing.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }
}
