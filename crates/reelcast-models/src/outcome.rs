//! Per-job outcomes of a batch sweep.

use serde::{Deserialize, Serialize};

use crate::JobId;

/// Result of one job's pipeline run within a sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    /// Full pipeline completed; the post is live.
    Success { publish_id: String },
    /// A stage failed; the job is marked failed with this message.
    Failed { error: String },
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, JobOutcome::Success { .. })
    }
}

/// One entry in the batch sweep report. A sweep returns exactly one of these
/// per attempted job, regardless of sibling failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepOutcome {
    pub job_id: JobId,
    #[serde(flatten)]
    pub outcome: JobOutcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serialization_shape() {
        let ok = SweepOutcome {
            job_id: JobId::from_string("j1"),
            outcome: JobOutcome::Success {
                publish_id: "pub-1".into(),
            },
        };
        let v = serde_json::to_value(&ok).unwrap();
        assert_eq!(v["job_id"], "j1");
        assert_eq!(v["status"], "success");
        assert_eq!(v["publish_id"], "pub-1");

        let failed = SweepOutcome {
            job_id: JobId::from_string("j2"),
            outcome: JobOutcome::Failed {
                error: "video generation failed".into(),
            },
        };
        let v = serde_json::to_value(&failed).unwrap();
        assert_eq!(v["status"], "failed");
        assert_eq!(v["error"], "video generation failed");
    }
}
