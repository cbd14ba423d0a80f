//! The prompt-to-publish pipeline.
//!
//! Drives a job through Generate -> Transfer -> Publish, persisting its
//! status at every transition and isolating failures per job so one bad job
//! never aborts its batch siblings. Collaborators sit behind traits so the
//! orchestrator can be exercised against fakes and the concrete HTTP clients
//! can be swapped independently.

pub mod error;
pub mod orchestrator;
pub mod queue;
pub mod traits;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::Orchestrator;
pub use queue::{PipelineHandle, PipelineWorker};
pub use traits::{Archiver, Generator, Publisher};
