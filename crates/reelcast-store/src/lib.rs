//! Job store abstraction.
//!
//! The pipeline talks to jobs exclusively through the [`JobStore`] trait so a
//! durable backing store can be substituted without touching the
//! orchestrator. [`MemoryStore`] is the in-process implementation: it holds
//! records for the lifetime of the process and hands out snapshots only.

pub mod error;
pub mod memory;
mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::JobStore;
