//! Bounded fixed-interval polling.
//!
//! Long-running provider jobs expose no push channel here, so completion is
//! detected by probing a status endpoint. The attempt ceiling is the sole
//! timeout mechanism: it keeps a stuck provider job from blocking a pipeline
//! run forever.

use std::future::Future;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

/// Configuration for a polling loop.
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Fixed wait between probes.
    pub interval: Duration,
    /// Maximum number of probes before giving up.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        // 5s x 60 attempts: a five-minute cap
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 60,
        }
    }
}

impl PollConfig {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }
}

/// What a single probe observed.
#[derive(Debug)]
pub enum PollStatus<T> {
    /// Terminal success; polling stops with this value.
    Ready(T),
    /// Not terminal yet; poll again after the interval.
    Pending,
    /// Terminal provider-reported failure.
    Rejected(String),
}

/// Why a polling loop ended without a value.
#[derive(Debug, Error)]
pub enum PollError<E> {
    /// The attempt ceiling was reached without a terminal state.
    #[error("no terminal state after {0} attempts")]
    Timeout(u32),

    /// The provider reported a terminal failure.
    #[error("{0}")]
    Rejected(String),

    /// A probe itself failed (network, deserialization).
    #[error(transparent)]
    Probe(E),
}

/// Poll `probe` until it reaches a terminal state or the attempt ceiling.
///
/// Waits one interval before the first probe; submission and the first
/// status read are never back to back.
pub async fn poll_until<F, Fut, T, E>(
    config: &PollConfig,
    mut probe: F,
) -> Result<T, PollError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<PollStatus<T>, E>>,
{
    for attempt in 1..=config.max_attempts {
        tokio::time::sleep(config.interval).await;

        match probe().await.map_err(PollError::Probe)? {
            PollStatus::Ready(value) => return Ok(value),
            PollStatus::Rejected(reason) => return Err(PollError::Rejected(reason)),
            PollStatus::Pending => {
                debug!(attempt, max = config.max_attempts, "still pending");
            }
        }
    }

    Err(PollError::Timeout(config.max_attempts))
}
