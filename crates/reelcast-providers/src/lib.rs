//! HTTP clients for the external providers.
//!
//! Both providers expose the same behavioral contract: submit a long-running
//! job, poll a status endpoint until it reaches a terminal state, then read
//! the result. Neither offers a push channel, so [`poll::poll_until`] drives
//! bounded, fixed-interval polling for both.

pub mod generate;
pub mod poll;
pub mod publish;

pub use generate::{GeneratedAsset, GenerateOptions, GeneratorError, VideoGenClient, VideoGenConfig};
pub use poll::{poll_until, PollConfig, PollError, PollStatus};
pub use publish::{GraphPublisher, PublishError, PublisherConfig};
