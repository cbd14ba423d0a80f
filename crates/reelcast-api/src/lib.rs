//! Axum HTTP API server.
//!
//! This crate provides:
//! - Job intake, listing, deletion, and the manual publish trigger
//! - The shared-secret batch sweep endpoint
//! - Asset housekeeping endpoints over durable storage
//! - Prometheus metrics and health probes

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
