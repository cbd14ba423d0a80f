//! API routes.

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::assets::{delete_asset, list_assets};
use crate::handlers::health::{health, ready};
use crate::handlers::jobs::{create_job, delete_job, list_jobs, publish_job};
use crate::handlers::sweep::run_sweep;
use crate::metrics::metrics_middleware;
use crate::middleware::{cors_layer, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let job_routes = Router::new()
        .route("/jobs", post(create_job).get(list_jobs))
        .route("/jobs/:job_id", delete(delete_job))
        .route("/jobs/:job_id/publish", post(publish_job));

    let sweep_routes = Router::new().route("/sweep", post(run_sweep));

    // Operator housekeeping over durable storage
    let asset_routes = Router::new().route("/assets", get(list_assets).delete(delete_asset));

    let api_routes = Router::new()
        .merge(job_routes)
        .merge(sweep_routes)
        .merge(asset_routes);

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    // Metrics endpoint (if enabled)
    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
