//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus recorder")
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "reelcast_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "reelcast_http_request_duration_seconds";

    // Pipeline metrics
    pub const JOBS_COMPLETED_TOTAL: &str = "reelcast_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "reelcast_jobs_failed_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record the per-job results of a batch sweep.
pub fn record_sweep(succeeded: u64, failed: u64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(succeeded);
    counter!(names::JOBS_FAILED_TOTAL).increment(failed);
}

/// Middleware that times every request.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16();
    record_http_request(&method, &path, status, start.elapsed().as_secs_f64());

    response
}
