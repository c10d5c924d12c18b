//! Access log line per request.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Logs method, path with query, status and latency.
///
/// For event streams the latency is time to the response head, not the
/// stream lifetime.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let target = request
        .uri()
        .path_and_query()
        .map_or_else(|| request.uri().path().to_string(), |pq| pq.to_string());
    let started = Instant::now();

    let response = next.run(request).await;

    tracing::info!(
        %method,
        %target,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        "Handled request"
    );
    response
}
