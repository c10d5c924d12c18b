//! Route definitions for the status HTTP API.

use axum::{Router, middleware as axum_middleware, routing::get};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the router with all routes and the request-logging middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(status_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Status endpoints: snapshot/stream, raw codetime
fn status_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(handlers::status::get_status))
        .route("/status/codetime", get(handlers::status::get_codetime))
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
