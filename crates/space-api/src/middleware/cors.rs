//! Cross-origin access for browser widgets reading the status.

use std::time::Duration;

use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};

use space_core::config::CorsConfig;

fn is_wildcard(values: &[String]) -> bool {
    values.iter().any(|v| v == "*")
}

/// Parse what parses; a malformed entry is dropped rather than failing startup.
fn parsed<T: std::str::FromStr>(values: &[String]) -> Vec<T> {
    values.iter().filter_map(|v| v.trim().parse().ok()).collect()
}

/// CORS layer for the configured origins, methods and headers.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    let origins = if is_wildcard(&config.allowed_origins) {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parsed::<HeaderValue>(&config.allowed_origins))
    };

    let headers = if is_wildcard(&config.allowed_headers) {
        AllowHeaders::any()
    } else {
        AllowHeaders::list(parsed::<HeaderName>(&config.allowed_headers))
    };

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(parsed::<Method>(&config.allowed_methods))
        .allow_headers(headers)
        .max_age(Duration::from_secs(config.max_age_seconds))
}
