//! Health check handler.

use axum::Json;
use axum::extract::State;

use space_core::traits::cache::CacheProvider;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::state::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<ApiResponse<HealthResponse>> {
    let cache = match state.cache.health_check().await {
        Ok(true) => "connected",
        Ok(false) => "unavailable",
        Err(e) => {
            tracing::warn!(error = %e, "Cache health check failed");
            "unavailable"
        }
    };

    Json(ApiResponse::success(
        HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            cache: cache.to_string(),
        },
        "ok",
    ))
}
