//! Now-playing status handlers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::StreamExt;
use serde_json::Value;

use space_core::error::AppError;
use space_realtime::Frame;

use crate::dto::request::StatusParams;
use crate::dto::response::ApiResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// GET /status
///
/// Returns one snapshot in the envelope, or, with `sse=true`, a
/// `text/event-stream` of changed snapshots and heartbeat comments.
pub async fn get_status(
    State(state): State<AppState>,
    params: Result<Query<StatusParams>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(params) = params
        .map_err(|e| AppError::validation(format!("Invalid query string: {}", e.body_text())))?;
    let request = params.request(&state.config.status)?;

    if params.is_stream() {
        let interval_ms = params.interval_ms(&state.config.status)?;
        let frames = state.streams.open(request, interval_ms)?;
        return Ok(Sse::new(frames.map(frame_to_event)).into_response());
    }

    let snapshot = state.aggregator.get_status(&request).await?;
    Ok(Json(ApiResponse::success(snapshot, request.source.label())).into_response())
}

/// GET /status/codetime
pub async fn get_codetime(State(state): State<AppState>) -> Result<Json<ApiResponse<Value>>, ApiError> {
    let stats = state.codetime.latest_stats(None).await?;
    Ok(Json(ApiResponse::success(stats, "codetime")))
}

fn frame_to_event(frame: Frame) -> Result<Event, axum::Error> {
    match frame {
        Frame::Snapshot(snapshot) => Event::default().json_data(&*snapshot),
        Frame::Heartbeat => Ok(Event::default().comment("heartbeat")),
    }
}
