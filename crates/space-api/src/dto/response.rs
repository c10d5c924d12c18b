//! Response envelope DTOs.

use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

/// Outcome class carried in every envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The request succeeded.
    Success,
    /// The caller sent something invalid.
    Failed,
    /// The server or an upstream failed.
    Error,
}

/// Standard response envelope: `{code, status, message, data}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// HTTP status code as a string (`"200"`, `"400"`, ...).
    pub code: String,
    /// Outcome class.
    pub status: ResponseStatus,
    /// Human-readable message.
    pub message: String,
    /// Payload, `null` on failure.
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            code: StatusCode::OK.as_str().to_string(),
            status: ResponseStatus::Success,
            message: message.into(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// Creates a client-error response.
    pub fn failed(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            status: ResponseStatus::Failed,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a server-error response.
    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code: code.as_str().to_string(),
            status: ResponseStatus::Error,
            message: message.into(),
            data: None,
        }
    }
}

/// Health check payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `"connected"` or `"unavailable"`.
    pub cache: String,
}
