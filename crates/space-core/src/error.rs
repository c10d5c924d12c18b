//! Error type shared by every crate.
//!
//! Library errors are folded into [`AppError`] at the point they occur so
//! that `?` works end to end and the HTTP layer only has to look at
//! [`ErrorKind`].

use std::error::Error as StdError;
use std::fmt;

use thiserror::Error;

/// What went wrong, coarse enough to pick a response status from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// Bad source, user key, or interval.
    Validation,
    /// The upstream does not know the user.
    NotFound,
    /// An upstream call failed or answered with something unusable.
    Upstream,
    /// The freshness store could not be reached.
    Cache,
    /// Missing or contradictory settings.
    Configuration,
    /// A value could not be encoded or decoded.
    Serialization,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION",
            Self::NotFound => "NOT_FOUND",
            Self::Upstream => "UPSTREAM",
            Self::Cache => "CACHE",
            Self::Configuration => "CONFIGURATION",
            Self::Serialization => "SERIALIZATION",
            Self::Internal => "INTERNAL",
        }
    }

    /// Whether the caller can fix the request and retry.
    pub fn is_caller_fault(&self) -> bool {
        matches!(self, Self::Validation | Self::NotFound)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error with a kind, a message fit for the response body, and
/// optionally the library error behind it.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    pub kind: ErrorKind,
    pub message: String,
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Like [`AppError::new`], keeping `source` as the cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            source: Some(Box::new(source)),
            ..Self::new(kind, message)
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Upstream, message)
    }

    pub fn cache(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cache, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// See [`ErrorKind::is_caller_fault`].
    pub fn is_client_error(&self) -> bool {
        self.kind.is_caller_fault()
    }
}

/// Cloning keeps kind and message; the cause is not cloneable.
impl Clone for AppError {
    fn clone(&self) -> Self {
        Self::new(self.kind, self.message.clone())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        let message = format!("Invalid JSON: {err}");
        Self::with_source(ErrorKind::Serialization, message, err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        let message = format!("Configuration error: {err}");
        Self::with_source(ErrorKind::Configuration, message, err)
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "Upstream request timed out".to_string()
        } else {
            format!("Upstream request failed: {err}")
        };
        Self::with_source(ErrorKind::Upstream, message, err)
    }
}
