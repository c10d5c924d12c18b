//! Request DTOs.

use serde::Deserialize;

use space_core::config::status::StatusConfig;
use space_core::error::AppError;
use space_core::result::AppResult;
use space_service::StatusRequest;

/// Query parameters of `GET /status`.
///
/// Values are kept as strings so that malformed input surfaces as a
/// validation error naming the parameter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusParams {
    /// Source kind (`s` or `source`).
    #[serde(default, alias = "source")]
    pub s: Option<String>,
    /// Numeric user key (`q` or `query`).
    #[serde(default, alias = "query")]
    pub q: Option<String>,
    /// `"true"` (case-insensitive) to stream.
    #[serde(default)]
    pub sse: Option<String>,
    /// Stream poll interval in milliseconds (`interval` or `i`).
    #[serde(default, alias = "i")]
    pub interval: Option<String>,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl StatusParams {
    /// Resolve the source and user key, applying configured defaults.
    pub fn request(&self, defaults: &StatusConfig) -> AppResult<StatusRequest> {
        let source = present(&self.s).unwrap_or(defaults.default_source.as_str());
        match present(&self.q) {
            Some(user_key) => StatusRequest::parse(source, user_key),
            None => StatusRequest::parse(source, &defaults.default_user_key.to_string()),
        }
    }

    /// Whether the client asked for a stream.
    pub fn is_stream(&self) -> bool {
        present(&self.sse).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }

    /// Resolve the poll interval, applying the configured default.
    ///
    /// Negative values resolve to zero so the range check rejects them.
    pub fn interval_ms(&self, defaults: &StatusConfig) -> AppResult<u64> {
        let Some(raw) = present(&self.interval) else {
            return Ok(defaults.default_interval_ms);
        };

        let value = raw.parse::<i64>().map_err(|_| {
            AppError::validation(format!(
                "Invalid interval: '{raw}' is not an integer number of milliseconds"
            ))
        })?;
        Ok(u64::try_from(value).unwrap_or(0))
    }
}
