//! Now-playing status configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Now-playing status aggregation and streaming configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusConfig {
    /// Source used when the request does not name one.
    #[serde(default = "default_source")]
    pub default_source: String,
    /// User key used when the request does not name one.
    #[serde(default = "default_user_key")]
    pub default_user_key: u64,
    /// Stream poll interval used when the request does not name one.
    #[serde(default = "default_interval_ms")]
    pub default_interval_ms: u64,
    /// Smallest accepted stream poll interval.
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,
    /// Heartbeat cadence for open streams.
    #[serde(default = "default_heartbeat_interval")]
    pub heartbeat_interval_seconds: u64,
    /// How long the same activity may be observed before the user is
    /// considered inactive.
    #[serde(default = "default_inactivity_window")]
    pub inactivity_window_seconds: u64,
    /// Timeout applied to every upstream request.
    #[serde(default = "default_upstream_timeout")]
    pub upstream_timeout_seconds: u64,
    /// Frames buffered per stream before the poll task waits on the client.
    #[serde(default = "default_stream_buffer")]
    pub stream_buffer: usize,
    /// NetEase Cloud Music provider settings.
    #[serde(default)]
    pub ncm: NcmConfig,
    /// codetime.dev provider settings.
    #[serde(default)]
    pub codetime: CodetimeConfig,
}

impl StatusConfig {
    /// Reject settings that would stall or spin the stream timers.
    pub fn validate(&self) -> AppResult<()> {
        let cadences = [
            ("status.min_interval_ms", self.min_interval_ms),
            ("status.default_interval_ms", self.default_interval_ms),
            ("status.heartbeat_interval_seconds", self.heartbeat_interval_seconds),
            ("status.inactivity_window_seconds", self.inactivity_window_seconds),
            ("status.stream_buffer", self.stream_buffer as u64),
        ];
        if let Some((name, _)) = cadences.iter().find(|(_, value)| *value == 0) {
            return Err(AppError::configuration(format!("{name} must be greater than zero")));
        }
        if self.default_interval_ms < self.min_interval_ms {
            return Err(AppError::configuration(format!(
                "status.default_interval_ms ({}) is below status.min_interval_ms ({})",
                self.default_interval_ms, self.min_interval_ms
            )));
        }
        Ok(())
    }

    /// Inactivity window as a `chrono` duration.
    pub fn inactivity_window(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.inactivity_window_seconds as i64)
    }

    /// Heartbeat cadence as a `std` duration.
    pub fn heartbeat_interval(&self) -> Duration {
        Duration::from_secs(self.heartbeat_interval_seconds)
    }

    /// Upstream request timeout as a `std` duration.
    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            default_source: default_source(),
            default_user_key: default_user_key(),
            default_interval_ms: default_interval_ms(),
            min_interval_ms: default_min_interval_ms(),
            heartbeat_interval_seconds: default_heartbeat_interval(),
            inactivity_window_seconds: default_inactivity_window(),
            upstream_timeout_seconds: default_upstream_timeout(),
            stream_buffer: default_stream_buffer(),
            ncm: NcmConfig::default(),
            codetime: CodetimeConfig::default(),
        }
    }
}

/// NetEase Cloud Music user-status provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NcmConfig {
    /// API host, without a trailing slash.
    #[serde(default = "default_ncm_base_url")]
    pub base_url: String,
    /// `MUSIC_U` login cookie used for the status request.
    #[serde(default)]
    pub music_u: String,
    /// Client version reported in the `appver` cookie.
    #[serde(default = "default_ncm_app_version")]
    pub app_version: String,
    /// Device id sent in the encrypted request body.
    #[serde(default = "default_ncm_device_id")]
    pub device_id: String,
}

impl Default for NcmConfig {
    fn default() -> Self {
        Self {
            base_url: default_ncm_base_url(),
            music_u: String::new(),
            app_version: default_ncm_app_version(),
            device_id: default_ncm_device_id(),
        }
    }
}

/// codetime.dev coding-activity provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodetimeConfig {
    /// API host, without a trailing slash.
    #[serde(default = "default_codetime_base_url")]
    pub base_url: String,
    /// `CODETIME_SESSION` cookie value.
    #[serde(default)]
    pub session: String,
}

impl Default for CodetimeConfig {
    fn default() -> Self {
        Self {
            base_url: default_codetime_base_url(),
            session: String::new(),
        }
    }
}

fn default_source() -> String {
    "codetime".to_string()
}

fn default_user_key() -> u64 {
    515522946
}

fn default_interval_ms() -> u64 {
    5000
}

fn default_min_interval_ms() -> u64 {
    1000
}

fn default_heartbeat_interval() -> u64 {
    30
}

fn default_inactivity_window() -> u64 {
    5 * 60
}

fn default_upstream_timeout() -> u64 {
    10
}

fn default_stream_buffer() -> usize {
    16
}

fn default_ncm_base_url() -> String {
    "https://interface3.music.163.com".to_string()
}

fn default_ncm_app_version() -> String {
    "9.3.35".to_string()
}

fn default_ncm_device_id() -> String {
    "b464d3d44ed8210cee17e297dcaf730a".to_string()
}

fn default_codetime_base_url() -> String {
    "https://api.codetime.dev".to_string()
}
