//! codetime.dev coding-activity provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::header::COOKIE;
use serde::Deserialize;
use serde_json::Value;

use space_core::config::status::CodetimeConfig;
use space_core::error::{AppError, ErrorKind};
use space_core::result::AppResult;
use space_entity::status::{Activity, Collection, Creator, RawActivity, SourceKind, UpstreamUser};

use super::NowPlayingSource;

const LATEST_STATS_PATH: &str = "/stats/latest";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestEvent {
    #[serde(default)]
    project: Option<String>,
    #[serde(default)]
    relative_file: Option<String>,
    #[serde(default)]
    language: Option<String>,
    #[serde(default)]
    editor: Option<String>,
    #[serde(default)]
    platform: Option<String>,
    #[serde(default)]
    event_time: Option<Value>,
}

/// `eventTime` arrives either as epoch milliseconds or as an RFC 3339 string.
fn event_time(value: Option<Value>) -> Option<DateTime<Utc>> {
    match value? {
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|t| t.with_timezone(&Utc)),
        _ => None,
    }
}

fn named(name: Option<String>) -> Vec<String> {
    name.into_iter().filter(|n| !n.is_empty()).collect()
}

fn creator(name: Option<String>) -> Vec<Creator> {
    named(name)
        .into_iter()
        .map(|name| Creator { id: 0, name })
        .collect()
}

/// Normalize a latest-stats payload.
///
/// Accepts the event at the top level or under `data`; a null body or an
/// event without a file is "no current activity".
pub fn parse_latest(value: Value, user_key: u64) -> AppResult<RawActivity> {
    let event = match value {
        Value::Null => return Ok(RawActivity::idle(user_key)),
        Value::Object(mut map) if map.contains_key("data") => {
            match map.remove("data").unwrap_or(Value::Null) {
                Value::Null => return Ok(RawActivity::idle(user_key)),
                data => data,
            }
        }
        other => other,
    };

    let event: LatestEvent = serde_json::from_value(event).map_err(|e| {
        AppError::with_source(ErrorKind::Upstream, "Malformed codetime payload", e)
    })?;

    let Some(file) = event.relative_file.filter(|f| !f.is_empty()) else {
        return Ok(RawActivity::idle(user_key));
    };
    let project = event.project.unwrap_or_default();
    let title = file
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file.as_str())
        .to_string();

    let activity = Activity {
        title,
        alias_names: named(event.language),
        translated_names: Vec::new(),
        id: format!("{project}/{file}"),
        creators: creator(event.editor),
        collection: Collection {
            id: 0,
            name: project,
            cover_image: String::new(),
            published_at: event_time(event.event_time),
            creators: creator(event.platform),
        },
    };

    Ok(RawActivity {
        record_id: 0,
        user: UpstreamUser {
            id: user_key as i64,
            ..UpstreamUser::default()
        },
        activity: Some(activity),
    })
}

/// codetime.dev status adapter.
#[derive(Debug, Clone)]
pub struct CodetimeSource {
    client: reqwest::Client,
    config: CodetimeConfig,
}

impl CodetimeSource {
    /// Create a new adapter.
    pub fn new(client: reqwest::Client, config: CodetimeConfig) -> Self {
        Self { client, config }
    }

    /// Fetch the raw latest-stats JSON, optionally for a specific user.
    pub async fn latest_stats(&self, user_key: Option<u64>) -> AppResult<Value> {
        if self.config.session.is_empty() {
            return Err(AppError::configuration(
                "Missing codetime session (status.codetime.session)",
            ));
        }

        let base = format!("{}{LATEST_STATS_PATH}", self.config.base_url);
        let url = match user_key {
            Some(id) => reqwest::Url::parse_with_params(&base, &[("userId", id.to_string())]),
            None => reqwest::Url::parse(&base),
        }
        .map_err(|e| AppError::configuration(format!("Invalid codetime base URL: {e}")))?;

        let response = self
            .client
            .get(url)
            .header(COOKIE, format!("CODETIME_SESSION={}", self.config.session))
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::not_found("codetime user not found"));
        }
        if !status.is_success() {
            return Err(AppError::upstream(format!("codetime status error: {status}")));
        }

        let json: Value = response.json().await?;
        if json.get("error").is_some_and(|e| !e.is_null()) {
            tracing::warn!(error = %json["error"], "codetime reported an error");
            return Err(AppError::upstream("codetime service error"));
        }

        Ok(json)
    }
}

#[async_trait]
impl NowPlayingSource for CodetimeSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Codetime
    }

    async fn fetch(&self, user_key: u64) -> AppResult<RawActivity> {
        let json = self.latest_stats(Some(user_key)).await?;
        tracing::debug!(user_key, "Fetched codetime latest stats");
        parse_latest(json, user_key)
    }
}
