//! NetEase Cloud Music user-status provider.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::seq::IndexedRandom;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_TYPE, COOKIE, HeaderMap, HeaderValue, USER_AGENT};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use space_core::config::status::NcmConfig;
use space_core::error::{AppError, ErrorKind};
use space_core::result::AppResult;
use space_entity::status::{Activity, Collection, Creator, RawActivity, SourceKind, UpstreamUser};

use super::NowPlayingSource;
use super::eapi;

/// Path signed into the encrypted params.
const USER_STATUS_DETAIL_API: &str = "/api/social/user/status/detail";
/// Path actually requested.
const USER_STATUS_DETAIL_URL: &str = "/eapi/social/user/status/detail";

static USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (iPhone; CPU iPhone OS 9_1 like Mac OS X) AppleWebKit/601.1.46 (KHTML, like Gecko) Version/9.0 Mobile/13B143 Safari/601.1",
    "Mozilla/5.0 (Linux; Android 5.0; SM-G900P Build/LRX21T) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/59.0.3071.115 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 6.0; Nexus 5 Build/MRA58N) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/59.0.3071.115 Mobile Safari/537.36",
    "Mozilla/5.0 (Linux; Android 5.1.1; Nexus 6 Build/LYZ28E) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/59.0.3071.115 Mobile Safari/537.36",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 10_3_2 like Mac OS X) AppleWebKit/603.2.4 (KHTML, like Gecko) Mobile/14F89;GameHelper",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 10_0 like Mac OS X) AppleWebKit/602.1.38 (KHTML, like Gecko) Version/10.0 Mobile/14A300 Safari/602.1",
    "NeteaseMusic/6.5.0.1575377963(164);Dalvik/2.1.0 (Linux; U; Android 9; MIX 2 MIUI/V12.0.1.0.PDECNXM)",
];

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusDetailRequest<'a> {
    visitor_id: String,
    device_id: &'a str,
    e_r: bool,
}

#[derive(Debug, Deserialize)]
struct StatusResponse {
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    data: Option<StatusData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusData {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    user_id: Option<i64>,
    #[serde(default)]
    avatar: Option<String>,
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    song: Option<NcmSong>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NcmSong {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    alias: Option<Vec<String>>,
    #[serde(default)]
    trans_names: Option<Vec<String>>,
    #[serde(default)]
    ext_properties: Option<ExtProperties>,
    #[serde(default)]
    artists: Option<Vec<NcmArtist>>,
    #[serde(default)]
    album: Option<NcmAlbum>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtProperties {
    #[serde(default)]
    trans_names: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct NcmArtist {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NcmAlbum {
    #[serde(default)]
    id: Option<i64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    pic_url: Option<String>,
    #[serde(default)]
    publish_time: Option<i64>,
    #[serde(default)]
    artists: Option<Vec<NcmArtist>>,
}

impl From<NcmArtist> for Creator {
    fn from(artist: NcmArtist) -> Self {
        Self {
            id: artist.id.unwrap_or_default(),
            name: artist.name.unwrap_or_default(),
        }
    }
}

impl NcmSong {
    fn into_activity(self) -> Option<Activity> {
        let id = self.id?;
        let translated_names = self
            .trans_names
            .or_else(|| self.ext_properties.and_then(|ep| ep.trans_names))
            .unwrap_or_default();
        let album = self.album;

        Some(Activity {
            title: self.name.unwrap_or_default(),
            alias_names: self.alias.unwrap_or_default(),
            translated_names,
            id: id.to_string(),
            creators: creators(self.artists),
            collection: album
                .map(|album| Collection {
                    id: album.id.unwrap_or_default(),
                    name: album.name.unwrap_or_default(),
                    cover_image: album.pic_url.unwrap_or_default(),
                    published_at: album.publish_time.and_then(DateTime::<Utc>::from_timestamp_millis),
                    creators: creators(album.artists),
                })
                .unwrap_or_default(),
        })
    }
}

fn creators(artists: Option<Vec<NcmArtist>>) -> Vec<Creator> {
    artists
        .unwrap_or_default()
        .into_iter()
        .map(Creator::from)
        .collect()
}

/// Normalize a decoded user-status response.
pub fn parse_status(value: Value, user_key: u64) -> AppResult<RawActivity> {
    let response: StatusResponse = serde_json::from_value(value).map_err(|e| {
        AppError::with_source(ErrorKind::Upstream, "Malformed NetEase status payload", e)
    })?;

    match response.code {
        None | Some(200) => {}
        Some(404) => {
            return Err(AppError::not_found(format!("NetEase user {user_key} not found")));
        }
        Some(code) => {
            return Err(AppError::upstream(format!(
                "NetEase status error {code}: {}",
                response.message.unwrap_or_default()
            )));
        }
    }

    let Some(data) = response.data else {
        return Ok(RawActivity::idle(user_key));
    };

    Ok(RawActivity {
        record_id: data.id.unwrap_or_default(),
        user: UpstreamUser {
            id: data.user_id.unwrap_or(user_key as i64),
            avatar: data.avatar.unwrap_or_default(),
            name: data.user_name.unwrap_or_default(),
        },
        activity: data.song.and_then(NcmSong::into_activity),
    })
}

/// NetEase Cloud Music status adapter.
#[derive(Debug, Clone)]
pub struct NcmSource {
    client: reqwest::Client,
    config: NcmConfig,
}

impl NcmSource {
    /// Create a new adapter.
    pub fn new(client: reqwest::Client, config: NcmConfig) -> Self {
        Self { client, config }
    }

    fn user_agent() -> &'static str {
        USER_AGENTS
            .choose(&mut rand::rng())
            .copied()
            .unwrap_or_default()
    }

    fn headers(&self) -> AppResult<HeaderMap> {
        let cookie = format!(
            "appver={}; buildver={}; MUSIC_U={}",
            self.config.app_version,
            Utc::now().timestamp(),
            self.config.music_u
        );

        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/x-www-form-urlencoded"),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::user_agent()));
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        // Compressed bodies cannot be decrypted
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&cookie)
                .map_err(|e| AppError::configuration(format!("Invalid NetEase cookie: {e}")))?,
        );
        Ok(headers)
    }
}

#[async_trait]
impl NowPlayingSource for NcmSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Ncm
    }

    async fn fetch(&self, user_key: u64) -> AppResult<RawActivity> {
        let request = serde_json::to_string(&StatusDetailRequest {
            visitor_id: user_key.to_string(),
            device_id: &self.config.device_id,
            e_r: true,
        })?;
        let body = eapi::encrypt_params(USER_STATUS_DETAIL_API, &request);
        let url = format!("{}{USER_STATUS_DETAIL_URL}", self.config.base_url);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::upstream(format!("NetEase status HTTP {status}")));
        }

        let bytes = response.bytes().await?;
        let value = eapi::decode_body(&bytes)?;
        tracing::debug!(user_key, "Fetched NetEase status");

        parse_status(value, user_key)
    }
}
