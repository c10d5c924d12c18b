//! Public now-playing snapshot.
//!
//! Field names inside the activity follow the legacy front-end (`name`,
//! `alias`, `transNames`, `artists`, `album`, ...). The activity itself is
//! published as `activity`; the legacy payload called it `song`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::raw::RawActivity;

/// A person or entity credited for an activity (artist, editor, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Creator {
    /// Provider id (0 when the provider has none).
    pub id: i64,
    /// Display name.
    pub name: String,
}

/// The grouping an activity belongs to (album, project, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    /// Provider id (0 when the provider has none).
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Cover art URL.
    #[serde(rename = "image")]
    pub cover_image: String,
    /// Release / event time.
    #[serde(rename = "publishTime")]
    pub published_at: Option<DateTime<Utc>>,
    /// Credited creators of the collection.
    #[serde(rename = "artists")]
    pub creators: Vec<Creator>,
}

/// The thing a user is currently doing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Title (song name, file name, ...).
    #[serde(rename = "name")]
    pub title: String,
    /// Alternative titles.
    #[serde(rename = "alias")]
    pub alias_names: Vec<String>,
    /// Translated titles.
    #[serde(rename = "transNames")]
    pub translated_names: Vec<String>,
    /// Upstream activity identifier.
    pub id: String,
    /// Credited creators.
    #[serde(rename = "artists")]
    pub creators: Vec<Creator>,
    /// Grouping of the activity.
    #[serde(rename = "album")]
    pub collection: Collection,
}

/// User block of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotUser {
    /// Provider user id.
    pub id: i64,
    /// Avatar URL.
    pub avatar: String,
    /// Display name.
    #[serde(rename = "name")]
    pub display_name: String,
    /// Whether the user is currently engaged.
    pub active: bool,
}

/// Status returned to clients, built fresh on every poll.
///
/// `activity` is present iff `user.active` is true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NowPlayingSnapshot {
    /// Provider-side status record id.
    #[serde(rename = "id")]
    pub record_id: i64,
    /// The user and their activity flag.
    pub user: SnapshotUser,
    /// Current activity, omitted when inactive.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity: Option<Activity>,
    /// When the snapshot was taken.
    #[serde(rename = "lastUpdate")]
    pub observed_at: DateTime<Utc>,
    /// Activity id observed upstream, kept even when inactive so streams
    /// can tell a stale activity from a changed one.
    #[serde(skip)]
    pub observed_activity_id: Option<String>,
}

impl NowPlayingSnapshot {
    /// Build a snapshot from a provider result and a freshness decision.
    pub fn from_raw(raw: RawActivity, active: bool, observed_at: DateTime<Utc>) -> Self {
        let observed_activity_id = raw.activity_id().map(str::to_string);
        let active = active && raw.activity.is_some();

        Self {
            record_id: raw.record_id,
            user: SnapshotUser {
                id: raw.user.id,
                avatar: raw.user.avatar,
                display_name: raw.user.name,
                active,
            },
            activity: if active { raw.activity } else { None },
            observed_at,
            observed_activity_id,
        }
    }

    /// Whether the user is active.
    pub fn is_active(&self) -> bool {
        self.user.active
    }
}
