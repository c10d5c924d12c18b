//! Activity freshness record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Last-seen activity for one tracked user key.
///
/// Created on first observation and overwritten in place whenever a new
/// activity id is observed. Never deleted by the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityRecord {
    /// Tracked user key (`"<source>:<user>"`).
    pub user_key: String,
    /// Upstream activity identifier last observed as new.
    pub activity_id: String,
    /// When `activity_id` was first observed.
    pub last_seen_at: DateTime<Utc>,
}

impl ActivityRecord {
    /// Create a record observed at `now`.
    pub fn new(user_key: impl Into<String>, activity_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            user_key: user_key.into(),
            activity_id: activity_id.into(),
            last_seen_at: now,
        }
    }

    /// Apply a partial update.
    pub fn apply(&mut self, patch: ActivityPatch) {
        if let Some(activity_id) = patch.activity_id {
            self.activity_id = activity_id;
        }
        if let Some(last_seen_at) = patch.last_seen_at {
            self.last_seen_at = last_seen_at;
        }
    }
}

/// Partial update to an [`ActivityRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityPatch {
    /// New activity id.
    pub activity_id: Option<String>,
    /// New observation time.
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl ActivityPatch {
    /// Patch that replaces both the id and the observation time.
    pub fn observed(activity_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            activity_id: Some(activity_id.into()),
            last_seen_at: Some(now),
        }
    }
}
