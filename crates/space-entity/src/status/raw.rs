//! Provider payloads normalized at the adapter boundary.

use serde::{Deserialize, Serialize};

use super::snapshot::Activity;

/// User fields reported by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamUser {
    /// Provider user id.
    pub id: i64,
    /// Avatar URL (empty when the provider has none).
    pub avatar: String,
    /// Display name (empty when the provider has none).
    pub name: String,
}

/// Normalized result of one provider fetch.
///
/// `activity == None` is the "no current activity" sentinel: the provider
/// answered, but the user is not playing or coding anything.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawActivity {
    /// Provider-side id of the status record (0 when not reported).
    pub record_id: i64,
    /// The user the status belongs to.
    pub user: UpstreamUser,
    /// What the user is doing, if anything.
    pub activity: Option<Activity>,
}

impl RawActivity {
    /// A result with no current activity for `user_key`.
    pub fn idle(user_key: u64) -> Self {
        Self {
            record_id: 0,
            user: UpstreamUser {
                id: user_key as i64,
                ..UpstreamUser::default()
            },
            activity: None,
        }
    }

    /// Identifier of the current activity, if any.
    pub fn activity_id(&self) -> Option<&str> {
        self.activity.as_ref().map(|a| a.id.as_str())
    }
}
