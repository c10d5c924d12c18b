//! Per-connection change tracking.

use uuid::Uuid;

use space_entity::status::NowPlayingSnapshot;

/// Unique stream identifier
pub type StreamId = Uuid;

/// What the client of one stream has last been sent.
#[derive(Debug, Clone)]
pub struct StreamSession {
    /// Stream identifier, used in logs.
    pub id: StreamId,
    /// Activity id of the last emitted snapshot.
    pub last_activity_id: Option<String>,
    /// Active flag of the last emitted snapshot; `None` before the first frame.
    pub last_active: Option<bool>,
}

impl StreamSession {
    /// A session that has emitted nothing yet.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            last_activity_id: None,
            last_active: None,
        }
    }

    /// Record `snapshot` if it differs from the last emitted one.
    ///
    /// Returns `true` when the snapshot should be sent. The first snapshot
    /// is always sent.
    pub fn observe(&mut self, snapshot: &NowPlayingSnapshot) -> bool {
        let active = snapshot.is_active();
        let activity_id = snapshot.observed_activity_id.as_deref();

        if self.last_active == Some(active) && self.last_activity_id.as_deref() == activity_id {
            return false;
        }

        self.last_active = Some(active);
        self.last_activity_id = activity_id.map(str::to_string);
        true
    }
}

impl Default for StreamSession {
    fn default() -> Self {
        Self::new()
    }
}
