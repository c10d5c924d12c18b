//! Inactivity classification.
//!
//! A user is considered inactive once the same activity id has been
//! observed for at least the inactivity window. The window is measured
//! from when the id was *first* seen: repeat observations do not refresh
//! the record, so a song on endless repeat eventually reads as idle.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use space_entity::activity::{ActivityPatch, ActivityRecord};

use super::store::ActivityStore;

/// Outcome of one classification, named after the transition taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// No record existed; one was created.
    FirstSeen,
    /// Same id, still inside the window. Store untouched.
    Confirmed,
    /// A different id was observed; the record was reset.
    Changed,
    /// Same id for at least the window. Store untouched.
    Stale,
}

impl Classification {
    /// Whether the user should be reported as inactive.
    pub fn is_inactive(&self) -> bool {
        matches!(self, Self::Stale)
    }

    /// Short name for logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstSeen => "first_seen",
            Self::Confirmed => "confirmed",
            Self::Changed => "changed",
            Self::Stale => "stale",
        }
    }
}

/// Decides active/inactive per tracked user and keeps the store current.
#[derive(Debug, Clone)]
pub struct InactivityClassifier {
    /// Freshness records.
    store: Arc<dyn ActivityStore>,
    /// Observation span after which an unchanged activity is stale.
    window: Duration,
}

impl InactivityClassifier {
    /// Creates a new classifier.
    pub fn new(store: Arc<dyn ActivityStore>, window: Duration) -> Self {
        Self { store, window }
    }

    /// Classify the observation of `activity_id` for `user_key` at `now`.
    ///
    /// Store failures never fail the call: an unreadable record is treated
    /// as first seen and write errors are only logged.
    pub async fn classify(
        &self,
        user_key: &str,
        activity_id: &str,
        now: DateTime<Utc>,
    ) -> Classification {
        let existing = match self.store.find(user_key).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(user_key, error = %e, "Activity record unreadable, treating as first seen");
                None
            }
        };

        let classification = match existing {
            None => {
                let record = ActivityRecord::new(user_key, activity_id, now);
                if let Err(e) = self.store.insert(&record).await {
                    warn!(user_key, error = %e, "Failed to insert activity record");
                }
                Classification::FirstSeen
            }
            Some(record) if record.activity_id != activity_id => {
                let patch = ActivityPatch::observed(activity_id, now);
                if let Err(e) = self.store.update(user_key, patch).await {
                    warn!(user_key, error = %e, "Failed to update activity record");
                }
                Classification::Changed
            }
            Some(record) if now - record.last_seen_at >= self.window => Classification::Stale,
            Some(_) => Classification::Confirmed,
        };

        debug!(
            user_key,
            activity_id,
            classification = classification.as_str(),
            "Classified activity"
        );

        classification
    }
}
