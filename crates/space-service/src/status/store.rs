//! Activity freshness store.

use std::sync::Arc;

use async_trait::async_trait;

use space_cache::CacheManager;
use space_cache::keys;
use space_core::error::AppError;
use space_core::result::AppResult;
use space_entity::activity::{ActivityPatch, ActivityRecord};

/// Persistence of last-seen activity per tracked user key.
#[async_trait]
pub trait ActivityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Look up the record for `user_key`.
    async fn find(&self, user_key: &str) -> AppResult<Option<ActivityRecord>>;

    /// Store a new record, replacing any existing one.
    async fn insert(&self, record: &ActivityRecord) -> AppResult<()>;

    /// Apply a partial update to an existing record.
    async fn update(&self, user_key: &str, patch: ActivityPatch) -> AppResult<ActivityRecord>;
}

/// [`ActivityStore`] backed by the application cache.
///
/// Records are written without expiry; one only goes away by being
/// overwritten.
#[derive(Debug, Clone)]
pub struct CacheActivityStore {
    /// Cache holding serialized records.
    cache: Arc<CacheManager>,
}

impl CacheActivityStore {
    /// Creates a new store.
    pub fn new(cache: Arc<CacheManager>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl ActivityStore for CacheActivityStore {
    async fn find(&self, user_key: &str) -> AppResult<Option<ActivityRecord>> {
        self.cache
            .get_json(&keys::activity_record(user_key))
            .await
            .map_err(|e| AppError::cache(format!("Failed to read activity record: {e}")))
    }

    async fn insert(&self, record: &ActivityRecord) -> AppResult<()> {
        self.cache
            .set_json(&keys::activity_record(&record.user_key), record)
            .await
            .map_err(|e| AppError::cache(format!("Failed to write activity record: {e}")))
    }

    async fn update(&self, user_key: &str, patch: ActivityPatch) -> AppResult<ActivityRecord> {
        let record = match self.find(user_key).await? {
            Some(mut record) => {
                record.apply(patch);
                record
            }
            None => match patch {
                ActivityPatch {
                    activity_id: Some(activity_id),
                    last_seen_at: Some(last_seen_at),
                } => ActivityRecord::new(user_key, activity_id, last_seen_at),
                _ => {
                    return Err(AppError::not_found(format!(
                        "No activity record for '{user_key}'"
                    )));
                }
            },
        };

        self.insert(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use space_core::config::cache::MemoryCacheConfig;
    use space_core::error::ErrorKind;

    fn store() -> CacheActivityStore {
        let provider = space_cache::memory::MemoryCacheProvider::new(&MemoryCacheConfig::default());
        let cache = CacheManager::from_provider(Arc::new(provider));
        CacheActivityStore::new(Arc::new(cache))
    }

    #[tokio::test]
    async fn test_insert_then_find() {
        let store = store();
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert!(store.find("ncm:42").await.unwrap().is_none());
        store.insert(&ActivityRecord::new("ncm:42", "song-A", t0)).await.unwrap();

        let record = store.find("ncm:42").await.unwrap().unwrap();
        assert_eq!(record.activity_id, "song-A");
        assert_eq!(record.last_seen_at, t0);
        assert!(store.find("codetime:42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_overwrites_in_place() {
        let store = store();
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let t1 = DateTime::from_timestamp(1_700_000_400, 0).unwrap();
        store.insert(&ActivityRecord::new("ncm:42", "song-A", t0)).await.unwrap();

        let updated = store
            .update("ncm:42", ActivityPatch::observed("song-B", t1))
            .await
            .unwrap();

        assert_eq!(updated.activity_id, "song-B");
        assert_eq!(store.find("ncm:42").await.unwrap().unwrap().last_seen_at, t1);
    }

    #[tokio::test]
    async fn test_partial_update_of_missing_record_fails() {
        let store = store();
        let patch = ActivityPatch {
            activity_id: Some("song-A".to_string()),
            last_seen_at: None,
        };

        let err = store.update("ncm:7", patch).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_stale_record_outlives_wall_clock_time() {
        let store = Arc::new(store());
        let classifier = crate::status::classifier::InactivityClassifier::new(
            store.clone(),
            chrono::Duration::minutes(5),
        );
        let t0 = DateTime::from_timestamp(1_700_000_000, 0).unwrap();

        assert!(!classifier.classify("ncm:42", "song-A", t0).await.is_inactive());
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        let later = t0 + chrono::Duration::seconds(400);
        assert!(classifier.classify("ncm:42", "song-A", later).await.is_inactive());
        assert_eq!(
            store.find("ncm:42").await.unwrap(),
            Some(ActivityRecord::new("ncm:42", "song-A", t0))
        );
    }
}
