//! Status aggregation: fetch, classify, shape.

use std::sync::Arc;

use tracing::{debug, instrument};

use space_core::error::AppError;
use space_core::result::AppResult;
use space_core::traits::clock::Clock;
use space_entity::status::{NowPlayingSnapshot, SourceKind};

use super::classifier::InactivityClassifier;
use super::source::SourceRegistry;

/// A validated status request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusRequest {
    /// Provider to ask.
    pub source: SourceKind,
    /// Provider user id.
    pub user_key: u64,
}

impl StatusRequest {
    /// Creates a request from already-typed parts.
    pub fn new(source: SourceKind, user_key: u64) -> Self {
        Self { source, user_key }
    }

    /// Parse raw query values.
    pub fn parse(source: &str, user_key: &str) -> AppResult<Self> {
        let source = source.parse::<SourceKind>()?;
        let user_key = user_key.trim().parse::<u64>().map_err(|_| {
            AppError::validation(format!(
                "Invalid query: '{user_key}' is not a numeric user id"
            ))
        })?;
        Ok(Self { source, user_key })
    }

    /// Key under which freshness is tracked.
    pub fn tracked_key(&self) -> String {
        format!("{}:{}", self.source, self.user_key)
    }
}

/// Orchestrates one status poll.
#[derive(Debug, Clone)]
pub struct StatusAggregator {
    /// Provider adapters.
    sources: SourceRegistry,
    /// Freshness classifier.
    classifier: InactivityClassifier,
    /// Time source for observations.
    clock: Arc<dyn Clock>,
}

impl StatusAggregator {
    /// Creates a new aggregator.
    pub fn new(
        sources: SourceRegistry,
        classifier: InactivityClassifier,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            sources,
            classifier,
            clock,
        }
    }

    /// Fetch, classify, and shape the current status for `request`.
    #[instrument(skip(self, request), fields(source = %request.source, user_key = request.user_key))]
    pub async fn get_status(&self, request: &StatusRequest) -> AppResult<NowPlayingSnapshot> {
        let source = self.sources.get(request.source)?;
        let raw = source.fetch(request.user_key).await?;
        let now = self.clock.now();

        let active = match raw.activity_id() {
            Some(activity_id) => {
                let classification = self
                    .classifier
                    .classify(&request.tracked_key(), activity_id, now)
                    .await;
                !classification.is_inactive()
            }
            None => {
                debug!("Upstream reports no current activity");
                false
            }
        };

        Ok(NowPlayingSnapshot::from_raw(raw, active, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Duration};
    use space_core::error::ErrorKind;
    use space_core::traits::clock::ManualClock;
    use space_entity::activity::{ActivityPatch, ActivityRecord};
    use space_entity::status::{Activity, RawActivity, UpstreamUser};

    use crate::status::source::NowPlayingSource;
    use crate::status::store::ActivityStore;

    #[derive(Debug, Default)]
    struct Scripted {
        current: Mutex<Option<AppResult<RawActivity>>>,
    }

    impl Scripted {
        fn playing(&self, song: &str) {
            *self.current.lock().unwrap() = Some(Ok(RawActivity {
                record_id: 1,
                user: UpstreamUser {
                    id: 42,
                    avatar: String::new(),
                    name: "listener".to_string(),
                },
                activity: Some(Activity {
                    id: song.to_string(),
                    title: song.to_string(),
                    ..Activity::default()
                }),
            }));
        }

        fn set(&self, result: AppResult<RawActivity>) {
            *self.current.lock().unwrap() = Some(result);
        }
    }

    #[async_trait]
    impl NowPlayingSource for Scripted {
        fn kind(&self) -> SourceKind {
            SourceKind::Ncm
        }

        async fn fetch(&self, user_key: u64) -> AppResult<RawActivity> {
            self.current
                .lock()
                .unwrap()
                .clone()
                .unwrap_or_else(|| Ok(RawActivity::idle(user_key)))
        }
    }

    #[derive(Debug, Default)]
    struct MapStore(Mutex<HashMap<String, ActivityRecord>>);

    #[async_trait]
    impl ActivityStore for MapStore {
        async fn find(&self, user_key: &str) -> AppResult<Option<ActivityRecord>> {
            Ok(self.0.lock().unwrap().get(user_key).cloned())
        }

        async fn insert(&self, record: &ActivityRecord) -> AppResult<()> {
            self.0
                .lock()
                .unwrap()
                .insert(record.user_key.clone(), record.clone());
            Ok(())
        }

        async fn update(&self, user_key: &str, patch: ActivityPatch) -> AppResult<ActivityRecord> {
            let mut records = self.0.lock().unwrap();
            let record = records
                .get_mut(user_key)
                .ok_or_else(|| AppError::not_found("missing"))?;
            record.apply(patch);
            Ok(record.clone())
        }
    }

    struct Fixture {
        source: Arc<Scripted>,
        store: Arc<MapStore>,
        clock: Arc<ManualClock>,
        aggregator: StatusAggregator,
    }

    fn fixture() -> Fixture {
        let source = Arc::new(Scripted::default());
        let store = Arc::new(MapStore::default());
        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let aggregator = StatusAggregator::new(
            SourceRegistry::new().with(source.clone()),
            InactivityClassifier::new(store.clone(), Duration::minutes(5)),
            clock.clone(),
        );
        Fixture {
            source,
            store,
            clock,
            aggregator,
        }
    }

    fn ncm(user_key: u64) -> StatusRequest {
        StatusRequest::new(SourceKind::Ncm, user_key)
    }

    #[test]
    fn test_parse_request() {
        let request = StatusRequest::parse("ncm", "42").unwrap();
        assert_eq!(request, ncm(42));
        assert_eq!(request.tracked_key(), "ncm:42");

        let err = StatusRequest::parse("ncm", "abc").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.contains("Invalid query"));

        let err = StatusRequest::parse("spotify", "42").unwrap_err();
        assert!(err.message.contains("Invalid source"));
    }

    #[tokio::test]
    async fn test_listening_scenario() {
        let f = fixture();
        f.source.playing("song-A");

        let first = f.aggregator.get_status(&ncm(42)).await.unwrap();
        assert!(first.is_active());
        assert_eq!(first.activity.as_ref().unwrap().id, "song-A");
        assert_eq!(first.observed_at, f.clock.now());

        f.clock.advance(Duration::seconds(100));
        let second = f.aggregator.get_status(&ncm(42)).await.unwrap();
        assert!(second.is_active());
        let record = f.store.find("ncm:42").await.unwrap().unwrap();
        assert_eq!(record.last_seen_at, first.observed_at);

        f.clock.advance(Duration::seconds(220));
        let third = f.aggregator.get_status(&ncm(42)).await.unwrap();
        assert!(!third.is_active());
        assert!(third.activity.is_none());

        f.clock.advance(Duration::seconds(80));
        f.source.playing("song-B");
        let fourth = f.aggregator.get_status(&ncm(42)).await.unwrap();
        assert!(fourth.is_active());
        assert_eq!(fourth.activity.unwrap().id, "song-B");
        let record = f.store.find("ncm:42").await.unwrap().unwrap();
        assert_eq!(record.last_seen_at, fourth.observed_at);
    }

    #[tokio::test]
    async fn test_no_activity_skips_classifier() {
        let f = fixture();

        let snapshot = f.aggregator.get_status(&ncm(42)).await.unwrap();

        assert!(!snapshot.is_active());
        assert!(snapshot.activity.is_none());
        assert!(f.store.find("ncm:42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_upstream_error_propagates() {
        let f = fixture();
        f.source.set(Err(AppError::upstream("down")));

        let err = f.aggregator.get_status(&ncm(42)).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Upstream);
        assert!(f.store.find("ncm:42").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unregistered_source_is_rejected() {
        let f = fixture();
        let err = f
            .aggregator
            .get_status(&StatusRequest::new(SourceKind::Codetime, 42))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
