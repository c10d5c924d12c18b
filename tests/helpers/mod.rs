//! Shared test helpers for integration tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::DateTime;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use space_cache::CacheManager;
use space_core::config::AppConfig;
use space_core::result::AppResult;
use space_core::traits::clock::ManualClock;
use space_entity::status::{Activity, RawActivity, SourceKind, UpstreamUser};
use space_service::status::source::{CodetimeSource, build_http_client};
use space_service::{NowPlayingSource, SourceRegistry};

/// Provider double whose answer is set by the test.
#[derive(Debug)]
pub struct StubSource {
    kind: SourceKind,
    answer: Mutex<Option<AppResult<RawActivity>>>,
    calls: AtomicUsize,
}

impl StubSource {
    fn new(kind: SourceKind) -> Self {
        Self {
            kind,
            answer: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    /// Report `song` as currently playing.
    pub fn play(&self, song: &str) {
        self.answer(Ok(RawActivity {
            record_id: 3301,
            user: UpstreamUser {
                id: 42,
                avatar: "https://img.example/avatar.jpg".to_string(),
                name: "listener".to_string(),
            },
            activity: Some(Activity {
                title: format!("Title of {song}"),
                id: song.to_string(),
                ..Activity::default()
            }),
        }));
    }

    /// Set the answer returned by every fetch.
    pub fn answer(&self, answer: AppResult<RawActivity>) {
        *self.answer.lock().unwrap() = Some(answer);
    }

    /// Number of fetches so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl NowPlayingSource for StubSource {
    fn kind(&self) -> SourceKind {
        self.kind
    }

    async fn fetch(&self, user_key: u64) -> AppResult<RawActivity> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(RawActivity::idle(user_key)))
    }
}

/// Response captured from the router.
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Stub behind `s=ncm`
    pub ncm: Arc<StubSource>,
    /// Stub behind `s=codetime`
    pub codetime: Arc<StubSource>,
    /// Clock driving freshness decisions
    pub clock: Arc<ManualClock>,
}

impl TestApp {
    /// Create a new test application with in-memory cache and stub sources.
    pub async fn new() -> Self {
        let config = AppConfig::default();
        let cache = Arc::new(
            CacheManager::new(&config.cache)
                .await
                .expect("Failed to init cache"),
        );

        let ncm = Arc::new(StubSource::new(SourceKind::Ncm));
        let codetime = Arc::new(StubSource::new(SourceKind::Codetime));
        let sources = SourceRegistry::new()
            .with(ncm.clone())
            .with(codetime.clone());

        let clock = Arc::new(ManualClock::new(
            DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
        ));
        let client = build_http_client(&config.status).expect("Failed to build client");
        let passthrough = Arc::new(CodetimeSource::new(client, config.status.codetime.clone()));

        let state = space_api::AppState::new(
            config,
            cache,
            sources,
            clock.clone(),
            passthrough,
            CancellationToken::new(),
        );

        Self {
            router: space_api::build_app(state),
            ncm,
            codetime,
            clock,
        }
    }

    /// Send a GET and return the raw response.
    pub async fn get_raw(&self, uri: &str) -> axum::response::Response {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send a GET and parse the JSON body.
    pub async fn get(&self, uri: &str) -> TestResponse {
        let response = self.get_raw(uri).await;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
