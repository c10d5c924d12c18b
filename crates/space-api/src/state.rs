//! Shared application state passed to all handlers via Axum's `State` extractor.

use std::sync::Arc;

use space_cache::CacheManager;
use space_core::config::AppConfig;
use space_core::traits::clock::Clock;
use space_realtime::StreamController;
use tokio_util::sync::CancellationToken;
use space_service::status::source::CodetimeSource;
use space_service::{
    CacheActivityStore, InactivityClassifier, SourceRegistry, StatusAggregator,
};

/// Central application state shared across all request handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Cache backing the freshness store.
    pub cache: Arc<CacheManager>,
    /// One-shot status polls.
    pub aggregator: Arc<StatusAggregator>,
    /// Status streams.
    pub streams: Arc<StreamController>,
    /// Raw codetime passthrough.
    pub codetime: Arc<CodetimeSource>,
}

impl AppState {
    /// Wire the status pipeline on top of `cache` and `sources`.
    ///
    /// Cancelling `shutdown` ends every open status stream.
    pub fn new(
        config: AppConfig,
        cache: Arc<CacheManager>,
        sources: SourceRegistry,
        clock: Arc<dyn Clock>,
        codetime: Arc<CodetimeSource>,
        shutdown: CancellationToken,
    ) -> Self {
        let store = CacheActivityStore::new(Arc::clone(&cache));
        let classifier =
            InactivityClassifier::new(Arc::new(store), config.status.inactivity_window());
        let aggregator = Arc::new(StatusAggregator::new(sources, classifier, clock));
        let streams = Arc::new(
            StreamController::from_config(Arc::clone(&aggregator), &config.status)
                .with_shutdown(shutdown),
        );

        Self {
            config: Arc::new(config),
            cache,
            aggregator,
            streams,
            codetime,
        }
    }
}
