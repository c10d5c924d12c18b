//! Upstream now-playing providers.
//!
//! Each provider fetches "what is this user doing" and normalizes its
//! payload into a [`RawActivity`]. Adapters never retry; the stream poll
//! loop is the retry mechanism.

pub mod codetime;
pub mod eapi;
pub mod ncm;

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use space_core::config::status::StatusConfig;
use space_core::error::{AppError, ErrorKind};
use space_core::result::AppResult;
use space_entity::status::{RawActivity, SourceKind};

pub use codetime::CodetimeSource;
pub use ncm::NcmSource;

/// A provider of current user activity.
#[async_trait]
pub trait NowPlayingSource: Send + Sync + std::fmt::Debug + 'static {
    /// Which provider this is.
    fn kind(&self) -> SourceKind;

    /// Fetch the current activity of `user_key`.
    ///
    /// A provider answer without a current activity is `Ok` with
    /// `activity: None`; transport or payload failures are
    /// `ErrorKind::Upstream`.
    async fn fetch(&self, user_key: u64) -> AppResult<RawActivity>;
}

/// Registered providers keyed by kind.
#[derive(Debug, Clone, Default)]
pub struct SourceRegistry {
    sources: HashMap<SourceKind, Arc<dyn NowPlayingSource>>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider, replacing any previous one of the same kind.
    pub fn register(&mut self, source: Arc<dyn NowPlayingSource>) {
        self.sources.insert(source.kind(), source);
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, source: Arc<dyn NowPlayingSource>) -> Self {
        self.register(source);
        self
    }

    /// Look up the provider for `kind`.
    pub fn get(&self, kind: SourceKind) -> AppResult<Arc<dyn NowPlayingSource>> {
        self.sources.get(&kind).cloned().ok_or_else(|| {
            AppError::validation(format!("Invalid source: '{kind}' is not enabled"))
        })
    }

    /// Registered kinds.
    pub fn kinds(&self) -> Vec<SourceKind> {
        SourceKind::ALL
            .into_iter()
            .filter(|k| self.sources.contains_key(k))
            .collect()
    }
}

/// Build the shared upstream HTTP client.
pub fn build_http_client(config: &StatusConfig) -> AppResult<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.upstream_timeout())
        .build()
        .map_err(|e| AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e))
}

/// Build a registry with every provider wired from configuration.
pub fn registry_from_config(config: &StatusConfig, client: reqwest::Client) -> SourceRegistry {
    SourceRegistry::new()
        .with(Arc::new(NcmSource::new(client.clone(), config.ncm.clone())))
        .with(Arc::new(CodetimeSource::new(client, config.codetime.clone())))
}
