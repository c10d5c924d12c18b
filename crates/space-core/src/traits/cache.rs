//! Key-value backend used for freshness records.

use async_trait::async_trait;

use crate::result::AppResult;

/// A string key-value backend.
///
/// Values are opaque strings; callers own their encoding. A written value
/// stays until it is overwritten: backends must neither expire nor evict it.
#[async_trait]
pub trait CacheProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Read `key`, `None` when it was never written.
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    /// Write `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> AppResult<()>;

    /// Whether the backend currently answers.
    async fn health_check(&self) -> AppResult<bool>;
}
