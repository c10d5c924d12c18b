//! Process-local backend on top of moka.

use async_trait::async_trait;
use moka::future::Cache;

use space_core::config::cache::MemoryCacheConfig;
use space_core::result::AppResult;
use space_core::traits::cache::CacheProvider;

/// Freshness records kept in this process only; lost on restart.
///
/// Built without capacity bound or expiry so that a record is only ever
/// replaced, never dropped.
#[derive(Debug, Clone)]
pub struct MemoryCacheProvider {
    slots: Cache<String, String>,
}

impl MemoryCacheProvider {
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let slots = Cache::builder()
            .initial_capacity(config.initial_capacity)
            .build();
        Self { slots }
    }
}

#[async_trait]
impl CacheProvider for MemoryCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        Ok(self.slots.get(key).await)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.slots.insert(key.to_owned(), value.to_owned()).await;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
