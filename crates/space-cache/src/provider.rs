//! Backend selection and typed access.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use space_core::config::cache::CacheConfig;
use space_core::error::AppError;
use space_core::result::AppResult;
use space_core::traits::cache::CacheProvider;

/// The configured cache backend.
#[derive(Debug, Clone)]
pub struct CacheManager {
    backend: Arc<dyn CacheProvider>,
}

impl CacheManager {
    /// Connect the backend named by `config.provider`.
    pub async fn new(config: &CacheConfig) -> AppResult<Self> {
        let backend: Arc<dyn CacheProvider> = match config.provider.as_str() {
            #[cfg(feature = "redis-backend")]
            "redis" => {
                let client = crate::redis::RedisClient::connect(&config.redis).await?;
                Arc::new(crate::redis::RedisCacheProvider::new(client))
            }
            #[cfg(feature = "memory")]
            "memory" => Arc::new(crate::memory::MemoryCacheProvider::new(&config.memory)),
            other => {
                return Err(AppError::configuration(format!(
                    "Unknown cache provider: '{other}'. Supported: memory, redis"
                )));
            }
        };

        info!(provider = %config.provider, "Cache backend ready");
        Ok(Self { backend })
    }

    /// Wrap an already-built backend.
    pub fn from_provider(backend: Arc<dyn CacheProvider>) -> Self {
        Self { backend }
    }

    /// Read and decode a JSON value.
    pub async fn get_json<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        self.backend
            .get(key)
            .await?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(Into::into)
    }

    /// Encode and write a JSON value.
    pub async fn set_json<T: Serialize + Sync>(&self, key: &str, value: &T) -> AppResult<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.set(key, &raw).await
    }
}

#[async_trait]
impl CacheProvider for CacheManager {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        self.backend.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        self.backend.set(key, value).await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.backend.health_check().await
    }
}
