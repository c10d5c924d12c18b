//! Redis-backed records, shared across instances and restarts.

use async_trait::async_trait;
use redis::AsyncCommands;

use space_core::error::{AppError, ErrorKind};
use space_core::result::AppResult;
use space_core::traits::cache::CacheProvider;

use super::client::RedisClient;

/// Backend storing each value under `<prefix><key>` with a plain `SET`,
/// so records carry no expiry.
#[derive(Debug, Clone)]
pub struct RedisCacheProvider {
    client: RedisClient,
}

impl RedisCacheProvider {
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }
}

fn redis_failure(e: redis::RedisError) -> AppError {
    AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
}

#[async_trait]
impl CacheProvider for RedisCacheProvider {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let mut conn = self.client.conn_mut();
        let value: Option<String> = conn
            .get(self.client.prefixed_key(key))
            .await
            .map_err(redis_failure)?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let mut conn = self.client.conn_mut();
        let _: () = conn
            .set(self.client.prefixed_key(key), value)
            .await
            .map_err(redis_failure)?;
        Ok(())
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let reply: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(redis_failure)?;
        Ok(reply == "PONG")
    }
}
