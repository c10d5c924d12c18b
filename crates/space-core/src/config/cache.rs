//! Where freshness records are kept.

use serde::{Deserialize, Serialize};

/// Backend selection plus per-backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// `"memory"` (single process) or `"redis"` (shared, survives restarts).
    pub provider: String,
    pub redis: RedisCacheConfig,
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: "memory".to_string(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RedisCacheConfig {
    pub url: String,
    /// Namespace prepended to every key.
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://localhost:6379".to_string(),
            key_prefix: "space:".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCacheConfig {
    /// Tracked users to reserve room for up front. Not a limit: records
    /// are never evicted.
    pub initial_capacity: usize,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
        }
    }
}
