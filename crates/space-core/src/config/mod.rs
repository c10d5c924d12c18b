//! Configuration sections and the layered loader.
//!
//! Sources, later ones winning: `config/default.toml`, `config/<env>.toml`,
//! then `SPACE__SECTION__KEY` environment variables.

pub mod app;
pub mod cache;
pub mod logging;
pub mod status;

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use self::app::ServerConfig;
use self::cache::CacheConfig;
use self::logging::LoggingConfig;
use self::status::StatusConfig;

pub use self::app::CorsConfig;

use crate::result::AppResult;

/// Every section defaults, so an empty source set still boots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Backend of the freshness store.
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub status: StatusConfig,
}

impl AppConfig {
    /// Merge all sources for environment `env`, e.g. `development`.
    pub fn load(env: &str) -> AppResult<Self> {
        let merged = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                Environment::with_prefix("SPACE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = merged.try_deserialize()?;
        config.status.validate()?;
        Ok(config)
    }
}
