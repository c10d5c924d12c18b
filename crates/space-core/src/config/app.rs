//! Listener and CORS settings.

use serde::{Deserialize, Serialize};

/// Where the HTTP listener binds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

impl ServerConfig {
    /// `host:port` for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            cors: CorsConfig::default(),
        }
    }
}

/// Browser access rules. A `"*"` entry in origins or headers allows any.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
    pub allowed_methods: Vec<String>,
    pub allowed_headers: Vec<String>,
    /// How long browsers may reuse a preflight answer.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        let any = vec!["*".to_string()];
        Self {
            allowed_origins: any.clone(),
            allowed_methods: vec!["GET".to_string(), "OPTIONS".to_string()],
            allowed_headers: any,
            max_age_seconds: 3600,
        }
    }
}
