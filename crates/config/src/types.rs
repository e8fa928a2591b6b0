//! Configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnclaConfig {
    /// Backend API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Stored session settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Log output
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend API settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Backend origin; request paths carry the `/api` prefix
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Freshness window for cached GET responses (0 disables caching)
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,

    /// Rows requested per list page
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_cache_ttl() -> u64 {
    300
}

fn default_page_size() -> u32 {
    20
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
            page_size: default_page_size(),
        }
    }
}

/// Stored session settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Where tokens are kept between runs; defaults under the user data dir
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
}

impl SessionConfig {
    /// Configured path, or `<data dir>/ancla/credentials.json`
    pub fn resolved_credentials_path(&self) -> Option<PathBuf> {
        self.credentials_path.clone().or_else(|| {
            dirs::data_local_dir().map(|dir| dir.join("ancla").join("credentials.json"))
        })
    }
}

/// Log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
