//! Ancla Config - Configuration management
//!
//! TOML file with `[api]`, `[session]` and `[logging]` sections, every
//! field defaulted, plus environment overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod loader;
pub mod types;

pub use loader::{ConfigError, ConfigLoader, API_URL_ENV, CONFIG_PATH_ENV};
pub use types::{AnclaConfig, ApiConfig, LoggingConfig, SessionConfig};
