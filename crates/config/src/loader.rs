//! Configuration loader

use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

use crate::types::AnclaConfig;

/// Environment variable overriding `api.base_url`
pub const API_URL_ENV: &str = "ANCLA_API_URL";

/// Environment variable pointing at a config file
pub const CONFIG_PATH_ENV: &str = "ANCLA_CONFIG";

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("config file not found: {0}")]
    NotFound(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// Validation error
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration loader
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: AnclaConfig,

    /// Path the configuration came from, if any
    config_path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create loader with default configuration
    pub fn new() -> Self {
        Self {
            config: AnclaConfig::default(),
            config_path: None,
        }
    }

    /// Load configuration from file
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: AnclaConfig = toml::from_str(&content)?;

        Self::validate(&config)?;
        tracing::debug!(path = %path.display(), "Configuration loaded");

        Ok(Self {
            config,
            config_path: Some(path.to_path_buf()),
        })
    }

    /// Load configuration from string
    pub fn load_str(content: &str) -> Result<Self, ConfigError> {
        let config: AnclaConfig = toml::from_str(content)?;
        Self::validate(&config)?;

        Ok(Self {
            config,
            config_path: None,
        })
    }

    /// Resolve configuration the way the CLI does.
    ///
    /// Order: explicit path, then `$ANCLA_CONFIG`, then
    /// `<config dir>/ancla/config.toml` if it exists, then defaults.
    /// `$ANCLA_API_URL` overrides the base URL in every case.
    pub fn from_env_or_file(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_PATH_ENV).map(PathBuf::from);
        let mut loader = match explicit.map(Path::to_path_buf).or(env_path) {
            Some(path) => Self::load_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::load_file(path)?,
                None => Self::new(),
            },
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            loader.override_base_url(&url)?;
        }
        Ok(loader)
    }

    /// `<config dir>/ancla/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("ancla").join("config.toml"))
    }

    /// Get current configuration
    #[inline]
    pub fn get(&self) -> &AnclaConfig {
        &self.config
    }

    /// Consume the loader
    pub fn into_config(self) -> AnclaConfig {
        self.config
    }

    /// Where the configuration was read from
    pub fn path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Replace the base URL, re-validating
    pub fn override_base_url(&mut self, url: &str) -> Result<(), ConfigError> {
        let mut next = self.config.clone();
        next.api.base_url = url.trim().to_string();
        Self::validate(&next)?;
        tracing::debug!(base_url = %next.api.base_url, "API base URL overridden");
        self.config = next;
        Ok(())
    }

    /// Validate configuration
    pub fn validate(config: &AnclaConfig) -> Result<(), ConfigError> {
        let url = Url::parse(&config.api.base_url).map_err(|e| {
            ConfigError::Validation(format!("api.base_url '{}': {}", config.api.base_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "api.base_url must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if config.api.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be positive".to_string(),
            ));
        }

        if config.api.page_size == 0 || config.api.page_size > 100 {
            return Err(ConfigError::Validation(format!(
                "api.page_size must be between 1 and 100, got {}",
                config.api.page_size
            )));
        }

        if config.logging.level.trim().is_empty() {
            return Err(ConfigError::Validation(
                "logging.level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let loader = ConfigLoader::new();
        let config = loader.get();

        assert_eq!(config.api.base_url, "http://localhost:5000");
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.cache_ttl_secs, 300);
        assert_eq!(config.logging.level, "warn");
        assert!(ConfigLoader::validate(config).is_ok());
    }

    #[test]
    fn test_load_string() {
        let config_str = r#"
[api]
base_url = "https://prestamos.example.gt"
cache_ttl_secs = 60

[logging]
level = "ancla_client=debug"
"#;

        let loader = ConfigLoader::load_str(config_str).unwrap();
        let config = loader.get();

        assert_eq!(config.api.base_url, "https://prestamos.example.gt");
        assert_eq!(config.api.cache_ttl_secs, 60);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.api.page_size, 20);
        assert!(config.session.credentials_path.is_none());
        assert!(loader.path().is_none());
    }

    #[test]
    fn test_validation_bad_url() {
        let result = ConfigLoader::load_str("[api]\nbase_url = \"not a url\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));

        let result = ConfigLoader::load_str("[api]\nbase_url = \"ftp://host/api\"\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_validation_zero_timeout() {
        let result = ConfigLoader::load_str("[api]\ntimeout_secs = 0\n");
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_parse_error() {
        let result = ConfigLoader::load_str("[api\nbase_url = ");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[session]\ncredentials_path = \"/tmp/ancla-test/creds.json\"\n"
        )
        .unwrap();

        let loader = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(loader.path(), Some(file.path()));
        assert_eq!(
            loader.get().session.resolved_credentials_path(),
            Some(PathBuf::from("/tmp/ancla-test/creds.json"))
        );
    }

    #[test]
    fn test_missing_file() {
        let result = ConfigLoader::load_file("/definitely/not/here/ancla.toml");
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_override_base_url() {
        let mut loader = ConfigLoader::new();
        loader.override_base_url(" http://10.0.0.5:8000 ").unwrap();
        assert_eq!(loader.get().api.base_url, "http://10.0.0.5:8000");

        assert!(loader.override_base_url("::nope").is_err());
        assert_eq!(loader.get().api.base_url, "http://10.0.0.5:8000");
    }
}
