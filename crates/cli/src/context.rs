//! Shared command context: configuration, logging, session and output

use ancla_client::{ApiClient, ClientError, CredentialStore, FileCredentialStore, MemoryCredentialStore, SessionContext};
use ancla_config::{AnclaConfig, ConfigLoader};
use ancla_core::{AuthState, GuardDecision};
use ancla_reports::{ExportFormat, ReportData};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over the configured level.
pub fn init_logging(config: Option<&AnclaConfig>) {
    let default_level = config.map(|c| c.logging.level.as_str()).unwrap_or("warn");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub struct AppContext {
    pub config: AnclaConfig,
    pub api: ApiClient,
    pub format: ExportFormat,
}

impl AppContext {
    pub fn open(config_path: Option<&Path>, api_url: Option<&str>, format: ExportFormat) -> Result<Self> {
        let mut loader =
            ConfigLoader::from_env_or_file(config_path).context("Failed to load configuration")?;
        if let Some(url) = api_url {
            loader.override_base_url(url).context("Invalid --api-url")?;
        }
        let config = loader.into_config();
        init_logging(Some(&config));

        let store: Arc<dyn CredentialStore> = match config.session.resolved_credentials_path() {
            Some(path) => Arc::new(FileCredentialStore::new(path)),
            None => {
                tracing::warn!("No data directory; the session will not outlive this command");
                Arc::new(MemoryCredentialStore::new())
            }
        };
        let session = Arc::new(SessionContext::new(store));
        let api = ApiClient::from_config(&config, session).context("Failed to build API client")?;

        Ok(Self {
            config,
            api,
            format,
        })
    }

    /// Resolve the stored session and require a signed-in user.
    pub async fn require_session(&self) -> Result<AuthState> {
        let state = self.api.auth().bootstrap().await;
        if !state.is_authenticated() {
            bail!("Not signed in. Run `ancla login` first.");
        }
        Ok(state)
    }

    /// Bootstrap, then run the route guard for the screen this command stands for.
    pub async fn require(&self, route: &str) -> Result<()> {
        let state = self.api.auth().bootstrap().await;
        let decision = self.api.session().guard(route);
        tracing::debug!(%state, route, %decision, "route guard");
        match decision {
            GuardDecision::Allow => Ok(()),
            GuardDecision::RedirectToLogin { .. } => {
                bail!("Not signed in. Run `ancla login` first.")
            }
            GuardDecision::RedirectToHome { route: home } => bail!(
                "{} cannot open {}; your home is {}",
                state
                    .role()
                    .map(|r| r.label().to_string())
                    .unwrap_or_default(),
                route,
                home
            ),
            GuardDecision::NotFound => bail!("Unknown route {}", route),
            GuardDecision::Wait => bail!("Session is still loading"),
        }
    }

    pub fn print(&self, report: &dyn ReportData) {
        print!("{}", self.format.render(report));
    }
}

/// Show field errors under the message, the way a form would.
pub fn describe(err: &ClientError) -> String {
    let api = err.to_api_error();
    let mut text = api.message.clone();
    if let Some(fields) = &api.field_errors {
        for (field, messages) in fields {
            for message in messages {
                text.push_str(&format!("\n  {}: {}", field, message));
            }
        }
    }
    text
}

/// `?` for client calls: keeps the normalized message and field errors.
pub trait ClientResultExt<T> {
    fn or_describe(self) -> Result<T>;
}

impl<T> ClientResultExt<T> for Result<T, ClientError> {
    fn or_describe(self) -> Result<T> {
        self.map_err(|e| anyhow::anyhow!(describe(&e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ancla_client::ApiError;

    #[test]
    fn test_describe_lists_field_errors() {
        let mut fields = ancla_core::FieldErrors::new();
        fields.insert("dpi".to_string(), vec!["DPI must have 13 digits".to_string()]);
        let err = ClientError::Api(ApiError {
            message: "Validation failed".to_string(),
            field_errors: Some(fields),
            status_code: 422,
        });
        assert_eq!(describe(&err), "Validation failed\n  dpi: DPI must have 13 digits");
    }
}
