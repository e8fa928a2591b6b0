use crate::error::ClientResult;
use crate::http::ApiClient;
use ancla_core::access::AuthState;
use ancla_core::{AuthTokens, LoginCredentials, RegisterData, User};
use serde_json::{json, Value};
use tracing::{info, warn};

const BASE: &str = "/api/auth";

pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    pub(crate) fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Sign in and store the issued tokens in the session.
    pub async fn login(&self, credentials: &LoginCredentials) -> ClientResult<User> {
        let tokens: AuthTokens = self.api.post(&format!("{}/login", BASE), credentials).await?;
        self.api.cache().clear();
        self.api.session().sign_in(&tokens)?;
        info!(email = %tokens.user.email, role = %tokens.user.role(), "Signed in");
        Ok(tokens.user)
    }

    pub async fn register(&self, data: &RegisterData) -> ClientResult<User> {
        let tokens: AuthTokens = self.api.post(&format!("{}/register", BASE), data).await?;
        self.api.cache().clear();
        self.api.session().sign_in(&tokens)?;
        Ok(tokens.user)
    }

    /// Tell the backend, then forget the session locally even if that call failed.
    pub async fn logout(&self) -> ClientResult<()> {
        if self.api.session().access_token().is_some() {
            let result: ClientResult<Value> = self.api.post_empty(&format!("{}/logout", BASE)).await;
            if let Err(e) = result {
                warn!(error = %e, "Backend logout failed, clearing local session anyway");
            }
        }
        self.api.cache().clear();
        self.api.session().sign_out()
    }

    /// Current user; also refreshes the session's copy.
    pub async fn me(&self) -> ClientResult<User> {
        let user: User = self.api.get(&format!("{}/me", BASE)).await?;
        self.api.session().set_user(user.clone());
        Ok(user)
    }

    pub async fn refresh(&self) -> ClientResult<()> {
        self.api.refresh().await
    }

    pub async fn forgot_password(&self, email: &str) -> ClientResult<()> {
        let _: Value = self
            .api
            .post(&format!("{}/forgot-password", BASE), &json!({ "email": email }))
            .await?;
        Ok(())
    }

    pub async fn reset_password(&self, token: &str, password: &str) -> ClientResult<()> {
        let _: Value = self
            .api
            .post(
                &format!("{}/reset-password", BASE),
                &json!({ "token": token, "password": password }),
            )
            .await?;
        Ok(())
    }

    /// Resolve the session from stored credentials; the `me` call runs once per session.
    pub async fn bootstrap(&self) -> AuthState {
        let api = self.api;
        self.api
            .session()
            .bootstrap(|| async move { api.get::<User>(&format!("{}/me", BASE)).await })
            .await
    }
}
