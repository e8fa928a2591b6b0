//! # Session Module
//!
//! The one piece of shared mutable state in the client: stored tokens, the
//! signed-in user and the observable [`AuthState`]. It is created by the
//! caller and handed to [`ApiClient`](crate::ApiClient); nothing is global.

use crate::credentials::{CredentialStore, Credentials, MemoryCredentialStore};
use crate::error::ClientResult;
use ancla_core::access::{authorize, AuthState, GuardDecision};
use ancla_core::{AuthTokens, User};
use std::future::Future;
use std::sync::{Arc, RwLock};
use tokio::sync::{watch, Mutex, OnceCell};
use tracing::{info, warn};

pub struct SessionContext {
    store: Arc<dyn CredentialStore>,
    credentials: RwLock<Option<Credentials>>,
    user: RwLock<Option<User>>,
    state: watch::Sender<AuthState>,
    /// Held while a token refresh is in flight
    refresh_lock: Mutex<()>,
    bootstrapped: OnceCell<()>,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl SessionContext {
    /// New session in the `Loading` state; call [`bootstrap`](Self::bootstrap) to resolve it.
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        let (state, _) = watch::channel(AuthState::Loading);
        Self {
            store,
            credentials: RwLock::new(None),
            user: RwLock::new(None),
            state,
            refresh_lock: Mutex::new(()),
            bootstrapped: OnceCell::new(),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryCredentialStore::new()))
    }

    pub fn state(&self) -> AuthState {
        *self.state.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Guard decision for a path under the current state
    pub fn guard(&self, path: &str) -> GuardDecision {
        authorize(self.state(), path)
    }

    pub fn user(&self) -> Option<User> {
        self.user.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.credentials
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|c| c.access_token.clone())
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.credentials
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(|c| c.refresh_token.clone())
    }

    pub(crate) fn refresh_lock(&self) -> &Mutex<()> {
        &self.refresh_lock
    }

    fn set_state(&self, next: AuthState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            info!(from = %previous, to = %next, "Session state changed");
        }
    }

    /// Resolve `Loading` once, from the stored credential.
    ///
    /// `fetch_user` is the `me` call; it runs at most once per session no
    /// matter how many callers race here. Any failure leaves the session
    /// unauthenticated.
    pub async fn bootstrap<F, Fut>(&self, fetch_user: F) -> AuthState
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<User>>,
    {
        self.bootstrapped
            .get_or_init(|| async move {
                if self.access_token().is_none() {
                    match self.store.load() {
                        Ok(Some(credentials)) => {
                            *self.credentials.write().unwrap_or_else(|e| e.into_inner()) =
                                Some(credentials);
                        }
                        Ok(None) => {
                            self.set_state(AuthState::Unauthenticated);
                            return;
                        }
                        Err(e) => {
                            warn!(error = %e, "Could not read stored credentials");
                            self.set_state(AuthState::Unauthenticated);
                            return;
                        }
                    }
                }

                match fetch_user().await {
                    Ok(user) => self.set_user(user),
                    Err(e) => {
                        warn!(error = %e, "Session bootstrap failed");
                        self.expire();
                    }
                }
            })
            .await;
        self.state()
    }

    pub fn is_bootstrapped(&self) -> bool {
        self.bootstrapped.initialized()
    }

    /// Store tokens from a login / register response.
    pub fn sign_in(&self, tokens: &AuthTokens) -> ClientResult<()> {
        let credentials = Credentials {
            access_token: tokens.access_token.clone(),
            refresh_token: tokens.refresh_token.clone(),
        };
        self.store.save(&credentials)?;
        *self.credentials.write().unwrap_or_else(|e| e.into_inner()) = Some(credentials);
        self.set_user(tokens.user.clone());
        Ok(())
    }

    pub fn set_user(&self, user: User) {
        let role = user.role();
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = Some(user);
        self.set_state(AuthState::Authenticated(role));
    }

    /// Replace the access token after a refresh; keeps the refresh token
    /// unless a new one was issued.
    pub fn update_tokens(&self, access_token: String, refresh_token: Option<String>) -> ClientResult<()> {
        let mut guard = self.credentials.write().unwrap_or_else(|e| e.into_inner());
        let refresh_token = refresh_token
            .or_else(|| guard.as_ref().map(|c| c.refresh_token.clone()))
            .unwrap_or_default();
        let next = Credentials {
            access_token,
            refresh_token,
        };
        self.store.save(&next)?;
        *guard = Some(next);
        Ok(())
    }

    /// Drop everything and fall back to `Unauthenticated`.
    pub fn expire(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Could not remove stored credentials");
        }
        *self.credentials.write().unwrap_or_else(|e| e.into_inner()) = None;
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.set_state(AuthState::Unauthenticated);
    }

    /// Explicit logout; unlike [`expire`](Self::expire) a store failure is reported.
    pub fn sign_out(&self) -> ClientResult<()> {
        let cleared = self.store.clear();
        *self.credentials.write().unwrap_or_else(|e| e.into_inner()) = None;
        *self.user.write().unwrap_or_else(|e| e.into_inner()) = None;
        self.set_state(AuthState::Unauthenticated);
        cleared?;
        Ok(())
    }
}
