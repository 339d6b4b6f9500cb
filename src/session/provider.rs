//! The one session context every route shares.
//!
//! DESIGN
//! ======
//! `SessionProvider` owns the API client, the token store and the notifier,
//! and records the last determination as `{status, user}`. `guard`,
//! `refresh`, `handle_callback`, `login`, `complete_onboarding` and `logout`
//! all take the same async mutex, so at most one verify (or exchange) is in
//! flight and no two determinations interleave.

#[cfg(test)]
#[path = "provider_test.rs"]
mod provider_test;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::CompassConfig;
use crate::net::api::{ApiError, CompassApi, HttpApi};
use crate::net::demo::DemoApi;
use crate::net::types::{GoogleAuthUrl, LoginRequest, OnboardingRequest, User};
use crate::notify::{Notice, Notifier};
use crate::session::callback::{CallbackHandler, CallbackParams, CallbackResult};
use crate::session::gate::{GateOutcome, Route, SessionGate, SessionStatus, landing_for};
use crate::session::token::{RevocableTokenStore, TokenStore, TokenStoreError};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

#[derive(Clone, Debug, Default)]
struct SessionState {
    status: SessionStatus,
    user: Option<User>,
}

impl SessionState {
    fn signed_in(user: User) -> Self {
        Self { status: SessionStatus::for_user(&user), user: Some(user) }
    }

    fn signed_out() -> Self {
        Self { status: SessionStatus::Unauthenticated, user: None }
    }
}

pub struct SessionProvider {
    api: Arc<dyn CompassApi>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
    gate: SessionGate,
    callback: CallbackHandler,
    state: Mutex<SessionState>,
}

impl SessionProvider {
    pub fn new(api: Arc<dyn CompassApi>, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self::assemble(api, Arc::new(RevocableTokenStore::new(tokens)), notifier)
    }

    fn assemble(api: Arc<dyn CompassApi>, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            gate: SessionGate::new(api.clone(), tokens.clone(), notifier.clone()),
            callback: CallbackHandler::new(api.clone(), tokens.clone(), notifier.clone()),
            api,
            tokens,
            notifier,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Build the provider for `config`, using canned data in demo mode.
    pub fn from_config(
        config: &CompassConfig,
        tokens: Arc<dyn TokenStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, ApiError> {
        let tokens: Arc<dyn TokenStore> = Arc::new(RevocableTokenStore::new(tokens));
        let api: Arc<dyn CompassApi> = if config.demo_mode {
            tracing::info!("demo mode: serving canned backend data");
            Arc::new(DemoApi::new())
        } else {
            tracing::info!(api = %config.api_base(), "using backend");
            Arc::new(HttpApi::new(config, tokens.clone())?)
        };
        Ok(Self::assemble(api, tokens, notifier))
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn CompassApi> {
        &self.api
    }

    /// The token store as every session reader sees it.
    #[must_use]
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    #[must_use]
    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub async fn status(&self) -> SessionStatus {
        self.state.lock().await.status
    }

    pub async fn user(&self) -> Option<User> {
        self.state.lock().await.user.clone()
    }

    /// Gate one mount of `current`.
    pub async fn guard(&self, current: Route) -> GateOutcome {
        let mut state = self.state.lock().await;
        let outcome = self.gate.check(current).await;
        *state = SessionState { status: outcome.status, user: outcome.user.clone() };
        outcome
    }

    /// Re-verify the stored token under the gate's rules.
    pub async fn refresh(&self) -> SessionStatus {
        let mut state = self.state.lock().await;
        let (status, user) = self.gate.resolve().await;
        *state = SessionState { status, user };
        status
    }

    /// Direct email login. Returns the post-login route.
    pub async fn login(&self, email: &str, name: &str) -> Result<Route, SessionError> {
        let email = email.trim();
        let name = name.trim();
        if email.is_empty() {
            return Err(SessionError::MissingField("email"));
        }
        if name.is_empty() {
            return Err(SessionError::MissingField("name"));
        }

        let mut state = self.state.lock().await;
        let request = LoginRequest { email: email.to_owned(), name: name.to_owned() };
        let auth = match self.api.login(&request).await {
            Ok(auth) => auth,
            Err(e) => {
                tracing::warn!(error = %e, "login failed");
                self.notifier.notify(Notice::error(format!("Login failed: {}", e.detail())));
                return Err(e.into());
            }
        };
        self.tokens.store(&auth.access_token)?;

        let route = landing_for(&auth.user);
        tracing::info!(user_id = auth.user.id, to = %route, "logged in");
        self.notifier.notify(Notice::success("Logged in successfully"));
        *state = SessionState::signed_in(auth.user);
        Ok(route)
    }

    pub async fn google_auth_url(&self) -> Result<GoogleAuthUrl, ApiError> {
        self.api.google_auth_url().await.inspect_err(|e| {
            tracing::warn!(error = %e, "google auth url unavailable");
            self.notifier.notify(Notice::error("Failed to start Google sign-in"));
        })
    }

    pub async fn handle_callback(&self, params: &CallbackParams) -> CallbackResult {
        let mut state = self.state.lock().await;
        let result = self.callback.handle(params).await;
        *state = match &result.user {
            Some(user) => SessionState::signed_in(user.clone()),
            None => SessionState::signed_out(),
        };
        result
    }

    /// Submit a validated onboarding form. Returns the post-onboarding route.
    pub async fn complete_onboarding(&self, request: &OnboardingRequest) -> Result<Route, SessionError> {
        let mut state = self.state.lock().await;
        match self.api.complete_onboarding(request).await {
            Ok(response) => {
                tracing::info!(user_id = response.user.id, "onboarding completed");
                self.notifier.notify(Notice::success("Profile setup complete! Welcome to your dashboard."));
                let route = landing_for(&response.user);
                *state = SessionState::signed_in(response.user);
                Ok(route)
            }
            Err(e) => {
                tracing::warn!(error = %e, "onboarding failed");
                self.notifier.notify(Notice::error("Setup failed. Please try again."));
                Err(e.into())
            }
        }
    }

    /// Forget the session unconditionally and land on the landing route.
    pub async fn logout(&self) -> Route {
        let mut state = self.state.lock().await;
        let cleared = self.tokens.clear();
        *state = SessionState::signed_out();
        match cleared {
            Ok(()) => {
                tracing::info!("logged out");
                self.notifier.notify(Notice::success("Logged out successfully"));
            }
            Err(e) => {
                tracing::error!(error = %e, "logout: failed to remove saved session");
                self.notifier.notify(Notice::error(format!("Logged out, but the saved session could not be removed: {e}")));
            }
        }
        Route::Landing
    }
}
