//! OAuth callback: turn `?code=` / `?error=` into a stored token and a route.
//!
//! Exactly one exchange call is made per callback and it is never retried.
//! Every failure lands on the landing route with no token persisted.

#[cfg(test)]
#[path = "callback_test.rs"]
mod callback_test;

use std::sync::Arc;

use reqwest::Url;

use crate::net::api::CompassApi;
use crate::net::types::User;
use crate::notify::{Notice, Notifier};
use crate::session::gate::{Route, landing_for};
use crate::session::token::TokenStore;

/// Resolves relative callback references (`/auth/callback?...`, `?code=...`).
const CALLBACK_BASE: &str = "http://localhost/auth/callback";

/// Query parameters the OAuth provider appends to the callback URL.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CallbackParams {
    /// Read `code` and `error` from a full URL, a path with a query, or a
    /// bare query string. Empty values count as absent.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let Some(url) = callback_url(raw) else {
            tracing::warn!(raw, "callback: unparseable callback reference");
            return Self::default();
        };

        let mut params = Self::default();
        for (key, value) in url.query_pairs() {
            let slot = match key.as_ref() {
                "code" => &mut params.code,
                "error" => &mut params.error,
                _ => continue,
            };
            if slot.is_none() && !value.trim().is_empty() {
                *slot = Some(value.into_owned());
            }
        }
        params
    }
}

fn callback_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    let reference = if raw.contains('?') || raw.contains("://") || raw.starts_with('/') {
        raw.to_owned()
    } else {
        format!("?{raw}")
    };
    Url::parse(CALLBACK_BASE).ok()?.join(&reference).ok()
}

/// Where the callback left the caller.
#[derive(Clone, Debug, PartialEq)]
pub struct CallbackResult {
    pub route: Route,
    /// Present only when the exchange succeeded and the token was stored.
    pub user: Option<User>,
}

impl CallbackResult {
    fn landing() -> Self {
        Self { route: Route::Landing, user: None }
    }
}

pub struct CallbackHandler {
    api: Arc<dyn CompassApi>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl CallbackHandler {
    pub(crate) fn new(api: Arc<dyn CompassApi>, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, tokens, notifier }
    }

    pub async fn handle(&self, params: &CallbackParams) -> CallbackResult {
        if let Some(error) = &params.error {
            tracing::warn!(error = %error, "callback: provider returned an error");
            self.notifier.notify(Notice::error(format!("Authentication failed: {error}")));
            return CallbackResult::landing();
        }

        let Some(code) = &params.code else {
            tracing::warn!("callback: no authorization code");
            self.notifier.notify(Notice::error("No authorization code received"));
            return CallbackResult::landing();
        };

        let auth = match self.api.google_callback(code).await {
            Ok(auth) => auth,
            Err(e) => {
                tracing::warn!(error = %e, "callback: code exchange failed");
                self.notifier.notify(Notice::error(format!("Authentication failed: {}", e.detail())));
                return CallbackResult::landing();
            }
        };

        if let Err(e) = self.tokens.store(&auth.access_token) {
            tracing::error!(error = %e, "callback: failed to persist session token");
            self.notifier.notify(Notice::error("Authentication failed: could not save session"));
            return CallbackResult::landing();
        }

        let route = landing_for(&auth.user);
        tracing::info!(user_id = auth.user.id, to = %route, "callback: signed in");
        self.notifier.notify(Notice::success(format!("Welcome, {}!", auth.user.name)));
        CallbackResult { route, user: Some(auth.user) }
    }
}
