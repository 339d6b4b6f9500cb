//! Sign-in: direct email login and the Google OAuth entry point.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use crate::session::gate::Route;
use crate::session::provider::{SessionError, SessionProvider};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub name: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Self {
        Self { email: email.into(), name: name.into() }
    }

    /// Log in and return the route the caller lands on.
    pub async fn submit(&self, provider: &SessionProvider) -> Result<Route, SessionError> {
        provider.login(&self.email, &self.name).await
    }
}

/// URL to send the caller to for Google sign-in.
pub async fn google_sign_in(provider: &SessionProvider) -> Option<String> {
    provider.google_auth_url().await.ok().map(|url| url.auth_url)
}
