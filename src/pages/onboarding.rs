//! Onboarding: the three-field profile form every new account completes.
//!
//! The gate only lets `ONBOARDING_REQUIRED` callers render this page; signed
//! out callers go to landing and onboarded ones to the dashboard.

#[cfg(test)]
#[path = "onboarding_test.rs"]
mod onboarding_test;

use crate::net::types::{OnboardingRequest, User};
use crate::session::gate::{Navigation, Route};
use crate::session::provider::{SessionError, SessionProvider};

#[derive(Debug, thiserror::Error)]
pub enum OnboardingError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid TikTok username: {0}")]
    InvalidUsername(String),
    #[error(transparent)]
    Submit(#[from] SessionError),
}

/// Trim a TikTok handle and drop a leading `@`.
pub fn normalize_username(raw: &str) -> Result<String, OnboardingError> {
    let name = raw.trim();
    let name = name.strip_prefix('@').unwrap_or(name);
    if name.is_empty() {
        return Err(OnboardingError::Missing("TikTok username"));
    }
    if name.chars().any(|c| c.is_whitespace() || c == '@') {
        return Err(OnboardingError::InvalidUsername(raw.trim().to_owned()));
    }
    Ok(name.to_owned())
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OnboardingForm {
    pub tiktok_username: String,
    pub offer_description: String,
    pub target_audience: String,
}

impl OnboardingForm {
    pub fn validate(&self) -> Result<OnboardingRequest, OnboardingError> {
        let tiktok_username = normalize_username(&self.tiktok_username)?;
        let offer_description = required(&self.offer_description, "offer description")?;
        let target_audience = required(&self.target_audience, "target audience")?;
        Ok(OnboardingRequest { tiktok_username, offer_description, target_audience })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, OnboardingError> {
    let value = value.trim();
    if value.is_empty() { Err(OnboardingError::Missing(field)) } else { Ok(value.to_owned()) }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OnboardingPage {
    pub user: Option<User>,
}

impl OnboardingPage {
    /// Render the form, or return where the gate sends the caller.
    pub async fn mount(provider: &SessionProvider) -> Result<Self, Route> {
        let outcome = provider.guard(Route::Onboarding).await;
        match outcome.navigation {
            Navigation::Stay => Ok(Self { user: outcome.user }),
            Navigation::Redirect(to) => Err(to),
        }
    }

    /// Validate, submit, and return the route to continue to.
    pub async fn submit(&self, provider: &SessionProvider, form: &OnboardingForm) -> Result<Route, OnboardingError> {
        let request = form.validate()?;
        Ok(provider.complete_onboarding(&request).await?)
    }
}
