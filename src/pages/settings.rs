//! Account settings: profile fields and the weekly-update opt-in.

#[cfg(test)]
#[path = "settings_test.rs"]
mod settings_test;

use serde::Serialize;

use super::onboarding::{OnboardingError, normalize_username};
use super::{PageContext, Section};
use crate::net::api::ApiError;
use crate::net::types::{User, UserUpdate};
use crate::notify::Notice;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("nothing to update")]
    NothingToUpdate,
    #[error(transparent)]
    Invalid(#[from] OnboardingError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("page closed before the update finished")]
    Closed,
}

/// Requested changes; `None` leaves a field as it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub tiktok_username: Option<String>,
    pub offer_description: Option<String>,
    pub target_audience: Option<String>,
    pub weekly_updates_enabled: Option<bool>,
}

impl SettingsForm {
    pub fn to_update(&self) -> Result<UserUpdate, SettingsError> {
        let update = UserUpdate {
            tiktok_username: self.tiktok_username.as_deref().map(normalize_username).transpose()?,
            offer_description: trimmed(self.offer_description.as_deref()),
            target_audience: trimmed(self.target_audience.as_deref()),
            weekly_updates_enabled: self.weekly_updates_enabled,
        };
        if update.is_empty() { Err(SettingsError::NothingToUpdate) } else { Ok(update) }
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_owned)
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SettingsPage {
    pub account: Section<User>,
}

impl SettingsPage {
    pub async fn load(ctx: &PageContext) -> Option<Self> {
        let account = ctx.fetch(|api| async move { api.current_user().await });
        Some(Self { account: ctx.settle(account, "account settings").await? })
    }

    /// Save `form`. A changed TikTok handle also queues a profile scrape.
    pub async fn save(&mut self, ctx: &mut PageContext, form: &SettingsForm) -> Result<User, SettingsError> {
        let update = form.to_update()?;
        let previous = ctx.user().tiktok_username.clone();

        let body = update.clone();
        let saved = ctx.fetch(move |api| async move { api.update_user(&body).await });
        let user = match saved.resolve().await.ok_or(SettingsError::Closed)? {
            Ok(user) => user,
            Err(e) => {
                tracing::warn!(error = %e, "settings update failed");
                ctx.notify(Notice::error(format!("Failed to save settings: {}", e.detail())));
                return Err(e.into());
            }
        };
        tracing::info!(user_id = user.id, "settings saved");
        ctx.notify(Notice::success("Settings saved"));

        if let Some(handle) = update.tiktok_username.filter(|handle| previous.as_ref() != Some(handle)) {
            let scrape = ctx.fetch(move |api| async move { api.scrape_profile(&handle).await });
            if let Some(Err(e)) = scrape.resolve().await {
                tracing::warn!(error = %e, "profile scrape after handle change failed");
                ctx.notify(Notice::info("Profile data will update on the next refresh"));
            }
        }

        ctx.replace_user(user.clone());
        self.account = Section::Loaded(user.clone());
        Ok(user)
    }
}
