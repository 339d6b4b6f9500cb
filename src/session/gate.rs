//! Session gate: the redirect decision made on every route entry.
//!
//! STATE MACHINE
//! =============
//! ```text
//! UNKNOWN --no token-----------------> UNAUTHENTICATED     (-> landing)
//! UNKNOWN --verify failed, clear-----> UNAUTHENTICATED     (-> landing)
//! UNKNOWN --verify ok, no username---> ONBOARDING_REQUIRED (-> onboarding)
//! UNKNOWN --verify ok, username------> AUTHENTICATED       (-> dashboard)
//! ```
//! A redirect whose target is the current route becomes "render in place".
//! Verify runs at most once per `check` and is never retried.

#[cfg(test)]
#[path = "gate_test.rs"]
mod gate_test;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::net::api::{ApiError, CompassApi};
use crate::net::types::User;
use crate::notify::{Notice, Notifier};
use crate::session::token::TokenStore;

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DashboardPage {
    Overview,
    Analytics,
    Recommendations,
    BestPractices,
    EngagedLeads,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Landing,
    AuthCallback,
    Onboarding,
    Dashboard(DashboardPage),
}

impl Route {
    pub const DASHBOARD: Route = Route::Dashboard(DashboardPage::Overview);

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Landing => "/",
            Self::AuthCallback => "/auth/callback",
            Self::Onboarding => "/onboarding",
            Self::Dashboard(DashboardPage::Overview) => "/dashboard",
            Self::Dashboard(DashboardPage::Analytics) => "/dashboard/analytics",
            Self::Dashboard(DashboardPage::Recommendations) => "/dashboard/recommendations",
            Self::Dashboard(DashboardPage::BestPractices) => "/dashboard/best-practices",
            Self::Dashboard(DashboardPage::EngagedLeads) => "/dashboard/engaged-leads",
            Self::Dashboard(DashboardPage::Settings) => "/dashboard/settings",
        }
    }

    #[must_use]
    pub fn is_dashboard(self) -> bool {
        matches!(self, Self::Dashboard(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl serde::Serialize for Route {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.path())
    }
}

impl FromStr for Route {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let path = raw.split(['?', '#']).next().unwrap_or_default();
        let path = if path.len() > 1 { path.trim_end_matches('/') } else { path };
        match path {
            "" | "/" => Ok(Self::Landing),
            "/auth/callback" => Ok(Self::AuthCallback),
            "/onboarding" => Ok(Self::Onboarding),
            "/dashboard" => Ok(Self::DASHBOARD),
            "/dashboard/analytics" => Ok(Self::Dashboard(DashboardPage::Analytics)),
            "/dashboard/recommendations" => Ok(Self::Dashboard(DashboardPage::Recommendations)),
            "/dashboard/best-practices" => Ok(Self::Dashboard(DashboardPage::BestPractices)),
            "/dashboard/engaged-leads" => Ok(Self::Dashboard(DashboardPage::EngagedLeads)),
            "/dashboard/settings" => Ok(Self::Dashboard(DashboardPage::Settings)),
            other => Err(format!("unknown route: {other}")),
        }
    }
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionStatus {
    #[default]
    Unknown,
    Unauthenticated,
    OnboardingRequired,
    Authenticated,
}

impl SessionStatus {
    #[must_use]
    pub fn for_user(user: &User) -> Self {
        if user.needs_onboarding() { Self::OnboardingRequired } else { Self::Authenticated }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// Render the current route.
    Stay,
    Redirect(Route),
}

/// Where a determined status sends a caller currently on `current`.
///
/// Returns `None` for `Unknown`: nothing may render yet.
#[must_use]
pub fn decide(status: SessionStatus, current: Route) -> Option<Navigation> {
    let target = match status {
        SessionStatus::Unknown => return None,
        SessionStatus::Unauthenticated => Route::Landing,
        SessionStatus::OnboardingRequired => Route::Onboarding,
        SessionStatus::Authenticated if current.is_dashboard() => current,
        SessionStatus::Authenticated => Route::DASHBOARD,
    };
    Some(if target == current { Navigation::Stay } else { Navigation::Redirect(target) })
}

/// Post-login destination for a freshly authenticated user.
#[must_use]
pub fn landing_for(user: &User) -> Route {
    if user.needs_onboarding() { Route::Onboarding } else { Route::DASHBOARD }
}

// =============================================================================
// GATED SESSION
// =============================================================================

/// Proof that the gate confirmed an onboarded user for this page mount.
///
/// Only the gate constructs it, so dashboard pages cannot load without it.
#[derive(Clone)]
pub struct GatedSession {
    user: User,
    api: Arc<dyn CompassApi>,
}

impl GatedSession {
    #[must_use]
    pub fn user(&self) -> &User {
        &self.user
    }

    #[must_use]
    pub fn api(&self) -> &Arc<dyn CompassApi> {
        &self.api
    }

    /// Replace the cached user after a profile update on the same mount.
    pub(crate) fn with_user(&self, user: User) -> Self {
        Self { user, api: self.api.clone() }
    }
}

impl fmt::Debug for GatedSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatedSession").field("user", &self.user.id).finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct GateOutcome {
    pub status: SessionStatus,
    pub user: Option<User>,
    pub navigation: Navigation,
    session: Option<GatedSession>,
}

impl GateOutcome {
    /// The dashboard session, present only for `AUTHENTICATED` + render in place.
    #[must_use]
    pub fn session(&self) -> Option<&GatedSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn into_session(self) -> Option<GatedSession> {
        self.session
    }

    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self.navigation {
            Navigation::Redirect(route) => Some(route),
            Navigation::Stay => None,
        }
    }

    /// Route the caller ends up on.
    #[must_use]
    pub fn destination(&self, current: Route) -> Route {
        self.redirect().unwrap_or(current)
    }
}

// =============================================================================
// GATE
// =============================================================================

enum Determination {
    NoToken,
    Rejected,
    Verified(User),
}

pub struct SessionGate {
    api: Arc<dyn CompassApi>,
    tokens: Arc<dyn TokenStore>,
    notifier: Arc<dyn Notifier>,
}

impl SessionGate {
    /// Built by `SessionProvider`, which hands it the revocable token view.
    pub(crate) fn new(api: Arc<dyn CompassApi>, tokens: Arc<dyn TokenStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { api, tokens, notifier }
    }

    /// Determine status for the stored token, clearing it on verify failure.
    pub async fn resolve(&self) -> (SessionStatus, Option<User>) {
        match self.determine().await {
            Determination::Verified(user) => (SessionStatus::for_user(&user), Some(user)),
            Determination::NoToken | Determination::Rejected => (SessionStatus::Unauthenticated, None),
        }
    }

    /// Run the gate for one mount of `current`.
    pub async fn check(&self, current: Route) -> GateOutcome {
        let determination = self.determine().await;
        let missing_token = matches!(determination, Determination::NoToken);
        let (status, user) = match determination {
            Determination::Verified(user) => (SessionStatus::for_user(&user), Some(user)),
            Determination::NoToken | Determination::Rejected => (SessionStatus::Unauthenticated, None),
        };
        let navigation = decide(status, current).unwrap_or(Navigation::Redirect(Route::Landing));

        if missing_token && navigation != Navigation::Stay {
            self.notifier.notify(Notice::info("Please sign in to continue"));
        }
        if let Navigation::Redirect(target) = navigation {
            tracing::info!(from = %current, to = %target, ?status, "gate redirect");
        }

        let session = match (&user, navigation) {
            (Some(user), Navigation::Stay) if status == SessionStatus::Authenticated => {
                Some(GatedSession { user: user.clone(), api: self.api.clone() })
            }
            _ => None,
        };

        GateOutcome { status, user, navigation, session }
    }

    async fn determine(&self) -> Determination {
        if self.tokens.token().is_none() {
            tracing::debug!("gate: no session token");
            return Determination::NoToken;
        }

        match self.api.verify().await {
            Ok(user) => {
                tracing::debug!(user_id = user.id, "gate: token verified");
                Determination::Verified(user)
            }
            Err(e) => {
                self.drop_token(&e);
                Determination::Rejected
            }
        }
    }

    fn drop_token(&self, error: &ApiError) {
        tracing::warn!(error = %error, "gate: verify failed, clearing session");
        // Cleared before the redirect is returned so no later read sees it.
        if let Err(clear_err) = self.tokens.clear() {
            tracing::error!(error = %clear_err, "gate: failed to clear session token");
        }
        self.notifier.notify(Notice::error(format!("Authentication failed: {}", error.detail())));
    }
}
