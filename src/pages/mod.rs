//! Per-route view-models.
//!
//! SYSTEM CONTEXT
//! ==============
//! Dashboard pages are loaded from a `PageContext`, which can only be built
//! from the `GatedSession` the gate hands out. Every fetch runs inside the
//! context's `PageScope`; a load returns `None` when the scope closed before
//! its results arrived.
//!
//! ERROR HANDLING
//! ==============
//! A failed fetch never fails the page. It is logged, surfaced as a notice,
//! and the section resolves to `Failed` (or `Fallback` where a fixed
//! substitute exists).

pub mod analytics;
pub mod best_practices;
pub mod dashboard;
pub mod engaged_leads;
pub mod format;
pub mod landing;
pub mod login;
pub mod onboarding;
pub mod recommendations;
pub mod settings;


use std::sync::Arc;

use serde::Serialize;

use crate::net::api::{ApiError, CompassApi};
use crate::net::types::User;
use crate::notify::{Notice, Notifier};
use crate::session::gate::{GatedSession, Route};
use crate::session::provider::SessionProvider;
use crate::task::{PageScope, Pending};

// =============================================================================
// SECTION
// =============================================================================

/// One independently fetched block of a page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "state", content = "data", rename_all = "snake_case")]
pub enum Section<T> {
    Loaded(T),
    /// The call succeeded with nothing to show.
    Empty,
    /// The call failed; carries the reason shown to the user.
    Failed(String),
    /// The call failed and a fixed substitute is shown instead.
    Fallback(T),
}

impl<T> Section<T> {
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) | Self::Fallback(value) => Some(value),
            Self::Empty | Self::Failed(_) => None,
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<T> Section<Vec<T>> {
    /// Turn an empty list into `Empty`.
    #[must_use]
    pub fn non_empty(self) -> Self {
        match self {
            Self::Loaded(items) if items.is_empty() => Self::Empty,
            other => other,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[T] {
        self.value().map_or(&[][..], Vec::as_slice)
    }
}

// =============================================================================
// CONTEXT
// =============================================================================

/// A mounted dashboard page: the gated session plus its task scope.
pub struct PageContext {
    session: GatedSession,
    notifier: Arc<dyn Notifier>,
    scope: PageScope,
}

impl PageContext {
    #[must_use]
    pub fn new(session: GatedSession, notifier: Arc<dyn Notifier>, name: &'static str) -> Self {
        Self { session, notifier, scope: PageScope::new(name) }
    }

    #[must_use]
    pub fn user(&self) -> &User {
        self.session.user()
    }

    #[must_use]
    pub fn api(&self) -> Arc<dyn CompassApi> {
        self.session.api().clone()
    }

    #[must_use]
    pub fn scope(&self) -> &PageScope {
        &self.scope
    }

    pub fn notify(&self, notice: Notice) {
        self.notifier.notify(notice);
    }

    /// Run one backend call inside the page scope.
    pub fn fetch<T, F, Fut>(&self, call: F) -> Pending<Result<T, ApiError>>
    where
        F: FnOnce(Arc<dyn CompassApi>) -> Fut,
        Fut: std::future::Future<Output = Result<T, ApiError>> + Send + 'static,
        T: Send + 'static,
    {
        self.scope.spawn(call(self.api()))
    }

    /// Await a fetch and map it to a section, reporting failures.
    ///
    /// `None` means the page closed first and nothing may be applied.
    pub async fn settle<T>(&self, pending: Pending<Result<T, ApiError>>, what: &str) -> Option<Section<T>> {
        Some(match pending.resolve().await? {
            Ok(value) => Section::Loaded(value),
            Err(e) => {
                self.report(what, &e);
                Section::Failed(e.detail())
            }
        })
    }

    pub(crate) fn report(&self, what: &str, error: &ApiError) {
        tracing::warn!(page = self.scope.name(), error = %error, "failed to load {what}");
        self.notify(Notice::error(format!("Failed to load {what}")));
    }

    pub(crate) fn replace_user(&mut self, user: User) {
        self.session = self.session.with_user(user);
    }

    /// Abort outstanding fetches; late results are discarded.
    pub fn close(&self) {
        self.scope.close();
    }
}

/// Gate `route` and open a page context when it may render.
///
/// `Err` carries the route the caller must go to instead.
pub async fn mount(provider: &SessionProvider, route: Route, name: &'static str) -> Result<PageContext, Route> {
    let outcome = provider.guard(route).await;
    let destination = outcome.destination(route);
    match outcome.into_session() {
        Some(session) => Ok(PageContext::new(session, provider.notifier(), name)),
        None => Err(destination),
    }
}
