//! Creator Compass client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Headless client for the Creator Compass backend. The backend owns all
//! scraping, scoring and analytics; this crate owns the session lifecycle
//! (token storage, verification, onboarding redirects) and the per-page
//! view-models that bind backend responses to displayable state.
//!
//! LAYOUT
//! ======
//! - `net`: wire types and the `CompassApi` client seam.
//! - `session`: token store, gate, OAuth callback handling, provider.
//! - `task`: page-scoped cancellable fetches.
//! - `pages`: one view-model per route.

pub mod config;
pub mod net;
pub mod notify;
pub mod pages;
pub mod session;
pub mod task;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CompassConfig;
pub use net::api::{ApiError, CompassApi, HttpApi};
pub use net::demo::DemoApi;
pub use notify::{Notice, NoticeLevel, Notifier};
pub use session::gate::{GateOutcome, GatedSession, Route, SessionStatus};
pub use session::provider::SessionProvider;
pub use session::token::{FileTokenStore, MemoryTokenStore, RevocableTokenStore, SessionCookie, TokenStore};
pub use task::PageScope;
