//! Session token persistence.
//!
//! DESIGN
//! ======
//! The token behaves like the `access_token` browser cookie: it carries a
//! fixed 7-day expiry and an expired entry reads as absent. Presence says
//! nothing about validity; only `/auth/verify` establishes that.
//!
//! All operations are synchronous so a `clear` is complete before any
//! caller acts on the redirect that follows it. When the backing store cannot
//! remove the token, `RevocableTokenStore` remembers it as revoked and reads
//! it as absent for the rest of the process.

#[cfg(test)]
#[path = "token_test.rs"]
mod token_test;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

pub const COOKIE_NAME: &str = "access_token";
pub const TOKEN_TTL: Duration = Duration::days(7);

#[derive(Debug, thiserror::Error)]
pub enum TokenStoreError {
    #[error("token store io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("token store encode failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("token store lock poisoned")]
    Poisoned,
}

/// A persisted token and its absolute expiry (unix seconds).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCookie {
    pub name: String,
    pub access_token: String,
    pub expires_at: i64,
}

impl SessionCookie {
    #[must_use]
    pub fn issue(access_token: &str, now: OffsetDateTime) -> Self {
        Self {
            name: COOKIE_NAME.to_owned(),
            access_token: access_token.to_owned(),
            expires_at: (now + TOKEN_TTL).unix_timestamp(),
        }
    }

    #[must_use]
    pub fn is_expired(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp() >= self.expires_at
    }
}

/// Client-side token storage shared by the gate, the provider and the API client.
pub trait TokenStore: Send + Sync {
    /// The stored token, or `None` when absent or expired.
    fn token(&self) -> Option<String>;

    /// Persist `access_token` with a fresh 7-day expiry.
    fn store(&self, access_token: &str) -> Result<(), TokenStoreError>;

    /// Remove any stored token. Clearing an empty store succeeds.
    fn clear(&self) -> Result<(), TokenStoreError>;
}

// =============================================================================
// MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    cookie: Mutex<Option<SessionCookie>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cookie(cookie: SessionCookie) -> Self {
        Self { cookie: Mutex::new(Some(cookie)) }
    }

    /// Raw cookie regardless of expiry.
    #[must_use]
    pub fn cookie(&self) -> Option<SessionCookie> {
        self.cookie.lock().ok().and_then(|guard| guard.clone())
    }
}

impl TokenStore for MemoryTokenStore {
    fn token(&self) -> Option<String> {
        let guard = self.cookie.lock().ok()?;
        let cookie = guard.as_ref()?;
        if cookie.is_expired(OffsetDateTime::now_utc()) {
            return None;
        }
        Some(cookie.access_token.clone())
    }

    fn store(&self, access_token: &str) -> Result<(), TokenStoreError> {
        let mut guard = self.cookie.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = Some(SessionCookie::issue(access_token, OffsetDateTime::now_utc()));
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let mut guard = self.cookie.lock().map_err(|_| TokenStoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// REVOCATION
// =============================================================================

/// Store view that never hands back a token whose `clear` failed.
pub struct RevocableTokenStore {
    inner: Arc<dyn TokenStore>,
    revoked: Mutex<Option<String>>,
}

impl RevocableTokenStore {
    #[must_use]
    pub fn new(inner: Arc<dyn TokenStore>) -> Self {
        Self { inner, revoked: Mutex::new(None) }
    }

    /// Whether a stale token is currently masked.
    #[must_use]
    pub fn has_revoked(&self) -> bool {
        self.revoked.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}

impl TokenStore for RevocableTokenStore {
    fn token(&self) -> Option<String> {
        let token = self.inner.token()?;
        let revoked = self.revoked.lock().unwrap_or_else(PoisonError::into_inner);
        if revoked.as_deref() == Some(token.as_str()) {
            tracing::debug!("session token revoked in this process");
            return None;
        }
        Some(token)
    }

    fn store(&self, access_token: &str) -> Result<(), TokenStoreError> {
        self.inner.store(access_token)?;
        *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        match self.inner.clear() {
            Ok(()) => {
                *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = None;
                Ok(())
            }
            Err(e) => {
                let stale = self.inner.token();
                tracing::warn!(error = %e, masked = stale.is_some(), "token clear failed, revoking in memory");
                *self.revoked.lock().unwrap_or_else(PoisonError::into_inner) = stale;
                Err(e)
            }
        }
    }
}

// =============================================================================
// FILE
// =============================================================================

/// JSON file holding one `SessionCookie`. Used by the CLI between invocations.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    // Serializes writers within this process; across processes last writer wins.
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_cookie(&self) -> Option<SessionCookie> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable");
                return None;
            }
        };
        match serde_json::from_str::<SessionCookie>(&raw) {
            Ok(cookie) => Some(cookie),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt");
                None
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        let cookie = self.read_cookie()?;
        if cookie.is_expired(OffsetDateTime::now_utc()) {
            tracing::debug!(path = %self.path.display(), "session cookie expired");
            return None;
        }
        Some(cookie.access_token)
    }

    fn store(&self, access_token: &str) -> Result<(), TokenStoreError> {
        let _guard = self.write_lock.lock().map_err(|_| TokenStoreError::Poisoned)?;
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let cookie = SessionCookie::issue(access_token, OffsetDateTime::now_utc());
        let body = serde_json::to_vec_pretty(&cookie)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, body)?;
        restrict_permissions(&tmp)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), TokenStoreError> {
        let _guard = self.write_lock.lock().map_err(|_| TokenStoreError::Poisoned)?;
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
