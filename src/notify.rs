//! User-visible notices (the toast channel).
//!
//! Session and page code report outcomes here instead of printing; the CLI
//! renders them to stderr, tests collect them.

#[cfg(test)]
#[path = "notify_test.rs"]
mod notify_test;

use std::sync::Mutex;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Success, message: message.into() }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Info, message: message.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self { level: NoticeLevel::Error, message: message.into() }
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Emits notices as tracing events only.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => tracing::warn!(message = %notice.message, "notice"),
            NoticeLevel::Success | NoticeLevel::Info => tracing::info!(message = %notice.message, "notice"),
        }
    }
}

/// Buffers notices until drained.
#[derive(Debug, Default)]
pub struct NoticeLog {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything collected so far.
    pub fn drain(&self) -> Vec<Notice> {
        self.notices.lock().map(|mut guard| std::mem::take(&mut *guard)).unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<Notice> {
        self.notices.lock().ok().and_then(|guard| guard.last().cloned())
    }
}

impl Notifier for NoticeLog {
    fn notify(&self, notice: Notice) {
        tracing::debug!(level = ?notice.level, message = %notice.message, "notice queued");
        if let Ok(mut guard) = self.notices.lock() {
            guard.push(notice);
        }
    }
}
