//! Page-scoped cancellable fetches.
//!
//! DESIGN
//! ======
//! A page opens one `PageScope` per mount and spawns every data fetch through
//! it. Closing or dropping the scope aborts whatever is still running, and a
//! result that lands after close is discarded instead of applied.

#[cfg(test)]
#[path = "task_test.rs"]
mod task_test;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::{AbortHandle, JoinHandle};

pub struct PageScope {
    name: &'static str,
    open: Arc<AtomicBool>,
    tasks: Mutex<Vec<AbortHandle>>,
}

impl PageScope {
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self { name, open: Arc::new(AtomicBool::new(true)), tasks: Mutex::new(Vec::new()) }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    /// Start `future` on the runtime, bound to this scope.
    pub fn spawn<F>(&self, future: F) -> Pending<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let handle = tokio::spawn(future);
        if self.is_open() {
            let mut tasks = self.tasks.lock().unwrap_or_else(PoisonError::into_inner);
            tasks.retain(|task| !task.is_finished());
            tasks.push(handle.abort_handle());
        } else {
            handle.abort();
        }
        Pending { scope: self.name, open: self.open.clone(), handle }
    }

    /// Spawn and wait in one step.
    pub async fn run<F>(&self, future: F) -> Option<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.spawn(future).resolve().await
    }

    /// Abort outstanding tasks and discard any result still to come.
    pub fn close(&self) {
        if !self.open.swap(false, Ordering::AcqRel) {
            return;
        }
        let tasks = std::mem::take(&mut *self.tasks.lock().unwrap_or_else(PoisonError::into_inner));
        let aborted = tasks.iter().filter(|task| !task.is_finished()).count();
        for task in tasks {
            task.abort();
        }
        tracing::debug!(scope = self.name, aborted, "page scope closed");
    }
}

impl Drop for PageScope {
    fn drop(&mut self) {
        self.close();
    }
}

/// A fetch started inside a `PageScope`.
pub struct Pending<T> {
    scope: &'static str,
    open: Arc<AtomicBool>,
    handle: JoinHandle<T>,
}

impl<T> Pending<T> {
    /// The task's output, or `None` if the scope closed first.
    pub async fn resolve(self) -> Option<T> {
        match self.handle.await {
            Ok(value) if self.open.load(Ordering::Acquire) => Some(value),
            Ok(_) => {
                tracing::debug!(scope = self.scope, "discarding result for closed page");
                None
            }
            Err(e) if e.is_cancelled() => None,
            Err(e) => {
                tracing::error!(scope = self.scope, error = %e, "page task panicked");
                None
            }
        }
    }
}
