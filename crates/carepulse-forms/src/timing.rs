//! Debounce and throttle for change handlers

use parking_lot::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs only the last call made within `delay`
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Schedule `f`, cancelling whatever was scheduled before.
    ///
    /// Must be called from within a tokio runtime.
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let delay = self.delay;
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        });
        if let Some(previous) = self.pending.lock().replace(task) {
            previous.abort();
        }
    }

    /// Drop the scheduled call, if any
    pub fn cancel(&self) {
        if let Some(task) = self.pending.lock().take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs at most one call per `limit`; calls inside the window are dropped
#[derive(Debug)]
pub struct Throttle {
    limit: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(limit: Duration) -> Self {
        Self {
            limit,
            last: Mutex::new(None),
        }
    }

    /// Run `f` unless the previous run was less than `limit` ago
    pub fn call<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let now = Instant::now();
        {
            let mut last = self.last.lock();
            if last.is_some_and(|at| now.duration_since(at) < self.limit) {
                return None;
            }
            *last = Some(now);
        }
        Some(f())
    }
}
