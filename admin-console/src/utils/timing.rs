//! Rate limiting for UI-triggered actions. Both helpers need a running tokio
//! runtime.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Runs only the last call of a burst, `wait` after that call
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            pending: Mutex::new(None),
        }
    }

    /// Replaces any call still waiting
    pub fn call<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let wait = self.wait;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(wait).await;
            f();
        });
        if let Some(previous) = self.pending.lock().replace(handle) {
            previous.abort();
        }
    }

    pub fn cancel(&self) {
        if let Some(pending) = self.pending.lock().take() {
            pending.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Runs the first call, then ignores calls until `limit` has passed
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

    /// Returns whether `f` ran
    pub fn call<F: FnOnce()>(&self, f: F) -> bool {
        let now = Instant::now();
        {
            let mut last = self.last.lock();
            if last.is_some_and(|at| now.duration_since(at) < self.limit) {
                return false;
            }
            *last = Some(now);
        }
        f();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn test_debouncer_runs_last_call_only() {
        let hits = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(300));

        for i in 1..=3 {
            let hits = hits.clone();
            let last = last.clone();
            debouncer.call(move || {
                hits.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_throttle_drops_calls_inside_window() {
        let throttle = Throttle::new(Duration::from_secs(1));
        let mut ran = 0;

        assert!(throttle.call(|| ran += 1));
        assert!(!throttle.call(|| ran += 1));

        tokio::time::advance(Duration::from_millis(1001)).await;
        assert!(throttle.call(|| ran += 1));
        assert_eq!(ran, 2);
    }
}
