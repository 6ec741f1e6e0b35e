//! Reference-counted loading state.
//!
//! Every request registers under its own id and deregisters when its guard
//! drops, so one completion never clears another request's loading state.

use std::collections::HashSet;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}

#[derive(Debug, Default)]
struct TrackerState {
    next_id: AtomicU64,
    active: Mutex<HashSet<RequestId>>,
}

#[derive(Debug, Clone, Default)]
pub struct InFlightTracker {
    state: Arc<TrackerState>,
}

impl InFlightTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> InFlightGuard {
        let id = RequestId(self.state.next_id.fetch_add(1, Ordering::Relaxed) + 1);
        self.state.active.lock().insert(id);
        InFlightGuard {
            id,
            state: Arc::clone(&self.state),
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.state.active.lock().is_empty()
    }

    pub fn count(&self) -> usize {
        self.state.active.lock().len()
    }

    pub fn contains(&self, id: RequestId) -> bool {
        self.state.active.lock().contains(&id)
    }
}

/// Keeps its request registered until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    id: RequestId,
    state: Arc<TrackerState>,
}

impl InFlightGuard {
    pub fn id(&self) -> RequestId {
        self.id
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.state.active.lock().remove(&self.id);
    }
}
