//! Client-side state containers.
//!
//! Each store keeps its state behind a single-writer lock and hands out
//! immutable [`Snapshot`]s. Every mutation bumps the revision, so callers can
//! tell whether anything changed between two reads. List fetches take a
//! sequence ticket and drop responses that a newer fetch has superseded.

pub mod app;
pub mod live;
pub mod media;
pub mod user;

use std::collections::HashMap;
use std::hash::Hash;
use std::ops::Deref;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::{Mutex, RwLock};

pub use app::{AppStore, ErrorLog, Layout, Theme, ERROR_LOG_CAPACITY};
pub use live::{LiveFilters, LiveResource, LiveState, LiveStore};
pub use media::{MediaFilters, MediaResource, MediaState, MediaStore};
pub use user::{UserResource, UserStore};

pub const FIRST_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Immutable copy of a store's state at one revision
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<S> {
    pub revision: u64,
    pub state: S,
}

impl<S> Deref for Snapshot<S> {
    type Target = S;

    fn deref(&self) -> &S {
        &self.state
    }
}

#[derive(Debug)]
pub(crate) struct StateCell<S> {
    inner: RwLock<(u64, S)>,
}

impl<S: Clone> StateCell<S> {
    pub(crate) fn new(state: S) -> Self {
        Self {
            inner: RwLock::new((0, state)),
        }
    }

    pub(crate) fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.inner.read().1)
    }

    pub(crate) fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut guard = self.inner.write();
        guard.0 += 1;
        f(&mut guard.1)
    }

    pub(crate) fn snapshot(&self) -> Snapshot<S> {
        let guard = self.inner.read();
        Snapshot {
            revision: guard.0,
            state: guard.1.clone(),
        }
    }
}

/// Hands out increasing tickets; only the newest one is current
#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    latest: AtomicU64,
}

impl Sequencer {
    pub(crate) fn ticket(&self) -> u64 {
        self.latest.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub(crate) fn is_latest(&self, ticket: u64) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket
    }
}

/// Per-resource loading flags, counted so overlapping actions do not clear
/// each other
#[derive(Debug)]
pub struct LoadingSet<K> {
    active: Mutex<HashMap<K, usize>>,
}

impl<K> Default for LoadingSet<K> {
    fn default() -> Self {
        Self {
            active: Mutex::new(HashMap::new()),
        }
    }
}

impl<K: Copy + Eq + Hash> LoadingSet<K> {
    pub fn begin(&self, key: K) -> LoadingGuard<'_, K> {
        *self.active.lock().entry(key).or_insert(0) += 1;
        LoadingGuard { set: self, key }
    }

    pub fn is_loading(&self, key: K) -> bool {
        self.active.lock().get(&key).copied().unwrap_or(0) > 0
    }

    pub fn any(&self) -> bool {
        self.active.lock().values().any(|count| *count > 0)
    }

    fn finish(&self, key: K) {
        let mut active = self.active.lock();
        if let Some(count) = active.get_mut(&key) {
            *count -= 1;
            if *count == 0 {
                active.remove(&key);
            }
        }
    }
}

/// Clears its loading flag on drop, including on early error returns
#[derive(Debug)]
pub struct LoadingGuard<'a, K: Copy + Eq + Hash> {
    set: &'a LoadingSet<K>,
    key: K,
}

impl<K: Copy + Eq + Hash> Drop for LoadingGuard<'_, K> {
    fn drop(&mut self) {
        self.set.finish(self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revision_bumps_on_update() {
        let cell = StateCell::new(vec![1]);
        assert_eq!(cell.snapshot().revision, 0);

        cell.update(|v| v.push(2));
        let snap = cell.snapshot();
        assert_eq!(snap.revision, 1);
        assert_eq!(*snap, vec![1, 2]);

        assert_eq!(cell.read(|v| v.len()), 2);
        assert_eq!(cell.snapshot().revision, 1);
    }

    #[test]
    fn test_only_newest_ticket_is_latest() {
        let seq = Sequencer::default();
        let first = seq.ticket();
        let second = seq.ticket();
        assert!(!seq.is_latest(first));
        assert!(seq.is_latest(second));
    }

    #[test]
    fn test_loading_guard_counts_overlap() {
        let set = LoadingSet::default();
        let a = set.begin("list");
        let b = set.begin("list");
        drop(a);
        assert!(set.is_loading("list"));
        drop(b);
        assert!(!set.is_loading("list"));
        assert!(!set.any());
    }
}
