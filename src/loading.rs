//! Initial-load and manual-refresh tracking
//!
//! A panel distinguishes "nothing loaded yet" (`initial_loading`) from
//! "stale data being refreshed" (`refreshing`). At most one load runs at a
//! time; a request made while another is in flight is dropped, not queued.
//! The one exception is a follow-up requested after a mutation: it is
//! remembered and served by whichever load is running when it arrives.

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;

/// Snapshot of a panel's loading flags
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingFlags {
    pub initial_loading: bool,
    pub refreshing: bool,
}

impl LoadingFlags {
    pub fn busy(self) -> bool {
        self.initial_loading || self.refreshing
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadKind {
    Initial,
    Refresh,
}

/// What a load or refresh request did
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// A batch ran and its results were committed
    Applied,
    /// Another load was in flight; nothing was fetched
    Skipped,
}

#[derive(Debug, Default)]
pub struct LoadTracker {
    in_flight: AtomicBool,
    initial_loading: AtomicBool,
    refreshing: AtomicBool,
    /// Set once any load has committed; later initial loads count as refreshes.
    loaded: AtomicBool,
    follow_up: AtomicBool,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the tracker for a load of `kind`.
    ///
    /// Returns `None` while another load holds it. The returned guard clears
    /// the flag when dropped, whichever way the load ends. An `Initial`
    /// request made after a load has committed runs as a `Refresh`.
    pub fn try_begin(&self, kind: LoadKind) -> Option<LoadGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()?;
        // This load reads after any earlier follow-up request, so it serves it.
        self.follow_up.store(false, Ordering::SeqCst);
        let kind = match kind {
            LoadKind::Initial if self.loaded.load(Ordering::Acquire) => LoadKind::Refresh,
            kind => kind,
        };
        self.flag(kind).store(true, Ordering::Release);
        Some(LoadGuard { tracker: self, kind })
    }

    /// Ask for one more load because the backing data just changed.
    ///
    /// Call before attempting the load. If another load holds the tracker,
    /// its owner picks the request up with [`take_follow_up`](Self::take_follow_up)
    /// once its guard is dropped.
    pub fn request_follow_up(&self) {
        self.follow_up.store(true, Ordering::SeqCst);
    }

    /// Consume a follow-up request made while the caller's load was in flight.
    pub fn take_follow_up(&self) -> bool {
        self.follow_up.swap(false, Ordering::SeqCst)
    }

    pub fn flags(&self) -> LoadingFlags {
        LoadingFlags {
            initial_loading: self.initial_loading.load(Ordering::Acquire),
            refreshing: self.refreshing.load(Ordering::Acquire),
        }
    }

    fn flag(&self, kind: LoadKind) -> &AtomicBool {
        match kind {
            LoadKind::Initial => &self.initial_loading,
            LoadKind::Refresh => &self.refreshing,
        }
    }
}

/// Held for the duration of one load
#[derive(Debug)]
pub struct LoadGuard<'a> {
    tracker: &'a LoadTracker,
    kind: LoadKind,
}

impl LoadGuard<'_> {
    pub fn kind(&self) -> LoadKind {
        self.kind
    }

    /// Record that this load's results were committed.
    pub fn commit(&self) {
        self.tracker.loaded.store(true, Ordering::Release);
    }
}

impl Drop for LoadGuard<'_> {
    fn drop(&mut self) {
        self.tracker.flag(self.kind).store(false, Ordering::Release);
        self.tracker.in_flight.store(false, Ordering::SeqCst);
    }
}
