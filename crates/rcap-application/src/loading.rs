//! Per-store busy flag.

use std::sync::atomic::{AtomicBool, Ordering};

/// True while an action of the owning store is in flight.
///
/// Concurrent actions are not counted. Every completion clears the flag, even
/// if another action is still running.
#[derive(Debug, Default)]
pub struct LoadingFlag {
    loading: AtomicBool,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Raises the flag until the returned guard is dropped.
    pub fn begin(&self) -> LoadingGuard<'_> {
        self.loading.store(true, Ordering::SeqCst);
        LoadingGuard { flag: self }
    }
}

#[must_use = "the flag drops back to false as soon as the guard is dropped"]
pub struct LoadingGuard<'a> {
    flag: &'a LoadingFlag,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.flag.loading.store(false, Ordering::SeqCst);
    }
}
