//! Shared update state.
//!
//! One `UpdateState` is shared (behind an `Arc`) by the checker and the
//! applier. It records which version is ready to apply and whether a check is
//! currently running.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::version::Version;

/// Version ready to apply plus the single-flight flag for checks.
#[derive(Debug, Default)]
pub struct UpdateState {
    pending: Mutex<Option<Version>>,
    checking: AtomicBool,
}

impl UpdateState {
    /// Creates an empty state: nothing pending, no check running.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the version that is downloaded (or detected) and ready to apply.
    #[must_use]
    pub fn pending_version(&self) -> Option<Version> {
        self.pending.lock().clone()
    }

    /// Returns whether an update is ready to apply.
    #[must_use]
    pub fn is_update_ready(&self) -> bool {
        self.pending.lock().is_some()
    }

    /// Records `version` as ready to apply. Last writer wins.
    pub fn set_pending(&self, version: Version) {
        let previous = self.pending.lock().replace(version.clone());
        if let Some(previous) = previous.filter(|p| *p != version) {
            tracing::debug!("Pending update changed from {} to {}", previous, version);
        }
    }

    /// Returns whether a check currently holds the guard.
    #[must_use]
    pub fn is_checking(&self) -> bool {
        self.checking.load(Ordering::Acquire)
    }

    /// Marks a check as running.
    ///
    /// Returns `None` when another check already holds the guard. The flag is
    /// cleared when the returned guard is dropped.
    #[must_use]
    pub fn try_begin_check(&self) -> Option<CheckGuard<'_>> {
        self.checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| CheckGuard { state: self })
    }
}

/// Clears the "check in progress" flag on drop.
#[derive(Debug)]
pub struct CheckGuard<'a> {
    state: &'a UpdateState,
}

impl Drop for CheckGuard<'_> {
    fn drop(&mut self) {
        self.state.checking.store(false, Ordering::Release);
    }
}
