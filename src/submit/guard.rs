//! Mutual exclusion for batch runs
//!
//! The guard is owned by a [`BatchRunner`](super::BatchRunner), so separate
//! runners (and separate tests) never share a busy flag. A permit releases
//! the flag when dropped, including during unwinding.

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct SessionGuard {
    active: AtomicBool,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a batch as active, or returns `None` if one already is
    pub fn try_acquire(&self) -> Option<SessionPermit<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| SessionPermit { guard: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }
}

/// Proof that the holder is the only running batch
#[derive(Debug)]
pub struct SessionPermit<'a> {
    guard: &'a SessionGuard,
}

impl Drop for SessionPermit<'_> {
    fn drop(&mut self) {
        self.guard.active.store(false, Ordering::Release);
    }
}
