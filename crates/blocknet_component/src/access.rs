// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scoped suspension of access checks.
//!
//! Some mutations are legitimate even on read-only components, for example
//! when the graph synchronizer mirrors a port into a locked component. The
//! caller acquires an [`AccessGuard`]; checks stay suspended until every
//! outstanding guard is dropped.

use std::cell::Cell;
use std::rc::Rc;

/// Shared counter of outstanding access guards
#[derive(Debug, Clone, Default)]
pub struct AccessChecks {
    suspended: Rc<Cell<usize>>,
}

impl AccessChecks {
    /// Create a counter with checks enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether access checks are currently enforced
    pub fn enforced(&self) -> bool {
        self.suspended.get() == 0
    }

    /// Suspend checks until the returned guard is dropped
    pub fn suspend(&self) -> AccessGuard {
        self.suspended.set(self.suspended.get() + 1);
        AccessGuard {
            suspended: Some(Rc::clone(&self.suspended)),
        }
    }
}

/// Guard returned by [`AccessChecks::suspend`]
#[derive(Debug)]
#[must_use = "access checks are restored as soon as the guard is dropped"]
pub struct AccessGuard {
    suspended: Option<Rc<Cell<usize>>>,
}

impl AccessGuard {
    /// Guard for component systems without access control
    pub fn noop() -> Self {
        Self { suspended: None }
    }
}

impl Drop for AccessGuard {
    fn drop(&mut self) {
        if let Some(counter) = &self.suspended {
            counter.set(counter.get().saturating_sub(1));
        }
    }
}
