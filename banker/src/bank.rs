//! Shared, serialized access to a single allocation state.
//!
//! A [`Bank`] owns one [`SystemState`] behind a read/write lock. Requests hold
//! the write lock for the whole validate-allocate-check-commit/rollback
//! sequence; safety checks and snapshots only take the read lock.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::info;

use crate::core::request::request;
use crate::core::safety::check_safety;
use crate::core::state::SystemState;
use crate::core::types::{RequestOutcome, SafetyReport};

#[derive(Debug)]
pub struct Bank {
    state: RwLock<SystemState>,
}

impl Bank {
    pub fn new(state: SystemState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Run one request transaction against the owned state.
    pub fn request(&self, pid: usize, req: &[i64]) -> RequestOutcome {
        let mut state = self.write();
        let outcome = request(&mut state, pid, req);
        match outcome.rejection() {
            None => info!(pid, ?req, "request granted"),
            Some(reason) => info!(pid, ?req, reason = reason.code(), "request rejected"),
        }
        outcome
    }

    pub fn check_safety(&self) -> SafetyReport {
        let report = check_safety(&self.read());
        info!(safe = report.safe, order = ?report.order, "safety check");
        report
    }

    /// Clone of the current state.
    pub fn snapshot(&self) -> SystemState {
        self.read().clone()
    }

    pub fn into_inner(self) -> SystemState {
        self.state.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    // A panic can only occur outside the transaction body, so a poisoned lock
    // still guards a consistent state.
    fn read(&self) -> RwLockReadGuard<'_, SystemState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SystemState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }
}
