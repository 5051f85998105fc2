//! Structured, language-neutral audit events.
//!
//! Events are recorded in the order the core performs each transition. They
//! carry indices and vector snapshots only; [`crate::render::render_trace`]
//! turns them into text.

use serde::{Deserialize, Serialize};

use crate::core::types::{Rejection, ResourceVector};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A new pass over all unfinished processes begins (1-indexed).
    PassStarted { pass: usize },
    /// `pid` could finish with the current work vector and released its
    /// allocation.
    ProcessFinished {
        pass: usize,
        pid: usize,
        need: ResourceVector,
        work_before: ResourceVector,
        work_after: ResourceVector,
    },
    /// Every process finished; `order` is the completion sequence.
    Safe { order: Vec<usize> },
    /// No further process could finish.
    Unsafe {
        completed: Vec<usize>,
        remaining: Vec<usize>,
    },
    RequestReceived { pid: usize, request: Vec<i64> },
    /// The request failed validation before any mutation.
    RequestRejected { reason: Rejection },
    /// State after the provisional allocation, before the safety check.
    TentativelyAllocated {
        pid: usize,
        available: ResourceVector,
        allocation: ResourceVector,
        need: ResourceVector,
    },
    Committed { pid: usize },
    /// The snapshot of `available`, `allocation[pid]` and `need[pid]` was
    /// restored.
    RolledBack { pid: usize },
}
