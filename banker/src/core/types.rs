//! Shared deterministic types for the allocator core.
//!
//! These types define stable contracts between core components and the
//! presentation boundary. They carry structured data only; text rendering
//! lives in [`crate::render`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::trace::TraceEvent;

/// One non-negative count per resource type.
pub type ResourceVector = Vec<u64>;

/// Why a request was not granted.
///
/// Every variant is a local, recoverable rejection. None of them leaves the
/// state modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Rejection {
    /// `pid` is outside `0..process_count`.
    InvalidProcessId { pid: usize, process_count: usize },
    /// Request length differs from the number of resource types.
    DimensionMismatch { expected: usize, actual: usize },
    /// A request component is below zero.
    NegativeRequest { index: usize, value: i64 },
    /// The process asked for more than its remaining declared need.
    ExceedsNeed {
        index: usize,
        requested: u64,
        need: u64,
    },
    /// Not enough free units right now; the process must wait.
    ExceedsAvailable {
        index: usize,
        requested: u64,
        available: u64,
    },
    /// Granting would leave the system unsafe; the tentative allocation was
    /// rolled back.
    UnsafeAfterAllocation { remaining: Vec<usize> },
}

impl Rejection {
    /// Stable snake_case code, matching the serialized `kind` tag.
    pub fn code(&self) -> &'static str {
        match self {
            Rejection::InvalidProcessId { .. } => "invalid_process_id",
            Rejection::DimensionMismatch { .. } => "dimension_mismatch",
            Rejection::NegativeRequest { .. } => "negative_request",
            Rejection::ExceedsNeed { .. } => "exceeds_need",
            Rejection::ExceedsAvailable { .. } => "exceeds_available",
            Rejection::UnsafeAfterAllocation { .. } => "unsafe_after_allocation",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::InvalidProcessId { pid, process_count } => write!(
                f,
                "invalid process id {} (valid ids are 0..{})",
                pid, process_count
            ),
            Rejection::DimensionMismatch { expected, actual } => write!(
                f,
                "request has {} components but there are {} resource types",
                actual, expected
            ),
            Rejection::NegativeRequest { index, value } => {
                write!(f, "request component R{} is negative ({})", index, value)
            }
            Rejection::ExceedsNeed {
                index,
                requested,
                need,
            } => write!(
                f,
                "request for R{} ({}) exceeds remaining need ({})",
                index, requested, need
            ),
            Rejection::ExceedsAvailable {
                index,
                requested,
                available,
            } => write!(
                f,
                "request for R{} ({}) exceeds available units ({}); process must wait",
                index, requested, available
            ),
            Rejection::UnsafeAfterAllocation { remaining } => {
                let ids: Vec<String> = remaining.iter().map(|pid| format!("P{}", pid)).collect();
                write!(
                    f,
                    "granting would leave the system unsafe (unresolved: {})",
                    ids.join(", ")
                )
            }
        }
    }
}

/// Result of running the safety algorithm over a state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub safe: bool,
    /// Completion order. When unsafe, only the processes that did complete.
    pub order: Vec<usize>,
    pub trace: Vec<TraceEvent>,
}

impl SafetyReport {
    /// Process ids that never completed, in ascending order.
    pub fn remaining(&self, process_count: usize) -> Vec<usize> {
        (0..process_count)
            .filter(|pid| !self.order.contains(pid))
            .collect()
    }
}

/// Result of a request transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RequestOutcome {
    Granted {
        trace: Vec<TraceEvent>,
    },
    Rejected {
        reason: Rejection,
        trace: Vec<TraceEvent>,
    },
}

impl RequestOutcome {
    pub fn is_granted(&self) -> bool {
        matches!(self, RequestOutcome::Granted { .. })
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            RequestOutcome::Granted { .. } => None,
            RequestOutcome::Rejected { reason, .. } => Some(reason),
        }
    }

    pub fn trace(&self) -> &[TraceEvent] {
        match self {
            RequestOutcome::Granted { trace } | RequestOutcome::Rejected { trace, .. } => trace,
        }
    }
}
