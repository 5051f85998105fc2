//! Request transactions: validate, allocate tentatively, prove safety, then
//! commit or roll back.

use tracing::debug;

use crate::core::safety::check_safety;
use crate::core::state::SystemState;
use crate::core::trace::TraceEvent;
use crate::core::types::{Rejection, RequestOutcome, ResourceVector};
use crate::core::vector;

/// Try to grant `req` to process `pid`.
///
/// Validation runs in a fixed order (process id, length, sign, need,
/// availability) and the first failure is returned without touching `state`.
/// A request that passes validation is applied and the safety check is re-run
/// on the mutated state; if it is unsafe the pre-request `available`,
/// `allocation[pid]` and `need[pid]` are restored exactly.
///
/// This is the only operation that mutates a [`SystemState`].
pub fn request(state: &mut SystemState, pid: usize, req: &[i64]) -> RequestOutcome {
    let mut trace = vec![TraceEvent::RequestReceived {
        pid,
        request: req.to_vec(),
    }];

    let req = match validate_request(state, pid, req) {
        Ok(req) => req,
        Err(reason) => {
            debug!(pid, reason = reason.code(), "request failed validation");
            trace.push(TraceEvent::RequestRejected {
                reason: reason.clone(),
            });
            return RequestOutcome::Rejected { reason, trace };
        }
    };

    let snapshot = state.snapshot(pid);
    state.allocate(pid, &req);
    trace.push(TraceEvent::TentativelyAllocated {
        pid,
        available: state.available().to_vec(),
        allocation: state.allocation(pid).to_vec(),
        need: state.need(pid).to_vec(),
    });

    let report = check_safety(state);
    trace.extend(report.trace.iter().cloned());

    if report.safe {
        debug!(pid, ?req, "request committed");
        trace.push(TraceEvent::Committed { pid });
        return RequestOutcome::Granted { trace };
    }

    let remaining = report.remaining(state.process_count());
    state.restore(snapshot);
    debug!(pid, ?req, ?remaining, "request rolled back");
    trace.push(TraceEvent::RolledBack { pid });
    RequestOutcome::Rejected {
        reason: Rejection::UnsafeAfterAllocation { remaining },
        trace,
    }
}

/// Run the five validation checks, returning the request as unsigned units.
fn validate_request(
    state: &SystemState,
    pid: usize,
    req: &[i64],
) -> Result<ResourceVector, Rejection> {
    if pid >= state.process_count() {
        return Err(Rejection::InvalidProcessId {
            pid,
            process_count: state.process_count(),
        });
    }

    if req.len() != state.resource_count() {
        return Err(Rejection::DimensionMismatch {
            expected: state.resource_count(),
            actual: req.len(),
        });
    }

    let units = req
        .iter()
        .enumerate()
        .map(|(index, value)| {
            u64::try_from(*value).map_err(|_| Rejection::NegativeRequest {
                index,
                value: *value,
            })
        })
        .collect::<Result<ResourceVector, _>>()?;

    if !vector::leq(&units, state.need(pid)) {
        let index = first_excess(&units, state.need(pid));
        return Err(Rejection::ExceedsNeed {
            index,
            requested: units[index],
            need: state.need(pid)[index],
        });
    }

    if !vector::leq(&units, state.available()) {
        let index = first_excess(&units, state.available());
        return Err(Rejection::ExceedsAvailable {
            index,
            requested: units[index],
            available: state.available()[index],
        });
    }

    Ok(units)
}

/// Index of the first component where `a[k] > b[k]`. Only called after
/// `leq(a, b)` returned false.
fn first_excess(a: &[u64], b: &[u64]) -> usize {
    a.iter()
        .zip(b)
        .position(|(left, right)| left > right)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::invariants::validate_invariants;
    use crate::test_support::{classic_state, state_from};

    fn assert_rejected_unchanged(pid: usize, req: &[i64], expected: Rejection) {
        let mut state = classic_state();
        let before = state.clone();
        let outcome = request(&mut state, pid, req);
        assert_eq!(outcome.rejection(), Some(&expected));
        assert_eq!(state, before);
    }

    #[test]
    fn grants_safe_request_and_commits() {
        let mut state = classic_state();
        let outcome = request(&mut state, 1, &[1, 0, 2]);

        assert!(outcome.is_granted());
        assert_eq!(state.available(), &[2, 3, 0]);
        assert_eq!(state.allocation(1), &[3, 0, 2]);
        assert_eq!(state.need(1), &[0, 2, 0]);
        assert!(validate_invariants(&state).is_empty());
        assert_eq!(outcome.trace().last(), Some(&TraceEvent::Committed { pid: 1 }));
    }

    #[test]
    fn rejects_invalid_process_id() {
        assert_rejected_unchanged(
            5,
            &[1, 1, 1],
            Rejection::InvalidProcessId {
                pid: 5,
                process_count: 5,
            },
        );
    }

    #[test]
    fn rejects_dimension_mismatch() {
        assert_rejected_unchanged(
            0,
            &[1, 1],
            Rejection::DimensionMismatch {
                expected: 3,
                actual: 2,
            },
        );
    }

    #[test]
    fn rejects_negative_component() {
        assert_rejected_unchanged(
            0,
            &[-1, 0, 0],
            Rejection::NegativeRequest {
                index: 0,
                value: -1,
            },
        );
    }

    #[test]
    fn rejects_request_beyond_need() {
        // need[3] = [0, 1, 1]
        assert_rejected_unchanged(
            3,
            &[0, 2, 0],
            Rejection::ExceedsNeed {
                index: 1,
                requested: 2,
                need: 1,
            },
        );
    }

    #[test]
    fn rejects_request_beyond_available() {
        // need[2] = [6, 0, 0], available = [3, 3, 2]
        assert_rejected_unchanged(
            2,
            &[4, 0, 0],
            Rejection::ExceedsAvailable {
                index: 0,
                requested: 4,
                available: 3,
            },
        );
    }

    #[test]
    fn validation_order_reports_pid_before_dimension() {
        assert_rejected_unchanged(
            9,
            &[-1],
            Rejection::InvalidProcessId {
                pid: 9,
                process_count: 5,
            },
        );
    }

    #[test]
    fn rolls_back_unsafe_request() {
        let mut state = classic_state();
        assert!(request(&mut state, 1, &[1, 0, 2]).is_granted());
        let before = state.clone();

        let outcome = request(&mut state, 0, &[0, 2, 0]);
        assert_eq!(
            outcome.rejection(),
            Some(&Rejection::UnsafeAfterAllocation {
                remaining: vec![0, 1, 2, 3, 4],
            })
        );
        assert_eq!(state, before);
        assert_eq!(outcome.trace().last(), Some(&TraceEvent::RolledBack { pid: 0 }));
        assert!(outcome.trace().contains(&TraceEvent::TentativelyAllocated {
            pid: 0,
            available: vec![2, 1, 0],
            allocation: vec![0, 3, 0],
            need: vec![7, 2, 3],
        }));
    }

    #[test]
    fn validation_rejection_trace_has_no_safety_events() {
        let mut state = classic_state();
        let outcome = request(&mut state, 0, &[1]);
        assert_eq!(outcome.trace().len(), 2);
        assert!(matches!(
            outcome.trace()[1],
            TraceEvent::RequestRejected { .. }
        ));
    }

    #[test]
    fn zero_request_is_granted_on_safe_state() {
        let mut state = state_from(&[2], vec![vec![2]], vec![vec![1]]);
        let before = state.clone();
        assert!(request(&mut state, 0, &[0]).is_granted());
        assert_eq!(state, before);
    }
}
