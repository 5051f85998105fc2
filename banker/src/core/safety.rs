//! Safety algorithm: search for an order in which every process can finish.

use tracing::debug;

use crate::core::state::SystemState;
use crate::core::trace::TraceEvent;
use crate::core::types::SafetyReport;
use crate::core::vector;

/// Decide whether `state` is safe and produce a completion order.
///
/// Each pass scans processes in ascending index order. A process whose need
/// fits in `work` finishes immediately and its allocation is added to `work`
/// before the scan continues, so later indices in the same pass see the
/// released units. Passes repeat until one finishes nobody, which bounds the
/// loop at `n + 1` passes.
///
/// Never mutates `state`.
pub fn check_safety(state: &SystemState) -> SafetyReport {
    let n = state.process_count();
    let mut work = state.available().to_vec();
    let mut finished = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut trace = Vec::new();

    for pass in 1..=n + 1 {
        trace.push(TraceEvent::PassStarted { pass });
        let mut progressed = false;

        for pid in 0..n {
            if finished[pid] || !vector::leq(state.need(pid), &work) {
                continue;
            }
            let work_after = vector::add(&work, state.allocation(pid));
            debug!(pass, pid, ?work, ?work_after, "process can finish");
            trace.push(TraceEvent::ProcessFinished {
                pass,
                pid,
                need: state.need(pid).to_vec(),
                work_before: std::mem::replace(&mut work, work_after.clone()),
                work_after,
            });
            finished[pid] = true;
            order.push(pid);
            progressed = true;
        }

        if !progressed || order.len() == n {
            break;
        }
    }

    let safe = finished.iter().all(|done| *done);
    if safe {
        debug!(?order, "state is safe");
        trace.push(TraceEvent::Safe {
            order: order.clone(),
        });
    } else {
        let remaining: Vec<usize> = (0..n).filter(|pid| !finished[*pid]).collect();
        debug!(?order, ?remaining, "state is unsafe");
        trace.push(TraceEvent::Unsafe {
            completed: order.clone(),
            remaining,
        });
    }

    SafetyReport { safe, order, trace }
}
