//! Presentation layer: turns states, reports and trace events into text.
//!
//! The core only produces structured data. Everything human-readable is built
//! here, and the state table goes through a minijinja template so its layout
//! can change without touching the column math.

use anyhow::{Context, Result};
use minijinja::{Environment, context};
use serde::Serialize;

use crate::core::state::SystemState;
use crate::core::trace::TraceEvent;
use crate::core::types::{RequestOutcome, SafetyReport};

const STATE_TEMPLATE: &str = "\
Total:     {{ total }}
Available: {{ available }}

{{ header.label }}  {{ header.max }}  {{ header.allocation }}  {{ header.need }}
{% for row in rows %}{{ row.label }}  {{ row.max }}  {{ row.allocation }}  {{ row.need }}
{% endfor %}";

/// One padded table row.
#[derive(Debug, Serialize)]
struct RowView {
    label: String,
    max: String,
    allocation: String,
    need: String,
}

/// Render totals, free units and the per-process matrices as a table.
pub fn render_state(state: &SystemState) -> Result<String> {
    let width = state
        .total()
        .iter()
        .map(|value| value.to_string().len())
        .max()
        .unwrap_or(1);
    let cells = |row: &[u64]| {
        row.iter()
            .map(|value| format!("{:>width$}", value, width = width))
            .collect::<Vec<_>>()
            .join(" ")
    };

    let column = (state.resource_count() * (width + 1)).max("Allocation".len() + 1);
    let label_width = format!("P{}", state.process_count().saturating_sub(1))
        .len()
        .max("Process".len());
    let pad = |text: String, width: usize| format!("{:<width$}", text, width = width);

    let header = RowView {
        label: pad("Process".to_string(), label_width),
        max: pad("Max".to_string(), column),
        allocation: pad("Allocation".to_string(), column),
        need: "Need".to_string(),
    };
    let rows: Vec<RowView> = (0..state.process_count())
        .map(|pid| RowView {
            label: pad(format!("P{}", pid), label_width),
            max: pad(cells(state.max(pid)), column),
            allocation: pad(cells(state.allocation(pid)), column),
            need: cells(state.need(pid)),
        })
        .collect();

    let mut env = Environment::new();
    env.add_template("state", STATE_TEMPLATE)
        .context("parse state template")?;
    let template = env.get_template("state")?;
    let rendered = template
        .render(context! {
            total => format_vector(state.total()),
            available => format_vector(state.available()),
            header => header,
            rows => rows,
        })
        .context("render state template")?;
    Ok(rendered)
}

/// One line per trace event, in recorded order.
pub fn render_trace(trace: &[TraceEvent]) -> Vec<String> {
    trace.iter().map(render_event).collect()
}

fn render_event(event: &TraceEvent) -> String {
    match event {
        TraceEvent::PassStarted { pass } => format!("pass {}", pass),
        TraceEvent::ProcessFinished {
            pid,
            need,
            work_before,
            work_after,
            ..
        } => format!(
            "  P{} can finish: need {} <= work {}; work becomes {}",
            pid,
            format_vector(need),
            format_vector(work_before),
            format_vector(work_after)
        ),
        TraceEvent::Safe { order } => format!("safe: {}", format_order(order)),
        TraceEvent::Unsafe {
            completed,
            remaining,
        } => format!(
            "unsafe: completed [{}], unresolved {}",
            format_ids(completed),
            format_ids(remaining)
        ),
        TraceEvent::RequestReceived { pid, request } => {
            let units: Vec<String> = request.iter().map(i64::to_string).collect();
            format!("request from P{}: [{}]", pid, units.join(", "))
        }
        TraceEvent::RequestRejected { reason } => format!("rejected: {}", reason),
        TraceEvent::TentativelyAllocated {
            pid,
            available,
            allocation,
            need,
        } => format!(
            "tentatively allocated to P{}: available {}, allocation {}, need {}",
            pid,
            format_vector(available),
            format_vector(allocation),
            format_vector(need)
        ),
        TraceEvent::Committed { pid } => format!("committed allocation for P{}", pid),
        TraceEvent::RolledBack { pid } => format!("rolled back allocation for P{}", pid),
    }
}

/// One-line verdict for a safety check.
pub fn render_safety(report: &SafetyReport, process_count: usize) -> String {
    if report.safe {
        format!("SAFE: completion order {}", format_order(&report.order))
    } else {
        format!(
            "UNSAFE: unresolved {}",
            format_ids(&report.remaining(process_count))
        )
    }
}

/// One-line verdict for a request transaction.
pub fn render_outcome(outcome: &RequestOutcome) -> String {
    match outcome {
        RequestOutcome::Granted { .. } => "GRANTED".to_string(),
        RequestOutcome::Rejected { reason, .. } => {
            format!("REJECTED ({}): {}", reason.code(), reason)
        }
    }
}

fn format_vector(values: &[u64]) -> String {
    let parts: Vec<String> = values.iter().map(u64::to_string).collect();
    format!("[{}]", parts.join(", "))
}

fn format_ids(ids: &[usize]) -> String {
    ids.iter()
        .map(|pid| format!("P{}", pid))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_order(order: &[usize]) -> String {
    order
        .iter()
        .map(|pid| format!("P{}", pid))
        .collect::<Vec<_>>()
        .join(" -> ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::request::request;
    use crate::core::safety::check_safety;
    use crate::test_support::{classic_state, state_from};

    #[test]
    fn state_table_lists_every_process() {
        let rendered = render_state(&classic_state()).expect("render");
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Total:     [10, 5, 7]");
        assert_eq!(lines[1], "Available: [3, 3, 2]");
        assert!(lines[3].starts_with("Process"));
        assert!(lines[3].ends_with("Need"));
        assert!(lines[4].starts_with("P0"));
        assert!(lines[4].ends_with(" 7  4  3"));
        assert!(lines[8].starts_with("P4"));
    }

    #[test]
    fn safety_verdict_shows_order() {
        let report = check_safety(&classic_state());
        assert_eq!(
            render_safety(&report, 5),
            "SAFE: completion order P1 -> P3 -> P4 -> P0 -> P2"
        );
    }

    #[test]
    fn unsafe_verdict_lists_unresolved_processes() {
        let state = state_from(
            &[3],
            vec![vec![1], vec![3], vec![3]],
            vec![vec![0], vec![1], vec![1]],
        );
        let report = check_safety(&state);
        assert_eq!(render_safety(&report, 3), "UNSAFE: unresolved P1, P2");
        assert_eq!(
            render_trace(&report.trace).last().map(String::as_str),
            Some("unsafe: completed [P0], unresolved P1, P2")
        );
    }

    #[test]
    fn trace_lines_follow_events() {
        let mut state = classic_state();
        let outcome = request(&mut state, 0, &[0, 0, 9]);
        let lines = render_trace(outcome.trace());
        assert_eq!(lines[0], "request from P0: [0, 0, 9]");
        assert!(lines[1].starts_with("rejected: request for R2 (9) exceeds remaining need"));
        assert!(render_outcome(&outcome).starts_with("REJECTED (exceeds_need)"));
    }

    #[test]
    fn process_finished_line_shows_work_growth() {
        let report = check_safety(&classic_state());
        let lines = render_trace(&report.trace);
        assert_eq!(lines[0], "pass 1");
        assert_eq!(
            lines[1],
            "  P1 can finish: need [1, 2, 2] <= work [3, 3, 2]; work becomes [5, 3, 2]"
        );
    }
}
