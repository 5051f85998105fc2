//! Semantic invariants of an allocation state.
//!
//! Both checks return every violation found rather than stopping at the first,
//! so a malformed state file reports all of its problems at once.

use crate::core::state::SystemState;
use crate::core::vector;

/// Check construction inputs before any vector is derived from them:
/// - `max` and `allocation` have one row per process
/// - every row has one column per resource type
/// - `allocation[i][j] <= max[i][j] <= total[j]`
/// - `sum_i allocation[i][j] <= total[j]`
pub fn validate_matrices(
    total: &[u64],
    max: &[Vec<u64>],
    allocation: &[Vec<u64>],
) -> Vec<String> {
    let mut errors = Vec::new();
    let m = total.len();

    if max.len() != allocation.len() {
        errors.push(format!(
            "max has {} rows but allocation has {}",
            max.len(),
            allocation.len()
        ));
        return errors;
    }

    let mut shaped = true;
    for (pid, (max_row, alloc_row)) in max.iter().zip(allocation).enumerate() {
        if max_row.len() != m {
            errors.push(format!("P{}: max has {} columns, expected {}", pid, max_row.len(), m));
            shaped = false;
        }
        if alloc_row.len() != m {
            errors.push(format!(
                "P{}: allocation has {} columns, expected {}",
                pid,
                alloc_row.len(),
                m
            ));
            shaped = false;
        }
    }
    if !shaped {
        return errors;
    }

    for (pid, (max_row, alloc_row)) in max.iter().zip(allocation).enumerate() {
        let columns = alloc_row.iter().zip(max_row).zip(total).enumerate();
        for (j, ((alloc_j, max_j), total_j)) in columns {
            if alloc_j > max_j {
                errors.push(format!(
                    "P{}: allocation {} exceeds max {} for R{}",
                    pid, alloc_j, max_j, j
                ));
            }
            if max_j > total_j {
                errors.push(format!(
                    "P{}: max {} exceeds total {} for R{}",
                    pid, max_j, total_j, j
                ));
            }
        }
    }

    for (j, total_j) in total.iter().enumerate() {
        match column_sum(allocation, j) {
            Some(allocated) if allocated > *total_j => errors.push(format!(
                "R{}: allocated {} exceeds total {}",
                j, allocated, total_j
            )),
            Some(_) => {}
            None => errors.push(format!("R{}: allocated sum overflows", j)),
        }
    }

    errors
}

/// Check every invariant of a constructed state:
/// - the matrix checks of [`validate_matrices`]
/// - `need[i] == max[i] - allocation[i]`
/// - `available[j] + sum_i allocation[i][j] == total[j]`
///
/// `available[j] >= 0` holds by construction of the unsigned vector type.
pub fn validate_invariants(state: &SystemState) -> Vec<String> {
    let mut errors = validate_matrices(
        state.total(),
        state.max_matrix(),
        state.allocation_matrix(),
    );
    if !errors.is_empty() {
        return errors;
    }

    let m = state.resource_count();
    if state.available().len() != m {
        errors.push(format!(
            "available has {} columns, expected {}",
            state.available().len(),
            m
        ));
        return errors;
    }
    if state.need_matrix().len() != state.process_count() {
        errors.push(format!(
            "need has {} rows, expected {}",
            state.need_matrix().len(),
            state.process_count()
        ));
        return errors;
    }

    for pid in 0..state.process_count() {
        let expected = vector::sub(state.max(pid), state.allocation(pid));
        if state.need(pid) != expected.as_slice() {
            errors.push(format!(
                "P{}: need {:?} differs from max - allocation {:?}",
                pid,
                state.need(pid),
                expected
            ));
        }
    }

    for (j, (available, total)) in state.available().iter().zip(state.total()).enumerate() {
        let accounted = column_sum(state.allocation_matrix(), j)
            .and_then(|allocated| allocated.checked_add(*available));
        match accounted {
            Some(accounted) if accounted == *total => {}
            Some(accounted) => errors.push(format!(
                "R{}: available {} + allocated {} != total {}",
                j,
                available,
                accounted - available,
                total
            )),
            None => errors.push(format!("R{}: available + allocated overflows", j)),
        }
    }

    errors
}

/// `sum_i allocation[i][j]`, or `None` if it does not fit in `u64`.
fn column_sum(allocation: &[Vec<u64>], j: usize) -> Option<u64> {
    allocation
        .iter()
        .try_fold(0u64, |acc, row| acc.checked_add(row[j]))
}
