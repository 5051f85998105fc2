//! The allocation state: totals, free units and per-process matrices.

use serde::{Deserialize, Serialize};

use crate::core::invariants::validate_matrices;
use crate::core::types::ResourceVector;
use crate::core::vector;

/// Construction input: everything else is derived from these three.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateMatrices {
    pub total: ResourceVector,
    pub max: Vec<ResourceVector>,
    pub allocation: Vec<ResourceVector>,
}

/// Resource bookkeeping for `n` processes over `m` resource types.
///
/// Fields are private: after construction the only writer is
/// [`crate::core::request::request`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SystemState {
    total: ResourceVector,
    available: ResourceVector,
    max: Vec<ResourceVector>,
    allocation: Vec<ResourceVector>,
    need: Vec<ResourceVector>,
}

/// Pre-transaction values restored on rollback.
#[derive(Debug, Clone)]
pub(crate) struct Snapshot {
    pid: usize,
    available: ResourceVector,
    allocation: ResourceVector,
    need: ResourceVector,
}

impl SystemState {
    /// Build a state, deriving `available = total - sum(allocation)` and
    /// `need = max - allocation`.
    ///
    /// Returns every invariant violation when the matrices are inconsistent.
    pub fn new(
        total: ResourceVector,
        max: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Result<Self, Vec<String>> {
        let errors = validate_matrices(&total, &max, &allocation);
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(Self::derive(total, max, allocation))
    }

    /// Build a state from matrices already known to satisfy the invariants,
    /// such as a compiled-in preset.
    pub(crate) fn from_trusted(matrices: StateMatrices) -> Self {
        debug_assert!(
            validate_matrices(&matrices.total, &matrices.max, &matrices.allocation).is_empty(),
            "trusted matrices violate invariants"
        );
        Self::derive(matrices.total, matrices.max, matrices.allocation)
    }

    // Validation guarantees every column sum fits within `total`.
    fn derive(
        total: ResourceVector,
        max: Vec<ResourceVector>,
        allocation: Vec<ResourceVector>,
    ) -> Self {
        let allocated = allocation
            .iter()
            .fold(vec![0; total.len()], |acc, row| vector::add(&acc, row));
        let available = vector::sub(&total, &allocated);
        let need = max
            .iter()
            .zip(&allocation)
            .map(|(max_row, alloc_row)| vector::sub(max_row, alloc_row))
            .collect();

        Self {
            total,
            available,
            max,
            allocation,
            need,
        }
    }

    pub fn from_matrices(matrices: StateMatrices) -> Result<Self, Vec<String>> {
        Self::new(matrices.total, matrices.max, matrices.allocation)
    }

    /// The construction input that reproduces this state.
    pub fn matrices(&self) -> StateMatrices {
        StateMatrices {
            total: self.total.clone(),
            max: self.max.clone(),
            allocation: self.allocation.clone(),
        }
    }

    /// Number of processes (`n`).
    pub fn process_count(&self) -> usize {
        self.max.len()
    }

    /// Number of resource types (`m`).
    pub fn resource_count(&self) -> usize {
        self.total.len()
    }

    pub fn total(&self) -> &[u64] {
        &self.total
    }

    pub fn available(&self) -> &[u64] {
        &self.available
    }

    /// Declared maximum of `pid`. Panics if `pid` is out of range.
    pub fn max(&self, pid: usize) -> &[u64] {
        &self.max[pid]
    }

    pub fn allocation(&self, pid: usize) -> &[u64] {
        &self.allocation[pid]
    }

    pub fn need(&self, pid: usize) -> &[u64] {
        &self.need[pid]
    }

    pub fn max_matrix(&self) -> &[ResourceVector] {
        &self.max
    }

    pub fn allocation_matrix(&self) -> &[ResourceVector] {
        &self.allocation
    }

    pub fn need_matrix(&self) -> &[ResourceVector] {
        &self.need
    }

    pub(crate) fn snapshot(&self, pid: usize) -> Snapshot {
        Snapshot {
            pid,
            available: self.available.clone(),
            allocation: self.allocation[pid].clone(),
            need: self.need[pid].clone(),
        }
    }

    /// Move `req` from `available` to `pid`. Caller has checked
    /// `req <= need[pid]` and `req <= available`.
    pub(crate) fn allocate(&mut self, pid: usize, req: &[u64]) {
        self.available = vector::sub(&self.available, req);
        self.allocation[pid] = vector::add(&self.allocation[pid], req);
        self.need[pid] = vector::sub(&self.need[pid], req);
    }

    pub(crate) fn restore(&mut self, snapshot: Snapshot) {
        let Snapshot {
            pid,
            available,
            allocation,
            need,
        } = snapshot;
        self.available = available;
        self.allocation[pid] = allocation;
        self.need[pid] = need;
    }
}
