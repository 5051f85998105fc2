//! Elementwise algebra over fixed-length resource vectors.
//!
//! Callers guarantee equal lengths; a mismatch is a dimension error raised at
//! the request boundary, never here.

use crate::core::types::ResourceVector;

/// True iff `a[k] <= b[k]` for every `k`.
pub fn leq(a: &[u64], b: &[u64]) -> bool {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    a.iter().zip(b).all(|(left, right)| left <= right)
}

pub fn add(a: &[u64], b: &[u64]) -> ResourceVector {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    a.iter().zip(b).map(|(left, right)| left + right).collect()
}

/// Elementwise `a - b`, saturating at zero.
///
/// Only called where `b <= a` already holds, so saturation never triggers in
/// a well-formed state.
pub fn sub(a: &[u64], b: &[u64]) -> ResourceVector {
    debug_assert_eq!(a.len(), b.len(), "vector length mismatch");
    a.iter()
        .zip(b)
        .map(|(left, right)| left.saturating_sub(*right))
        .collect()
}
