//! Test-only helpers for constructing allocation states.

use crate::core::invariants::validate_invariants;
use crate::core::state::SystemState;

/// The five-process, three-resource example state.
pub fn classic_state() -> SystemState {
    crate::preset::classic()
}

/// Build a state from literal matrices, panicking on invariant violations.
pub fn state_from(total: &[u64], max: Vec<Vec<u64>>, allocation: Vec<Vec<u64>>) -> SystemState {
    SystemState::new(total.to_vec(), max, allocation).expect("test state violates invariants")
}

/// Panic with every violation if `state` breaks an invariant.
pub fn assert_invariants(state: &SystemState) {
    let errors = validate_invariants(state);
    assert!(errors.is_empty(), "invariant violations:\n- {}", errors.join("\n- "));
}
