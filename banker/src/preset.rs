//! Canned example states.

use crate::core::state::{StateMatrices, SystemState};

/// The textbook five-process, three-resource example.
///
/// `total = [10, 5, 7]`, which leaves `available = [3, 3, 2]`.
pub fn classic_matrices() -> StateMatrices {
    StateMatrices {
        total: vec![10, 5, 7],
        max: vec![
            vec![7, 5, 3],
            vec![3, 2, 2],
            vec![9, 0, 2],
            vec![2, 2, 2],
            vec![4, 3, 3],
        ],
        allocation: vec![
            vec![0, 1, 0],
            vec![2, 0, 0],
            vec![3, 0, 2],
            vec![2, 1, 1],
            vec![0, 0, 2],
        ],
    }
}

pub fn classic() -> SystemState {
    SystemState::from_trusted(classic_matrices())
}
