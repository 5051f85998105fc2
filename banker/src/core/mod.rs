//! Deterministic, pure allocator logic.
//!
//! Core modules must be free of I/O side effects. They operate on an
//! in-memory [`state::SystemState`] and return structured outcomes and trace
//! events suitable for tests and for rendering at the boundary.

pub mod invariants;
pub mod request;
pub mod safety;
pub mod state;
pub mod trace;
pub mod types;
pub mod vector;
