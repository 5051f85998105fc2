//! Deadlock-avoidance resource allocator (banker's algorithm).
//!
//! The crate tracks, for a fixed set of processes, the maximum units of each
//! resource type they may claim, what they currently hold and what is still
//! free, and grants a request only if the resulting state stays safe. The
//! architecture enforces a strict separation:
//!
//! - **[`core`]**: Pure, deterministic logic (vector algebra, state,
//!   safety check, request transactions). No I/O, fully testable in isolation.
//! - **[`io`]**: Side-effecting operations (config and state files).
//!
//! [`bank`] serializes access to one state across threads; [`shell`],
//! [`command`] and [`render`] form the text boundary used by the CLI.

pub mod bank;
pub mod command;
pub mod core;
pub mod exit_codes;
pub mod io;
pub mod logging;
pub mod preset;
pub mod render;
pub mod shell;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
