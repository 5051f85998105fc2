//! Stable exit codes for banker CLI commands.

/// Command succeeded, the state is safe, or the request was granted.
pub const OK: i32 = 0;
/// Command failed due to invalid config, state file, arguments or other errors.
/// Command-line usage errors are mapped here too, instead of clap's default 2.
pub const INVALID: i32 = 1;
/// `banker check` found the state unsafe.
pub const UNSAFE: i32 = 2;
/// `banker request` was rejected (validation or unsafe after allocation).
pub const REJECTED: i32 = 3;
