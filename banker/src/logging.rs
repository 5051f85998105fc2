//! Diagnostic tracing for the allocator.
//!
//! # Separation of Concerns
//!
//! - **Tracing (this module)**: dev diagnostics via `RUST_LOG`, output to stderr.
//!   Not part of the product output.
//!
//! - **Trace events (`core::trace`)**: the structured audit of each safety
//!   check and request, rendered to stdout by the shell and CLI.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`; falls back to `default_filter` (normally the configured
/// `log_level`) and then to `warn` if that does not parse.
/// Output: stderr, compact format. Call once per process.
///
/// # Example
/// ```bash
/// RUST_LOG=banker=debug banker check
/// ```
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
