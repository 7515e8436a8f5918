//! Developer-diagnostics logging.
//!
//! Initializes tracing to stderr with `RUST_LOG`-style filtering. This is
//! separate from the audit log: tracing is for whoever operates the binary,
//! the audit file is the contractual record of connections and statements.

use tracing_subscriber::EnvFilter;

/// Initializes stderr logging with an env-filter (default level: info).
pub fn init() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
