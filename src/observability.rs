//! Observability setup.
//!
//! Installs a `tracing` subscriber writing to stderr. Stdout is reserved
//! for MCP protocol frames, so nothing here may ever write to it. The
//! `RUST_LOG` environment variable overrides the default filter.

use tracing_subscriber::EnvFilter;

/// Initializes logging.
///
/// Idempotent: a second call (e.g. from tests) is a no-op.
pub fn init(verbose: bool) {
    let default_directive = if verbose {
        "plainmcp=debug,info"
    } else {
        "plainmcp=info,warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
