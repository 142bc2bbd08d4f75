//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor an explicit level is given.
pub const DEFAULT_FILTER: &str = "warn,grid_balancer=info";

/// Installs a stderr `fmt` subscriber.
///
/// `level` (e.g. `"debug"` or a full filter directive) takes priority over
/// `RUST_LOG`, which takes priority over [`DEFAULT_FILTER`]. Calling this more
/// than once is a no-op.
pub fn init_tracing(level: Option<&str>) {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
