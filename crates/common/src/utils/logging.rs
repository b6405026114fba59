use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Store events at info, everything else at warn.
const DEFAULT_DIRECTIVES: &str = "warn,service=info,instances=info";

/// `RUST_LOG` when set, otherwise [`DEFAULT_DIRECTIVES`].
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Compact human-readable logs on stderr, keeping stdout free for command output.
pub fn init_logging_default() {
    let _ = fmt()
        .with_env_filter(default_filter())
        .with_target(false)
        .compact()
        .with_writer(io::stderr)
        .try_init();
}

/// JSON structured logs on stderr.
pub fn init_logging_json() {
    // RUST_LOG=debug,service::storage=trace shows every load/save cycle
    let _ = fmt()
        .with_env_filter(default_filter())
        .with_target(true)
        .json()
        .with_writer(io::stderr)
        .try_init();
}
