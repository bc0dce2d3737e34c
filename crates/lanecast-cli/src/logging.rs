//! Logging setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Builds the filter used by [`init`]. `RUST_LOG` wins when set.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default = if verbose { "debug" } else { "info" };
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default))
}

/// Installs the global subscriber, logging to stderr so stdout stays free
/// for command output. Calling it twice is harmless.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .try_init();
}
