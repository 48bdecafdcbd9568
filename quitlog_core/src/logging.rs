//! Tracing setup for quitlog.
//!
//! Log output goes to stderr so it never interleaves with the views the
//! session prints on stdout.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Map a `-v` repeat count to a default filter level.
///
/// Quiet by default: the interactive menu owns the terminal.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize logging at INFO (`RUST_LOG` overrides)
pub fn init() {
    init_with_level("info");
}

/// Install the global subscriber.
///
/// `RUST_LOG` still wins over `default_level` when set.
pub fn init_with_level(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Initialize logging for testing (captures logs for test output)
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(EnvFilter::new("debug"))
        .try_init();
}
