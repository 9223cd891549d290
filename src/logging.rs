//! Diagnostic logging on stderr via `tracing-subscriber`.
//!
//! User-facing progress goes to stdout through [`crate::output`]; this module
//! only carries diagnostics (per-album failures, cache decisions, document
//! writes). `RUST_LOG` overrides the verbosity flags.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default filter directive for a `-v` count.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

fn build_env_filter(verbosity: u8) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(verbosity))
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}
