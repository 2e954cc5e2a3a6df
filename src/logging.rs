//! Logging setup.
//!
//! All diagnostics go to stderr through `tracing`; stdout carries only the
//! benchmark report. `RUST_LOG` wins over the verbosity flags when set.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Map `-v` counts and `--quiet` to a default filter directive.
#[must_use]
pub fn default_directive(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber.
///
/// `filter_override` takes precedence over both `RUST_LOG` and the flags.
///
/// # Errors
///
/// Returns an error if the filter does not parse or a subscriber is already set.
pub fn init_logging(
    verbose: u8,
    quiet: bool,
    filter_override: Option<&str>,
) -> anyhow::Result<()> {
    let filter = match filter_override {
        Some(directive) => EnvFilter::try_new(directive)?,
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_directive(verbose, quiet)))?,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose > 1),
        )
        .try_init()?;

    Ok(())
}

/// Subscriber for unit and integration tests; safe to call repeatedly.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}
