//! Tracing subscriber setup

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins when set. Otherwise only warnings are shown, or
/// everything down to debug with `--verbose`. Run outcomes are printed to
/// stdout by the commands themselves.
pub fn init(verbose: bool) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let default = if verbose { "debug" } else { "warn" };
    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(verbose)
        .with_level(true)
        .compact();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
