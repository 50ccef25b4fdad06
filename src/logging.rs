//! Logging configuration using tracing
//!
//! Logs always go to stderr; stdout is reserved for the result document.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when neither `--verbose` nor `RUST_LOG` says otherwise
const DEFAULT_DIRECTIVES: &str = "warn";

/// `--verbose` turns on debug output for this binary only
const VERBOSE_DIRECTIVES: &str = "kip=debug,warn";

/// Initialize the logging system
pub fn init(verbose: bool, json: bool) -> anyhow::Result<()> {
    let filter = build_filter(verbose, std::env::var(EnvFilter::DEFAULT_ENV).ok());

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}

fn build_filter(verbose: bool, env_directives: Option<String>) -> EnvFilter {
    if verbose {
        return EnvFilter::new(VERBOSE_DIRECTIVES);
    }

    env_directives
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVES))
}
