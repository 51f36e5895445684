//! graphscraper-cli library
//!
//! This module exposes the internal functionality of graphscraper-cli for testing purposes.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[doc(hidden)]
pub mod commands;

pub mod types;
pub use types::{Cli, Commands, StoreArgs};

/// The log filter used unless `RUST_LOG` is set
#[must_use]
pub fn default_log_level(verbose: bool) -> &'static str {
    if verbose {
        "debug"
    } else {
        "info"
    }
}

/// Install the global tracing subscriber
pub fn setup_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_log_level(verbose)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[cfg(test)]
mod tests;
