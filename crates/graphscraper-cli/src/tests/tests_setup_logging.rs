//! Tests for the logging setup

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::default_log_level;

#[test]
fn test_verbose_selects_debug() {
    assert_eq!(default_log_level(true), "debug");
    assert_eq!(default_log_level(false), "info");
}

#[test]
fn test_default_levels_parse() {
    for verbose in [true, false] {
        let filter = EnvFilter::try_new(default_log_level(verbose));
        assert!(filter.is_ok());
    }
}

#[test]
fn test_crate_directives_parse() {
    let filter = EnvFilter::try_new("graphscraper_core=debug,sqlx=warn,info");
    assert!(filter.is_ok());
}

/// Subscriber construction must not require a global install
#[test]
fn test_registry_with_stderr_layer() {
    let _subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::new(default_log_level(false)));
}
