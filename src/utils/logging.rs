// src/utils/logging.rs
use tracing_subscriber::{fmt, EnvFilter};

/// Crate logs at info, dependencies only when they warn.
const DEFAULT_FILTER: &str = "warn,officer_search=info";

/// Installs the global `fmt` subscriber. `RUST_LOG` takes precedence over
/// the default filter.
pub fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter());

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("Logging setup complete.");
}

fn default_filter() -> EnvFilter {
    EnvFilter::new(DEFAULT_FILTER)
}
