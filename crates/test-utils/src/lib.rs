//! Shared test utilities for the graphql-dsl crates.

pub mod assertions;
pub mod fixtures;
mod transport;

pub use fixtures::{starwars_schema, STARWARS_SCHEMA};
pub use transport::MockTransport;

/// Install a fmt subscriber for the current test binary.
///
/// Filtering follows `RUST_LOG` and is off by default. Safe to call from
/// every test; only the first call installs anything.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("off")),
        )
        .with_test_writer()
        .try_init();
}
