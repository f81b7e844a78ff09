//! Configuration for graphql-dsl clients.
//!
//! A project describes its endpoint, where the schema comes from and how
//! custom scalars and field names are treated in a `.graphql-dsl.yml` (or
//! `.yaml`, `.json`, `.toml`) file. [`find_config`] walks up from a directory
//! to locate one; [`load_config`] parses and validates it.

mod config;
mod error;
mod loader;

pub use config::{DslConfig, EndpointConfig, ScalarKind, SchemaSource};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
