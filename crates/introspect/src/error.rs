use graphql_dsl::{DslError, GraphQLError, TransportError};
use graphql_dsl_config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Introspection query failed: {}", join_messages(.0))]
    Execution(Vec<GraphQLError>),

    #[error("Invalid introspection response: {0}")]
    Invalid(String),

    #[error("Introspected schema is invalid: {0}")]
    Schema(String),

    #[error("Failed to read schema file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("No config file found in {} or its parents", .0.display())]
    ConfigNotFound(PathBuf),

    #[error(transparent)]
    Dsl(#[from] DslError),
}

fn join_messages(errors: &[GraphQLError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}
