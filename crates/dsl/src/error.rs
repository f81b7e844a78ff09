use crate::operation::OperationKind;
use crate::transport::{GraphQLError, TransportError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DslError>;

/// A type or field name that does not exist on the schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaLookupError {
    #[error("Type {0} doesn't exist in the schema")]
    UnknownType(String),

    #[error("Type {0} has no fields to select")]
    NotComposite(String),

    #[error("Field {field} doesn't exist in type {type_name}")]
    UnknownField { type_name: String, field: String },

    #[error("Schema has no {0} root type")]
    MissingRoot(OperationKind),
}

#[derive(Debug, Error)]
pub enum DslError {
    #[error(transparent)]
    SchemaLookup(#[from] SchemaLookupError),

    #[error("Field {field} has a leaf type and cannot select sub-fields")]
    LeafSelection { field: String },

    #[error("Field {field} has a composite type but no sub-fields were selected")]
    EmptySelectionSet { field: String },

    #[error("Invalid GraphQL name: {0}")]
    InvalidName(String),

    #[error("Invalid argument {argument} on field {field}: {reason}")]
    ArgumentSerialization {
        field: String,
        argument: String,
        reason: String,
    },

    #[error("Response does not match the selection at {path}: {reason}")]
    ShapeMismatch { path: String, reason: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Server returned {} error(s): {}", .0.len(), first_message(.0))]
    Execution(Vec<GraphQLError>),

    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
}

fn first_message(errors: &[GraphQLError]) -> &str {
    errors.first().map_or("", |e| e.message.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = DslError::from(SchemaLookupError::UnknownField {
            type_name: "Character".into(),
            field: "nmae".into(),
        });
        assert_eq!(err.to_string(), "Field nmae doesn't exist in type Character");

        let err = DslError::Execution(vec![GraphQLError::new("boom")]);
        assert_eq!(err.to_string(), "Server returned 1 error(s): boom");
    }
}
