//! Formatting helpers for snapshot testing with insta.
//!
//! Rendered documents and inflated results are formatted consistently so
//! snapshots stay readable.

use graphql_dsl::{DslError, ResultFragment};

/// Pretty-print an inflated result as JSON keyed by accessor name.
///
/// # Example
///
/// ```
/// use graphql_dsl_test_utils::assertions::format_fragment;
/// use graphql_dsl_test_utils::starwars_schema;
/// use serde_json::json;
///
/// let dsl = starwars_schema();
/// let hero = dsl
///     .field("Query", "hero")
///     .unwrap()
///     .select([dsl.field("Character", "name").unwrap()])
///     .unwrap();
/// let result = dsl
///     .query()
///     .unwrap()
///     .select([hero])
///     .inflate(&json!({"hero": {"__typename": "Droid", "name": "R2-D2"}}))
///     .unwrap();
/// assert_eq!(format_fragment(&result), "{\n  \"hero\": {\n    \"name\": \"R2-D2\"\n  }\n}");
/// ```
pub fn format_fragment(fragment: &ResultFragment) -> String {
    serde_json::to_string_pretty(fragment).unwrap_or_else(|err| format!("(unserializable: {err})"))
}

/// Format a list of errors, one numbered line each.
pub fn format_errors(errors: &[DslError]) -> String {
    if errors.is_empty() {
        return String::from("(no errors)");
    }

    errors
        .iter()
        .enumerate()
        .map(|(i, e)| format!("[{}] {e}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphql_dsl::SchemaLookupError;

    #[test]
    fn test_format_errors_empty() {
        assert_eq!(format_errors(&[]), "(no errors)");
    }

    #[test]
    fn test_format_errors() {
        let errors = vec![
            DslError::from(SchemaLookupError::UnknownType("Starship".into())),
            DslError::InvalidName("not a name".into()),
        ];
        assert_eq!(
            format_errors(&errors),
            "[1] Type Starship doesn't exist in the schema\n[2] Invalid GraphQL name: not a name"
        );
    }
}
