//! Conversion between native [`Value`]s and the wire, driven by declared types.
//!
//! Arguments are serialized into AST literals; response leaves are parsed
//! from JSON. Both directions dispatch on the same [`layer`] peeling, so list
//! and non-null handling cannot drift apart between them.

use crate::introspection::{classify, layer, TypeClass, TypeLayer};
use crate::names::to_wire_case;
use crate::scalar::ScalarError;
use crate::schema::SchemaContext;
use crate::value::Value;
use apollo_compiler::ast::{self, FloatValue, IntValue, NamedType, Type};
use apollo_compiler::collections::IndexMap;
use apollo_compiler::schema::ExtendedType;
use apollo_compiler::{Name, Node};
use thiserror::Error;

/// Why a value could not cross the codec.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct CodecError(pub String);

impl From<ScalarError> for CodecError {
    fn from(err: ScalarError) -> Self {
        Self(err.0)
    }
}

/// Variables referenced while serializing, with the type declared at the
/// position where each was used.
pub type VariableTypes = IndexMap<Name, Type>;

/// Type-directed serializer and deserializer over one schema.
#[derive(Debug, Clone, Copy)]
pub struct ValueCodec<'a> {
    context: &'a SchemaContext,
}

impl<'a> ValueCodec<'a> {
    #[must_use]
    pub const fn new(context: &'a SchemaContext) -> Self {
        Self { context }
    }

    /// Serialize `value` as a literal of declared type `ty`.
    ///
    /// `null` is accepted at any layer. Variables render as `$name` and are
    /// recorded in `variables`; reusing a variable at a different type is an
    /// error.
    pub fn serialize(
        &self,
        ty: &Type,
        value: &Value,
        variables: &mut VariableTypes,
    ) -> Result<ast::Value, CodecError> {
        match value {
            Value::Null => return Ok(ast::Value::Null),
            Value::Variable(name) => return record_variable(name, ty, variables),
            _ => {}
        }

        match layer(ty) {
            TypeLayer::List(item) => {
                let Value::List(items) = value else {
                    return Err(CodecError(format!(
                        "expected a list for {ty}, got {} {value}",
                        value.kind()
                    )));
                };
                items
                    .iter()
                    .map(|item_value| self.serialize(item, item_value, variables).map(Node::new))
                    .collect::<Result<Vec<_>, _>>()
                    .map(ast::Value::List)
            }
            TypeLayer::Named(name) => self.serialize_named(name, value, variables),
        }
    }

    fn serialize_named(
        &self,
        name: &NamedType,
        value: &Value,
        variables: &mut VariableTypes,
    ) -> Result<ast::Value, CodecError> {
        match self.context.schema().types.get(name.as_str()) {
            Some(ExtendedType::Enum(enum_type)) => {
                let member = value
                    .as_str()
                    .filter(|member| enum_type.values.contains_key(*member))
                    .ok_or_else(|| {
                        CodecError(format!("{value} is not a member of enum {name}"))
                    })?;
                Name::new(member)
                    .map(ast::Value::Enum)
                    .map_err(|_| CodecError(format!("invalid enum value {member}")))
            }
            Some(ExtendedType::InputObject(input)) => {
                let Value::Object(fields) = value else {
                    return Err(CodecError(format!(
                        "expected an object for input {name}, got {} {value}",
                        value.kind()
                    )));
                };
                let mut object = Vec::with_capacity(fields.len());
                for (key, field_value) in fields {
                    let (field_name, definition) = input
                        .fields
                        .get_key_value(key.as_str())
                        .or_else(|| input.fields.get_key_value(to_wire_case(key).as_str()))
                        .ok_or_else(|| {
                            CodecError(format!("field {key} doesn't exist in input {name}"))
                        })?;
                    let literal = self.serialize(&definition.ty, field_value, variables)?;
                    object.push((field_name.clone(), Node::new(literal)));
                }
                Ok(ast::Value::Object(object))
            }
            Some(ExtendedType::Scalar(_)) => {
                let json = self.context.scalars().get(name.as_str()).serialize(value)?;
                json_to_literal(&json)
            }
            Some(_) => Err(CodecError(format!("{name} is not an input type"))),
            None => Err(CodecError(format!("type {name} doesn't exist in the schema"))),
        }
    }

    /// Parse a response value of declared type `ty` into a native value.
    ///
    /// Wrapped leaves (`[Episode!]!`) are parsed item by item through the
    /// named type's parse function.
    pub fn deserialize(&self, ty: &Type, json: &serde_json::Value) -> Result<Value, CodecError> {
        if json.is_null() {
            return Ok(Value::Null);
        }

        match layer(ty) {
            TypeLayer::List(item) => {
                let serde_json::Value::Array(items) = json else {
                    return Err(CodecError(format!("expected a list for {ty}, got {json}")));
                };
                items
                    .iter()
                    .map(|item_json| self.deserialize(item, item_json))
                    .collect::<Result<Vec<_>, _>>()
                    .map(Value::List)
            }
            TypeLayer::Named(name) => self.deserialize_named(name, json),
        }
    }

    fn deserialize_named(
        &self,
        name: &NamedType,
        json: &serde_json::Value,
    ) -> Result<Value, CodecError> {
        match classify(self.context.schema(), name.as_str()) {
            Some(TypeClass::Enum) => json
                .as_str()
                .map(Value::enum_value)
                .ok_or_else(|| CodecError(format!("expected an enum value for {name}, got {json}"))),
            Some(TypeClass::Scalar) => Ok(self.context.scalars().get(name.as_str()).parse_value(json)?),
            // Unions are never selected into; their payload is kept as-is.
            _ => Ok(Value::Json(json.clone())),
        }
    }
}

fn record_variable(
    name: &str,
    ty: &Type,
    variables: &mut VariableTypes,
) -> Result<ast::Value, CodecError> {
    let name = Name::new(name).map_err(|_| CodecError(format!("invalid variable name {name}")))?;
    match variables.get(&name) {
        Some(existing) if existing != ty => Err(CodecError(format!(
            "variable ${name} is used as both {existing} and {ty}"
        ))),
        Some(_) => Ok(ast::Value::Variable(name)),
        None => {
            variables.insert(name.clone(), ty.clone());
            Ok(ast::Value::Variable(name))
        }
    }
}

/// Convert the JSON produced by a scalar codec into an AST literal.
pub fn json_to_literal(json: &serde_json::Value) -> Result<ast::Value, CodecError> {
    Ok(match json {
        serde_json::Value::Null => ast::Value::Null,
        serde_json::Value::Bool(b) => ast::Value::Boolean(*b),
        serde_json::Value::Number(n) if n.is_i64() || n.is_u64() => {
            ast::Value::Int(IntValue::new_parsed(&n.to_string()))
        }
        serde_json::Value::Number(n) => {
            let x = n
                .as_f64()
                .filter(|x| x.is_finite())
                .ok_or_else(|| CodecError(format!("{n} is not a finite float")))?;
            ast::Value::Float(FloatValue::new_parsed(&format!("{x:?}")))
        }
        serde_json::Value::String(s) => ast::Value::String(s.clone()),
        serde_json::Value::Array(items) => ast::Value::List(
            items
                .iter()
                .map(|item| json_to_literal(item).map(Node::new))
                .collect::<Result<_, _>>()?,
        ),
        serde_json::Value::Object(fields) => ast::Value::Object(
            fields
                .iter()
                .map(|(key, value)| {
                    let key = Name::new(key)
                        .map_err(|_| CodecError(format!("invalid object key {key}")))?;
                    Ok((key, Node::new(json_to_literal(value)?)))
                })
                .collect::<Result<_, CodecError>>()?,
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scalar::DateTimeScalar;
    use crate::schema::DslSchema;
    use apollo_compiler::name;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    const SDL: &str = r"
        type Query { search(filter: Filter, episodes: [Episode!]!, at: Instant, limit: Int): [Episode] }
        enum Episode { NEWHOPE EMPIRE JEDI }
        input Filter { nameLike: String, episode: Episode, tags: [String!] }
        scalar Instant
    ";

    fn schema() -> DslSchema {
        DslSchema::builder_from_sdl(SDL)
            .unwrap()
            .scalar("Instant", DateTimeScalar)
            .build()
    }

    fn episodes() -> Type {
        Type::Named(name!("Episode")).non_null().list().non_null()
    }

    fn render(schema: &DslSchema, ty: &Type, value: &Value) -> Result<String, CodecError> {
        let mut variables = VariableTypes::default();
        ValueCodec::new(schema.context())
            .serialize(ty, value, &mut variables)
            .map(|literal| literal.serialize().no_indent().to_string())
    }

    #[test]
    fn test_serialize_enum_list() {
        let schema = schema();
        let value = Value::from(vec![Value::enum_value("JEDI"), Value::enum_value("EMPIRE")]);
        assert_eq!(render(&schema, &episodes(), &value).unwrap(), "[JEDI, EMPIRE]");
    }

    #[test]
    fn test_serialize_enum_accepts_strings() {
        let schema = schema();
        let ty = Type::Named(name!("Episode"));
        assert_eq!(render(&schema, &ty, &Value::from("JEDI")).unwrap(), "JEDI");
        assert!(render(&schema, &ty, &Value::from("CLONES")).is_err());
    }

    #[test]
    fn test_list_requires_list() {
        let schema = schema();
        let err = render(&schema, &episodes(), &Value::enum_value("JEDI")).unwrap_err();
        assert!(err.0.contains("expected a list"), "{err}");
    }

    #[test]
    fn test_null_at_any_layer() {
        let schema = schema();
        assert_eq!(render(&schema, &episodes(), &Value::Null).unwrap(), "null");
    }

    #[test]
    fn test_input_object_uses_declared_field_types() {
        let schema = schema();
        let ty = Type::Named(name!("Filter"));
        let value = Value::object([
            ("name_like", Value::from("Sky")),
            ("episode", Value::enum_value("NEWHOPE")),
            ("tags", Value::from(vec!["jedi"])),
        ]);
        assert_eq!(
            render(&schema, &ty, &value).unwrap(),
            r#"{nameLike: "Sky", episode: NEWHOPE, tags: ["jedi"]}"#
        );

        let unknown = Value::object([("color", "red")]);
        assert!(render(&schema, &ty, &unknown).is_err());
    }

    #[test]
    fn test_variables_are_recorded() {
        let schema = schema();
        let codec = ValueCodec::new(schema.context());
        let mut variables = VariableTypes::default();

        let literal = codec
            .serialize(&episodes(), &crate::var("eps"), &mut variables)
            .unwrap();
        assert_eq!(literal.to_string(), "$eps");
        assert_eq!(variables.get("eps").map(ToString::to_string).as_deref(), Some("[Episode!]!"));

        let clash = codec.serialize(&Type::Named(name!("Int")), &crate::var("eps"), &mut variables);
        assert!(clash.is_err());
    }

    #[test]
    fn test_scalar_out_of_range() {
        let schema = schema();
        let ty = Type::Named(name!("Int"));
        assert_eq!(render(&schema, &ty, &Value::Int(10)).unwrap(), "10");
        assert!(render(&schema, &ty, &Value::Int(i64::MAX)).is_err());
    }

    #[test]
    fn test_deserialize_wrapped_leaves() {
        let schema = schema();
        let codec = ValueCodec::new(schema.context());
        assert_eq!(
            codec.deserialize(&episodes(), &json!(["JEDI", "EMPIRE"])).unwrap(),
            Value::List(vec![Value::enum_value("JEDI"), Value::enum_value("EMPIRE")])
        );
        assert!(codec.deserialize(&episodes(), &json!("JEDI")).is_err());
        assert_eq!(codec.deserialize(&episodes(), &json!(null)).unwrap(), Value::Null);
    }

    #[test]
    fn test_custom_scalar_round_trip() {
        let schema = schema();
        let codec = ValueCodec::new(schema.context());
        let ty = Type::Named(name!("Instant"));
        let instant = Value::from(Utc.with_ymd_and_hms(2020, 5, 4, 12, 0, 0).unwrap());

        let literal = codec
            .serialize(&ty, &instant, &mut VariableTypes::default())
            .unwrap();
        assert_eq!(literal.to_string(), r#""2020-05-04T12:00:00+00:00""#);
        assert_eq!(codec.deserialize(&ty, &json!("2020-05-04T12:00:00+00:00")).unwrap(), instant);
    }

    #[test]
    fn test_json_to_literal() {
        let literal = json_to_literal(&json!({"a": [1, 2.5, true, null, "x"]})).unwrap();
        assert_eq!(
            literal.serialize().no_indent().to_string(),
            r#"{a: [1, 2.5, true, null, "x"]}"#
        );
    }
}
