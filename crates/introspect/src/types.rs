//! The shape of an introspection query result.
//!
//! Every `__Type` is read into one [`FullType`]; which of its lists are
//! present depends on [`TypeKind`], as in the introspection schema itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The `data` object of an introspection response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntrospectionData {
    #[serde(rename = "__schema")]
    pub schema: IntrospectionSchema,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntrospectionSchema {
    pub query_type: Option<NamedRef>,
    pub mutation_type: Option<NamedRef>,
    pub subscription_type: Option<NamedRef>,
    pub types: Vec<FullType>,
    #[serde(default)]
    pub directives: Vec<DirectiveDef>,
}

impl IntrospectionSchema {
    /// Root type names, if any differs from `Query`/`Mutation`/`Subscription`.
    #[must_use]
    pub fn custom_roots(&self) -> Option<[(&'static str, Option<&str>); 3]> {
        let roots = [
            ("query", "Query", &self.query_type),
            ("mutation", "Mutation", &self.mutation_type),
            ("subscription", "Subscription", &self.subscription_type),
        ];
        let custom = roots
            .iter()
            .any(|(_, default, root)| root.as_ref().is_some_and(|r| r.name != *default));
        custom.then(|| roots.map(|(keyword, _, root)| (keyword, root.as_ref().map(|r| r.name.as_str()))))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// A named type. Lists that do not apply to the kind are `null` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullType {
    pub kind: TypeKind,
    pub name: String,
    pub description: Option<String>,
    pub fields: Option<Vec<FieldDef>>,
    pub input_fields: Option<Vec<InputValue>>,
    pub interfaces: Option<Vec<NamedRef>>,
    pub enum_values: Option<Vec<EnumValueDef>>,
    pub possible_types: Option<Vec<NamedRef>>,
}

impl FullType {
    #[must_use]
    pub fn fields(&self) -> &[FieldDef] {
        self.fields.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn input_fields(&self) -> &[InputValue] {
        self.input_fields.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn interfaces(&self) -> &[NamedRef] {
        self.interfaces.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn enum_values(&self) -> &[EnumValueDef] {
        self.enum_values.as_deref().unwrap_or_default()
    }

    #[must_use]
    pub fn possible_types(&self) -> &[NamedRef] {
        self.possible_types.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDef {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputValue {
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    /// A GraphQL literal, as printed by the server
    pub default_value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnumValueDef {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_deprecated: bool,
    pub deprecation_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectiveDef {
    pub name: String,
    pub description: Option<String>,
    pub locations: Vec<String>,
    #[serde(default)]
    pub args: Vec<InputValue>,
}

/// A possibly wrapped type reference, `ofType` chained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub kind: TypeKind,
    pub name: Option<String>,
    pub of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    #[must_use]
    pub fn named(kind: TypeKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: Some(name.into()),
            of_type: None,
        }
    }

    #[must_use]
    pub fn non_null(self) -> Self {
        Self::wrap(TypeKind::NonNull, self)
    }

    #[must_use]
    pub fn list(self) -> Self {
        Self::wrap(TypeKind::List, self)
    }

    fn wrap(kind: TypeKind, inner: Self) -> Self {
        Self {
            kind,
            name: None,
            of_type: Some(Box::new(inner)),
        }
    }
}

/// Writes the reference in SDL notation, e.g. `[String!]!`.
impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.of_type.as_deref();
        match (self.kind, inner) {
            (TypeKind::NonNull, Some(inner)) => write!(f, "{inner}!"),
            (TypeKind::List, Some(inner)) => write!(f, "[{inner}]"),
            _ => f.write_str(self.name.as_deref().unwrap_or_default()),
        }
    }
}
