//! The schema facade: entry point for building selections.

use crate::codec::ValueCodec;
use crate::error::{DslError, Result, SchemaLookupError};
use crate::field::Field;
use crate::introspection::{base_type, has_child_selections};
use crate::names::{to_accessor_case, to_wire_case};
use crate::operation::{Operation, OperationKind};
use crate::scalar::{ScalarCodec, ScalarRegistry};
use apollo_compiler::collections::IndexMap;
use apollo_compiler::schema::{Component, ExtendedType, FieldDefinition};
use apollo_compiler::validation::Valid;
use apollo_compiler::{Name, Schema};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Everything selections need to know about the schema they were built from.
///
/// Shared by every [`Field`] and [`Operation`] created from one [`DslSchema`].
#[derive(Debug)]
pub struct SchemaContext {
    schema: Valid<Schema>,
    scalars: ScalarRegistry,
    /// type name -> wire field name -> accessor name
    renames: HashMap<String, HashMap<String, String>>,
}

impl SchemaContext {
    #[must_use]
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    #[must_use]
    pub const fn scalars(&self) -> &ScalarRegistry {
        &self.scalars
    }

    #[must_use]
    pub const fn codec(&self) -> ValueCodec<'_> {
        ValueCodec::new(self)
    }

    /// The accessor name for a field, honoring configured renames.
    fn accessor_for(&self, type_name: &str, wire: &str) -> String {
        self.renames
            .get(type_name)
            .and_then(|fields| fields.get(wire))
            .cloned()
            .unwrap_or_else(|| to_accessor_case(wire))
    }
}

/// Builder for a [`DslSchema`] with custom scalars and accessor renames.
#[derive(Debug)]
pub struct DslSchemaBuilder {
    schema: Valid<Schema>,
    scalars: ScalarRegistry,
    renames: HashMap<String, HashMap<String, String>>,
}

impl DslSchemaBuilder {
    /// Register the serialize/parse functions for a custom scalar.
    #[must_use]
    pub fn scalar(mut self, name: impl Into<String>, codec: impl ScalarCodec + 'static) -> Self {
        self.scalars.insert(name, codec);
        self
    }

    /// Expose `type_name.wire_field` under `accessor` instead of its
    /// underscore-cased name.
    #[must_use]
    pub fn rename(
        mut self,
        type_name: impl Into<String>,
        wire_field: impl Into<String>,
        accessor: impl Into<String>,
    ) -> Self {
        self.renames
            .entry(type_name.into())
            .or_default()
            .insert(wire_field.into(), accessor.into());
        self
    }

    #[must_use]
    pub fn build(self) -> DslSchema {
        DslSchema {
            context: Arc::new(SchemaContext {
                schema: self.schema,
                scalars: self.scalars,
                renames: self.renames,
            }),
            namespaces: Arc::new(DashMap::new()),
        }
    }
}

/// A schema, viewed as a set of per-type field namespaces.
///
/// ```
/// # use graphql_dsl::DslSchema;
/// let dsl = DslSchema::parse("type Query { hero: Character } type Character { name: String }")?;
/// let hero = dsl.field("Query", "hero")?.select([dsl.field("Character", "name")?])?;
/// assert_eq!(hero.to_string(), "hero {\n  name\n}");
/// # Ok::<(), graphql_dsl::DslError>(())
/// ```
///
/// Cloning is cheap and clones share the namespace cache.
#[derive(Debug, Clone)]
pub struct DslSchema {
    context: Arc<SchemaContext>,
    namespaces: Arc<DashMap<String, Arc<TypeNamespace>>>,
}

impl DslSchema {
    /// Wrap a validated schema with the built-in scalars and no renames.
    #[must_use]
    pub fn new(schema: Valid<Schema>) -> Self {
        Self::builder(schema).build()
    }

    #[must_use]
    pub fn builder(schema: Valid<Schema>) -> DslSchemaBuilder {
        DslSchemaBuilder {
            schema,
            scalars: ScalarRegistry::new(),
            renames: HashMap::new(),
        }
    }

    /// Parse and validate SDL, then start a builder over it.
    pub fn builder_from_sdl(sdl: &str) -> Result<DslSchemaBuilder> {
        parse_sdl(sdl).map(Self::builder)
    }

    /// Parse and validate SDL into a schema with default settings.
    pub fn parse(sdl: &str) -> Result<Self> {
        parse_sdl(sdl).map(Self::new)
    }

    #[must_use]
    pub fn context(&self) -> &SchemaContext {
        &self.context
    }

    #[must_use]
    pub fn schema(&self) -> &Schema {
        self.context.schema()
    }

    /// The field namespace of an object or interface type.
    ///
    /// Namespaces are built on first access and cached; concurrent first
    /// accesses to the same type build it once.
    #[tracing::instrument(skip(self), level = "trace")]
    pub fn ty(&self, type_name: &str) -> Result<Arc<TypeNamespace>> {
        if let Some(namespace) = self.namespaces.get(type_name) {
            return Ok(Arc::clone(&namespace));
        }

        let extended = self
            .context
            .schema()
            .types
            .get(type_name)
            .ok_or_else(|| SchemaLookupError::UnknownType(type_name.to_string()))?;
        let (name, definitions) = match extended {
            ExtendedType::Object(object) => (&object.name, &object.fields),
            ExtendedType::Interface(interface) => (&interface.name, &interface.fields),
            _ => return Err(SchemaLookupError::NotComposite(type_name.to_string()).into()),
        };

        let namespace = self
            .namespaces
            .entry(type_name.to_string())
            .or_insert_with(|| Arc::new(TypeNamespace::build(&self.context, name, definitions)));
        Ok(Arc::clone(&namespace))
    }

    /// Shortcut for `self.ty(type_name)?.field(field_name)`.
    pub fn field(&self, type_name: &str, field_name: &str) -> Result<Field> {
        self.ty(type_name)?.field(field_name)
    }

    /// Start a query against the schema's query root.
    pub fn query(&self) -> Result<Operation> {
        self.operation(OperationKind::Query)
    }

    /// Start a mutation; fails if the schema has no mutation root.
    pub fn mutation(&self) -> Result<Operation> {
        self.operation(OperationKind::Mutation)
    }

    fn operation(&self, kind: OperationKind) -> Result<Operation> {
        let root = self
            .context
            .schema()
            .root_operation(kind.operation_type())
            .ok_or(SchemaLookupError::MissingRoot(kind))?;
        Ok(Operation::new(Arc::clone(&self.context), kind, root.clone()))
    }
}

fn parse_sdl(sdl: &str) -> Result<Valid<Schema>> {
    Schema::parse_and_validate(sdl, "schema.graphql")
        .map_err(|invalid| DslError::InvalidSchema(invalid.errors.to_string()))
}

/// The fields of one composite type, addressable by accessor or wire name.
#[derive(Debug)]
pub struct TypeNamespace {
    type_name: Name,
    /// Keyed by wire name, in schema order.
    fields: IndexMap<Name, Field>,
    /// accessor -> wire name
    accessors: HashMap<String, Name>,
}

impl TypeNamespace {
    fn build(
        context: &Arc<SchemaContext>,
        name: &Name,
        definitions: &IndexMap<Name, Component<FieldDefinition>>,
    ) -> Self {
        let mut fields = IndexMap::default();
        let mut accessors = HashMap::new();
        for (wire, definition) in definitions {
            let mut accessor = context.accessor_for(name.as_str(), wire.as_str());
            // The first field in schema order keeps a contested accessor.
            if let Some(taken_by) = accessors.get(&accessor) {
                tracing::warn!(
                    type_name = %name,
                    field = %wire,
                    accessor = %accessor,
                    taken_by = %taken_by,
                    "accessor already in use, falling back to the field name"
                );
                accessor = wire.to_string();
            }
            let composite =
                has_child_selections(context.schema(), base_type(&definition.ty).as_str());
            accessors
                .entry(accessor.clone())
                .or_insert_with(|| wire.clone());
            fields.insert(
                wire.clone(),
                Field::new(
                    Arc::clone(context),
                    name.clone(),
                    definition.node.clone(),
                    accessor,
                    composite,
                ),
            );
        }

        tracing::debug!(type_name = %name, fields = fields.len(), "built type namespace");
        Self {
            type_name: name.clone(),
            fields,
            accessors,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &str {
        self.type_name.as_str()
    }

    /// Look up a field by accessor name, then by wire name, then by the wire
    /// form of `name`.
    pub fn field(&self, name: &str) -> Result<Field> {
        self.accessors
            .get(name)
            .and_then(|wire| self.fields.get(wire))
            .or_else(|| self.fields.get(name))
            .or_else(|| self.fields.get(to_wire_case(name).as_str()))
            .cloned()
            .ok_or_else(|| {
                SchemaLookupError::UnknownField {
                    type_name: self.type_name.to_string(),
                    field: name.to_string(),
                }
                .into()
            })
    }

    /// All fields in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const SDL: &str = r"
        type Query { hero: Character, node: Node }
        type Mutation { rename(name: String!): Character }
        interface Node { id: ID! }
        type Character implements Node { id: ID!, name: String, appearsIn: [String], HTTPStatus: Int }
        scalar Instant
    ";

    #[test]
    fn test_lookup_by_accessor_and_wire_name() {
        let dsl = DslSchema::parse(SDL).unwrap();
        let character = dsl.ty("Character").unwrap();

        assert_eq!(character.field("appears_in").unwrap().name(), "appearsIn");
        assert_eq!(character.field("appearsIn").unwrap().name(), "appearsIn");
        assert_eq!(character.field("appearsIn").unwrap().accessor(), "appears_in");
        assert_eq!(character.field("http_status").unwrap().name(), "HTTPStatus");
    }

    #[test]
    fn test_unknown_field() {
        let dsl = DslSchema::parse(SDL).unwrap();
        let err = dsl.field("Character", "nmae").unwrap_err();
        assert_eq!(err.to_string(), "Field nmae doesn't exist in type Character");
    }

    #[test]
    fn test_unknown_and_leaf_types() {
        let dsl = DslSchema::parse(SDL).unwrap();
        assert!(matches!(
            dsl.ty("Starship"),
            Err(DslError::SchemaLookup(SchemaLookupError::UnknownType(_)))
        ));
        assert!(matches!(
            dsl.ty("Instant"),
            Err(DslError::SchemaLookup(SchemaLookupError::NotComposite(_)))
        ));
        assert!(dsl.ty("Node").is_ok());
    }

    #[test]
    fn test_namespace_is_cached() {
        let dsl = DslSchema::parse(SDL).unwrap();
        let first = dsl.ty("Character").unwrap();
        let second = dsl.clone().ty("Character").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_concurrent_first_access_builds_once() {
        let dsl = DslSchema::parse(SDL).unwrap();
        let namespaces: Vec<_> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| scope.spawn(|| dsl.ty("Character").unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(namespaces.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
    }

    #[test]
    fn test_renames() {
        let dsl = DslSchema::builder_from_sdl(SDL)
            .unwrap()
            .rename("Character", "appearsIn", "episodes")
            .build();
        let field = dsl.field("Character", "episodes").unwrap();
        assert_eq!(field.name(), "appearsIn");
        assert_eq!(field.accessor(), "episodes");
    }

    #[test]
    fn test_colliding_accessors_keep_the_first_field() {
        let dsl = DslSchema::parse(
            "type Query { pair: Pair } type Pair { appearsIn: [String], appears_in: [String] }",
        )
        .unwrap();
        let pair = dsl.ty("Pair").unwrap();

        assert_eq!(pair.field("appears_in").unwrap().name(), "appearsIn");
        assert_eq!(pair.field("appearsIn").unwrap().name(), "appearsIn");
        let accessors: Vec<_> = pair.fields().map(|f| (f.name(), f.accessor())).collect();
        assert_eq!(
            accessors,
            [("appearsIn", "appears_in"), ("appears_in", "appears_in")]
        );
    }

    #[test]
    fn test_rename_onto_a_taken_accessor_falls_back_to_the_field_name() {
        let dsl = DslSchema::builder_from_sdl(SDL)
            .unwrap()
            .rename("Character", "appearsIn", "name")
            .build();
        let character = dsl.ty("Character").unwrap();

        assert_eq!(character.field("name").unwrap().name(), "name");
        let appears_in = character.field("appearsIn").unwrap();
        assert_eq!(appears_in.name(), "appearsIn");
        assert_eq!(appears_in.accessor(), "appearsIn");
        assert_eq!(character.field("appears_in").unwrap().name(), "appearsIn");
    }

    #[test]
    fn test_single_letter_segments_resolve_either_way() {
        let dsl = DslSchema::parse("type Query { coordXY: Int }").unwrap();
        let root = dsl.ty("Query").unwrap();

        assert_eq!(root.field("coord_xy").unwrap().name(), "coordXY");
        assert_eq!(root.field("coord_x_y").unwrap().name(), "coordXY");
        assert_eq!(root.field("coordXY").unwrap().accessor(), "coord_xy");
    }

    #[test]
    fn test_fields_in_schema_order() {
        let dsl = DslSchema::parse(SDL).unwrap();
        let names: Vec<_> = dsl
            .ty("Character")
            .unwrap()
            .fields()
            .map(|f| f.name().to_string())
            .collect();
        assert_eq!(names, ["id", "name", "appearsIn", "HTTPStatus"]);
    }

    #[test]
    fn test_roots() {
        let dsl = DslSchema::parse(SDL).unwrap();
        assert!(dsl.query().is_ok());
        assert!(dsl.mutation().is_ok());

        let query_only = DslSchema::parse("type Query { a: Int }").unwrap();
        assert!(matches!(
            query_only.mutation(),
            Err(DslError::SchemaLookup(SchemaLookupError::MissingRoot(OperationKind::Mutation)))
        ));
    }

    #[test]
    fn test_invalid_sdl() {
        assert!(matches!(
            DslSchema::parse("type Query { a: Missing }"),
            Err(DslError::InvalidSchema(_))
        ));
    }
}
