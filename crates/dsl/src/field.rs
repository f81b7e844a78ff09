//! Selection nodes.
//!
//! A [`Field`] is one requested field of a parent type, with its arguments,
//! alias and (for composite fields) child selections. Builder methods take
//! `&self` and return a new node, so a field obtained from a
//! [`TypeNamespace`](crate::TypeNamespace) can be reused as a template.

use crate::codec::VariableTypes;
use crate::error::{DslError, Result};
use crate::fragment::{ResultFragment, ResultValue};
use crate::introspection::{layer, TypeLayer};
use crate::names::to_wire_case;
use crate::schema::SchemaContext;
use crate::value::Value;
use apollo_compiler::ast::{self, Argument, DirectiveList, InputValueDefinition, Selection, Type};
use apollo_compiler::collections::IndexMap;
use apollo_compiler::schema::FieldDefinition;
use apollo_compiler::{name, Name, Node};
use std::fmt;
use std::sync::Arc;

/// Schema-side facts about a field, shared by every node built from it.
#[derive(Debug)]
struct FieldMeta {
    parent: Name,
    definition: Node<FieldDefinition>,
}

#[derive(Debug, Clone)]
enum Shape {
    Leaf,
    Composite(Vec<Field>),
}

/// State threaded through AST construction of one selection tree.
#[derive(Debug, Default)]
pub(crate) struct AstContext {
    /// Prepend `__typename` to every nested selection set.
    pub(crate) with_typename: bool,
    pub(crate) variables: VariableTypes,
}

/// A node in a selection tree.
#[derive(Clone)]
pub struct Field {
    context: Arc<SchemaContext>,
    meta: Arc<FieldMeta>,
    alias: Option<String>,
    accessor: String,
    arguments: IndexMap<String, Value>,
    shape: Shape,
}

impl Field {
    pub(crate) fn new(
        context: Arc<SchemaContext>,
        parent: Name,
        definition: Node<FieldDefinition>,
        accessor: String,
        composite: bool,
    ) -> Self {
        Self {
            context,
            meta: Arc::new(FieldMeta { parent, definition }),
            alias: None,
            accessor,
            arguments: IndexMap::default(),
            shape: if composite {
                Shape::Composite(Vec::new())
            } else {
                Shape::Leaf
            },
        }
    }

    /// The schema name of the field.
    #[must_use]
    pub fn name(&self) -> &str {
        self.meta.definition.name.as_str()
    }

    #[must_use]
    pub fn alias_name(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// The response key: the alias if set, otherwise the schema name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.name())
    }

    /// The key this field's value is stored under in a [`ResultFragment`].
    #[must_use]
    pub fn accessor(&self) -> &str {
        &self.accessor
    }

    /// The type that declares this field.
    #[must_use]
    pub fn parent_type(&self) -> &str {
        self.meta.parent.as_str()
    }

    /// The declared type, with list and non-null wrappers.
    #[must_use]
    pub fn field_type(&self) -> &Type {
        &self.meta.definition.ty
    }

    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self.shape, Shape::Leaf)
    }

    #[must_use]
    pub const fn arguments(&self) -> &IndexMap<String, Value> {
        &self.arguments
    }

    /// Child selections; always empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Field] {
        match &self.shape {
            Shape::Leaf => &[],
            Shape::Composite(children) => children,
        }
    }

    /// Append child selections.
    ///
    /// Fails with [`DslError::LeafSelection`] if this field has a scalar,
    /// enum or union type.
    pub fn select<I>(&self, children: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let Shape::Composite(existing) = &self.shape else {
            return Err(DslError::LeafSelection {
                field: self.qualified_name(),
            });
        };
        let mut selected = existing.clone();
        selected.extend(children.into_iter().map(Into::into));
        Ok(Self {
            shape: Shape::Composite(selected),
            ..self.clone()
        })
    }

    /// Append child selections, aliasing each child with its paired name.
    pub fn select_aliased<I, K, F>(&self, children: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<Field>,
    {
        self.select(
            children
                .into_iter()
                .map(|(alias, child)| child.into().alias(alias)),
        )
    }

    /// Set arguments. A name given again replaces the earlier value in place.
    ///
    /// Names may be accessor-cased; they are matched against the declared
    /// arguments when the field is rendered.
    #[must_use]
    pub fn args<I, K, V>(&self, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut merged = self.arguments.clone();
        for (name, value) in arguments {
            merged.insert(name.into(), value.into());
        }
        Self {
            arguments: merged,
            ..self.clone()
        }
    }

    /// Same as [`Field::args`].
    #[must_use]
    pub fn call<I, K, V>(&self, arguments: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.args(arguments)
    }

    /// Request the field under a different response key.
    ///
    /// The alias also becomes the accessor name in inflated results.
    #[must_use]
    pub fn alias(&self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        Self {
            accessor: alias.clone(),
            alias: Some(alias),
            ..self.clone()
        }
    }

    fn qualified_name(&self) -> String {
        format!("{}.{}", self.meta.parent, self.display_name())
    }

    fn argument_definition(&self, name: &str) -> Option<&Node<InputValueDefinition>> {
        let arguments = &self.meta.definition.arguments;
        arguments
            .iter()
            .find(|argument| argument.name.as_str() == name)
            .or_else(|| {
                let wire = to_wire_case(name);
                arguments.iter().find(|argument| argument.name.as_str() == wire)
            })
    }

    /// Build the AST of this field and its subtree.
    pub fn to_ast(&self) -> Result<ast::Field> {
        self.build(&mut AstContext::default())
    }

    pub(crate) fn build(&self, context: &mut AstContext) -> Result<ast::Field> {
        let alias = self
            .alias
            .as_deref()
            .map(|alias| Name::new(alias).map_err(|_| DslError::InvalidName(alias.to_string())))
            .transpose()?;

        let codec = self.context.codec();
        let mut arguments = Vec::with_capacity(self.arguments.len());
        for (name, value) in &self.arguments {
            let argument_error = |reason: String| DslError::ArgumentSerialization {
                field: self.qualified_name(),
                argument: name.clone(),
                reason,
            };
            let definition = self.argument_definition(name).ok_or_else(|| {
                argument_error(format!("{} has no argument {name}", self.qualified_name()))
            })?;
            let literal = codec
                .serialize(&definition.ty, value, &mut context.variables)
                .map_err(|err| argument_error(err.0))?;
            arguments.push(Node::new(Argument {
                name: definition.name.clone(),
                value: Node::new(literal),
            }));
        }

        let selection_set = match &self.shape {
            Shape::Leaf => Vec::new(),
            Shape::Composite(children) if children.is_empty() => {
                return Err(DslError::EmptySelectionSet {
                    field: self.qualified_name(),
                })
            }
            Shape::Composite(children) => {
                let mut selections = Vec::with_capacity(children.len() + 1);
                if context.with_typename {
                    selections.push(typename_selection());
                }
                for child in children {
                    selections.push(Selection::Field(Node::new(child.build(context)?)));
                }
                selections
            }
        };

        Ok(ast::Field {
            alias,
            name: self.meta.definition.name.clone(),
            arguments,
            directives: DirectiveList::default(),
            selection_set,
        })
    }

    /// Render the field subtree as GraphQL text.
    pub fn render(&self) -> Result<String> {
        let field = self.to_ast()?;
        Ok(field.to_string().trim_end().to_string())
    }

    /// Convert this field's response value into a result value.
    ///
    /// `data` is the value under this field's response key, not the
    /// enclosing object.
    pub fn inflate(&self, data: &serde_json::Value) -> Result<ResultValue> {
        self.inflate_at(self.field_type(), data, self.display_name())
    }

    fn inflate_at(&self, ty: &Type, data: &serde_json::Value, path: &str) -> Result<ResultValue> {
        let shape_error = |reason: String| DslError::ShapeMismatch {
            path: path.to_string(),
            reason,
        };

        if self.is_leaf() {
            return self
                .context
                .codec()
                .deserialize(ty, data)
                .map(ResultValue::Leaf)
                .map_err(|err| shape_error(err.0));
        }
        if data.is_null() {
            return Ok(ResultValue::NULL);
        }

        match layer(ty) {
            TypeLayer::List(item) => {
                let serde_json::Value::Array(items) = data else {
                    return Err(shape_error(format!("expected a list, got {data}")));
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(i, item_data)| self.inflate_at(item, item_data, &format!("{path}[{i}]")))
                    .collect::<Result<Vec<_>>>()
                    .map(ResultValue::List)
            }
            TypeLayer::Named(type_name) => {
                let serde_json::Value::Object(object) = data else {
                    return Err(shape_error(format!("expected an object, got {data}")));
                };
                inflate_object(self.children(), type_name.as_str(), object, path)
                    .map(ResultValue::Fragment)
            }
        }
    }
}

/// Inflate the children of a selection set from one response object.
///
/// Missing keys inflate to null.
pub(crate) fn inflate_object(
    children: &[Field],
    declared_type: &str,
    object: &serde_json::Map<String, serde_json::Value>,
    path: &str,
) -> Result<ResultFragment> {
    let mut fields = IndexMap::default();
    for child in children {
        let key = child.display_name();
        let value = object.get(key).unwrap_or(&serde_json::Value::Null);
        let child_path = if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        };
        let inflated = child.inflate_at(child.field_type(), value, &child_path)?;
        fields.insert(child.accessor.clone(), inflated);
    }

    let type_name = object
        .get("__typename")
        .and_then(serde_json::Value::as_str)
        .unwrap_or(declared_type);
    Ok(ResultFragment::new(type_name, fields))
}

fn typename_selection() -> Selection {
    Selection::Field(Node::new(ast::Field {
        alias: None,
        name: name!("__typename"),
        arguments: Vec::new(),
        directives: DirectiveList::default(),
        selection_set: Vec::new(),
    }))
}

impl From<&Field> for Field {
    fn from(field: &Field) -> Self {
        field.clone()
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("parent", &self.meta.parent)
            .field("name", &self.name())
            .field("alias", &self.alias)
            .field("accessor", &self.accessor)
            .field("arguments", &self.arguments)
            .field("children", &self.children())
            .finish()
    }
}

/// Renders the GraphQL text of the subtree. A tree that cannot be rendered
/// (see [`Field::render`]) is written as a comment carrying the error.
impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "# {err}"),
        }
    }
}
