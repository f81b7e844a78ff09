//! Top-level query and mutation documents.

use crate::error::{DslError, Result};
use crate::field::{inflate_object, AstContext, Field};
use crate::fragment::ResultFragment;
use crate::schema::SchemaContext;
use crate::transport::{GraphQLRequest, Transport};
use apollo_compiler::ast::{
    Definition, DirectiveList, Document, OperationDefinition, OperationType, Selection,
    VariableDefinition,
};
use apollo_compiler::{Name, Node};
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub(crate) const fn operation_type(self) -> OperationType {
        match self {
            Self::Query => OperationType::Query,
            Self::Mutation => OperationType::Mutation,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => f.write_str("query"),
            Self::Mutation => f.write_str("mutation"),
        }
    }
}

/// A query or mutation over selections of the root type.
///
/// `__typename` is requested in every nested selection set unless turned off
/// with [`Operation::with_typename`], so inflated fragments carry their
/// concrete type.
#[derive(Debug, Clone)]
pub struct Operation {
    context: Arc<SchemaContext>,
    kind: OperationKind,
    name: Option<String>,
    root_type: Name,
    selections: Vec<Field>,
    typename: bool,
}

impl Operation {
    pub(crate) fn new(context: Arc<SchemaContext>, kind: OperationKind, root_type: Name) -> Self {
        Self {
            context,
            kind,
            name: None,
            root_type,
            selections: Vec::new(),
            typename: true,
        }
    }

    /// The schema this operation was built against.
    #[must_use]
    pub fn context(&self) -> &SchemaContext {
        &self.context
    }

    #[must_use]
    pub const fn kind(&self) -> OperationKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn root_type(&self) -> &str {
        self.root_type.as_str()
    }

    #[must_use]
    pub fn selections(&self) -> &[Field] {
        &self.selections
    }

    /// Append root selections.
    #[must_use]
    pub fn select<I>(&self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let mut selections = self.selections.clone();
        selections.extend(fields.into_iter().map(Into::into));
        Self {
            selections,
            ..self.clone()
        }
    }

    /// Append root selections, aliasing each with its paired name.
    #[must_use]
    pub fn select_aliased<I, K, F>(&self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, F)>,
        K: Into<String>,
        F: Into<Field>,
    {
        self.select(fields.into_iter().map(|(alias, field)| field.into().alias(alias)))
    }

    /// Give the operation a name (`query HeroName { ... }`).
    #[must_use]
    pub fn named(&self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self.clone()
        }
    }

    #[must_use]
    pub fn with_typename(&self, typename: bool) -> Self {
        Self {
            typename,
            ..self.clone()
        }
    }

    /// Build the operation definition, declaring every variable referenced by
    /// an argument.
    pub fn to_ast(&self) -> Result<OperationDefinition> {
        if self.selections.is_empty() {
            return Err(DslError::EmptySelectionSet {
                field: self.root_type.to_string(),
            });
        }
        let name = self
            .name
            .as_deref()
            .map(|name| Name::new(name).map_err(|_| DslError::InvalidName(name.to_string())))
            .transpose()?;

        let mut context = AstContext {
            with_typename: self.typename,
            ..AstContext::default()
        };
        let selection_set = self
            .selections
            .iter()
            .map(|field| {
                field
                    .build(&mut context)
                    .map(|field| Selection::Field(Node::new(field)))
            })
            .collect::<Result<Vec<_>>>()?;

        let variables = context
            .variables
            .into_iter()
            .map(|(name, ty)| {
                Node::new(VariableDefinition {
                    name,
                    ty: Node::new(ty),
                    default_value: None,
                    directives: DirectiveList::default(),
                })
            })
            .collect();

        Ok(OperationDefinition {
            operation_type: self.kind.operation_type(),
            name,
            variables,
            directives: DirectiveList::default(),
            selection_set,
        })
    }

    pub fn to_document(&self) -> Result<Document> {
        let mut document = Document::new();
        document
            .definitions
            .push(Definition::OperationDefinition(Node::new(self.to_ast()?)));
        Ok(document)
    }

    /// Render the document as GraphQL text.
    pub fn render(&self) -> Result<String> {
        let document = self.to_document()?;
        Ok(document.to_string().trim_end().to_string())
    }

    /// Build a transport request for this operation.
    pub fn request(
        &self,
        variables: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<GraphQLRequest> {
        Ok(GraphQLRequest {
            query: self.render()?,
            variables,
            operation_name: self.name.clone(),
        })
    }

    /// Inflate the `data` object of a response into the root fragment.
    pub fn inflate(&self, data: &serde_json::Value) -> Result<ResultFragment> {
        let serde_json::Value::Object(object) = data else {
            return Err(DslError::ShapeMismatch {
                path: String::new(),
                reason: format!("expected the response data to be an object, got {data}"),
            });
        };
        inflate_object(&self.selections, self.root_type.as_str(), object, "")
    }

    /// Send the operation once and inflate the response.
    ///
    /// Any entry in the response's `errors` fails the whole execution, even
    /// when partial `data` came back.
    #[tracing::instrument(skip_all, fields(kind = %self.kind, name = self.name.as_deref()))]
    pub async fn execute<T: Transport>(
        &self,
        transport: &T,
        variables: Option<serde_json::Map<String, serde_json::Value>>,
    ) -> Result<ResultFragment> {
        let request = self.request(variables)?;
        tracing::debug!(query = %request.query, "executing operation");

        let response = transport.execute(&request).await?;
        if !response.errors.is_empty() {
            tracing::debug!(errors = response.errors.len(), "server returned errors");
            return Err(DslError::Execution(response.errors));
        }
        let data = response.data.ok_or_else(|| DslError::ShapeMismatch {
            path: String::new(),
            reason: "response has neither data nor errors".to_string(),
        })?;
        self.inflate(&data)
    }
}

/// Renders the full document. An operation that cannot be rendered (see
/// [`Operation::render`]) is written as a comment carrying the error.
impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.render() {
            Ok(text) => f.write_str(&text),
            Err(err) => write!(f, "# {err}"),
        }
    }
}
