use crate::error::Result;
use crate::field::Field;
use crate::fragment::ResultFragment;
use crate::operation::Operation;
use crate::schema::DslSchema;
use crate::transport::Transport;

/// A schema paired with a transport to run operations built from it.
#[derive(Debug, Clone)]
pub struct Client<T> {
    schema: DslSchema,
    transport: T,
    typename: bool,
}

impl<T: Transport> Client<T> {
    pub const fn new(schema: DslSchema, transport: T) -> Self {
        Self {
            schema,
            transport,
            typename: true,
        }
    }

    /// Whether operations built by [`Client::query`] and [`Client::mutate`]
    /// request `__typename` on nested selection sets (default: true).
    #[must_use]
    pub fn with_typename(mut self, typename: bool) -> Self {
        self.typename = typename;
        self
    }

    /// The schema facade, for building selections.
    pub const fn dsl(&self) -> &DslSchema {
        &self.schema
    }

    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Execute a prepared operation without variables.
    pub async fn execute(&self, operation: &Operation) -> Result<ResultFragment> {
        operation.execute(&self.transport, None).await
    }

    /// Execute a prepared operation, sending values for the variables its
    /// arguments reference.
    pub async fn execute_with_variables(
        &self,
        operation: &Operation,
        variables: serde_json::Map<String, serde_json::Value>,
    ) -> Result<ResultFragment> {
        operation.execute(&self.transport, Some(variables)).await
    }

    /// Run a query selecting `fields` on the query root.
    pub async fn query<I>(&self, fields: I) -> Result<ResultFragment>
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let operation = self.schema.query()?.with_typename(self.typename).select(fields);
        self.execute(&operation).await
    }

    /// Run a mutation selecting `fields` on the mutation root.
    pub async fn mutate<I>(&self, fields: I) -> Result<ResultFragment>
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let operation = self.schema.mutation()?.with_typename(self.typename).select(fields);
        self.execute(&operation).await
    }
}
