//! A fluent, schema-driven GraphQL query builder.
//!
//! Selections are built by looking up fields on a [`DslSchema`] and chaining
//! builder calls. The resulting tree renders to a GraphQL document, and the
//! response to that document inflates into [`ResultFragment`]s shaped like
//! the selection tree.
//!
//! # Examples
//!
//! ## Building and rendering a selection
//!
//! ```
//! use graphql_dsl::DslSchema;
//!
//! let dsl = DslSchema::parse(
//!     r"
//!     type Query { human(id: String!): Human }
//!     type Human { name: String, appearsIn: [Episode] }
//!     enum Episode { NEWHOPE EMPIRE JEDI }
//!     ",
//! )?;
//! let human = dsl.ty("Human")?;
//!
//! let luke = dsl
//!     .field("Query", "human")?
//!     .args([("id", "1000")])
//!     .select([human.field("name")?, human.field("appears_in")?])?;
//!
//! assert_eq!(luke.to_string(), "human(id: \"1000\") {\n  name\n  appearsIn\n}");
//! # Ok::<(), graphql_dsl::DslError>(())
//! ```
//!
//! ## Inflating a response
//!
//! ```
//! use graphql_dsl::DslSchema;
//! use serde_json::json;
//!
//! let dsl = DslSchema::parse("type Query { hero: Character } type Character { name: String }")?;
//! let hero = dsl.field("Query", "hero")?.select([dsl.field("Character", "name")?])?;
//! let query = dsl.query()?.select([hero]);
//!
//! let result = query.inflate(&json!({"hero": {"name": "R2-D2"}}))?;
//! assert_eq!(result.get("hero").and_then(|h| h.get("name")).and_then(|n| n.as_str()), Some("R2-D2"));
//! # Ok::<(), graphql_dsl::DslError>(())
//! ```

mod client;
pub mod codec;
mod error;
mod field;
mod fragment;
pub mod introspection;
pub mod names;
mod operation;
pub mod scalar;
mod schema;
mod transport;
mod value;

pub use client::Client;
pub use error::{DslError, Result, SchemaLookupError};
pub use field::Field;
pub use fragment::{ResultFragment, ResultValue};
pub use operation::{Operation, OperationKind};
pub use scalar::{DateTimeScalar, ScalarCodec, ScalarError, ScalarRegistry};
pub use schema::{DslSchema, DslSchemaBuilder, SchemaContext, TypeNamespace};
pub use transport::{GraphQLError, GraphQLRequest, GraphQLResponse, Transport, TransportError};
pub use value::{var, Value};

// Re-exported so callers can name schema types without a direct dependency.
pub use apollo_compiler;
