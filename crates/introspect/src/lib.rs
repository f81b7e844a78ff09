//! Schema loading and HTTP transport for graphql-dsl.
//!
//! # Examples
//!
//! ## From a config file
//!
//! ```no_run
//! use graphql_dsl_introspect::connect_from_dir;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = connect_from_dir(std::path::Path::new(".")).await?;
//! let dsl = client.dsl();
//! let hero = dsl.field("Query", "hero")?.select([dsl.field("Character", "name")?])?;
//! let result = client.query([hero]).await?;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Introspecting by hand
//!
//! ```no_run
//! use graphql_dsl_introspect::{fetch_dsl_schema, HttpTransport};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let transport = HttpTransport::new("https://swapi.example.com/graphql")?;
//! let dsl = fetch_dsl_schema(&transport).await?;
//! println!("{} root fields", dsl.ty("Query")?.len());
//! # Ok(())
//! # }
//! ```

mod error;
mod http;
mod query;
mod sdl;
mod types;

pub use error::{IntrospectionError, Result};
pub use http::{is_retryable, HttpTransport, HttpTransportBuilder};
pub use query::{introspection_request, INTROSPECTION_OPERATION, INTROSPECTION_QUERY};
pub use sdl::introspection_to_sdl;
pub use types::*;

use apollo_compiler::validation::Valid;
use apollo_compiler::Schema;
use graphql_dsl::scalar::{
    BooleanScalar, FloatScalar, IdScalar, IntScalar, OpaqueScalar, StringScalar,
};
use graphql_dsl::{Client, DateTimeScalar, DslSchema, DslSchemaBuilder, Transport};
use graphql_dsl_config::{DslConfig, ScalarKind, SchemaSource};
use std::path::Path;

/// Run the introspection query and return its `__schema`.
#[tracing::instrument(skip_all)]
pub async fn introspect<T: Transport>(transport: &T) -> Result<IntrospectionSchema> {
    let response = transport.execute(&introspection_request()).await?;
    if !response.errors.is_empty() {
        return Err(IntrospectionError::Execution(response.errors));
    }
    let data = response
        .data
        .ok_or_else(|| IntrospectionError::Invalid("response has no data".into()))?;
    let data: IntrospectionData =
        serde_json::from_value(data).map_err(|e| IntrospectionError::Invalid(e.to_string()))?;

    tracing::info!(
        types = data.schema.types.len(),
        directives = data.schema.directives.len(),
        "Introspection successful"
    );
    Ok(data.schema)
}

/// Introspect the endpoint behind `transport` and validate the result.
pub async fn fetch_schema<T: Transport>(transport: &T) -> Result<Valid<Schema>> {
    let introspected = introspect(transport).await?;
    let sdl = introspection_to_sdl(&introspected);
    Schema::parse_and_validate(sdl, "introspection.graphql")
        .map_err(|invalid| IntrospectionError::Schema(invalid.errors.to_string()))
}

/// [`fetch_schema`], wrapped with the built-in scalars and no renames.
pub async fn fetch_dsl_schema<T: Transport>(transport: &T) -> Result<DslSchema> {
    fetch_schema(transport).await.map(DslSchema::new)
}

/// Read and validate an SDL file.
pub fn load_schema_file(path: &Path) -> Result<Valid<Schema>> {
    let sdl = std::fs::read_to_string(path).map_err(|source| IntrospectionError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Schema::parse_and_validate(sdl, path)
        .map_err(|invalid| IntrospectionError::Schema(invalid.errors.to_string()))
}

/// Build a client from a loaded config.
///
/// Relative schema paths are resolved against `base_dir`, normally the
/// directory holding the config file.
#[tracing::instrument(skip_all, fields(url = %config.endpoint.url))]
pub async fn connect(config: &DslConfig, base_dir: &Path) -> Result<Client<HttpTransport>> {
    let transport = HttpTransport::from_config(&config.endpoint)?;

    let schema = match &config.schema {
        SchemaSource::Path(path) => {
            let path = base_dir.join(path);
            tracing::debug!(path = %path.display(), "Loading schema file");
            load_schema_file(&path)?
        }
        SchemaSource::Introspection => fetch_schema(&transport).await?,
    };

    let dsl = apply_config(DslSchema::builder(schema), config).build();
    Ok(Client::new(dsl, transport).with_typename(config.typename))
}

/// Find the nearest config file above `start_dir`, load it and [`connect`].
pub async fn connect_from_dir(start_dir: &Path) -> Result<Client<HttpTransport>> {
    let path = graphql_dsl_config::find_config(start_dir)?
        .ok_or_else(|| IntrospectionError::ConfigNotFound(start_dir.to_path_buf()))?;
    let config = graphql_dsl_config::load_config(&path)?;
    let base_dir = path.parent().unwrap_or(start_dir);
    connect(&config, base_dir).await
}

/// Register the configured scalar codecs and accessor renames.
#[must_use]
pub fn apply_config(mut builder: DslSchemaBuilder, config: &DslConfig) -> DslSchemaBuilder {
    for (name, kind) in &config.scalars {
        builder = match kind {
            ScalarKind::Int => builder.scalar(name, IntScalar),
            ScalarKind::Float => builder.scalar(name, FloatScalar),
            ScalarKind::String => builder.scalar(name, StringScalar),
            ScalarKind::Boolean => builder.scalar(name, BooleanScalar),
            ScalarKind::Id => builder.scalar(name, IdScalar),
            ScalarKind::DateTime => builder.scalar(name, DateTimeScalar),
            ScalarKind::Opaque => builder.scalar(name, OpaqueScalar),
        };
    }
    for (type_name, wire, accessor) in config.rename_entries() {
        builder = builder.rename(type_name, wire, accessor);
    }
    builder
}
