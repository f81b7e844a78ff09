use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Root configuration for a graphql-dsl client.
///
/// ```yaml
/// endpoint:
///   url: https://swapi.example.com/graphql
///   headers:
///     Authorization: Bearer token
///   timeout: 30
///   retries: 2
/// schema:
///   path: schema.graphql
/// typename: true
/// scalars:
///   DateTime: datetime
/// renames:
///   Human:
///     homePlanet: planet
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DslConfig {
    /// Where operations are sent
    pub endpoint: EndpointConfig,

    /// Where the schema comes from (default: introspection of the endpoint)
    #[serde(default)]
    pub schema: SchemaSource,

    /// Prepend `__typename` to nested selection sets (default: true)
    #[serde(default = "default_typename")]
    pub typename: bool,

    /// Codec to use for each custom scalar, by scalar name
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub scalars: HashMap<String, ScalarKind>,

    /// Accessor overrides: type name -> wire field name -> accessor
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub renames: HashMap<String, HashMap<String, String>>,
}

const fn default_typename() -> bool {
    true
}

impl DslConfig {
    /// A config for `url` with every other setting at its default.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            endpoint: EndpointConfig::new(url),
            schema: SchemaSource::default(),
            typename: true,
            scalars: HashMap::new(),
            renames: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_schema_path(mut self, path: impl Into<String>) -> Self {
        self.schema = SchemaSource::Path(path.into());
        self
    }

    /// Iterate `(type, wire name, accessor)` triples of the rename table.
    pub fn rename_entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.renames.iter().flat_map(|(type_name, fields)| {
            fields
                .iter()
                .map(move |(wire, accessor)| (type_name.as_str(), wire.as_str(), accessor.as_str()))
        })
    }
}

/// HTTP endpoint settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointConfig {
    pub url: String,

    /// Headers sent with every request (e.g., for authentication)
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Request timeout in seconds (default: 30)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,

    /// Connection timeout in seconds (default: 10)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connect_timeout: Option<u64>,

    /// Retry attempts after a network error or 5xx response (default: 0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retries: Option<u32>,
}

impl EndpointConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::new(),
            timeout: None,
            connect_timeout: None,
            retries: None,
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
            .map_or(Self::DEFAULT_TIMEOUT, Duration::from_secs)
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
            .map_or(Self::DEFAULT_CONNECT_TIMEOUT, Duration::from_secs)
    }

    #[must_use]
    pub fn retries(&self) -> u32 {
        self.retries.unwrap_or(0)
    }
}

/// Schema source configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaSource {
    /// An SDL file, relative to the config file's directory
    Path(String),
    /// Run the introspection query against the endpoint
    #[default]
    Introspection,
}

impl SchemaSource {
    #[must_use]
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::Path(path) => Some(path.as_str()),
            Self::Introspection => None,
        }
    }

    #[must_use]
    pub const fn is_introspection(&self) -> bool {
        matches!(self, Self::Introspection)
    }
}

/// Built-in codecs a custom scalar can be mapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScalarKind {
    Int,
    Float,
    String,
    Boolean,
    Id,
    /// RFC 3339 timestamps, parsed into date-time values
    DateTime,
    /// Passed through untouched
    Opaque,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: DslConfig =
            serde_json::from_str(r#"{"endpoint": {"url": "http://localhost:4000"}}"#).unwrap();

        assert!(config.typename);
        assert!(config.schema.is_introspection());
        assert!(config.scalars.is_empty());
        assert_eq!(config.endpoint.timeout(), Duration::from_secs(30));
        assert_eq!(config.endpoint.connect_timeout(), Duration::from_secs(10));
        assert_eq!(config.endpoint.retries(), 0);
        assert_eq!(config, DslConfig::new("http://localhost:4000"));
    }

    #[test]
    fn test_schema_path_source() {
        let config: DslConfig = serde_json::from_str(
            r#"{"endpoint": {"url": "http://localhost"}, "schema": {"path": "schema.graphql"}}"#,
        )
        .unwrap();
        assert_eq!(config.schema.path(), Some("schema.graphql"));

        let config: DslConfig = serde_json::from_str(
            r#"{"endpoint": {"url": "http://localhost"}, "schema": "introspection"}"#,
        )
        .unwrap();
        assert!(config.schema.is_introspection());
    }

    #[test]
    fn test_scalar_kinds() {
        let config: DslConfig = serde_json::from_str(
            r#"{
                "endpoint": {"url": "http://localhost"},
                "scalars": {"DateTime": "datetime", "JSON": "opaque", "Cursor": "id"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.scalars["DateTime"], ScalarKind::DateTime);
        assert_eq!(config.scalars["JSON"], ScalarKind::Opaque);
        assert_eq!(config.scalars["Cursor"], ScalarKind::Id);
    }

    #[test]
    fn test_rename_entries() {
        let mut config = DslConfig::new("http://localhost");
        config.renames.insert(
            "Human".into(),
            HashMap::from([("homePlanet".to_string(), "planet".to_string())]),
        );

        let entries: Vec<_> = config.rename_entries().collect();
        assert_eq!(entries, [("Human", "homePlanet", "planet")]);
    }

    #[test]
    fn test_endpoint_overrides() {
        let config: DslConfig = serde_json::from_str(
            r#"{"endpoint": {"url": "http://localhost", "timeout": 5, "connectTimeout": 1, "retries": 3}}"#,
        )
        .unwrap();
        assert_eq!(config.endpoint.timeout(), Duration::from_secs(5));
        assert_eq!(config.endpoint.connect_timeout(), Duration::from_secs(1));
        assert_eq!(config.endpoint.retries(), 3);
    }
}
