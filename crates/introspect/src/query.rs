use graphql_dsl::GraphQLRequest;

/// Operation name of [`INTROSPECTION_QUERY`].
pub const INTROSPECTION_OPERATION: &str = "IntrospectionQuery";

/// The introspection query sent by [`crate::fetch_schema`].
///
/// Type references are unwrapped seven levels deep, enough for
/// `[[[String!]!]!]`.
pub const INTROSPECTION_QUERY: &str = r"query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    subscriptionType { name }
    types { ...FullType }
    directives {
      name
      description
      locations
      args { ...InputValue }
    }
  }
}

fragment FullType on __Type {
  kind
  name
  description
  fields(includeDeprecated: true) {
    name
    description
    args { ...InputValue }
    type { ...TypeRef }
    isDeprecated
    deprecationReason
  }
  inputFields { ...InputValue }
  interfaces { ...TypeRef }
  enumValues(includeDeprecated: true) {
    name
    description
    isDeprecated
    deprecationReason
  }
  possibleTypes { ...TypeRef }
}

fragment InputValue on __InputValue {
  name
  description
  type { ...TypeRef }
  defaultValue
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType { kind name }
            }
          }
        }
      }
    }
  }
}
";

/// A request carrying [`INTROSPECTION_QUERY`].
#[must_use]
pub fn introspection_request() -> GraphQLRequest {
    let mut request = GraphQLRequest::new(INTROSPECTION_QUERY);
    request.operation_name = Some(INTROSPECTION_OPERATION.to_string());
    request
}
