//! The boundary to whatever actually sends a document to a GraphQL server.

use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;

/// A rendered operation ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<serde_json::Map<String, serde_json::Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_name: Option<String>,
}

impl GraphQLRequest {
    #[must_use]
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
            operation_name: None,
        }
    }
}

/// A response payload as returned by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphQLResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<GraphQLError>,
}

impl GraphQLResponse {
    /// A successful response carrying `data`.
    #[must_use]
    pub fn from_data(data: serde_json::Value) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }
}

/// One entry of a response's `errors` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphQLError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<serde_json::Map<String, serde_json::Value>>,
}

impl GraphQLError {
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}: {1}")]
    Http(u16, String),

    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid response: {0}")]
    Invalid(String),
}

/// Sends one request and returns the server's response.
///
/// Implementations own timeouts and retries; callers of [`Transport::execute`]
/// get exactly one result per call.
pub trait Transport: Send + Sync {
    fn execute(
        &self,
        request: &GraphQLRequest,
    ) -> impl Future<Output = Result<GraphQLResponse, TransportError>> + Send;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(
        &self,
        request: &GraphQLRequest,
    ) -> impl Future<Output = Result<GraphQLResponse, TransportError>> + Send {
        (**self).execute(request)
    }
}
