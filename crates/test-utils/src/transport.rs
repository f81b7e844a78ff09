//! A scripted [`Transport`] that records every request it receives.
//!
//! ## Usage
//!
//! ```
//! use graphql_dsl_test_utils::MockTransport;
//! use serde_json::json;
//!
//! let transport = MockTransport::new().with_data(json!({"hero": {"name": "R2-D2"}}));
//! assert_eq!(transport.pending(), 1);
//! assert_eq!(transport.request_count(), 0);
//! ```
//!
//! Clones share the same script and request log, so a test can hand one clone
//! to a client and inspect the other afterwards.

use graphql_dsl::{GraphQLError, GraphQLRequest, GraphQLResponse, Transport, TransportError};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

type Reply = Result<GraphQLResponse, TransportError>;

#[derive(Default)]
struct RequestLog {
    requests: Vec<GraphQLRequest>,
    replies: VecDeque<Reply>,
}

impl RequestLog {
    fn record(&mut self, request: &GraphQLRequest) -> Reply {
        self.requests.push(request.clone());
        self.replies.pop_front().unwrap_or_else(|| {
            Err(TransportError::Invalid(format!(
                "no scripted reply for request #{}",
                self.requests.len()
            )))
        })
    }

    fn checkpoint(&self) -> usize {
        self.requests.len()
    }

    fn requests_since(&self, checkpoint: usize) -> Vec<GraphQLRequest> {
        self.requests[checkpoint..].to_vec()
    }
}

/// Replies with scripted responses in order, then fails with
/// [`TransportError::Invalid`] once the script runs out.
#[derive(Clone, Default)]
pub struct MockTransport {
    log: Arc<Mutex<RequestLog>>,
}

impl std::fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockTransport")
            .field("requests", &self.request_count())
            .field("pending", &self.pending())
            .finish()
    }
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RequestLog> {
        self.log.lock().expect("RequestLog mutex poisoned")
    }

    /// Queue a full response.
    #[must_use]
    pub fn with_response(self, response: GraphQLResponse) -> Self {
        self.lock().replies.push_back(Ok(response));
        self
    }

    /// Queue a successful response carrying `data`.
    #[must_use]
    pub fn with_data(self, data: serde_json::Value) -> Self {
        self.with_response(GraphQLResponse::from_data(data))
    }

    /// Queue a response with GraphQL errors and no data.
    #[must_use]
    pub fn with_errors<I, S>(self, messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.with_response(GraphQLResponse {
            data: None,
            errors: messages.into_iter().map(GraphQLError::new).collect(),
        })
    }

    /// Queue a transport failure.
    #[must_use]
    pub fn with_failure(self, error: TransportError) -> Self {
        self.lock().replies.push_back(Err(error));
        self
    }

    /// Scripted replies not yet consumed.
    pub fn pending(&self) -> usize {
        self.lock().replies.len()
    }

    /// Get the current checkpoint (log position) for later comparison.
    pub fn checkpoint(&self) -> usize {
        self.lock().checkpoint()
    }

    /// Get all requests received since the given checkpoint.
    pub fn requests_since(&self, checkpoint: usize) -> Vec<GraphQLRequest> {
        self.lock().requests_since(checkpoint)
    }

    pub fn requests(&self) -> Vec<GraphQLRequest> {
        self.requests_since(0)
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    pub fn last_request(&self) -> Option<GraphQLRequest> {
        self.lock().requests.last().cloned()
    }
}

impl Transport for MockTransport {
    async fn execute(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, TransportError> {
        self.lock().record(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_replies_in_order_then_fails() {
        let transport = MockTransport::new()
            .with_data(json!({"a": 1}))
            .with_errors(["boom"]);

        let first = transport.execute(&GraphQLRequest::new("{ a }")).await.unwrap();
        assert_eq!(first.data, Some(json!({"a": 1})));

        let second = transport.execute(&GraphQLRequest::new("{ b }")).await.unwrap();
        assert_eq!(second.errors[0].message, "boom");

        let third = transport.execute(&GraphQLRequest::new("{ c }")).await;
        assert!(matches!(third, Err(TransportError::Invalid(_))));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn test_clones_share_the_log() {
        let transport = MockTransport::new().with_data(json!({}));
        let observer = transport.clone();

        let checkpoint = observer.checkpoint();
        transport.execute(&GraphQLRequest::new("{ a }")).await.unwrap();

        let seen = observer.requests_since(checkpoint);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].query, "{ a }");
        assert_eq!(observer.pending(), 0);
    }
}
