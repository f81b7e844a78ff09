//! A [`Transport`] that POSTs JSON requests over HTTP.
//!
//! Supports custom headers (e.g. for authentication), request and connection
//! timeouts, and retries with exponential backoff.

use graphql_dsl::{GraphQLRequest, GraphQLResponse, Transport, TransportError};
use graphql_dsl_config::EndpointConfig;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use std::collections::HashMap;
use std::time::Duration;

const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Sends operations to one GraphQL endpoint.
///
/// ```no_run
/// use graphql_dsl_introspect::HttpTransport;
/// use std::time::Duration;
///
/// # fn main() -> Result<(), graphql_dsl::TransportError> {
/// let transport = HttpTransport::builder("https://swapi.example.com/graphql")
///     .with_header("Authorization", "Bearer my-token")
///     .with_timeout(Duration::from_secs(60))
///     .with_retries(3)
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// Only network failures and 5xx responses are retried. Clones share the
/// underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    url: String,
    client: reqwest::Client,
    retries: u32,
    backoff: Duration,
}

#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    url: String,
    headers: HashMap<String, String>,
    timeout: Duration,
    connect_timeout: Duration,
    retries: u32,
    backoff: Duration,
}

impl HttpTransportBuilder {
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Maximum time for a whole request, connection included. Default 30s.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Maximum time to establish a connection. Default 10s.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Retry attempts after the first. Default 0.
    #[must_use]
    pub const fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    /// Delay before the first retry; doubles on each further attempt. Default 1s.
    #[must_use]
    pub const fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    /// Build the HTTP client. Fails on header names or values HTTP cannot carry.
    pub fn build(self) -> Result<HttpTransport, TransportError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TransportError::Invalid(format!("header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TransportError::Invalid(format!("header value for '{name}': {e}")))?;
            headers.insert(name, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(self.timeout)
            .connect_timeout(self.connect_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(HttpTransport {
            url: self.url,
            client,
            retries: self.retries,
            backoff: self.backoff,
        })
    }
}

impl HttpTransport {
    #[must_use]
    pub fn builder(url: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder {
            url: url.into(),
            headers: HashMap::new(),
            timeout: EndpointConfig::DEFAULT_TIMEOUT,
            connect_timeout: EndpointConfig::DEFAULT_CONNECT_TIMEOUT,
            retries: 0,
            backoff: DEFAULT_BACKOFF,
        }
    }

    /// A transport with default settings.
    pub fn new(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::builder(url).build()
    }

    pub fn from_config(endpoint: &EndpointConfig) -> Result<Self, TransportError> {
        Self::builder(endpoint.url.clone())
            .with_headers(endpoint.headers.clone())
            .with_timeout(endpoint.timeout())
            .with_connect_timeout(endpoint.connect_timeout())
            .with_retries(endpoint.retries())
            .build()
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub const fn retries(&self) -> u32 {
        self.retries
    }

    /// Delay before retry number `attempt` (1-based): backoff, 2x, 4x, ...
    fn delay(&self, attempt: u32) -> Duration {
        self.backoff
            .saturating_mul(1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX))
    }

    async fn send_once(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, TransportError> {
        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        tracing::debug!(status = status.as_u16(), "Received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "HTTP error response");
            return Err(TransportError::Http(status.as_u16(), body));
        }

        response.json::<GraphQLResponse>().await.map_err(|e| {
            tracing::error!(error = %e, "Failed to parse response");
            TransportError::Parse(e.to_string())
        })
    }
}

/// Network errors and 5xx responses are worth another attempt.
#[must_use]
pub const fn is_retryable(error: &TransportError) -> bool {
    match error {
        TransportError::Network(_) => true,
        TransportError::Http(status, _) => *status >= 500,
        TransportError::Parse(_) | TransportError::Invalid(_) => false,
    }
}

impl Transport for HttpTransport {
    #[tracing::instrument(skip_all, fields(url = %self.url, operation = request.operation_name.as_deref()))]
    async fn execute(&self, request: &GraphQLRequest) -> Result<GraphQLResponse, TransportError> {
        let mut attempt = 0;
        loop {
            if attempt > 0 {
                let delay = self.delay(attempt);
                tracing::info!(attempt, delay_ms = delay.as_millis(), "Retrying after delay");
                tokio::time::sleep(delay).await;
            }

            match self.send_once(request).await {
                Ok(response) => return Ok(response),
                Err(e) if attempt < self.retries && is_retryable(&e) => {
                    tracing::warn!(attempt, error = %e, "Request failed");
                    attempt += 1;
                }
                Err(e) => {
                    tracing::warn!(attempt, error = %e, "Request failed, giving up");
                    return Err(e);
                }
            }
        }
    }
}
