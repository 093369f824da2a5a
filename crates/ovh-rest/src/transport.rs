//! HTTP transport abstraction
//!
//! The client only needs one primitive: send a fully built request and get
//! the status, headers and raw body back. Keeping it behind a trait lets the
//! signing and classification logic be tested without real network calls.

use async_trait::async_trait;
use ovh_auth::Method;
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument};

/// Default request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const DEFAULT_USER_AGENT: &str = concat!("ovh-rest/", env!("CARGO_PKG_VERSION"));

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Build(String),

    /// Connection failed (refused, DNS, TLS)
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Request timed out
    #[error("request timed out: {0}")]
    Timeout(String),

    /// Request could not be sent
    #[error("request failed: {0}")]
    Request(String),

    /// Response body could not be read
    #[error("receive failed: {0}")]
    ReceiveFailed(String),
}

/// A fully built request, ready to go on the wire
#[derive(Clone)]
pub struct HttpRequest {
    /// HTTP method
    pub method: Method,
    /// Full URL
    pub url: String,
    /// Headers, in insertion order
    pub headers: Vec<(&'static str, String)>,
    /// Exact body bytes, empty when the call has no body
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// Create a request without headers or body
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Append a header
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    /// Set the body
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check whether a header is present (case-insensitive)
    pub fn has_header(&self, name: &str) -> bool {
        self.header_value(name).is_some()
    }
}

impl fmt::Debug for HttpRequest {
    // Header values include the consumer key and signature
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.headers.iter().map(|(name, _)| *name).collect();
        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &names)
            .field("body_len", &self.body.len())
            .finish()
    }
}

/// Raw response as received from the transport
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: Vec<(String, String)>,
    /// Raw body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a response without headers
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Append a header
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value (case-insensitive)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Check whether the status is in `[200, 300)`
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport abstraction
///
/// Implementations perform exactly one round trip per call: no retries and
/// no timeout beyond their own.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the raw response
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Real HTTP transport using reqwest
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default timeout and user agent
    pub fn new() -> Result<Self, TransportError> {
        Self::with_options(Duration::from_secs(DEFAULT_TIMEOUT_SECS), None)
    }

    /// Create a transport with a custom timeout and user agent
    pub fn with_options(
        timeout: Duration,
        user_agent: Option<&str>,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent.unwrap_or(DEFAULT_USER_AGENT))
            .build()
            .map_err(|e| TransportError::Build(e.to_string()))?;

        Ok(Self { client })
    }

    /// Wrap an existing reqwest client
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn map_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
        TransportError::ConnectionFailed(err.to_string())
    } else {
        TransportError::Request(err.to_string())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(to_reqwest_method(request.method), &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(*name, value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }

        let response = builder.send().await.map_err(map_send_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::ReceiveFailed(e.to_string())
            }
        })?;

        debug!(status, len = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body: body.to_vec(),
        })
    }
}

/// Mock transport for testing
///
/// Replays queued responses in order and records every request it receives.
#[cfg(any(test, feature = "test-utils"))]
#[derive(Default)]
pub struct MockTransport {
    responses: parking_lot::Mutex<std::collections::VecDeque<Result<HttpResponse, TransportError>>>,
    requests: parking_lot::Mutex<Vec<HttpRequest>>,
}

#[cfg(any(test, feature = "test-utils"))]
impl MockTransport {
    /// Create a new mock transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a response to be returned on execute()
    pub fn push_response(&self, response: HttpResponse) {
        self.responses.lock().push_back(Ok(response));
    }

    /// Add a response built from a status and body
    pub fn push(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.push_response(HttpResponse::new(status, body));
    }

    /// Simulate a transport failure
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Get every request received so far
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    /// Get the most recent request
    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.lock().last().cloned()
    }

    /// Number of responses still queued
    pub fn pending(&self) -> usize {
        self.responses.lock().len()
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request);
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::ConnectionFailed("no mock response queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_transport_replays_and_records() {
        let transport = MockTransport::new();
        transport.push(200, "1700000000");

        let request = HttpRequest::new(Method::Get, "https://mock.test/1.0/auth/time");
        let response = transport.execute(request).await.unwrap();

        assert!(response.is_success());
        assert_eq!(response.body, b"1700000000");
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.pending(), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_empty_queue_fails() {
        let transport = MockTransport::new();
        let result = transport
            .execute(HttpRequest::new(Method::Get, "https://mock.test"))
            .await;
        assert!(matches!(result, Err(TransportError::ConnectionFailed(_))));
    }

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let request = HttpRequest::new(Method::Get, "https://mock.test")
            .header("X-Ovh-Application", "ak");
        assert_eq!(request.header_value("x-ovh-application"), Some("ak"));
        assert!(!request.has_header("X-Ovh-Signature"));
    }

    #[test]
    fn test_request_debug_hides_header_values() {
        let request = HttpRequest::new(Method::Get, "https://mock.test")
            .header("X-Ovh-Consumer", "very-secret-ck");
        let debug = format!("{:?}", request);
        assert!(debug.contains("X-Ovh-Consumer"));
        assert!(!debug.contains("very-secret-ck"));
    }

    #[test]
    fn test_success_range() {
        assert!(!HttpResponse::new(199, "").is_success());
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(299, "").is_success());
        assert!(!HttpResponse::new(300, "").is_success());
    }
}
