//! Main REST client implementation

use ovh_auth::{Credentials, Method, RequestSigner};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info, instrument};

use crate::endpoint::Endpoint;
use crate::error::{ApiError, OvhError, OvhResult};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, DEFAULT_TIMEOUT_SECS};

/// `Content-Type` header
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// Application key header
pub const HEADER_APPLICATION: &str = "X-Ovh-Application";
/// Consumer key header
pub const HEADER_CONSUMER: &str = "X-Ovh-Consumer";
/// Server-adjusted timestamp header
pub const HEADER_TIMESTAMP: &str = "X-Ovh-Timestamp";
/// Request signature header
pub const HEADER_SIGNATURE: &str = "X-Ovh-Signature";

pub(crate) const CONTENT_TYPE_JSON: &str = "application/json";

const ENV_ENDPOINT: &str = "OVH_ENDPOINT";

/// OVH REST API client
///
/// Holds the application credentials, the optional consumer key and the
/// clock delta measured against the API at construction. Every call is
/// timestamped, signed and classified as success, [`ApiError`] or transport
/// failure. Nothing is retried.
///
/// Calls take `&self` and can run concurrently. The consumer key only
/// changes through [`request_consumer_key`](Self::request_consumer_key),
/// which needs `&mut self`.
///
/// # Example
///
/// ```no_run
/// use ovh_rest::{Credentials, Endpoint, OvhClient};
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Me {
///     nichandle: String,
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let creds = Credentials::from_env()?;
///     let client = OvhClient::new(Endpoint::OvhEu, creds).await?;
///
///     if let Some(me) = client.get::<Me>("/me").await? {
///         println!("Logged in as {}", me.nichandle);
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct OvhClient<T = ReqwestTransport> {
    pub(crate) transport: T,
    pub(crate) credentials: Credentials,
    pub(crate) endpoint: Endpoint,
    pub(crate) time_delta: i64,
}

impl OvhClient<ReqwestTransport> {
    /// Create a client for a region, with the default HTTP settings
    ///
    /// Fetches the API time to compute the clock delta; fails if the API
    /// cannot be reached.
    pub async fn new(endpoint: Endpoint, credentials: Credentials) -> OvhResult<Self> {
        Self::with_config(ClientConfig::new(credentials).with_endpoint(endpoint)).await
    }

    /// Create a client with custom configuration
    pub async fn with_config(config: ClientConfig) -> OvhResult<Self> {
        let transport = ReqwestTransport::with_options(
            Duration::from_secs(config.timeout_secs),
            config.user_agent.as_deref(),
        )?;
        Self::with_transport(config.endpoint, config.credentials, transport).await
    }

    /// Create a client from environment variables
    ///
    /// See [`ClientConfig::from_env`].
    pub async fn from_env() -> OvhResult<Self> {
        Self::with_config(ClientConfig::from_env()?).await
    }
}

impl<T: Transport> OvhClient<T> {
    /// Create a client over a custom transport
    pub async fn with_transport(
        endpoint: Endpoint,
        credentials: Credentials,
        transport: T,
    ) -> OvhResult<Self> {
        let mut client = Self {
            transport,
            credentials,
            endpoint,
            time_delta: 0,
        };
        client.refresh_time_delta().await?;

        info!(endpoint = %endpoint, delta = client.time_delta, "Created OVH REST client");
        Ok(client)
    }

    /// Get the region this client talks to
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Get the credentials used by this client
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Check if the client holds a consumer key
    pub fn has_consumer_key(&self) -> bool {
        self.credentials.has_consumer_key()
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.endpoint.url(), path)
        } else {
            format!("{}/{}", self.endpoint.url(), path)
        }
    }

    // ========================================================================
    // Signed calls
    // ========================================================================

    /// Make a signed call and decode the response
    ///
    /// `body` is sent as JSON; `None` sends (and signs) an empty body.
    /// Returns `Ok(None)` when the API answers with an empty success body.
    ///
    /// # Errors
    /// - [`OvhError::Transport`] if nothing came back
    /// - [`OvhError::Api`] for any status outside `[200, 300)`
    /// - [`OvhError::MalformedResponse`] if a body does not parse
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn call<B, R>(&self, method: Method, path: &str, body: Option<&B>) -> OvhResult<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response = self.dispatch(method, path, encode_body(body)?).await?;
        decode_body(&response)
    }

    /// Make a signed call and discard any success body
    #[instrument(skip_all, fields(method = %method, path = %path))]
    pub async fn send<B>(&self, method: Method, path: &str, body: Option<&B>) -> OvhResult<()>
    where
        B: Serialize + ?Sized,
    {
        self.dispatch(method, path, encode_body(body)?).await?;
        Ok(())
    }

    /// Signed `GET`
    pub async fn get<R: DeserializeOwned>(&self, path: &str) -> OvhResult<Option<R>> {
        self.call::<(), R>(Method::Get, path, None).await
    }

    /// Signed `POST` with a JSON body
    pub async fn post<B, R>(&self, path: &str, body: &B) -> OvhResult<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(Method::Post, path, Some(body)).await
    }

    /// Signed `PUT` with a JSON body
    pub async fn put<B, R>(&self, path: &str, body: &B) -> OvhResult<Option<R>>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.call(Method::Put, path, Some(body)).await
    }

    /// Signed `DELETE`
    pub async fn delete<R: DeserializeOwned>(&self, path: &str) -> OvhResult<Option<R>> {
        self.call::<(), R>(Method::Delete, path, None).await
    }

    async fn dispatch(&self, method: Method, path: &str, body: Vec<u8>) -> OvhResult<HttpResponse> {
        let signer = RequestSigner::new(&self.credentials, method, self.url(path), self.timestamp());
        let signature = signer.sign(&body);

        let request = HttpRequest::new(method, signer.url())
            .header(HEADER_CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(HEADER_APPLICATION, signer.application_key())
            .header(HEADER_CONSUMER, signer.consumer_key())
            .header(HEADER_TIMESTAMP, signer.timestamp().to_string())
            .header(HEADER_SIGNATURE, signature)
            .with_body(body);

        debug!(timestamp = signer.timestamp(), "Dispatching signed request");

        let response = self.transport.execute(request).await?;
        check_status(response)
    }
}

impl<T> std::fmt::Debug for OvhClient<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OvhClient")
            .field("endpoint", &self.endpoint)
            .field("has_consumer_key", &self.credentials.has_consumer_key())
            .field("time_delta", &self.time_delta)
            .finish()
    }
}

/// Serialize an optional body; absence is zero bytes, never `null`
fn encode_body<B: Serialize + ?Sized>(body: Option<&B>) -> OvhResult<Vec<u8>> {
    match body {
        Some(body) => serde_json::to_vec(body).map_err(OvhError::Serialize),
        None => Ok(Vec::new()),
    }
}

/// Turn any status outside `[200, 300)` into an error
pub(crate) fn check_status(response: HttpResponse) -> OvhResult<HttpResponse> {
    if response.is_success() {
        debug!(status = response.status, "Request succeeded");
        Ok(response)
    } else {
        debug!(status = response.status, "API returned an error");
        Err(ApiError::from_response(&response))
    }
}

/// Decode a success body; an empty body decodes to `None`
pub(crate) fn decode_body<R: DeserializeOwned>(response: &HttpResponse) -> OvhResult<Option<R>> {
    if response.body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(|e| OvhError::malformed(response.status, e))
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API region
    pub endpoint: Endpoint,
    /// Application credentials, optionally with a consumer key
    pub credentials: Credentials,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Custom user agent
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Create a configuration for the default region
    pub fn new(credentials: Credentials) -> Self {
        Self {
            endpoint: Endpoint::default(),
            credentials,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }

    /// Build the configuration from environment variables
    ///
    /// Reads `OVH_ENDPOINT` (defaults to `ovh-eu`) plus the variables read
    /// by [`Credentials::from_env`].
    pub fn from_env() -> OvhResult<Self> {
        let endpoint = match std::env::var(ENV_ENDPOINT) {
            Ok(name) => name.parse()?,
            Err(_) => Endpoint::default(),
        };
        let credentials = Credentials::from_env()?;
        Ok(Self::new(credentials).with_endpoint(endpoint))
    }

    /// Set the region
    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
