//! Signed REST client for the OVH API
//!
//! This crate wraps every call to the OVH API with the authentication the
//! API expects: a server-adjusted timestamp, the application and consumer
//! keys, and a `$1$` SHA-1 signature over the exact request. Responses are
//! classified as success, structured [`ApiError`] or transport failure.
//!
//! # Features
//!
//! - **Clock sync**: delta with `GET /auth/time` measured at construction
//! - **Consumer keys**: `POST /auth/credential` with scoped access rules
//! - **Signed calls**: generic over request and response types
//! - **Regions**: OVH EU/CA/US, Kimsufi, So you Start, RunAbove
//!
//! # Example
//!
//! ```no_run
//! use ovh_rest::{CredentialRequest, Credentials, Endpoint, Method, OvhClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let creds = Credentials::from_env()?;
//!     let mut client = OvhClient::new(Endpoint::OvhEu, creds).await?;
//!
//!     if !client.has_consumer_key() {
//!         let grant = client
//!             .request_consumer_key(CredentialRequest::new().add_rule(Method::Get, "/me"))
//!             .await?;
//!         println!("Validate your key at {}", grant.validation_url);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Retries
//!
//! Nothing is retried. A transport failure or a 5xx goes straight back to
//! the caller; [`OvhError::is_retryable`] helps decide what to do with it.

pub mod client;
pub mod clock;
mod credential;
pub mod endpoint;
pub mod error;
pub mod transport;

// Re-export main types
pub use client::{ClientConfig, OvhClient};
pub use endpoint::Endpoint;
pub use error::{ApiError, OvhError, OvhResult};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};

#[cfg(any(test, feature = "test-utils"))]
pub use transport::MockTransport;

// Re-export auth types used in the client API
pub use ovh_auth::{
    AccessRule, AuthError, CredentialGrant, CredentialRequest, CredentialState, Credentials,
    Method,
};
