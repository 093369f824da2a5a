//! Credentials and request signing for the OVH API
//!
//! This crate holds everything needed to authenticate a call to OVH without
//! touching the network: the application credentials, the `$1$` SHA-1
//! request signature, and the value types exchanged while asking OVH for a
//! new consumer key.
//!
//! # Example
//!
//! ```no_run
//! use ovh_auth::{Credentials, Method};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load credentials from environment
//!     let creds = Credentials::from_env()?;
//!
//!     // Sign a call to GET /me
//!     let signature = creds.sign(
//!         Method::Get,
//!         "https://eu.api.ovh.com/1.0/me",
//!         b"",
//!         1_700_000_000,
//!     );
//!     println!("X-Ovh-Signature: {}", signature);
//!
//!     Ok(())
//! }
//! ```

mod credentials;
mod error;
mod method;
mod rules;
pub mod signature;

pub use credentials::{Credentials, RequestSigner};
pub use error::{AuthError, AuthResult};
pub use method::Method;
pub use rules::{AccessRule, CredentialGrant, CredentialRequest, CredentialState};
pub use signature::{sign, SIGNATURE_PREFIX};
