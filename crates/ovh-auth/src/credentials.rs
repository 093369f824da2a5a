//! Application credentials for the OVH API
//!
//! # Security
//!
//! The application secret and the consumer key are stored using the
//! `secrecy` crate which:
//! - Zeroizes memory on drop
//! - Prevents accidental logging via Debug impl
//! - Provides explicit access via `expose_secret()`

use secrecy::{ExposeSecret, SecretString};

use crate::error::{AuthError, AuthResult};
use crate::method::Method;
use crate::signature;

const ENV_APPLICATION_KEY: &str = "OVH_APPLICATION_KEY";
const ENV_APPLICATION_SECRET: &str = "OVH_APPLICATION_SECRET";
const ENV_CONSUMER_KEY: &str = "OVH_CONSUMER_KEY";

/// API credentials for authenticated requests
///
/// The application key and secret never change once built. The consumer
/// key is absent until one is supplied up front or issued by the
/// credential flow.
pub struct Credentials {
    /// Application key (public, sent as `X-Ovh-Application`)
    application_key: String,
    /// Application secret (never transmitted)
    application_secret: SecretString,
    /// Consumer key (sent as `X-Ovh-Consumer`)
    consumer_key: Option<SecretString>,
}

impl Credentials {
    /// Create new credentials from an application key and secret
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidCredentials`] if either value is empty.
    pub fn new(
        application_key: impl Into<String>,
        application_secret: impl Into<String>,
    ) -> AuthResult<Self> {
        let application_key = application_key.into();
        let application_secret = application_secret.into();

        if application_key.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "application key is empty".to_string(),
            ));
        }
        if application_secret.is_empty() {
            return Err(AuthError::InvalidCredentials(
                "application secret is empty".to_string(),
            ));
        }

        Ok(Self {
            application_key,
            application_secret: SecretString::from(application_secret),
            consumer_key: None,
        })
    }

    /// Attach a consumer key obtained earlier
    ///
    /// An empty string leaves the credentials unauthenticated.
    pub fn with_consumer_key(mut self, consumer_key: impl Into<String>) -> Self {
        self.set_consumer_key(consumer_key);
        self
    }

    /// Create credentials from environment variables
    ///
    /// Reads `OVH_APPLICATION_KEY`, `OVH_APPLICATION_SECRET` and, when set,
    /// `OVH_CONSUMER_KEY`.
    pub fn from_env() -> AuthResult<Self> {
        let application_key = std::env::var(ENV_APPLICATION_KEY)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_APPLICATION_KEY.to_string()))?;
        let application_secret = std::env::var(ENV_APPLICATION_SECRET)
            .map_err(|_| AuthError::EnvVarNotSet(ENV_APPLICATION_SECRET.to_string()))?;

        let credentials = Self::new(application_key, application_secret)?;
        Ok(match std::env::var(ENV_CONSUMER_KEY) {
            Ok(consumer_key) => credentials.with_consumer_key(consumer_key),
            Err(_) => credentials,
        })
    }

    /// Get the application key
    pub fn application_key(&self) -> &str {
        &self.application_key
    }

    /// Check whether a consumer key is present
    pub fn has_consumer_key(&self) -> bool {
        self.consumer_key.is_some()
    }

    /// Consumer key as sent on the wire, empty when absent
    pub fn consumer_key(&self) -> &str {
        self.consumer_key
            .as_ref()
            .map(|key| key.expose_secret())
            .unwrap_or("")
    }

    /// Replace the consumer key
    pub fn set_consumer_key(&mut self, consumer_key: impl Into<String>) {
        let consumer_key = consumer_key.into();
        self.consumer_key = if consumer_key.is_empty() {
            None
        } else {
            Some(SecretString::from(consumer_key))
        };
    }

    /// Sign a request with these credentials
    ///
    /// # Arguments
    /// * `method` - HTTP method of the call
    /// * `url` - Full URL, exactly as dispatched
    /// * `body` - Serialized body, empty when the call has none
    /// * `timestamp` - Server-adjusted unix time in seconds
    pub fn sign(&self, method: Method, url: &str, body: &[u8], timestamp: i64) -> String {
        signature::sign(
            self.application_secret.expose_secret(),
            self.consumer_key(),
            method,
            url,
            body,
            timestamp,
        )
    }
}

impl Clone for Credentials {
    /// Clone credentials (creates new secrets with the same content)
    fn clone(&self) -> Self {
        Self {
            application_key: self.application_key.clone(),
            application_secret: SecretString::from(
                self.application_secret.expose_secret().to_string(),
            ),
            consumer_key: self
                .consumer_key
                .as_ref()
                .map(|key| SecretString::from(key.expose_secret().to_string())),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let key: String = self.application_key.chars().take(8).collect();
        f.debug_struct("Credentials")
            .field("application_key", &format!("{}...", key))
            .field("application_secret", &"[REDACTED]")
            .field(
                "consumer_key",
                &self.consumer_key.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

/// Request signer for building authenticated requests
///
/// Captures everything but the body, so the body can be serialized once and
/// both signed and sent.
#[derive(Debug)]
pub struct RequestSigner<'a> {
    credentials: &'a Credentials,
    method: Method,
    url: String,
    timestamp: i64,
}

impl<'a> RequestSigner<'a> {
    /// Create a new request signer
    pub fn new(
        credentials: &'a Credentials,
        method: Method,
        url: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            credentials,
            method,
            url: url.into(),
            timestamp,
        }
    }

    /// Get the timestamp for this request
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Get the URL for this request
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Get the application key
    pub fn application_key(&self) -> &str {
        self.credentials.application_key()
    }

    /// Get the consumer key, empty when absent
    pub fn consumer_key(&self) -> &str {
        self.credentials.consumer_key()
    }

    /// Sign the request with the given body
    pub fn sign(&self, body: &[u8]) -> String {
        self.credentials
            .sign(self.method, &self.url, body, self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_empty_values() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(AuthError::InvalidCredentials(_))
        ));
        assert!(matches!(
            Credentials::new("key", ""),
            Err(AuthError::InvalidCredentials(_))
        ));
    }

    #[test]
    fn test_consumer_key_lifecycle() {
        let mut creds = Credentials::new("app_key", "app_secret").unwrap();
        assert!(!creds.has_consumer_key());
        assert_eq!(creds.consumer_key(), "");

        creds.set_consumer_key("ck");
        assert!(creds.has_consumer_key());
        assert_eq!(creds.consumer_key(), "ck");

        creds.set_consumer_key("");
        assert!(!creds.has_consumer_key());
    }

    #[test]
    fn test_credentials_debug_redacts_secrets() {
        let creds = Credentials::new("application_key", "super_secret_value")
            .unwrap()
            .with_consumer_key("consumer_secret_value");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("super_secret_value"));
        assert!(!debug.contains("consumer_secret_value"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_signing_matches_engine() {
        let creds = Credentials::new("AK", "EgWIz07P0HYwtQDs")
            .unwrap()
            .with_consumer_key("MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1");
        let url = "https://eu.api.ovh.com/1.0/auth/currentCredential";

        let signature = creds.sign(Method::Get, url, b"", 1457018875);
        assert_eq!(signature, "$1$755618cd738a9b1a8596f65f936a58c242a798e7");

        let signer = RequestSigner::new(&creds, Method::Get, url, 1457018875);
        assert_eq!(signer.sign(b""), signature);
        assert_eq!(signer.consumer_key(), "MtSwSrPpNjqfVSmJhLbPyr2i45lSwPU1");
    }

    #[test]
    fn test_clone_keeps_consumer_key() {
        let creds = Credentials::new("AK", "AS").unwrap().with_consumer_key("CK");
        let cloned = creds.clone();
        assert_eq!(cloned.consumer_key(), "CK");
        assert_eq!(
            cloned.sign(Method::Get, "https://x/1.0/me", b"", 1),
            creds.sign(Method::Get, "https://x/1.0/me", b"", 1)
        );
    }
}
