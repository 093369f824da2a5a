//! Consumer key request and grant types
//!
//! A consumer key is scoped by a list of access rules. The application asks
//! for one with a [`CredentialRequest`]; OVH answers with a
//! [`CredentialGrant`] whose key only becomes usable after the end user
//! visits the validation URL.

use serde::{Deserialize, Serialize, Serializer};

use crate::method::Method;

/// One permission grant: a method and a path pattern
///
/// The path is either exact (`/me`) or ends with a `*` wildcard
/// (`/domain/*`, `/*`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    /// Allowed HTTP method
    pub method: Method,
    /// Allowed path pattern
    pub path: String,
}

impl AccessRule {
    /// Create a new access rule
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
        }
    }

    /// Check whether a call would be covered by this rule
    ///
    /// Mirrors the server-side matching: exact path, or prefix match when
    /// the pattern ends with `*`.
    pub fn allows(&self, method: Method, path: &str) -> bool {
        if self.method != method {
            return false;
        }
        match self.path.strip_suffix('*') {
            Some(prefix) => path.starts_with(prefix),
            None => self.path == path,
        }
    }
}

/// Body of `POST /auth/credential`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequest {
    /// Scope of the requested consumer key
    pub access_rules: Vec<AccessRule>,
    /// Where to send the user after validation
    ///
    /// When absent the user stays on the OVH website. Always sent, as an
    /// empty string when absent.
    #[serde(serialize_with = "serialize_redirection")]
    pub redirection: Option<String>,
}

fn serialize_redirection<S: Serializer>(
    redirection: &Option<String>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(redirection.as_deref().unwrap_or(""))
}

impl CredentialRequest {
    /// Create an empty request
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule
    pub fn add_rule(mut self, method: Method, path: impl Into<String>) -> Self {
        self.access_rules.push(AccessRule::new(method, path));
        self
    }

    /// Allow every method on every path
    pub fn allow_all(mut self) -> Self {
        for method in Method::ALL {
            self.access_rules.push(AccessRule::new(method, "/*"));
        }
        self
    }

    /// Set the redirection URL
    pub fn with_redirection(mut self, url: impl Into<String>) -> Self {
        self.redirection = Some(url.into());
        self
    }

    /// Check whether any rule covers the call
    pub fn allows(&self, method: Method, path: &str) -> bool {
        self.access_rules.iter().any(|rule| rule.allows(method, path))
    }
}

/// Validation state of a consumer key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CredentialState {
    /// Issued, waiting for the user to log in
    PendingValidation,
    Validated,
    Expired,
    Refused,
    /// Any state this client does not know about
    #[serde(other)]
    Unknown,
}

/// Response of `POST /auth/credential`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialGrant {
    /// Issued consumer key, not usable before validation
    pub consumer_key: String,
    /// Always `pendingValidation` at issuance
    pub state: CredentialState,
    /// URL the user must visit to validate the key
    pub validation_url: String,
}
