//! Error types for REST API operations

use ovh_auth::AuthError;
use serde::Deserialize;

use crate::transport::{HttpResponse, TransportError};

/// Response header carrying the request tracer when the body has none
pub(crate) const HEADER_QUERY_ID: &str = "X-Ovh-QueryID";

/// Structured failure returned by the API
///
/// `status` is always the HTTP status of the response, never a code found
/// in the body.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Error {status}: {message:?}")]
pub struct ApiError {
    /// HTTP status code
    pub status: u16,
    /// Human-readable message
    pub message: String,
    /// Symbolic error code (`INVALID_SIGNATURE`, ...) when provided
    pub error_code: Option<String>,
    /// Request tracer to quote to OVH support
    pub tracer: Option<String>,
}

/// Error body as sent by the API; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    error_code: Option<String>,
    #[serde(default)]
    tracer: Option<String>,
}

impl ApiError {
    /// Build an API error from a non-success response
    ///
    /// Fails with [`OvhError::MalformedResponse`] when the body is not a
    /// JSON object.
    pub(crate) fn from_response(response: &HttpResponse) -> OvhError {
        match serde_json::from_slice::<ApiErrorBody>(&response.body) {
            Ok(body) => OvhError::Api(ApiError {
                status: response.status,
                message: body.message,
                error_code: body.error_code,
                tracer: body
                    .tracer
                    .or_else(|| response.header(HEADER_QUERY_ID).map(str::to_string)),
            }),
            Err(e) => OvhError::malformed(response.status, e),
        }
    }

    /// Check whether the API rejected the credentials or the signature
    pub fn is_authentication_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
    }
}

/// Errors that can occur during REST API operations
#[derive(Debug, thiserror::Error)]
pub enum OvhError {
    /// Network-level failure, nothing usable came back
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// The time endpoint answered with a non-success status
    #[error("API seems down, HTTP response: {status}")]
    RemoteUnavailable {
        /// HTTP status code
        status: u16,
    },

    /// Response body does not match the expected shape
    #[error("Malformed response (HTTP {status}): {message}")]
    MalformedResponse {
        /// HTTP status code of the offending response
        status: u16,
        /// Parser diagnostic
        message: String,
    },

    /// API returned an error
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Unknown endpoint region
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Credentials could not be built
    #[error("Authentication setup failed: {0}")]
    Auth(#[from] AuthError),

    /// Request body could not be serialized
    #[error("Failed to serialize request body: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl OvhError {
    pub(crate) fn malformed(status: u16, err: impl std::fmt::Display) -> Self {
        Self::MalformedResponse {
            status,
            message: err.to_string(),
        }
    }

    /// Get the structured API error, if this is one
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(error) => Some(error),
            _ => None,
        }
    }

    /// Check if this is a structured API error
    pub fn is_api_error(&self) -> bool {
        matches!(self, Self::Api(_))
    }

    /// HTTP status of the API error, if this is one
    pub fn api_status(&self) -> Option<u16> {
        self.api_error().map(|error| error.status)
    }

    /// Check if the API rejected the credentials or the signature
    pub fn is_authentication_failure(&self) -> bool {
        self.api_error()
            .is_some_and(ApiError::is_authentication_failure)
    }

    /// Check if repeating the same call could succeed
    ///
    /// Nothing in this crate retries; this only helps callers decide.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RemoteUnavailable { .. } => true,
            Self::Api(error) => error.status == 429 || error.status >= 500,
            Self::MalformedResponse { .. }
            | Self::InvalidEndpoint(_)
            | Self::Auth(_)
            | Self::Serialize(_) => false,
        }
    }
}

/// Result type for REST operations
pub type OvhResult<T> = Result<T, OvhError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_comes_from_transport() {
        let response = HttpResponse::new(404, r#"{"message":"Not found","code":500}"#);
        let err = ApiError::from_response(&response);
        let api = err.api_error().unwrap();
        assert_eq!(api.status, 404);
        assert_eq!(api.message, "Not found");
        assert_eq!(err.api_status(), Some(404));
    }

    #[test]
    fn test_full_error_body() {
        let response = HttpResponse::new(
            400,
            r#"{"errorCode":"INVALID_SIGNATURE","httpCode":"400 Bad Request","message":"Invalid signature","tracer":"EU.ext-1.abc"}"#,
        );
        let api = match ApiError::from_response(&response) {
            OvhError::Api(api) => api,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(api.error_code.as_deref(), Some("INVALID_SIGNATURE"));
        assert_eq!(api.tracer.as_deref(), Some("EU.ext-1.abc"));
    }

    #[test]
    fn test_tracer_falls_back_to_query_id_header() {
        let response = HttpResponse::new(403, r#"{"message":"This call has not been granted"}"#)
            .with_header("x-ovh-queryid", "EU.ext-2.xyz");
        let err = ApiError::from_response(&response);
        assert_eq!(err.api_error().unwrap().tracer.as_deref(), Some("EU.ext-2.xyz"));
        assert!(err.is_authentication_failure());
    }

    #[test]
    fn test_unparseable_error_body() {
        let response = HttpResponse::new(502, "<html>Bad Gateway</html>");
        let err = ApiError::from_response(&response);
        assert!(matches!(err, OvhError::MalformedResponse { status: 502, .. }));
        assert!(!err.is_api_error());
    }

    #[test]
    fn test_retryable() {
        let server = OvhError::Api(ApiError {
            status: 503,
            message: String::new(),
            error_code: None,
            tracer: None,
        });
        assert!(server.is_retryable());
        assert!(OvhError::RemoteUnavailable { status: 500 }.is_retryable());
        assert!(!OvhError::InvalidEndpoint("mars".into()).is_retryable());
    }
}
