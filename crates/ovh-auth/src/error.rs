//! Error types for authentication operations

/// Errors that can occur while building or using credentials
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Invalid API credentials
    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    /// HTTP method not accepted by the API
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Environment variable not set
    #[error("Environment variable not set: {0}")]
    EnvVarNotSet(String),
}

/// Result type for authentication operations
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::EnvVarNotSet("OVH_APPLICATION_KEY".to_string());
        assert!(err.to_string().contains("OVH_APPLICATION_KEY"));
    }
}
