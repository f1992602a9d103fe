// ABOUTME: Error types for LLC backend operations
// ABOUTME: Result alias plus constructor helpers and predicates

use thiserror::Error;

/// Result type for backend operations
pub type LlcResult<T> = Result<T, LlcError>;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum LlcError {
    #[error("Authentication error: {0}")]
    Authentication(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Session expired or invalid")]
    SessionExpired,

    #[error("Record not editable: {0}")]
    NotEditable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LlcError {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an API error
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Check if this is a network-related error
    pub fn is_network_error(&self) -> bool {
        matches!(self, LlcError::Network(_))
    }

    /// Check if this error should send the user back to sign-in
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlcError::Authentication(_) | LlcError::SessionExpired
        )
    }
}

impl From<reqwest::Error> for LlcError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}
