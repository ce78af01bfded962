//! Error types for the course discovery subsystem.

use thiserror::Error;

/// Errors that can occur while talking to the course backend or configuring the client.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DiscoveryError {
    /// Network/HTTP request failed before a response arrived
    #[error("Network error: {message}")]
    Network { message: String },

    /// Server answered with a non-success status
    #[error("Unexpected response ({status}): {message}")]
    UnexpectedResponse { status: u16, message: String },

    /// Response body was not the expected JSON shape
    #[error("Decode error: {message}")]
    Decode { message: String },

    /// URL parsing/construction failed
    #[error("URL error: {message}")]
    UrlError { message: String },

    /// Environment or config file was malformed
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The owning view was torn down before the request finished
    #[error("Request cancelled")]
    Cancelled,
}

impl DiscoveryError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            DiscoveryError::Network { .. } | DiscoveryError::Decode { .. } => true,
            DiscoveryError::UnexpectedResponse { status, .. } => {
                *status >= 500 || *status == 429
            }
            DiscoveryError::UrlError { .. }
            | DiscoveryError::Config { .. }
            | DiscoveryError::Cancelled => false,
        }
    }

    /// Message shown to the user alongside the retry action.
    pub fn user_message(&self) -> &'static str {
        match self {
            DiscoveryError::Cancelled => "Loading was cancelled.",
            DiscoveryError::Config { .. } | DiscoveryError::UrlError { .. } => {
                "Course service is misconfigured."
            }
            _ => "Failed to load courses. Please try again later.",
        }
    }
}

impl From<reqwest::Error> for DiscoveryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return DiscoveryError::Decode {
                message: err.to_string(),
            };
        }
        match err.status() {
            Some(status) => DiscoveryError::UnexpectedResponse {
                status: status.as_u16(),
                message: err.to_string(),
            },
            None => DiscoveryError::Network {
                message: err.to_string(),
            },
        }
    }
}

impl From<url::ParseError> for DiscoveryError {
    fn from(err: url::ParseError) -> Self {
        DiscoveryError::UrlError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(err: serde_json::Error) -> Self {
        DiscoveryError::Decode {
            message: err.to_string(),
        }
    }
}
