//! REST API-specific error types.

use std::fmt;

/// Coarse classification of a failed call, kept by the collection store as
/// its error side-channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport or connectivity failure
    Network,
    /// Non-success status or unusable response body
    Server,
    /// The mutation target does not exist on the service
    NotFound,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ErrorKind::Network => "network error",
            ErrorKind::Server => "server error",
            ErrorKind::NotFound => "not found",
        };
        f.write_str(label)
    }
}

/// Errors that can occur while talking to the organizer service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// HTTP request could not be completed
    #[error("HTTP request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Service answered with a non-success status
    #[error("API error (status {status}): {message}")]
    Server { status: u16, message: String },

    /// Service reported the mutation target as missing
    #[error("{collection} record {id} not found")]
    NotFound { collection: &'static str, id: i64 },

    /// Failed to deserialize API response
    #[error("Failed to deserialize API response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// Base URL could not be used to build request URLs
    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// Request could not be handed to the network handler
    #[error("Network handler is not running")]
    Disconnected,
}

impl ApiError {
    /// Returns the error classification used by the screen and store.
    ///
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(e) if e.is_decode() => ErrorKind::Server,
            ApiError::Network(e) if e.is_status() => ErrorKind::Server,
            ApiError::Network(_) | ApiError::InvalidBaseUrl(_) | ApiError::Disconnected => {
                ErrorKind::Network
            }
            ApiError::Server { .. } | ApiError::Deserialization(_) => ErrorKind::Server,
            ApiError::NotFound { .. } => ErrorKind::NotFound,
        }
    }

    /// Returns the HTTP status for errors raised from a service response.
    ///
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}
