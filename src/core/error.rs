//! Custom error types for the client.
//!
//! Provides structured error handling for each domain:
//!
//! - [`FetchError`] - Transport failures for HTTP requests
//! - [`StoreError`] - Persistent settings store operations
//! - [`ContentError`] - Content model, session and login failures

use thiserror::Error;

use crate::models::VisitFailure;

/// Network/fetch-related errors for HTTP requests.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// Failed to create HTTP request
    #[error("Failed to create request")]
    RequestCreationFailed,
    /// Network request failed (CORS, connection refused, etc.)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// HTTP error response (non-2xx status)
    #[error("HTTP error: {status} {status_text}")]
    HttpError { status: u16, status_text: String },
    /// Failed to read response body
    #[error("Failed to read response")]
    ResponseReadFailed,
    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParseError(String),
}

impl FetchError {
    /// HTTP status of the failure, or 0 when no response arrived.
    pub fn status(&self) -> u16 {
        match self {
            Self::HttpError { status, .. } => *status,
            _ => 0,
        }
    }
}

/// Persistent settings store errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Backing storage not available.
    #[error("persistent storage not available")]
    StorageUnavailable,
    /// Failed to serialize a value to JSON.
    #[error("failed to serialize setting")]
    SerializationFailed,
    /// Failed to write to storage.
    #[error("failed to save setting")]
    WriteFailed,
    /// Failed to remove from storage.
    #[error("failed to remove setting")]
    RemoveFailed,
}

/// Content model, session and login errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContentError {
    /// A content fetch was refused with 401; the session has been cleared.
    #[error("Unauthorized")]
    Unauthorized,
    /// Any other failed fetch.
    #[error("Failure reaching {resource}: {status} {status_text}")]
    NetworkFailure {
        resource: String,
        status: u16,
        status_text: String,
    },
    /// Login reply did not match `(login|location):<value>`.
    #[error("Malformed server response: {0}")]
    MalformedServerResponse(String),
    /// Fetched JSON did not have the shape its node kind expects.
    #[error("Malformed content from {url}: {reason}")]
    MalformedPayload { url: String, reason: String },
    /// Provisioning invoked without a fetch time.
    #[error("Node provisioning without reliable time stamp: {0}")]
    MissingTimestamp(String),
    /// Feature deliberately not implemented yet.
    #[error("Not yet implemented: {0}")]
    NotImplemented(String),
    /// Internal inconsistency between registered roots and node kinds.
    #[error("Configuration error: {0}")]
    Configuration(String),
    /// The login endpoint kept redirecting.
    #[error("Login redirected more than {0} times")]
    LoginRedirectLimit(usize),
    /// No node is registered for the URL.
    #[error("No content node for {0}")]
    UnknownNode(String),
    /// Persistent settings failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContentError {
    /// Classify a failed content fetch of `resource`.
    pub fn from_failure(resource: &str, failure: &VisitFailure) -> Self {
        if failure.is_unauthorized() {
            Self::Unauthorized
        } else {
            Self::NetworkFailure {
                resource: resource.to_string(),
                status: failure.status,
                status_text: failure.status_text.clone(),
            }
        }
    }
}
