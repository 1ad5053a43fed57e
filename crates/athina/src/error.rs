//! Error types for the Athina SDK
//!
//! Every request goes through a single mapping boundary,
//! [`Error::from_response`], so resources never inspect status codes
//! themselves.

use std::time::Duration;
use thiserror::Error;

/// Result type alias for operations that can fail with an Athina SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Hint attached to every [`Error::Unauthorized`].
pub const UNAUTHORIZED_HINT: &str = "please check your athina api key and try again";

/// Main error type for the Athina SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// No API key was configured. Raised before any network I/O.
    #[error(
        "Athina API key is not set. Provide it with Client::builder().api_key(..) or the ATHINA_API_KEY environment variable"
    )]
    MissingCredential,

    /// The API rejected the credential (401).
    #[error("Unauthorized: {message} (please check your athina api key and try again)")]
    Unauthorized {
        /// The `error` field reported by the server
        message: String,
    },

    /// Any other non-success status.
    #[error("API error (status {status}): {error}: {}", .details.as_deref().unwrap_or("No Details"))]
    ApiError {
        /// HTTP status code
        status: u16,
        /// The `error` field reported by the server
        error: String,
        /// The `details.message` field, when present
        details: Option<String>,
    },

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// A success response did not have the shape the endpoint promises.
    #[error("Unexpected API response: {0}")]
    UnexpectedResponse(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid HTTP header name.
    #[error("Invalid HTTP header name: {0}")]
    InvalidHeaderName(String),

    /// Invalid HTTP header value.
    #[error("Invalid HTTP header value: {0}")]
    InvalidHeaderValue(String),
}

impl Error {
    /// Classify a non-success response.
    ///
    /// The body is read as an API envelope when possible. A body that is not
    /// JSON still yields a classified error with the `"Unknown Error"` message.
    pub fn from_response(status: u16, body: &str) -> Self {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).unwrap_or_default();
        let error = envelope.error.unwrap_or_else(|| "Unknown Error".to_string());

        match status {
            401 => Error::Unauthorized { message: error },
            _ => Error::ApiError {
                status,
                error,
                details: envelope.details.and_then(|d| d.message),
            },
        }
    }

    /// Check if this error is worth another attempt.
    ///
    /// Transport failures and 5xx responses are retryable. 401 and any
    /// other 4xx, as well as malformed payloads, are terminal.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Connection(_) | Error::Timeout(_) => true,
            Error::ApiError { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// True for failures where no HTTP response was received.
    pub fn is_transport_failure(&self) -> bool {
        matches!(self, Error::Connection(_) | Error::Timeout(_))
    }

    /// HTTP status carried by the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Unauthorized { .. } => Some(401),
            Error::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::HttpClient(err.to_string())
        } else {
            Error::Connection(err.to_string())
        }
    }
}

// Shape of an error envelope. Every field is optional since failure
// bodies are not guaranteed to follow it.

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    details: Option<ErrorDetails>,
}

#[derive(Debug, Default, serde::Deserialize)]
struct ErrorDetails {
    #[serde(default)]
    message: Option<String>,
}
