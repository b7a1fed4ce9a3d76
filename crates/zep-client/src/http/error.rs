/*
[INPUT]:  Error sources (transport, status classification, serialization, arguments)
[OUTPUT]: Structured error types with status context
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Message carried by every status-classification error.
pub const UNEXPECTED_STATUS_MESSAGE: &str = "Unexpected status code";

/// Longest body excerpt kept on an [`ZepError::Api`] error.
const BODY_SNIPPET_MAX_BYTES: usize = 512;

/// Main error type for the Zep client
#[derive(Error, Debug)]
pub enum ZepError {
    /// The HTTP round trip did not complete (connect, DNS, TLS, timeout)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a status outside the accepted set
    #[error("API error: {message}")]
    Api {
        status: u16,
        message: String,
        body: String,
    },

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A caller-supplied argument was rejected before any request was sent
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// The response decoded but did not have the expected shape
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The caller's cancellation token fired
    #[error("Request cancelled")]
    Cancelled,

    /// The caller's deadline passed before the response arrived
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

impl ZepError {
    /// Build the status-classification error for a rejected response.
    pub fn unexpected_status(status: StatusCode, body: &[u8]) -> Self {
        ZepError::Api {
            status: status.as_u16(),
            message: UNEXPECTED_STATUS_MESSAGE.to_string(),
            body: body_snippet(body),
        }
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ZepError::Api { status, .. } => Some(*status),
            ZepError::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if the error means the resource is missing
    pub fn is_not_found(&self) -> bool {
        matches!(self, ZepError::NotFound(_)) || self.status() == Some(404)
    }

    /// Check if the error happened before a response was received
    pub fn is_transport(&self) -> bool {
        matches!(self, ZepError::Http(_))
    }

    /// Turn a 404 classification into [`ZepError::NotFound`] with `message`.
    pub(crate) fn or_not_found(self, message: impl Into<String>) -> Self {
        match self {
            ZepError::Api { status: 404, .. } => ZepError::NotFound(message.into()),
            other => other,
        }
    }
}

fn body_snippet(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    if text.len() <= BODY_SNIPPET_MAX_BYTES {
        return text.into_owned();
    }
    let mut end = BODY_SNIPPET_MAX_BYTES;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &text[..end])
}

/// Result type alias for Zep operations
pub type Result<T> = std::result::Result<T, ZepError>;
