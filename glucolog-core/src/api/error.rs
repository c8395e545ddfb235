//! API error types.

use thiserror::Error;

/// Errors from a single call to the remote API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The request never got a response (DNS, refused, reset, TLS ...).
    #[error("Network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status.
    #[error("Server returned status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status { status: u16, message: Option<String> },

    /// A 2xx body that could not be decoded.
    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// The server-provided `error` text, if the server sent one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
