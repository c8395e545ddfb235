//! Sync error types.

use thiserror::Error;

use crate::api::ApiError;
use crate::session::SessionError;

/// Errors surfaced by [`LogSync`](super::LogSync) operations.
///
/// Whenever one of these is returned the log store has not been touched.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Session storage error: {0}")]
    Session(#[from] SessionError),

    #[error("Invalid glucose value '{0}': expected a whole number")]
    InvalidValue(String),
}

impl SyncError {
    /// Text for a user-facing alert: the server's own message when it sent
    /// one, `fallback` otherwise.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            SyncError::Api(e) => e.server_message().unwrap_or(fallback).to_string(),
            SyncError::InvalidValue(_) => self.to_string(),
            SyncError::Session(_) => fallback.to_string(),
        }
    }
}
