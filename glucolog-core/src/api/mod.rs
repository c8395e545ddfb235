//! Remote API access.
//!
//! [`ApiClient`] talks to the real HTTP service. [`GlucoseApi`] is the seam
//! the sync controller depends on, so it can be driven by a scripted fake.

mod client;
mod error;
#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use crate::models::{GlucoseLog, NewGlucoseLog};

pub use client::{ApiClient, DEFAULT_API_URL};
pub use error::ApiError;

/// The glucose endpoints of the remote API. Every call carries a bearer token.
pub trait GlucoseApi {
    /// `GET /glucose`: the complete current list for the token's user.
    fn list_logs(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<Vec<GlucoseLog>, ApiError>> + Send;

    /// `POST /glucose`: returns the raw response body, unvalidated.
    fn create_log(
        &self,
        token: &str,
        log: &NewGlucoseLog,
    ) -> impl Future<Output = Result<serde_json::Value, ApiError>> + Send;

    /// `DELETE /glucose/{id}`
    fn delete_log(&self, token: &str, id: &str)
        -> impl Future<Output = Result<(), ApiError>> + Send;
}
