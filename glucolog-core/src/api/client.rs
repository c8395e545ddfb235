//! HTTP client for the glucose tracking backend.

use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{ApiError, GlucoseApi};
use crate::models::{GlucoseLog, NewGlucoseLog, NewProfile};

/// Production backend.
pub const DEFAULT_API_URL: &str = "https://backend-rnapp.onrender.com";

/// Client for the remote REST API.
///
/// No timeout is configured: a request that never resolves keeps its
/// caller waiting.
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

#[derive(Deserialize)]
struct VerifyOtpResponse {
    token: Option<String>,
}

#[derive(Deserialize)]
struct CreateProfileResponse {
    #[serde(default)]
    user: Value,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL. A bare host gets `https://`.
    pub fn url(&self, path: &str) -> String {
        let base = if self.base_url.starts_with("http://") || self.base_url.starts_with("https://")
        {
            self.base_url.clone()
        } else {
            format!("https://{}", self.base_url)
        };
        format!("{}{}", base.trim_end_matches('/'), path)
    }

    /// `POST /auth/request-otp`
    pub async fn request_otp(&self, phone: &str) -> Result<(), ApiError> {
        let url = self.url("/auth/request-otp");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "phone": phone }))
            .send()
            .await
            .map_err(network)?;
        check_status(response).await?;
        Ok(())
    }

    /// `POST /auth/verify-otp`
    ///
    /// Returns `Ok(None)` when the server accepted the request but sent no
    /// token, which callers treat as a failed verification.
    pub async fn verify_otp(&self, phone: &str, otp: &str) -> Result<Option<String>, ApiError> {
        let url = self.url("/auth/verify-otp");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({ "phone": phone, "otp": otp }))
            .send()
            .await
            .map_err(network)?;
        let body: VerifyOtpResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.token.filter(|t| !t.is_empty()))
    }

    /// `POST /profile/create`, returning the `user` object from the response.
    pub async fn create_profile(&self, token: &str, profile: &NewProfile) -> Result<Value, ApiError> {
        let url = self.url("/profile/create");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(profile)
            .send()
            .await
            .map_err(network)?;
        let body: CreateProfileResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.user)
    }
}

impl GlucoseApi for ApiClient {
    async fn list_logs(&self, token: &str) -> Result<Vec<GlucoseLog>, ApiError> {
        let url = self.url("/glucose");
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;

        let records: Vec<Value> = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(GlucoseLog::from_list(records))
    }

    async fn create_log(&self, token: &str, log: &NewGlucoseLog) -> Result<Value, ApiError> {
        let url = self.url("/glucose");
        tracing::debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(log)
            .send()
            .await
            .map_err(network)?;
        let text = check_status(response)
            .await?
            .text()
            .await
            .map_err(network)?;

        // An empty or non-JSON success body is still a success; the caller
        // decides what to do with a record it cannot identify.
        Ok(serde_json::from_str(&text).unwrap_or(Value::Null))
    }

    async fn delete_log(&self, token: &str, id: &str) -> Result<(), ApiError> {
        let url = self.url(&format!("/glucose/{}", urlencoding::encode(id)));
        tracing::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(network)?;
        check_status(response).await?;
        Ok(())
    }
}

fn network(e: reqwest::Error) -> ApiError {
    ApiError::Network(e.to_string())
}

/// Passes 2xx responses through; turns anything else into
/// [`ApiError::Status`], picking up the body's `error` field if present.
async fn check_status(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string));

    tracing::debug!("Request failed with {}: {:?}", status, message);
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}
