//! Shared HTTP plumbing for the platform adapters.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, StatusCode, header};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::ErrorResponse;
use crate::domain::errors::AuthError;

const USER_AGENT: &str = concat!("backdesk/", env!("CARGO_PKG_VERSION"));
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Base URL, anon key and the pooled HTTP client.
#[derive(Clone)]
pub struct PlatformClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

/// Transport-level failure before any status was received.
#[derive(Debug, Error)]
pub enum SendFailure {
    #[error("request timed out")]
    Timeout,
    #[error("failed to connect to the platform")]
    Connect,
    #[error("{0}")]
    Other(String),
}

impl PlatformClient {
    /// Creates a client for `base_url` authenticated with `anon_key`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(
        base_url: impl Into<String>,
        anon_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .gzip(true)
            .build()
            .map_err(|e| AuthError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        })
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Request carrying the anon key, a request id and `bearer` (or the anon key).
    pub fn request(&self, method: reqwest::Method, path: &str, bearer: Option<&str>) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        debug!(%method, path, request_id = %request_id, "Platform request");

        self.client
            .request(method, self.url(path))
            .header("apikey", &self.anon_key)
            .header(REQUEST_ID_HEADER, request_id)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    /// Sends the request, classifying transport failures.
    ///
    /// # Errors
    /// Returns `SendFailure` if no response was received.
    pub async fn send(request: RequestBuilder) -> Result<Response, SendFailure> {
        request.send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach the platform");
            if e.is_timeout() {
                SendFailure::Timeout
            } else if e.is_connect() {
                SendFailure::Connect
            } else {
                SendFailure::Other(e.to_string())
            }
        })
    }

    /// Reads the error message from a failed response.
    pub async fn error_message(status: StatusCode, response: Response) -> String {
        response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::text)
            .unwrap_or_else(|| format!("HTTP {status}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base_url() {
        let client =
            PlatformClient::new("https://demo.example.co/", "anon", Duration::from_secs(5)).unwrap();

        assert_eq!(
            client.url("/rest/v1/companies"),
            "https://demo.example.co/rest/v1/companies"
        );
        assert_eq!(client.url("auth/v1/logout"), "https://demo.example.co/auth/v1/logout");
    }

    #[test]
    fn test_send_failure_messages() {
        assert_eq!(SendFailure::Timeout.to_string(), "request timed out");
        assert_eq!(
            SendFailure::Other("dns lookup failed".into()).to_string(),
            "dns lookup failed"
        );

        let error: &dyn std::error::Error = &SendFailure::Connect;
        assert_eq!(error.to_string(), "failed to connect to the platform");
    }
}
