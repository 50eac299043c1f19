//! Auth API adapter.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use super::client::{PlatformClient, SendFailure};
use super::dto::{DirectoryResponse, PasswordGrant, RefreshGrant, SignUpResponse, TokenResponse};
use crate::domain::entities::{AuthUser, DirectoryUser, Session, Token};
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthPort;

const TOKEN_PATH: &str = "auth/v1/token";
const LOGOUT_PATH: &str = "auth/v1/logout";
const SIGNUP_PATH: &str = "auth/v1/signup";
const HEALTH_PATH: &str = "auth/v1/health";
const DIRECTORY_FUNCTION_PATH: &str = "functions/v1/list-auth-users";

/// Which call produced a failed response; 400 means different things.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthCall {
    Password,
    Refresh,
    Other,
}

/// Platform auth client.
pub struct PlatformAuthClient {
    client: PlatformClient,
}

impl PlatformAuthClient {
    #[must_use]
    pub const fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    async fn grant<B: serde::Serialize + Sync>(
        &self,
        grant_type: &str,
        body: &B,
        call: AuthCall,
    ) -> Result<Session, AuthError> {
        let request = self
            .client
            .request(Method::POST, TOKEN_PATH, None)
            .query(&[("grant_type", grant_type)])
            .json(body);

        let response = PlatformClient::send(request).await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            let message = PlatformClient::error_message(status, response).await;
            return Err(map_status(status, message, call));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse token response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })?;

        token.into_session(Utc::now())
    }
}

fn network(failure: SendFailure) -> AuthError {
    AuthError::network(failure.to_string())
}

fn map_status(status: StatusCode, message: String, call: AuthCall) -> AuthError {
    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED if call == AuthCall::Password => {
            AuthError::InvalidCredentials
        }
        StatusCode::TOO_MANY_REQUESTS => AuthError::RateLimited,
        s if s.is_server_error() => AuthError::network(format!("platform unavailable: {message}")),
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::NOT_FOUND
        | StatusCode::CONFLICT
        | StatusCode::UNPROCESSABLE_ENTITY => AuthError::rejected(message),
        _ if call == AuthCall::Refresh => AuthError::rejected(message),
        _ => AuthError::unexpected(format!("unexpected response: {status} - {message}")),
    }
}

#[async_trait]
impl AuthPort for PlatformAuthClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        debug!(email = %email, "Requesting password grant");
        self.grant("password", &PasswordGrant { email, password }, AuthCall::Password)
            .await
    }

    async fn refresh(&self, refresh_token: &Token) -> Result<Session, AuthError> {
        debug!(token = %refresh_token, "Requesting refresh grant");
        self.grant(
            "refresh_token",
            &RefreshGrant {
                refresh_token: refresh_token.as_str(),
            },
            AuthCall::Refresh,
        )
        .await
    }

    async fn sign_out(&self, session: &Session) -> Result<(), AuthError> {
        let request = self
            .client
            .request(Method::POST, LOGOUT_PATH, Some(session.bearer()));
        let response = PlatformClient::send(request).await.map_err(network)?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            let message = PlatformClient::error_message(status, response).await;
            Err(map_status(status, message, AuthCall::Other))
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        debug!(email = %email, "Signing up auth account");
        let request = self
            .client
            .request(Method::POST, SIGNUP_PATH, None)
            .json(&PasswordGrant { email, password });

        let response = PlatformClient::send(request).await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            let message = PlatformClient::error_message(status, response).await;
            return Err(map_status(status, message, AuthCall::Other));
        }

        let body: SignUpResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse sign-up response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })?;
        Ok(body.into_user())
    }

    async fn list_directory_users(
        &self,
        session: &Session,
    ) -> Result<Vec<DirectoryUser>, AuthError> {
        let request = self
            .client
            .request(Method::POST, DIRECTORY_FUNCTION_PATH, Some(session.bearer()))
            .json(&serde_json::json!({}));

        let response = PlatformClient::send(request).await.map_err(network)?;
        let status = response.status();
        if !status.is_success() {
            let message = PlatformClient::error_message(status, response).await;
            return Err(map_status(status, message, AuthCall::Other));
        }

        let body: DirectoryResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse directory response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })?;

        if let Some(error) = body.error.filter(|e| !e.trim().is_empty()) {
            return Err(AuthError::rejected(error));
        }

        debug!(count = body.users.len(), "Directory users listed");
        Ok(body.users)
    }

    async fn health_check(&self) -> Result<(), AuthError> {
        let request = self.client.request(Method::GET, HEALTH_PATH, None);
        let response = PlatformClient::send(request).await.map_err(network)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(AuthError::network(format!(
                "platform returned {}",
                response.status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(StatusCode::BAD_REQUEST, AuthCall::Password ; "bad_password")]
    #[test_case(StatusCode::UNAUTHORIZED, AuthCall::Password ; "unauthorized_password")]
    fn test_password_failures_are_invalid_credentials(status: StatusCode, call: AuthCall) {
        assert!(matches!(
            map_status(status, "Invalid login credentials".into(), call),
            AuthError::InvalidCredentials
        ));
    }

    #[test]
    fn test_refresh_rejection_carries_message() {
        let error = map_status(
            StatusCode::BAD_REQUEST,
            "Invalid Refresh Token".into(),
            AuthCall::Refresh,
        );
        assert!(matches!(error, AuthError::Rejected { ref message } if message == "Invalid Refresh Token"));
        assert!(!error.is_network_error());
    }

    #[test]
    fn test_server_errors_are_network() {
        assert!(map_status(StatusCode::BAD_GATEWAY, "down".into(), AuthCall::Refresh).is_network_error());
    }

    #[test]
    fn test_rate_limit() {
        assert!(matches!(
            map_status(StatusCode::TOO_MANY_REQUESTS, String::new(), AuthCall::Other),
            AuthError::RateLimited
        ));
    }
}
