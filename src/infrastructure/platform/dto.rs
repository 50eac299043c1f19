use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{AuthUser, DirectoryUser, Session, Token};
use crate::domain::errors::AuthError;

#[derive(Debug, Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Body of a successful token grant.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: TokenUser,
}

impl TokenResponse {
    /// Converts the grant into a session, preferring the absolute expiry.
    ///
    /// # Errors
    /// Returns error if either token is empty.
    pub fn into_session(self, now: DateTime<Utc>) -> Result<Session, AuthError> {
        let access = Token::new(self.access_token)
            .ok_or_else(|| AuthError::unexpected("empty access token in response"))?;
        let refresh = Token::new(self.refresh_token)
            .ok_or_else(|| AuthError::unexpected("empty refresh token in response"))?;

        let expires_at = self
            .expires_at
            .and_then(|secs| Utc.timestamp_opt(secs, 0).single())
            .unwrap_or_else(|| now + Duration::seconds(self.expires_in.unwrap_or(3600)));

        Ok(Session::new(
            access,
            refresh,
            expires_at,
            self.user.id,
            self.user.email.unwrap_or_default(),
        ))
    }
}

/// Sign-up answers with either the user or a session wrapping it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    WithSession { user: AuthUser },
    User(AuthUser),
}

impl SignUpResponse {
    #[must_use]
    pub fn into_user(self) -> AuthUser {
        match self {
            Self::WithSession { user } | Self::User(user) => user,
        }
    }
}

/// Body of the `list-auth-users` function.
#[derive(Debug, Deserialize)]
pub struct DirectoryResponse {
    #[serde(default)]
    pub users: Vec<DirectoryUser>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Error body of the auth, table and function endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Most specific human-readable message present.
    #[must_use]
    pub fn text(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
            .or(self.details)
            .filter(|m| !m.trim().is_empty())
    }
}
