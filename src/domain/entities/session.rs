//! Platform session value objects.

use std::fmt;

use chrono::{DateTime, Duration, Utc};

/// Opaque bearer or refresh token with masking.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    value: String,
}

impl Token {
    const MIN_TOKEN_LENGTH: usize = 8;

    /// Creates new token; blank or too short input is rejected.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();

        if value.len() < Self::MIN_TOKEN_LENGTH {
            return None;
        }

        Some(Self { value })
    }

    /// Creates token without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns token as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked token for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// Authenticated platform session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    access_token: Token,
    refresh_token: Token,
    expires_at: DateTime<Utc>,
    user_id: String,
    email: String,
}

impl Session {
    /// Seconds before expiry at which the session counts as expired.
    const EXPIRY_MARGIN_SECS: i64 = 30;

    #[must_use]
    pub fn new(
        access_token: Token,
        refresh_token: Token,
        expires_at: DateTime<Utc>,
        user_id: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            access_token,
            refresh_token,
            expires_at,
            user_id: user_id.into(),
            email: email.into(),
        }
    }

    /// Value for the `Authorization: Bearer` header.
    #[must_use]
    pub fn bearer(&self) -> &str {
        self.access_token.as_str()
    }

    #[must_use]
    pub const fn refresh_token(&self) -> &Token {
        &self.refresh_token
    }

    #[must_use]
    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Auth provider user id (matches `users.auth_id`).
    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns whether the access token is expired (or about to be) at `now`.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(Self::EXPIRY_MARGIN_SECS) >= self.expires_at
    }
}
