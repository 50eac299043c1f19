//! Authentication DTOs.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::entities::{Session, UserProfile};

/// Login request data.
#[derive(Clone)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Account password, wiped on drop.
    pub password: Zeroizing<String>,
    /// Whether to keep the session in the keyring.
    pub remember: bool,
}

impl LoginRequest {
    /// Creates new login request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: Zeroizing::new(password.into()),
            remember: true,
        }
    }

    /// Disables session persistence.
    #[must_use]
    pub const fn without_persistence(mut self) -> Self {
        self.remember = false;
        self
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("remember", &self.remember)
            .finish()
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Authenticated session.
    pub session: Session,
    /// Caller's profile row, if one exists.
    pub profile: Option<UserProfile>,
    /// Whether the refresh token was persisted.
    pub session_persisted: bool,
}

impl LoginResponse {
    /// Creates new login response.
    #[must_use]
    pub const fn new(
        session: Session,
        profile: Option<UserProfile>,
        session_persisted: bool,
    ) -> Self {
        Self {
            session,
            profile,
            session_persisted,
        }
    }
}
